//! Staged DSP mode selection.
//!
//! The control surface only records which firmware mode should be active;
//! the mode's writes are replayed on the next power-up. Setting a value is
//! therefore free of register traffic.

/// The firmware mode index to apply on the next power-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ModeSelection(u32);

impl ModeSelection {
    /// Mode applied at probe and selected by default.
    pub const BASELINE: u32 = 0;

    /// Start with `mode` selected.
    pub const fn new(mode: u32) -> Self {
        Self(mode)
    }

    /// Selected mode index.
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Select `mode`. Returns `true` if the selection changed.
    ///
    /// No range check: an index the firmware lacks is reported when the
    /// mode is applied.
    pub fn set(&mut self, mode: u32) -> bool {
        if self.0 == mode {
            return false;
        }
        self.0 = mode;
        true
    }
}
