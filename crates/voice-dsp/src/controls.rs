//! Enumerated mixer controls exposed by the voice DSP.
//!
//! Two controls are plain register fields in `DSP_PATH1`; the third is the
//! staged [`ModeSelection`](crate::mode::ModeSelection) and never touches
//! hardware when written.

use platform::rt5670::{REG_DSP_PATH1, RXDP_SRC_SFT, TXDP_SRC_SFT};

/// Identifies one of the driver's controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ControlId {
    /// "RxDP SRC Switch"
    RxDpSrc,
    /// "TxDP SRC Switch"
    TxDpSrc,
    /// "DSP Function Switch"
    DspFunction,
}

/// Where a control's value lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ControlBinding {
    /// Bit field of a codec register, sized to hold every item index.
    Register {
        /// Register index
        reg: u8,
        /// Field shift
        shift: u8,
    },
    /// The staged DSP mode.
    ModeSelection,
}

/// An enumerated control definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnumControl {
    /// Identifier
    pub id: ControlId,
    /// User-visible name
    pub name: &'static str,
    /// Item labels, indexed by value
    pub items: &'static [&'static str],
    /// Storage
    pub binding: ControlBinding,
}

impl EnumControl {
    /// Number of items.
    pub fn item_count(&self) -> u32 {
        u32::try_from(self.items.len()).unwrap_or(u32::MAX)
    }

    /// Label of `item`, if it exists.
    pub fn item_name(&self, item: u32) -> Option<&'static str> {
        usize::try_from(item)
            .ok()
            .and_then(|i| self.items.get(i))
            .copied()
    }

    /// Index of the item labelled `name`.
    pub fn item_index(&self, name: &str) -> Option<u32> {
        self.items
            .iter()
            .position(|label| *label == name)
            .and_then(|i| u32::try_from(i).ok())
    }

    /// Unshifted field mask: enough bits for the highest item index.
    pub fn field_mask(&self) -> u16 {
        let last = self.item_count().saturating_sub(1);
        let highest = u16::try_from(last).unwrap_or(u16::MAX);
        u16::MAX.checked_shr(highest.leading_zeros()).unwrap_or(0)
    }

    /// `true` if `item` is one of the control's items.
    pub fn contains(&self, item: u32) -> bool {
        item < self.item_count()
    }
}

/// "RxDP SRC Switch" items.
pub const RXDP_SRC_ITEMS: [&str; 3] = ["Normal", "Divided by 2", "Divided by 3"];

/// "TxDP SRC Switch" items.
pub const TXDP_SRC_ITEMS: [&str; 3] = ["Normal", "Multiplied by 2", "Multiplied by 3"];

/// "DSP Function Switch" items; item `n` selects firmware mode index `n`.
pub const DSP_MODE_ITEMS: [&str; 5] = ["Mode 1", "Mode 2", "Mode 3", "Mode 4", "Mode 5"];

/// All controls, in registration order.
pub static CONTROLS: [EnumControl; 3] = [
    EnumControl {
        id: ControlId::RxDpSrc,
        name: "RxDP SRC Switch",
        items: &RXDP_SRC_ITEMS,
        binding: ControlBinding::Register {
            reg: REG_DSP_PATH1,
            shift: RXDP_SRC_SFT,
        },
    },
    EnumControl {
        id: ControlId::TxDpSrc,
        name: "TxDP SRC Switch",
        items: &TXDP_SRC_ITEMS,
        binding: ControlBinding::Register {
            reg: REG_DSP_PATH1,
            shift: TXDP_SRC_SFT,
        },
    },
    EnumControl {
        id: ControlId::DspFunction,
        name: "DSP Function Switch",
        items: &DSP_MODE_ITEMS,
        binding: ControlBinding::ModeSelection,
    },
];

impl ControlId {
    /// Definition of this control.
    pub fn control(self) -> &'static EnumControl {
        match self {
            Self::RxDpSrc => &CONTROLS[0],
            Self::TxDpSrc => &CONTROLS[1],
            Self::DspFunction => &CONTROLS[2],
        }
    }

    /// Look a control up by its user-visible name.
    pub fn from_name(name: &str) -> Option<Self> {
        CONTROLS.iter().find(|c| c.name == name).map(|c| c.id)
    }
}
