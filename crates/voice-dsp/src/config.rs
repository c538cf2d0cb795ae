//! Driver configuration
//!
//! [`DspConfig::rt5670`] is the reference configuration; every field maps to
//! a timing or naming constant of the codec's voice firmware.

use crate::command::ClockRate;

/// Firmware file requested at probe.
pub const DSP_FIRMWARE_NAME: &str = "rt567x_dsp.bin";

/// Busy-poll bound for the DSP status register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PollPolicy {
    /// Status reads before giving up (initial read plus retries).
    /// Zero is treated as one: the status is always read at least once.
    pub max_polls: u8,
    /// Wait between consecutive status reads, in microseconds.
    pub interval_us: u32,
}

impl PollPolicy {
    /// One read plus ten immediate retries.
    pub const RT5670: Self = Self {
        max_polls: 11,
        interval_us: 0,
    };

    /// Effective number of status reads.
    pub const fn polls(self) -> u8 {
        if self.max_polls == 0 {
            1
        } else {
            self.max_polls
        }
    }
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self::RT5670
    }
}

/// Voice DSP driver configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DspConfig {
    /// Status polling.
    pub poll: PollPolicy,
    /// Clock field of every command word.
    pub clock: ClockRate,
    /// Settle time after the reset pulse, milliseconds.
    pub reset_settle_ms: u32,
    /// Settle time between the baseline mode and the power-down write at
    /// probe, milliseconds.
    pub probe_settle_ms: u32,
    /// Firmware file requested at probe.
    pub firmware_name: &'static str,
}

impl DspConfig {
    /// RT5670 reference configuration.
    pub const fn rt5670() -> Self {
        Self {
            poll: PollPolicy::RT5670,
            clock: ClockRate::Khz96,
            reset_settle_ms: 10,
            probe_settle_ms: 15,
            firmware_name: DSP_FIRMWARE_NAME,
        }
    }

    /// Builder: replace the poll policy.
    #[must_use]
    pub const fn with_poll(mut self, poll: PollPolicy) -> Self {
        self.poll = poll;
        self
    }

    /// Builder: request a different firmware file.
    #[must_use]
    pub const fn with_firmware_name(mut self, name: &'static str) -> Self {
        self.firmware_name = name;
        self
    }
}

impl Default for DspConfig {
    fn default() -> Self {
        Self::rt5670()
    }
}
