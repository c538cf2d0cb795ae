//! Shared fixtures for the voice DSP integration suites.

#![allow(dead_code, clippy::indexing_slicing)]

use platform::mocks::{MockDelay, MockRegisterMap};
use platform::rt5670::{REG_DSP_ADDR, REG_DSP_CMD, REG_DSP_DATA_IN};
use voice_dsp::{DspConfig, DspPort};

/// Memory-write command word at 96 kHz.
pub const MW: u16 = 0x3B8B;

/// Two-mode firmware image.
///
/// | index | label  | position | entries |
/// |-------|--------|----------|---------|
/// | 0     | Mode 1 | 0x000A   | 2       |
/// | 1     | Mode 2 | 0x0014   | 3       |
/// | 2     | Mode 3 | 0x0023   | 0       |
pub const TWO_MODE_IMAGE: [u8; 35] = [
    2, //
    0x00, 0x0A, 2, //
    0x00, 0x14, 3, //
    0x00, 0x23, 0, //
    // mode index 0
    0x22, 0xFB, 0x00, 0x01, 0x00, //
    0x22, 0xFC, 0x80, 0x00, 0x00, //
    // mode index 1
    0x23, 0x01, 0x12, 0x34, 0x00, //
    0x23, 0x02, 0x56, 0x78, 0x00, //
    0x23, 0x03, 0x9A, 0xBC, 0x00, //
];

/// Port over fresh spies with the reference configuration.
pub fn port() -> DspPort<MockRegisterMap, MockDelay> {
    DspPort::new(
        MockRegisterMap::new(),
        MockDelay::new(),
        &DspConfig::rt5670(),
    )
}

/// DSP memory writes `(address, data)` recovered from the register log.
pub fn dsp_writes(regs: &MockRegisterMap) -> Vec<(u16, u16)> {
    regs.writes()
        .windows(3)
        .filter(|w| {
            w[0].0 == REG_DSP_ADDR && w[1].0 == REG_DSP_DATA_IN && w[2] == (REG_DSP_CMD, MW)
        })
        .map(|w| (w[0].1, w[1].1))
        .collect()
}
