//! DSP command words.
//!
//! A command is issued by writing one 16-bit word to DSP Control 1 after the
//! address (and, for writes, data) registers are loaded. The word layout is
//! fixed by the silicon; see [`platform::rt5670`] for the field table.
//!
//! | Command        | Opcode | Burst | Direction | 16-bit addr | Word @ 96 kHz |
//! |----------------|--------|-------|-----------|-------------|---------------|
//! | memory write   | 0x3B   | 2     | write     | yes         | `0x3B8B`      |
//! | memory read    | 0x37   | 0     | read      | yes         | `0x3793`      |
//! | register read  | 0x60   | 1     | read      | no          | `0x6095`      |

use platform::rt5670::{
    DSP_BUSY_MASK, DSP_CLK_192K, DSP_CLK_384K, DSP_CLK_64K, DSP_CLK_96K, DSP_CMD_EN, DSP_CMD_MR,
    DSP_CMD_MW, DSP_CMD_PE, DSP_CMD_RR, DSP_CMD_RW, DSP_CMD_SFT, DSP_DL_0, DSP_DL_1, DSP_DL_2,
    DSP_DL_3, DSP_I2C_AL_16, DSP_RW_MASK,
};

/// Command opcode (bits 15:8).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Opcode {
    /// Patch entry
    PatchEntry = DSP_CMD_PE,
    /// Memory write
    MemoryWrite = DSP_CMD_MW,
    /// Memory read (stages a value for register reads)
    MemoryRead = DSP_CMD_MR,
    /// Register read
    RegisterRead = DSP_CMD_RR,
    /// Register write
    RegisterWrite = DSP_CMD_RW,
}

/// DSP clock rate selector (bits 7:6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockRate {
    /// 384 kHz
    Khz384,
    /// 192 kHz
    Khz192,
    /// 96 kHz, the only rate the voice firmware is built for
    #[default]
    Khz96,
    /// 64 kHz
    Khz64,
}

impl ClockRate {
    /// Field value, already shifted into place.
    pub const fn bits(self) -> u16 {
        match self {
            Self::Khz384 => DSP_CLK_384K,
            Self::Khz192 => DSP_CLK_192K,
            Self::Khz96 => DSP_CLK_96K,
            Self::Khz64 => DSP_CLK_64K,
        }
    }
}

/// Burst length in 16-bit words (bits 3:2).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BurstLength {
    /// No data words
    Words0,
    /// One data word
    Words1,
    /// Two data words
    Words2,
    /// Three data words
    Words3,
}

impl BurstLength {
    /// Field value, already shifted into place.
    pub const fn bits(self) -> u16 {
        match self {
            Self::Words0 => DSP_DL_0,
            Self::Words1 => DSP_DL_1,
            Self::Words2 => DSP_DL_2,
            Self::Words3 => DSP_DL_3,
        }
    }
}

/// A complete value for DSP Control 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CommandWord {
    /// Operation
    pub opcode: Opcode,
    /// DSP clock
    pub clock: ClockRate,
    /// Burst length
    pub burst: BurstLength,
    /// Direction flag (set for reads)
    pub read: bool,
    /// 16-bit address width
    pub wide_address: bool,
}

impl CommandWord {
    /// Memory write of the loaded address/data pair.
    pub const fn memory_write(clock: ClockRate) -> Self {
        Self {
            opcode: Opcode::MemoryWrite,
            clock,
            burst: BurstLength::Words2,
            read: false,
            wide_address: true,
        }
    }

    /// Memory read: stages the value at the loaded address inside the DSP.
    pub const fn memory_read(clock: ClockRate) -> Self {
        Self {
            opcode: Opcode::MemoryRead,
            clock,
            burst: BurstLength::Words0,
            read: true,
            wide_address: true,
        }
    }

    /// Register read: selects one half of the staged value for data-out.
    pub const fn register_read(clock: ClockRate) -> Self {
        Self {
            opcode: Opcode::RegisterRead,
            clock,
            burst: BurstLength::Words1,
            read: true,
            wide_address: false,
        }
    }

    /// Encoded register value, command-enable bit included.
    #[allow(clippy::arithmetic_side_effects)] // constant shift of a u8 into the top byte
    pub const fn bits(self) -> u16 {
        let mut word = ((self.opcode as u16) << DSP_CMD_SFT)
            | self.clock.bits()
            | self.burst.bits()
            | DSP_CMD_EN;
        if self.read {
            word |= DSP_RW_MASK;
        }
        if self.wide_address {
            word |= DSP_I2C_AL_16;
        }
        word
    }
}

impl From<CommandWord> for u16 {
    fn from(word: CommandWord) -> Self {
        word.bits()
    }
}

/// `true` while the DSP is still executing the last command.
pub const fn is_busy(status: u16) -> bool {
    status & DSP_BUSY_MASK != 0
}

/// A single DSP access, built per call and never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DspCommand {
    /// Read the DSP word at `address`.
    Read {
        /// DSP address
        address: u16,
    },
    /// Write `data` to the DSP word at `address`.
    Write {
        /// DSP address
        address: u16,
        /// Value
        data: u16,
    },
}

impl DspCommand {
    /// Target DSP address.
    pub const fn address(self) -> u16 {
        match self {
            Self::Read { address } | Self::Write { address, .. } => address,
        }
    }
}
