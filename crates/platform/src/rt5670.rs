//! RT5670 codec register addresses and DSP command-word fields.
//!
//! Reference: Realtek RT5670 register map, DSP control block (0xE0–0xE4).
//!
//! The voice DSP is never addressed directly. The host drives it through
//! three narrow codec registers (address, data-in, command/status) and reads
//! results back through a fourth (data-out). Every field below is a hardware
//! contract and must match the silicon bit-exact.
//!
//! # DSP Control 1 (0xE0) layout
//!
//! | Bits  | Field          | Notes                                  |
//! |-------|----------------|----------------------------------------|
//! | 15:8  | command opcode | MW 0x3B, MR 0x37, RR 0x60, RW 0x68     |
//! | 7:6   | DSP clock      | 384k / 192k / 96k / 64k                |
//! | 5     | busy           | status only, set while a command runs  |
//! | 4     | direction      | 1 = read                               |
//! | 3:2   | burst length   | 0–3 words                              |
//! | 1     | address width  | 1 = 16-bit I²C addressing              |
//! | 0     | command enable | write 1 to start the command           |

/// 7-bit I²C device address of the RT5670.
pub const RT5670_I2C_ADDR: u8 = 0x1C;

/// DSP Path Control 1: RxDP/TxDP sample-rate conversion selects.
pub const REG_DSP_PATH1: u8 = 0x2D;
/// Digital power management 2 (holds the I²S/DSP power-domain bit).
pub const REG_PWR_DIG2: u8 = 0x62;
/// DSP Control 1: command word on write, status (busy bit) on read.
pub const REG_DSP_CTRL1: u8 = 0xE0;
/// DSP Control 2: DSP address register.
pub const REG_DSP_CTRL2: u8 = 0xE1;
/// DSP Control 3: DSP data-in register.
pub const REG_DSP_CTRL3: u8 = 0xE2;
/// DSP Control 4.
pub const REG_DSP_CTRL4: u8 = 0xE3;
/// DSP Control 5: DSP data-out register.
pub const REG_DSP_CTRL5: u8 = 0xE4;
/// Digital miscellaneous control (holds the DSP reset bit).
pub const REG_DIG_MISC: u8 = 0xFA;

/// Alias: the DSP command register.
pub const REG_DSP_CMD: u8 = REG_DSP_CTRL1;
/// Alias: the DSP address register.
pub const REG_DSP_ADDR: u8 = REG_DSP_CTRL2;
/// Alias: the DSP data-in register.
pub const REG_DSP_DATA_IN: u8 = REG_DSP_CTRL3;
/// Alias: the DSP data-out register.
pub const REG_DSP_DATA_OUT: u8 = REG_DSP_CTRL5;

/// PWR_DIG2: I²S/DSP power domain.
pub const PWR_I2S_DSP: u16 = 1 << 12;
/// DIG_MISC: DSP reset (assert high, then release).
pub const RST_DSP: u16 = 1 << 13;

/// DSP_PATH1: RxDP SRC select field shift (bits 15:14).
pub const RXDP_SRC_SFT: u8 = 14;
/// DSP_PATH1: TxDP SRC select field shift (bits 13:12).
pub const TXDP_SRC_SFT: u8 = 12;

// ---------------------------------------------------------------------------
// DSP Control 1 fields
// ---------------------------------------------------------------------------

/// Opcode field shift.
pub const DSP_CMD_SFT: u8 = 8;
/// Opcode field mask.
pub const DSP_CMD_MASK: u16 = 0xFF << 8;
/// Opcode: patch entry.
pub const DSP_CMD_PE: u8 = 0x0D;
/// Opcode: memory write.
pub const DSP_CMD_MW: u8 = 0x3B;
/// Opcode: memory read.
pub const DSP_CMD_MR: u8 = 0x37;
/// Opcode: register read.
pub const DSP_CMD_RR: u8 = 0x60;
/// Opcode: register write.
pub const DSP_CMD_RW: u8 = 0x68;

/// DSP clock field mask.
pub const DSP_CLK_MASK: u16 = 0x3 << 6;
/// DSP clock: 384 kHz.
pub const DSP_CLK_384K: u16 = 0x0 << 6;
/// DSP clock: 192 kHz.
pub const DSP_CLK_192K: u16 = 0x1 << 6;
/// DSP clock: 96 kHz.
pub const DSP_CLK_96K: u16 = 0x2 << 6;
/// DSP clock: 64 kHz.
pub const DSP_CLK_64K: u16 = 0x3 << 6;

/// Busy flag (status read of DSP Control 1).
pub const DSP_BUSY_MASK: u16 = 1 << 5;
/// Direction flag: set for reads.
pub const DSP_RW_MASK: u16 = 1 << 4;

/// Burst length field mask.
pub const DSP_DL_MASK: u16 = 0x3 << 2;
/// Burst length: 0 words.
pub const DSP_DL_0: u16 = 0x0 << 2;
/// Burst length: 1 word.
pub const DSP_DL_1: u16 = 0x1 << 2;
/// Burst length: 2 words.
pub const DSP_DL_2: u16 = 0x2 << 2;
/// Burst length: 3 words.
pub const DSP_DL_3: u16 = 0x3 << 2;

/// 16-bit I²C address width.
pub const DSP_I2C_AL_16: u16 = 1 << 1;
/// Command enable.
pub const DSP_CMD_EN: u16 = 1;

/// DSP internal index of the staged value's high half.
pub const DSP_REG_DATHI: u16 = 0x26;
/// DSP internal index of the staged value's low half.
pub const DSP_REG_DATLO: u16 = 0x25;

#[cfg(test)]
#[allow(clippy::arithmetic_side_effects)]
mod tests {
    use super::*;

    #[test]
    fn i2c_addr_matches_datasheet() {
        assert_eq!(RT5670_I2C_ADDR, 0x1C);
    }

    #[test]
    fn dsp_control_block_is_contiguous() {
        assert_eq!(REG_DSP_CTRL2, REG_DSP_CTRL1 + 1);
        assert_eq!(REG_DSP_CTRL3, REG_DSP_CTRL1 + 2);
        assert_eq!(REG_DSP_CTRL4, REG_DSP_CTRL1 + 3);
        assert_eq!(REG_DSP_CTRL5, REG_DSP_CTRL1 + 4);
    }

    #[test]
    fn aliases_point_at_control_block() {
        assert_eq!(REG_DSP_CMD, 0xE0);
        assert_eq!(REG_DSP_ADDR, 0xE1);
        assert_eq!(REG_DSP_DATA_IN, 0xE2);
        assert_eq!(REG_DSP_DATA_OUT, 0xE4);
    }

    #[test]
    fn dig_misc_and_pwr_dig2_addresses() {
        assert_eq!(REG_DIG_MISC, 0xFA);
        assert_eq!(REG_PWR_DIG2, 0x62);
        assert_eq!(REG_DSP_PATH1, 0x2D);
    }

    #[test]
    fn dsp_ctrl1_fields_do_not_overlap() {
        let fields = [
            DSP_CMD_MASK,
            DSP_CLK_MASK,
            DSP_BUSY_MASK,
            DSP_RW_MASK,
            DSP_DL_MASK,
            DSP_I2C_AL_16,
            DSP_CMD_EN,
        ];
        for (i, a) in fields.iter().enumerate() {
            for b in fields.iter().skip(i + 1) {
                assert_eq!(a & b, 0, "{a:#06x} overlaps {b:#06x}");
            }
        }
        assert_eq!(fields.iter().fold(0, |acc, f| acc | f), 0xFFFF);
    }

    #[test]
    fn clock_and_burst_values_sit_inside_their_masks() {
        for clk in [DSP_CLK_384K, DSP_CLK_192K, DSP_CLK_96K, DSP_CLK_64K] {
            assert_eq!(clk & !DSP_CLK_MASK, 0);
        }
        for dl in [DSP_DL_0, DSP_DL_1, DSP_DL_2, DSP_DL_3] {
            assert_eq!(dl & !DSP_DL_MASK, 0);
        }
        assert_eq!(DSP_CMD_MASK >> DSP_CMD_SFT, 0xFF);
        assert_eq!(DSP_CLK_MASK.count_ones(), 2);
        assert_eq!(DSP_DL_MASK.count_ones(), 2);
    }

    #[test]
    fn opcodes_are_distinct() {
        let v = [DSP_CMD_PE, DSP_CMD_MW, DSP_CMD_MR, DSP_CMD_RR, DSP_CMD_RW];
        for (i, a) in v.iter().enumerate() {
            for b in v.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn staged_value_halves_are_adjacent() {
        assert_eq!(DSP_REG_DATHI, DSP_REG_DATLO + 1);
    }

    #[test]
    fn src_fields_fit_in_register() {
        assert!(u32::from(RXDP_SRC_SFT) + 2 <= 16);
        assert_eq!((0x3u16 << RXDP_SRC_SFT) & (0x3u16 << TXDP_SRC_SFT), 0);
    }

    #[test]
    fn power_and_reset_bits_are_single_bits() {
        assert_eq!(PWR_I2S_DSP.count_ones(), 1);
        assert_eq!(RST_DSP.count_ones(), 1);
    }
}
