//! Power transitions of the voice DSP supply.
//!
//! The host audio framework raises [`DspEvent`]s around the supply widget's
//! power changes; the sequences here are what each event does to the codec.

use embedded_hal::delay::DelayNs;
use platform::rt5670::{PWR_I2S_DSP, REG_DIG_MISC, REG_PWR_DIG2, RST_DSP};
use platform::RegisterMap;

use crate::error::DspError;
use crate::port::DspPort;

/// DSP parameter written on power-down.
pub const DSP_QUIESCE_ADDR: u16 = 0x22F9;

/// Value written to [`DSP_QUIESCE_ADDR`].
pub const DSP_QUIESCE_VALUE: u16 = 0x0001;

/// Supply widget power events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DspEvent {
    /// The supply has just been switched off.
    PostPowerDown,
    /// The supply has just been switched on.
    PostPowerUp,
}

/// Pulse `DIG_MISC.RST_DSP` (assert, deassert) and wait `settle_ms`.
pub fn reset_pulse<R, D>(
    port: &mut DspPort<R, D>,
    settle_ms: u32,
) -> Result<(), DspError<R::Error>>
where
    R: RegisterMap,
    D: DelayNs,
{
    port.update_bits(REG_DIG_MISC, RST_DSP, RST_DSP)?;
    port.update_bits(REG_DIG_MISC, RST_DSP, 0)?;
    port.settle_ms(settle_ms);
    Ok(())
}

/// Write the power-down parameter.
pub fn quiesce<R, D>(port: &mut DspPort<R, D>) -> Result<(), DspError<R::Error>>
where
    R: RegisterMap,
    D: DelayNs,
{
    port.write(DSP_QUIESCE_ADDR, DSP_QUIESCE_VALUE)
}

/// Switch the DSP's I2S power domain.
pub fn set_power_domain<R, D>(
    port: &mut DspPort<R, D>,
    on: bool,
) -> Result<(), DspError<R::Error>>
where
    R: RegisterMap,
    D: DelayNs,
{
    let value = if on { PWR_I2S_DSP } else { 0 };
    port.update_bits(REG_PWR_DIG2, PWR_I2S_DSP, value)?;
    tracing::debug!(on, "DSP power domain");
    Ok(())
}
