//! Voice DSP driver
//!
//! [`VoiceDsp`] owns the command port, the firmware slot and the staged mode,
//! and is what the host audio framework talks to:
//!
//! - `probe` brings the DSP up once, leaves it powered down and requests
//!   the firmware file;
//! - `firmware_loaded` completes that request;
//! - `handle_event` runs the supply widget's power hooks;
//! - `control_get` / `control_put` back the mixer controls.

use embedded_hal::delay::DelayNs;
use platform::{FirmwareRequest, RegisterMap};

use crate::config::DspConfig;
use crate::controls::{ControlBinding, ControlId, CONTROLS};
use crate::error::DspError;
use crate::firmware::{FirmwareImage, FirmwareSlot};
use crate::mode::ModeSelection;
use crate::port::DspPort;
use crate::power::{self, DspEvent};
use crate::widgets::{ROUTES, WIDGETS};

/// The RT5670 voice DSP.
///
/// `B` is the owner type of the firmware bytes (`Vec<u8>`, `&'static [u8]`,
/// `Arc<[u8]>`...).
pub struct VoiceDsp<R, D, B> {
    port: DspPort<R, D>,
    config: DspConfig,
    firmware: FirmwareSlot<B>,
    mode: ModeSelection,
}

impl<R, D, B> VoiceDsp<R, D, B>
where
    R: RegisterMap,
    D: DelayNs,
    B: AsRef<[u8]>,
{
    /// Initialise the DSP and request its firmware.
    ///
    /// Sequence: power domain on, reset pulse, baseline mode, settle,
    /// power-down write, power domain off, firmware request. No step is
    /// fatal: a failed step is logged and the sequence carries on, so the
    /// power domain is always switched back off and the firmware is always
    /// requested. The baseline mode is skipped on a first probe since no
    /// firmware is available yet.
    pub fn probe<F>(regs: R, delay: D, config: DspConfig, loader: &mut F) -> Self
    where
        F: FirmwareRequest + ?Sized,
    {
        let mut dsp = Self::new(regs, delay, config, FirmwareSlot::Pending);
        dsp.initialise();
        tracing::debug!(name = dsp.config.firmware_name, "requesting DSP firmware");
        loader.request_firmware(dsp.config.firmware_name);
        dsp
    }

    /// Initialise the DSP with an image that is already in memory.
    ///
    /// Same sequence as [`probe`](Self::probe), but the baseline mode is
    /// applied from `image` and no firmware request is made.
    pub fn probe_with_firmware(
        regs: R,
        delay: D,
        config: DspConfig,
        image: FirmwareImage<B>,
    ) -> Self {
        let mut dsp = Self::new(regs, delay, config, FirmwareSlot::Loaded(image));
        dsp.initialise();
        dsp
    }

    fn new(regs: R, delay: D, config: DspConfig, firmware: FirmwareSlot<B>) -> Self {
        Self {
            port: DspPort::new(regs, delay, &config),
            config,
            firmware,
            mode: ModeSelection::default(),
        }
    }

    fn initialise(&mut self) {
        if let Err(err) = power::set_power_domain(&mut self.port, true) {
            tracing::warn!(error = ?err, "DSP power domain not switched on");
        }
        if let Err(err) = power::reset_pulse(&mut self.port, self.config.reset_settle_ms) {
            tracing::warn!(error = ?err, "DSP reset failed");
        }
        if let Err(err) = self.apply_mode(ModeSelection::BASELINE) {
            tracing::warn!(error = ?err, "baseline DSP mode not applied");
        }
        self.port.settle_ms(self.config.probe_settle_ms);
        if let Err(err) = power::quiesce(&mut self.port) {
            tracing::warn!(error = ?err, "DSP power-down write failed");
        }
        if let Err(err) = power::set_power_domain(&mut self.port, false) {
            tracing::warn!(error = ?err, "DSP power domain not switched off");
        }
        tracing::debug!(
            controls = CONTROLS.len(),
            widgets = WIDGETS.len(),
            routes = ROUTES.len(),
            "voice DSP ready"
        );
    }

    /// Completion of the firmware request: `Some(bytes)` or `None` on failure.
    pub fn firmware_loaded(&mut self, data: Option<B>) {
        self.firmware.complete(data);
    }

    /// Firmware availability.
    pub fn firmware(&self) -> &FirmwareSlot<B> {
        &self.firmware
    }

    /// Replay firmware mode `mode` now. Returns the number of DSP writes.
    pub fn apply_mode(&mut self, mode: u32) -> Result<usize, DspError<R::Error>> {
        let image = self.firmware.image().ok_or(DspError::NoFirmware)?;
        image.apply_mode(&mut self.port, mode)
    }

    /// Run the supply widget's hook for `event`.
    ///
    /// Every step of the transition runs even if an earlier one failed; the
    /// first failure is returned.
    pub fn handle_event(&mut self, event: DspEvent) -> Result<(), DspError<R::Error>> {
        tracing::debug!(?event, mode = self.mode.get(), "DSP power event");
        match event {
            DspEvent::PostPowerDown => {
                let quiesced = power::quiesce(&mut self.port);
                if let Err(err) = &quiesced {
                    tracing::warn!(error = ?err, "DSP power-down write failed");
                }
                quiesced
            }
            DspEvent::PostPowerUp => {
                let reset = power::reset_pulse(&mut self.port, self.config.reset_settle_ms);
                if let Err(err) = &reset {
                    tracing::warn!(error = ?err, "DSP reset failed");
                }
                let applied = self.apply_mode(self.mode.get()).map(|_| ());
                if let Err(err) = &applied {
                    tracing::warn!(mode = self.mode.get(), error = ?err, "DSP mode not applied");
                }
                reset.and(applied)
            }
        }
    }

    /// Staged mode index.
    pub fn mode(&self) -> u32 {
        self.mode.get()
    }

    /// Stage `mode` for the next power-up. Returns `true` if it changed.
    /// Never touches registers.
    pub fn set_mode(&mut self, mode: u32) -> bool {
        let changed = self.mode.set(mode);
        if changed {
            tracing::debug!(mode, "DSP mode staged");
        }
        changed
    }

    /// Current item index of control `id`.
    pub fn control_get(&mut self, id: ControlId) -> Result<u32, DspError<R::Error>> {
        let control = id.control();
        match control.binding {
            ControlBinding::Register { reg, shift } => {
                let value = self.port.read_register(reg)?;
                let field = value.checked_shr(u32::from(shift)).unwrap_or(0) & control.field_mask();
                Ok(u32::from(field))
            }
            ControlBinding::ModeSelection => Ok(self.mode.get()),
        }
    }

    /// Set control `id` to item `item`. Returns `true` if the value changed.
    pub fn control_put(&mut self, id: ControlId, item: u32) -> Result<bool, DspError<R::Error>> {
        let control = id.control();
        if !control.contains(item) {
            return Err(DspError::InvalidItem { control: id, item });
        }
        match control.binding {
            ControlBinding::Register { reg, shift } => {
                let shift = u32::from(shift);
                let mask = control.field_mask().checked_shl(shift).unwrap_or(0);
                let field = u16::try_from(item).unwrap_or(u16::MAX);
                let value = field.checked_shl(shift).unwrap_or(0);
                self.port.update_bits(reg, mask, value)
            }
            ControlBinding::ModeSelection => Ok(self.set_mode(item)),
        }
    }

    /// Write one DSP word directly.
    pub fn dsp_write(&mut self, address: u16, data: u16) -> Result<(), DspError<R::Error>> {
        self.port.write(address, data)
    }

    /// Read one DSP word directly.
    pub fn dsp_read(&mut self, address: u16) -> Result<u16, DspError<R::Error>> {
        self.port.read(address)
    }

    /// Active configuration.
    pub fn config(&self) -> &DspConfig {
        &self.config
    }

    /// The command port.
    pub fn port(&self) -> &DspPort<R, D> {
        &self.port
    }

    /// Mutable access to the command port.
    pub fn port_mut(&mut self) -> &mut DspPort<R, D> {
        &mut self.port
    }

    /// Tear down, returning the register map, the delay source and the
    /// firmware slot.
    pub fn release(self) -> (R, D, FirmwareSlot<B>) {
        let (regs, delay) = self.port.release();
        (regs, delay, self.firmware)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::arithmetic_side_effects)]
mod tests {
    use super::*;
    use platform::mocks::{MockDelay, MockFirmwareRequest, MockRegisterMap};
    use platform::rt5670::REG_DSP_PATH1;

    type TestDsp = VoiceDsp<MockRegisterMap, MockDelay, Vec<u8>>;

    fn probed() -> TestDsp {
        let mut loader = MockFirmwareRequest::new();
        let dsp = TestDsp::probe(
            MockRegisterMap::new(),
            MockDelay::new(),
            DspConfig::rt5670(),
            &mut loader,
        );
        assert_eq!(loader.requested, ["rt567x_dsp.bin"]);
        dsp
    }

    #[test]
    fn apply_without_firmware() {
        let mut dsp = probed();
        assert_eq!(dsp.apply_mode(0), Err(DspError::NoFirmware));
        dsp.firmware_loaded(None);
        assert_eq!(dsp.apply_mode(0), Err(DspError::NoFirmware));
    }

    #[test]
    fn src_controls_are_register_fields() {
        let mut dsp = probed();
        assert!(dsp.control_put(ControlId::RxDpSrc, 2).unwrap());
        assert!(dsp.control_put(ControlId::TxDpSrc, 1).unwrap());
        assert!(!dsp.control_put(ControlId::TxDpSrc, 1).unwrap());
        assert_eq!(dsp.port().registers().value(REG_DSP_PATH1), 0b1001 << 12);
        assert_eq!(dsp.control_get(ControlId::RxDpSrc).unwrap(), 2);
        assert_eq!(dsp.control_get(ControlId::TxDpSrc).unwrap(), 1);
    }

    #[test]
    fn out_of_range_items_are_rejected() {
        let mut dsp = probed();
        assert_eq!(
            dsp.control_put(ControlId::RxDpSrc, 3),
            Err(DspError::InvalidItem {
                control: ControlId::RxDpSrc,
                item: 3,
            })
        );
        assert_eq!(
            dsp.control_put(ControlId::DspFunction, 5),
            Err(DspError::InvalidItem {
                control: ControlId::DspFunction,
                item: 5,
            })
        );
        assert_eq!(dsp.mode(), 0);
    }

    #[test]
    fn function_switch_is_the_staged_mode() {
        let mut dsp = probed();
        assert!(dsp.control_put(ControlId::DspFunction, 3).unwrap());
        assert_eq!(dsp.mode(), 3);
        assert_eq!(dsp.control_get(ControlId::DspFunction).unwrap(), 3);
        assert!(!dsp.set_mode(3));
    }
}
