//! Command/poll engine
//!
//! The DSP is reached through three codec registers: an address register, a
//! data-in register and a command/status register. A command is issued by
//! loading address (and data), then writing a [`CommandWord`]; completion is
//! observed by polling the busy bit of the same command register.
//!
//! ```text
//! write(addr, data):  ADDR ← addr, DATA_IN ← data, CMD ← MW, wait_ready
//!
//! read(addr):         wait_ready
//!                     ADDR ← addr, CMD ← MR
//!                     wait_ready, ADDR ← 0x26, CMD ← RR
//!                     wait_ready, ADDR ← 0x25, CMD ← RR
//!                     wait_ready, DATA_OUT
//! ```
//!
//! Every step is a separate register access; the first failure aborts the
//! sequence and nothing is rolled back.

use embedded_hal::delay::DelayNs;
use platform::rt5670::{
    DSP_REG_DATHI, DSP_REG_DATLO, REG_DSP_ADDR, REG_DSP_CMD, REG_DSP_DATA_IN, REG_DSP_DATA_OUT,
};
use platform::RegisterMap;

use crate::command::{is_busy, ClockRate, CommandWord, DspCommand};
use crate::config::{DspConfig, PollPolicy};
use crate::error::DspError;

/// Exclusive handle on the DSP command registers.
///
/// Owning the register map (or a `&mut` to it) is what guarantees a single
/// command in flight: every operation takes `&mut self`.
pub struct DspPort<R, D> {
    regs: R,
    delay: D,
    poll: PollPolicy,
    clock: ClockRate,
}

impl<R: RegisterMap, D: DelayNs> DspPort<R, D> {
    /// Wrap a register map and delay source.
    pub fn new(regs: R, delay: D, config: &DspConfig) -> Self {
        Self {
            regs,
            delay,
            poll: config.poll,
            clock: config.clock,
        }
    }

    /// Poll the busy bit until it clears.
    ///
    /// Reads the status register at most [`PollPolicy::polls`] times and
    /// returns [`DspError::Busy`] only if every read reported busy.
    pub fn wait_ready(&mut self) -> Result<(), DspError<R::Error>> {
        let polls = self.poll.polls();
        for attempt in 0..polls {
            if attempt > 0 && self.poll.interval_us > 0 {
                self.delay.delay_us(self.poll.interval_us);
            }
            let status = self.regs.read_register(REG_DSP_CMD).map_err(DspError::Io)?;
            if !is_busy(status) {
                return Ok(());
            }
        }
        tracing::debug!(polls, "DSP busy bit never cleared");
        Err(DspError::Busy { polls })
    }

    /// Write one 16-bit word into DSP memory.
    pub fn write(&mut self, address: u16, data: u16) -> Result<(), DspError<R::Error>> {
        tracing::trace!(address, data, "DSP write");
        let written = self.try_write(address, data);
        if let Err(err) = &written {
            tracing::warn!(address, data, error = ?err, "DSP write failed");
        }
        written
    }

    /// Read one 16-bit word from DSP memory.
    ///
    /// The result is the content of the 16-bit data-out register, so it is
    /// returned as `u16`; callers wanting a 32-bit value widen it with
    /// `u32::from`.
    pub fn read(&mut self, address: u16) -> Result<u16, DspError<R::Error>> {
        let value = self.try_read(address);
        match &value {
            Ok(value) => tracing::trace!(address, value, "DSP read"),
            Err(err) => tracing::warn!(address, error = ?err, "DSP read failed"),
        }
        value
    }

    /// Run a transient command. Reads yield `Some(value)`.
    pub fn execute(&mut self, command: DspCommand) -> Result<Option<u16>, DspError<R::Error>> {
        match command {
            DspCommand::Read { address } => self.read(address).map(Some),
            DspCommand::Write { address, data } => self.write(address, data).map(|()| None),
        }
    }

    /// Block for `ms` milliseconds on the injected delay.
    pub fn settle_ms(&mut self, ms: u32) {
        if ms > 0 {
            self.delay.delay_ms(ms);
        }
    }

    /// Read-modify-write a codec register outside the DSP command window.
    pub fn update_bits(
        &mut self,
        reg: u8,
        mask: u16,
        value: u16,
    ) -> Result<bool, DspError<R::Error>> {
        self.regs
            .update_bits(reg, mask, value)
            .map_err(DspError::Io)
    }

    /// Read a codec register outside the DSP command window.
    ///
    /// Codec registers are 16 bits wide, hence `u16`.
    pub fn read_register(&mut self, reg: u8) -> Result<u16, DspError<R::Error>> {
        self.regs.read_register(reg).map_err(DspError::Io)
    }

    /// Clock rate encoded into command words.
    pub fn clock(&self) -> ClockRate {
        self.clock
    }

    /// Borrow the register map.
    pub fn registers(&self) -> &R {
        &self.regs
    }

    /// Mutably borrow the register map.
    pub fn registers_mut(&mut self) -> &mut R {
        &mut self.regs
    }

    /// Borrow the delay source.
    pub fn delay(&self) -> &D {
        &self.delay
    }

    /// Give back the register map and delay source.
    pub fn release(self) -> (R, D) {
        (self.regs, self.delay)
    }

    fn try_write(&mut self, address: u16, data: u16) -> Result<(), DspError<R::Error>> {
        self.set_address(address)?;
        self.regs
            .write_register(REG_DSP_DATA_IN, data)
            .map_err(DspError::Io)?;
        self.issue(CommandWord::memory_write(self.clock))?;
        self.wait_ready()
    }

    fn try_read(&mut self, address: u16) -> Result<u16, DspError<R::Error>> {
        let register_read = CommandWord::register_read(self.clock);

        self.wait_ready()?;
        self.set_address(address)?;
        self.issue(CommandWord::memory_read(self.clock))?;

        self.wait_ready()?;
        self.set_address(DSP_REG_DATHI)?;
        self.issue(register_read)?;

        self.wait_ready()?;
        self.set_address(DSP_REG_DATLO)?;
        self.issue(register_read)?;

        self.wait_ready()?;
        self.regs
            .read_register(REG_DSP_DATA_OUT)
            .map_err(DspError::Io)
    }

    fn set_address(&mut self, address: u16) -> Result<(), DspError<R::Error>> {
        self.regs
            .write_register(REG_DSP_ADDR, address)
            .map_err(DspError::Io)
    }

    fn issue(&mut self, word: CommandWord) -> Result<(), DspError<R::Error>> {
        self.regs
            .write_register(REG_DSP_CMD, word.bits())
            .map_err(DspError::Io)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use platform::mocks::{MockBusError, MockDelay, MockRegisterMap, RegisterAccess};
    use platform::rt5670::DSP_BUSY_MASK;

    fn port() -> DspPort<MockRegisterMap, MockDelay> {
        DspPort::new(
            MockRegisterMap::new(),
            MockDelay::new(),
            &DspConfig::rt5670(),
        )
    }

    #[test]
    fn idle_status_needs_one_poll() {
        let mut port = port();
        port.wait_ready().unwrap();
        assert_eq!(port.registers().reads_of(REG_DSP_CMD), 1);
    }

    #[test]
    fn busy_then_idle_stops_polling() {
        let mut port = port();
        port.registers_mut()
            .script_reads(REG_DSP_CMD, [DSP_BUSY_MASK; 4]);
        port.wait_ready().unwrap();
        assert_eq!(port.registers().reads_of(REG_DSP_CMD), 5);
    }

    #[test]
    fn interval_is_served_between_polls_only() {
        let poll = PollPolicy {
            max_polls: 3,
            interval_us: 20,
        };
        let config = DspConfig::rt5670().with_poll(poll);
        let mut port = DspPort::new(MockRegisterMap::new(), MockDelay::new(), &config);
        port.registers_mut()
            .script_reads(REG_DSP_CMD, [DSP_BUSY_MASK; 3]);
        assert_eq!(port.wait_ready(), Err(DspError::Busy { polls: 3 }));
        assert_eq!(port.delay().waits_ns(), [20_000, 20_000]);
    }

    #[test]
    fn status_read_failure_is_io() {
        let mut port = port();
        port.registers_mut().fail_reads_of(REG_DSP_CMD);
        let err = DspError::Io(MockBusError { reg: REG_DSP_CMD });
        assert_eq!(port.wait_ready(), Err(err));
    }

    #[test]
    fn write_sequence() {
        let mut port = port();
        port.write(0x22F9, 0x0001).unwrap();
        assert_eq!(
            port.registers().accesses(),
            [
                RegisterAccess::Write(REG_DSP_ADDR, 0x22F9),
                RegisterAccess::Write(REG_DSP_DATA_IN, 0x0001),
                RegisterAccess::Write(REG_DSP_CMD, 0x3B8B),
                RegisterAccess::Read(REG_DSP_CMD),
            ]
        );
    }

    #[test]
    fn data_write_failure_stops_before_command() {
        let mut port = port();
        port.registers_mut().fail_writes_to(REG_DSP_DATA_IN);
        assert!(port.write(0x1000, 2).unwrap_err().is_io());
        assert_eq!(port.registers().accesses().len(), 2);
    }

    #[test]
    fn read_returns_data_out() {
        let mut port = port();
        port.registers_mut().set_value(REG_DSP_DATA_OUT, 0xBEEF);
        assert_eq!(port.read(0x22F9).unwrap(), 0xBEEF);
        assert_eq!(port.registers().reads_of(REG_DSP_CMD), 4);
        assert_eq!(port.registers().reads_of(REG_DSP_DATA_OUT), 1);
    }

    #[test]
    fn execute_dispatches() {
        let mut port = port();
        port.registers_mut().set_value(REG_DSP_DATA_OUT, 7);
        let read = DspCommand::Read { address: 1 };
        assert_eq!(port.execute(read).unwrap(), Some(7));
        let write = DspCommand::Write {
            address: 1,
            data: 2,
        };
        assert_eq!(port.execute(write).unwrap(), None);
    }

    #[test]
    fn settle_zero_does_not_wait() {
        let mut port = port();
        port.settle_ms(0);
        port.settle_ms(10);
        assert_eq!(port.delay().total_ms(), 10);
        assert_eq!(port.delay().waits_ns().len(), 1);
    }
}
