//! Mock implementations for testing
//!
//! This module provides spy implementations of the platform traits for use
//! in unit and integration tests. Every register access is recorded in
//! order, reads can be scripted per register, and faults can be injected
//! per register and direction.

#![cfg(any(test, feature = "std"))]

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use embedded_hal::delay::DelayNs;

use crate::{FirmwareRequest, RegisterMap};

/// One recorded register access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterAccess {
    /// `read_register(reg)`
    Read(u8),
    /// `write_register(reg, value)`
    Write(u8, u16),
    /// `update_bits(reg, mask, value)`
    UpdateBits {
        /// Register index
        reg: u8,
        /// Bits affected
        mask: u16,
        /// New value of the affected bits
        value: u16,
    },
}

impl RegisterAccess {
    /// Register index touched by this access.
    pub fn reg(&self) -> u8 {
        match *self {
            Self::Read(reg) | Self::Write(reg, _) | Self::UpdateBits { reg, .. } => reg,
        }
    }
}

/// Injected bus fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("mock bus fault on register {reg:#04x}")]
pub struct MockBusError {
    /// Register whose access failed.
    pub reg: u8,
}

/// Register map spy.
///
/// Unwritten registers read as zero. Scripted reads take priority over the
/// stored value and are consumed one per read; once a script runs dry the
/// stored value is returned again. Failed accesses are still recorded.
#[derive(Debug, Default)]
pub struct MockRegisterMap {
    values: BTreeMap<u8, u16>,
    scripted: BTreeMap<u8, VecDeque<u16>>,
    failing_reads: BTreeSet<u8>,
    failing_writes: BTreeSet<u8>,
    log: Vec<RegisterAccess>,
}

impl MockRegisterMap {
    /// Create an empty register map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`set_value`](Self::set_value).
    #[must_use]
    pub fn with_value(mut self, reg: u8, value: u16) -> Self {
        self.set_value(reg, value);
        self
    }

    /// Preload a register without recording an access.
    pub fn set_value(&mut self, reg: u8, value: u16) {
        self.values.insert(reg, value);
    }

    /// Current stored value of a register.
    pub fn value(&self, reg: u8) -> u16 {
        self.values.get(&reg).copied().unwrap_or(0)
    }

    /// Queue values returned by the next reads of `reg`.
    pub fn script_reads(&mut self, reg: u8, values: impl IntoIterator<Item = u16>) {
        self.scripted.entry(reg).or_default().extend(values);
    }

    /// Make every read of `reg` fail.
    pub fn fail_reads_of(&mut self, reg: u8) {
        self.failing_reads.insert(reg);
    }

    /// Make every write or update of `reg` fail.
    pub fn fail_writes_to(&mut self, reg: u8) {
        self.failing_writes.insert(reg);
    }

    /// Remove all injected faults.
    pub fn clear_faults(&mut self) {
        self.failing_reads.clear();
        self.failing_writes.clear();
    }

    /// Every access so far, in order.
    pub fn accesses(&self) -> &[RegisterAccess] {
        &self.log
    }

    /// Plain writes so far, in order, as `(reg, value)`.
    pub fn writes(&self) -> Vec<(u8, u16)> {
        self.log
            .iter()
            .filter_map(|a| match *a {
                RegisterAccess::Write(reg, value) => Some((reg, value)),
                _ => None,
            })
            .collect()
    }

    /// Number of reads of `reg` so far.
    pub fn reads_of(&self, reg: u8) -> usize {
        self.log
            .iter()
            .filter(|a| **a == RegisterAccess::Read(reg))
            .count()
    }

    /// Forget recorded accesses (values and scripts are kept).
    pub fn clear_log(&mut self) {
        self.log.clear();
    }
}

impl RegisterMap for MockRegisterMap {
    type Error = MockBusError;

    fn read_register(&mut self, reg: u8) -> Result<u16, Self::Error> {
        self.log.push(RegisterAccess::Read(reg));
        if self.failing_reads.contains(&reg) {
            return Err(MockBusError { reg });
        }
        let scripted = self.scripted.get_mut(&reg).and_then(VecDeque::pop_front);
        Ok(scripted.unwrap_or_else(|| self.value(reg)))
    }

    fn write_register(&mut self, reg: u8, value: u16) -> Result<(), Self::Error> {
        self.log.push(RegisterAccess::Write(reg, value));
        if self.failing_writes.contains(&reg) {
            return Err(MockBusError { reg });
        }
        self.values.insert(reg, value);
        Ok(())
    }

    fn update_bits(&mut self, reg: u8, mask: u16, value: u16) -> Result<bool, Self::Error> {
        let access = RegisterAccess::UpdateBits { reg, mask, value };
        self.log.push(access);
        if self.failing_writes.contains(&reg) {
            return Err(MockBusError { reg });
        }
        let old = self.value(reg);
        let new = (old & !mask) | (value & mask);
        self.values.insert(reg, new);
        Ok(new != old)
    }
}

/// Delay that records requested durations instead of sleeping.
#[derive(Debug, Default)]
pub struct MockDelay {
    waits_ns: Vec<u64>,
}

impl MockDelay {
    /// Create a delay with no recorded waits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Each requested wait in nanoseconds, in order.
    pub fn waits_ns(&self) -> &[u64] {
        &self.waits_ns
    }

    /// Sum of all waits, in whole milliseconds.
    pub fn total_ms(&self) -> u64 {
        self.waits_ns.iter().sum::<u64>() / 1_000_000
    }
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.waits_ns.push(u64::from(ns));
    }

    fn delay_us(&mut self, us: u32) {
        self.waits_ns.push(u64::from(us).saturating_mul(1_000));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.waits_ns.push(u64::from(ms).saturating_mul(1_000_000));
    }
}

/// Firmware requester that only remembers what was asked for.
#[derive(Debug, Default)]
pub struct MockFirmwareRequest {
    /// Requested names, in order.
    pub requested: Vec<String>,
}

impl MockFirmwareRequest {
    /// Create a requester with no recorded requests.
    pub fn new() -> Self {
        Self::default()
    }
}

impl FirmwareRequest for MockFirmwareRequest {
    fn request_firmware(&mut self, name: &str) {
        self.requested.push(name.to_owned());
    }
}
