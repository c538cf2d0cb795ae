//! Codec register map abstraction
//!
//! The DSP protocol only needs three primitives from the bus: read a
//! register, write a register, and update a bit field. Each call is assumed
//! atomic; the caller owns the map exclusively (`&mut self`), so there is
//! never more than one access in flight.

use embedded_hal::i2c::I2c;

use crate::rt5670::RT5670_I2C_ADDR;

/// Register-level access to the codec.
///
/// Registers are addressed by an 8-bit index and hold 16-bit values.
pub trait RegisterMap {
    /// Error type
    type Error: core::fmt::Debug;

    /// Read one register.
    fn read_register(&mut self, reg: u8) -> Result<u16, Self::Error>;

    /// Write one register.
    fn write_register(&mut self, reg: u8, value: u16) -> Result<(), Self::Error>;

    /// Replace the bits selected by `mask` with the same bits of `value`.
    ///
    /// Returns `true` if the register changed. The default implementation is
    /// a read-modify-write that skips the write when nothing changes.
    fn update_bits(&mut self, reg: u8, mask: u16, value: u16) -> Result<bool, Self::Error> {
        let old = self.read_register(reg)?;
        let new = (old & !mask) | (value & mask);
        if new == old {
            return Ok(false);
        }
        self.write_register(reg, new)?;
        Ok(true)
    }
}

impl<T: RegisterMap + ?Sized> RegisterMap for &mut T {
    type Error = T::Error;

    fn read_register(&mut self, reg: u8) -> Result<u16, Self::Error> {
        (**self).read_register(reg)
    }

    fn write_register(&mut self, reg: u8, value: u16) -> Result<(), Self::Error> {
        (**self).write_register(reg, value)
    }

    fn update_bits(&mut self, reg: u8, mask: u16, value: u16) -> Result<bool, Self::Error> {
        (**self).update_bits(reg, mask, value)
    }
}

/// [`RegisterMap`] over an I²C bus.
///
/// Wire format: one register-index byte, then the 16-bit value big-endian.
/// Reads are a single `write_read` (index out, two bytes back).
pub struct I2cRegisterMap<I> {
    i2c: I,
    address: u8,
}

impl<I: I2c> I2cRegisterMap<I> {
    /// Create a register map for the device at `address`.
    pub fn new(i2c: I, address: u8) -> Self {
        Self { i2c, address }
    }

    /// Create a register map at the RT5670's fixed address.
    pub fn rt5670(i2c: I) -> Self {
        Self::new(i2c, RT5670_I2C_ADDR)
    }

    /// Device address this map talks to.
    pub fn address(&self) -> u8 {
        self.address
    }

    /// Give the bus back.
    pub fn release(self) -> I {
        self.i2c
    }
}

impl<I: I2c> RegisterMap for I2cRegisterMap<I> {
    type Error = I::Error;

    fn read_register(&mut self, reg: u8) -> Result<u16, Self::Error> {
        let mut buf = [0u8; 2];
        self.i2c.write_read(self.address, &[reg], &mut buf)?;
        Ok(u16::from_be_bytes(buf))
    }

    fn write_register(&mut self, reg: u8, value: u16) -> Result<(), Self::Error> {
        let [hi, lo] = value.to_be_bytes();
        self.i2c.write(self.address, &[reg, hi, lo])
    }
}
