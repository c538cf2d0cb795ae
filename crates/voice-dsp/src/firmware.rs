//! Firmware table parser and mode loader
//!
//! A firmware image is an untrusted byte blob laid out as:
//!
//! ```text
//! offset 0          mode_count
//! offset 1 + 3*m    [pos_hi, pos_lo, entry_count]     descriptor of mode m
//!                   (m = 0 ..= mode_count)
//! offset pos        entry_count × [addr_hi, addr_lo, data_hi, data_lo, reserved]
//! ```
//!
//! Positions are absolute and big-endian. Nothing is parsed on load; every
//! lookup bounds-checks the bytes it needs, and a mode's whole entry range is
//! validated before the first register write is issued.

use core::ops::Range;

use embedded_hal::delay::DelayNs;
use platform::RegisterMap;

use crate::error::{DspError, FirmwareError};
use crate::port::DspPort;

/// Bytes per mode descriptor.
pub const DESCRIPTOR_LEN: usize = 3;

/// Bytes per write entry.
pub const ENTRY_LEN: usize = 5;

/// Offset of the first descriptor.
const DESCRIPTOR_TABLE: usize = 1;

/// Location of one mode's write entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ModeDescriptor {
    /// Mode index
    pub mode: u32,
    /// Absolute offset of the first entry
    pub position: u16,
    /// Number of 5-byte entries
    pub entry_count: u8,
}

impl ModeDescriptor {
    /// Byte range covered by the entries.
    pub fn region(&self) -> Range<usize> {
        let start = usize::from(self.position);
        let len = usize::from(self.entry_count).saturating_mul(ENTRY_LEN);
        start..start.saturating_add(len)
    }
}

/// One decoded DSP write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WriteEntry {
    /// DSP address
    pub address: u16,
    /// Value
    pub data: u16,
    /// Fifth entry byte, carried but never interpreted
    pub reserved: u8,
}

impl WriteEntry {
    fn decode(bytes: &[u8]) -> Option<Self> {
        match *bytes {
            [addr_hi, addr_lo, data_hi, data_lo, reserved] => Some(Self {
                address: u16::from_be_bytes([addr_hi, addr_lo]),
                data: u16::from_be_bytes([data_hi, data_lo]),
                reserved,
            }),
            _ => None,
        }
    }
}

/// An immutable firmware blob.
///
/// Generic over the owner of the bytes, so the same parser works for a
/// `&'static [u8]` baked into flash, a `Vec<u8>` read from disk, or a shared
/// `Arc<[u8]>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirmwareImage<B> {
    data: B,
}

impl<B: AsRef<[u8]>> FirmwareImage<B> {
    /// Wrap a buffer. No parsing happens here.
    pub fn new(data: B) -> Self {
        Self { data }
    }

    /// Raw image bytes.
    pub fn as_bytes(&self) -> &[u8] {
        self.data.as_ref()
    }

    /// Image length in bytes.
    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    /// `true` for a zero-length image.
    pub fn is_empty(&self) -> bool {
        self.as_bytes().is_empty()
    }

    /// Highest valid mode index (header byte 0).
    pub fn mode_count(&self) -> Result<u8, FirmwareError> {
        let [count] = self.array::<1>(0)?;
        Ok(count)
    }

    /// Descriptor of `mode`.
    pub fn descriptor(&self, mode: u32) -> Result<ModeDescriptor, FirmwareError> {
        let count = self.mode_count()?;
        let index = u8::try_from(mode)
            .ok()
            .filter(|index| *index <= count)
            .ok_or(FirmwareError::InvalidMode { mode, count })?;

        let start = usize::from(index)
            .saturating_mul(DESCRIPTOR_LEN)
            .saturating_add(DESCRIPTOR_TABLE);
        let [pos_hi, pos_lo, entry_count] = self.array::<DESCRIPTOR_LEN>(start)?;
        Ok(ModeDescriptor {
            mode,
            position: u16::from_be_bytes([pos_hi, pos_lo]),
            entry_count,
        })
    }

    /// Decoded entries of `mode`, bounds-checked as a whole.
    pub fn entries(
        &self,
        mode: u32,
    ) -> Result<impl Iterator<Item = WriteEntry> + '_, FirmwareError> {
        let descriptor = self.descriptor(mode)?;
        let bytes = self.region(descriptor.region())?;
        Ok(bytes.chunks_exact(ENTRY_LEN).filter_map(WriteEntry::decode))
    }

    /// Every descriptor from index 0 through `mode_count`.
    ///
    /// Yields nothing for an empty image. Truncated descriptor tables yield
    /// an error for each missing descriptor.
    pub fn modes(&self) -> impl Iterator<Item = Result<ModeDescriptor, FirmwareError>> + '_ {
        let last = self.mode_count().ok().map(u32::from);
        last.into_iter()
            .flat_map(|last| 0..=last)
            .map(move |mode| self.descriptor(mode))
    }

    /// Replay the writes of `mode` through `port`.
    ///
    /// The mode index and the whole entry range are validated before the
    /// first write, so malformed tables never produce partial traffic. A
    /// failed write aborts the replay without rollback. Returns the number
    /// of writes issued.
    pub fn apply_mode<R, D>(
        &self,
        port: &mut DspPort<R, D>,
        mode: u32,
    ) -> Result<usize, DspError<R::Error>>
    where
        R: RegisterMap,
        D: DelayNs,
    {
        let entries = match self.entries(mode) {
            Ok(entries) => entries,
            Err(err) => {
                tracing::warn!(mode, error = %err, "rejecting DSP mode");
                return Err(err.into());
            }
        };

        let mut written = 0usize;
        for entry in entries {
            port.write(entry.address, entry.data)?;
            written = written.saturating_add(1);
        }
        tracing::debug!(mode, writes = written, "DSP mode applied");
        Ok(written)
    }

    fn region(&self, range: Range<usize>) -> Result<&[u8], FirmwareError> {
        let err = FirmwareError::OutOfBounds {
            start: range.start,
            end: range.end,
            len: self.len(),
        };
        self.as_bytes().get(range).ok_or(err)
    }

    fn array<const N: usize>(&self, start: usize) -> Result<[u8; N], FirmwareError> {
        let end = start.saturating_add(N);
        let bytes = self.region(start..end)?;
        let len = self.len();
        <[u8; N]>::try_from(bytes)
            .map_err(|_| FirmwareError::OutOfBounds { start, end, len })
    }
}

/// Firmware availability.
///
/// Starts [`Pending`](Self::Pending); the asynchronous loader completes it
/// with the delivered bytes or with nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FirmwareSlot<B> {
    /// Requested, not delivered yet.
    Pending,
    /// Delivered.
    Loaded(FirmwareImage<B>),
    /// The loader reported failure.
    Unavailable,
}

impl<B> Default for FirmwareSlot<B> {
    fn default() -> Self {
        Self::Pending
    }
}

impl<B: AsRef<[u8]>> FirmwareSlot<B> {
    /// Record the loader's result. A later delivery replaces an earlier one.
    pub fn complete(&mut self, data: Option<B>) {
        *self = match data {
            Some(bytes) => {
                let image = FirmwareImage::new(bytes);
                tracing::debug!(size = image.len(), "DSP firmware loaded");
                Self::Loaded(image)
            }
            None => {
                tracing::warn!("DSP firmware unavailable");
                Self::Unavailable
            }
        };
    }

    /// The image, if one was delivered.
    pub fn image(&self) -> Option<&FirmwareImage<B>> {
        match self {
            Self::Loaded(image) => Some(image),
            Self::Pending | Self::Unavailable => None,
        }
    }

    /// `true` once an image has been delivered.
    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded(_))
    }
}
