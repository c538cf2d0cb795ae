//! Error types for the voice DSP driver
//!
//! [`FirmwareError`] covers malformed firmware tables and carries no
//! transport type; [`DspError`] adds the bus, poll and control failures and
//! is generic over the register map's error.

use crate::controls::ControlId;

/// Firmware table decoding failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FirmwareError {
    /// Requested mode index is past the table.
    #[error("mode {mode} exceeds firmware mode count {count}")]
    InvalidMode {
        /// Requested mode index
        mode: u32,
        /// Mode count from the firmware header
        count: u8,
    },
    /// A header, descriptor or entry range lies outside the image.
    #[error("firmware bytes {start}..{end} exceed image length {len}")]
    OutOfBounds {
        /// First byte of the range
        start: usize,
        /// One past the last byte of the range
        end: usize,
        /// Image length
        len: usize,
    },
}

/// Voice DSP driver error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DspError<E> {
    /// The register map reported a failure.
    #[error("codec register access failed: {0:?}")]
    Io(E),
    /// The busy bit never cleared.
    #[error("DSP still busy after {polls} status polls")]
    Busy {
        /// Status reads performed
        polls: u8,
    },
    /// Requested mode index is past the firmware table.
    #[error("mode {mode} exceeds firmware mode count {count}")]
    InvalidMode {
        /// Requested mode index
        mode: u32,
        /// Mode count from the firmware header
        count: u8,
    },
    /// Firmware range outside the image.
    #[error("firmware bytes {start}..{end} exceed image length {len}")]
    OutOfBounds {
        /// First byte of the range
        start: usize,
        /// One past the last byte of the range
        end: usize,
        /// Image length
        len: usize,
    },
    /// No firmware image has been delivered.
    #[error("no DSP firmware loaded")]
    NoFirmware,
    /// Control put outside the control's item list.
    #[error("item {item} is not valid for {control:?}")]
    InvalidItem {
        /// Control written
        control: ControlId,
        /// Rejected item index
        item: u32,
    },
}

impl<E> From<FirmwareError> for DspError<E> {
    fn from(err: FirmwareError) -> Self {
        match err {
            FirmwareError::InvalidMode { mode, count } => Self::InvalidMode { mode, count },
            FirmwareError::OutOfBounds { start, end, len } => Self::OutOfBounds { start, end, len },
        }
    }
}

impl<E> DspError<E> {
    /// `true` for failures reported by the register map itself.
    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn firmware_errors_convert_field_for_field() {
        let err: DspError<()> = FirmwareError::InvalidMode { mode: 7, count: 2 }.into();
        assert_eq!(err, DspError::InvalidMode { mode: 7, count: 2 });

        let oob = FirmwareError::OutOfBounds {
            start: 10,
            end: 30,
            len: 20,
        };
        let err: DspError<()> = oob.into();
        assert_eq!(
            err,
            DspError::OutOfBounds {
                start: 10,
                end: 30,
                len: 20,
            }
        );
        assert!(!err.is_io());
    }

    #[test]
    fn messages_name_the_failure() {
        let busy: DspError<()> = DspError::Busy { polls: 11 };
        assert_eq!(busy.to_string(), "DSP still busy after 11 status polls");
        let io: DspError<&str> = DspError::Io("nak");
        assert_eq!(io.to_string(), "codec register access failed: \"nak\"");
        assert!(io.is_io());
        let oob = FirmwareError::OutOfBounds {
            start: 5,
            end: 20,
            len: 12,
        };
        assert_eq!(
            oob.to_string(),
            "firmware bytes 5..20 exceed image length 12"
        );
    }
}
