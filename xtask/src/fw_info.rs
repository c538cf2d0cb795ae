//! xtask fw-info: inspect a DSP firmware image.
//!
//! Prints the mode table (index, control label, position, entry count) and
//! checks that every mode's entries lie inside the image, which is exactly
//! what the driver verifies before replaying a mode.

use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;
use platform::firmware_local::LocalFirmwareStore;
use voice_dsp::controls::DSP_MODE_ITEMS;
use voice_dsp::{FirmwareError, FirmwareImage, ModeDescriptor};

/// Outcome of checking one mode.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct ModeReport {
    pub mode: u32,
    pub result: Result<ModeDescriptor, FirmwareError>,
}

impl ModeReport {
    /// Label of the "DSP Function Switch" item selecting this mode, if any.
    pub fn label(&self) -> &'static str {
        usize::try_from(self.mode)
            .ok()
            .and_then(|i| DSP_MODE_ITEMS.get(i))
            .copied()
            .unwrap_or("-")
    }
}

/// Check every mode of `image`.
pub(crate) fn inspect<B: AsRef<[u8]>>(
    image: &FirmwareImage<B>,
) -> Result<Vec<ModeReport>, FirmwareError> {
    let count = image.mode_count()?;
    tracing::debug!(count, size = image.len(), "inspecting firmware image");
    let reports = (0..=u32::from(count))
        .map(|mode| {
            let result = image.descriptor(mode).and_then(|descriptor| {
                // Validates the entry range as a whole.
                image.entries(mode).map(|_| descriptor)
            });
            if let Err(err) = &result {
                tracing::warn!(mode, error = %err, "malformed firmware mode");
            }
            ModeReport { mode, result }
        })
        .collect();
    Ok(reports)
}

pub fn run(file: Option<&Path>, name: &str, show_entries: bool) -> Result<()> {
    let (source, bytes) = match file {
        Some(path) => {
            let bytes = std::fs::read(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            (path.display().to_string(), bytes)
        }
        None => {
            let store = LocalFirmwareStore::from_env();
            let bytes = store.fetch(name)?;
            (store.root().join(name).display().to_string(), bytes)
        }
    };
    tracing::debug!(%source, "firmware image loaded");
    let image = FirmwareImage::new(bytes);

    println!();
    println!(
        "{}",
        format!("📦 {source} ({} bytes)", image.len())
            .cyan()
            .bold()
    );
    println!();

    let reports = inspect(&image).context("Firmware header unreadable")?;
    println!(
        "  {:<6} {:<8} {:>8} {:>8}",
        "index", "label", "position", "entries"
    );

    let mut bad = 0usize;
    for report in &reports {
        match &report.result {
            Ok(descriptor) => {
                println!(
                    "{}",
                    format!(
                        "  {:<6} {:<8} {:>#8x} {:>8}",
                        report.mode,
                        report.label(),
                        descriptor.position,
                        descriptor.entry_count
                    )
                    .green()
                );
                if show_entries {
                    for entry in image.entries(report.mode)? {
                        println!(
                            "         {:#06x} ← {:#06x}   (reserved {:#04x})",
                            entry.address, entry.data, entry.reserved
                        );
                    }
                }
            }
            Err(err) => {
                bad = bad.saturating_add(1);
                println!(
                    "{}",
                    format!("  {:<6} {:<8} {err}", report.mode, report.label())
                        .red()
                );
            }
        }
    }
    println!();

    if bad > 0 {
        anyhow::bail!("{bad} of {} modes are malformed", reports.len());
    }
    println!(
        "{}",
        format!("✓ All {} modes are in bounds", reports.len())
            .green()
            .bold()
    );
    println!();
    Ok(())
}

#[cfg(test)]
#[allow(clippy::indexing_slicing)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    /// Mode 0: 1 entry at 7; mode 1: 2 entries at 12 but the image ends at 17.
    const IMAGE: [u8; 17] = [
        1, //
        0x00, 0x07, 1, //
        0x00, 0x0C, 2, //
        0x22, 0xF9, 0x00, 0x01, 0x00, //
        0x23, 0x00, 0x00, 0x02, 0x00, //
    ];

    #[test]
    fn reports_each_mode() {
        let reports = inspect(&FirmwareImage::new(&IMAGE[..])).unwrap();
        assert_eq!(reports.len(), 2);
        assert_eq!(
            reports[0].result,
            Ok(ModeDescriptor {
                mode: 0,
                position: 7,
                entry_count: 1,
            })
        );
        assert_eq!(reports[0].label(), "Mode 1");
        assert_eq!(
            reports[1].result,
            Err(FirmwareError::OutOfBounds {
                start: 12,
                end: 22,
                len: 17,
            })
        );
    }

    #[test]
    fn empty_image_has_no_header() {
        assert!(inspect(&FirmwareImage::new(Vec::new())).is_err());
    }

    #[test]
    fn modes_past_the_control_have_no_label() {
        let report = ModeReport {
            mode: 9,
            result: Err(FirmwareError::InvalidMode { mode: 9, count: 9 }),
        };
        assert_eq!(report.label(), "-");
    }

    #[test]
    fn run_fails_on_malformed_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("dsp.bin");
        std::fs::write(&path, IMAGE).unwrap();
        assert!(run(Some(&path), "unused", true).is_err());

        std::fs::write(&path, &IMAGE[..12]).unwrap();
        // mode 1 now has no room at all, mode 0 still fits
        assert!(run(Some(&path), "unused", false).is_err());
    }

    #[test]
    fn run_accepts_valid_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("dsp.bin");
        let mut bytes = IMAGE.to_vec();
        bytes[6] = 1; // mode 1: one entry at 12..17
        std::fs::write(&path, bytes).unwrap();
        run(Some(&path), "unused", true).unwrap();
    }
}
