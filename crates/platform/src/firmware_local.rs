//! Local filesystem firmware store for host builds.
//!
//! `LocalFirmwareStore` resolves firmware names inside a firmware directory
//! (by default `/lib/firmware`, overridable with `RT5670_FIRMWARE_PATH`).
//! Requests made through [`FirmwareRequest`] are queued and fulfilled later
//! by [`LocalFirmwareStore::complete`], which mirrors the deferred delivery
//! the driver expects from a real loader.

use std::fs;
use std::path::{Path, PathBuf};

use crate::firmware::FirmwareRequest;

/// Directory searched when no override is given.
pub const DEFAULT_FIRMWARE_DIR: &str = "/lib/firmware";

/// Environment variable overriding [`DEFAULT_FIRMWARE_DIR`].
pub const FIRMWARE_PATH_ENV: &str = "RT5670_FIRMWARE_PATH";

/// Error type for local firmware lookups.
#[derive(Debug, thiserror::Error)]
pub enum LocalFirmwareError {
    /// The name is not a plain file name (separators, `..`, empty).
    #[error("firmware name {0:?} is not a plain file name")]
    InvalidName(String),
    /// The file could not be read.
    #[error("failed to read firmware {}: {source}", .path.display())]
    Io {
        /// Resolved path of the firmware file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// A firmware directory on the local filesystem.
///
/// # Example
/// ```ignore
/// use platform::firmware_local::LocalFirmwareStore;
/// let store = LocalFirmwareStore::new("/lib/firmware");
/// let blob = store.fetch("rt567x_dsp.bin").unwrap();
/// ```
pub struct LocalFirmwareStore {
    root: PathBuf,
    pending: Vec<String>,
}

impl LocalFirmwareStore {
    /// Create a store rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            pending: Vec::new(),
        }
    }

    /// Create from `RT5670_FIRMWARE_PATH`, falling back to `/lib/firmware`.
    #[must_use]
    pub fn from_env() -> Self {
        let root = std::env::var_os(FIRMWARE_PATH_ENV)
            .map_or_else(|| PathBuf::from(DEFAULT_FIRMWARE_DIR), PathBuf::from);
        Self::new(root)
    }

    /// Directory names are resolved against.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Names requested but not yet delivered.
    pub fn pending(&self) -> &[String] {
        &self.pending
    }

    /// Read firmware `name` from the store.
    pub fn fetch(&self, name: &str) -> Result<Vec<u8>, LocalFirmwareError> {
        let path = self.resolve(name)?;
        fs::read(&path)
            .map_err(|source| LocalFirmwareError::Io { path, source })
    }

    /// Fulfil every queued request, in request order.
    ///
    /// `deliver` receives the name and `Some(bytes)` on success or `None`
    /// when the file is missing or unreadable.
    pub fn complete<F>(&mut self, mut deliver: F)
    where
        F: FnMut(&str, Option<Vec<u8>>),
    {
        for name in core::mem::take(&mut self.pending) {
            match self.fetch(&name) {
                Ok(bytes) => {
                    tracing::debug!(name = %name, size = bytes.len(), "firmware loaded");
                    deliver(&name, Some(bytes));
                }
                Err(err) => {
                    tracing::warn!(name = %name, error = %err, "firmware unavailable");
                    deliver(&name, None);
                }
            }
        }
    }

    fn resolve(&self, name: &str) -> Result<PathBuf, LocalFirmwareError> {
        let plain = !name.is_empty()
            && name != "."
            && name != ".."
            && !name.contains(['/', '\\']);
        if !plain {
            return Err(LocalFirmwareError::InvalidName(name.to_owned()));
        }
        Ok(self.root.join(name))
    }
}

impl FirmwareRequest for LocalFirmwareStore {
    fn request_firmware(&mut self, name: &str) {
        self.pending.push(name.to_owned());
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn fetch_reads_whole_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("rt567x_dsp.bin");
        fs::write(&path, [2u8, 0, 10, 1]).unwrap();
        let store = LocalFirmwareStore::new(tmp.path());
        assert_eq!(store.fetch("rt567x_dsp.bin").unwrap(), vec![2, 0, 10, 1]);
    }

    #[test]
    fn fetch_missing_file_is_io_error() {
        let tmp = TempDir::new().unwrap();
        let store = LocalFirmwareStore::new(tmp.path());
        let err = store.fetch("missing.bin").unwrap_err();
        assert!(matches!(err, LocalFirmwareError::Io { .. }), "{err}");
    }

    #[test]
    fn path_components_are_rejected() {
        let store = LocalFirmwareStore::new("/nonexistent");
        for name in ["", ".", "..", "../etc/passwd", "sub/dsp.bin", "a\\b"] {
            assert!(
                matches!(store.fetch(name), Err(LocalFirmwareError::InvalidName(_))),
                "{name:?} should be rejected"
            );
        }
    }

    #[test]
    fn requests_are_deferred_until_complete() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("a.bin"), b"A").unwrap();
        let mut store = LocalFirmwareStore::new(tmp.path());
        store.request_firmware("a.bin");
        store.request_firmware("b.bin");
        assert_eq!(store.pending(), ["a.bin", "b.bin"]);

        let mut delivered = Vec::new();
        store.complete(|name, data| {
            delivered.push((name.to_owned(), data));
        });
        assert_eq!(
            delivered,
            [
                ("a.bin".to_owned(), Some(b"A".to_vec())),
                ("b.bin".to_owned(), None),
            ]
        );
        assert!(store.pending().is_empty());
    }

    #[test]
    fn root_is_kept() {
        let store = LocalFirmwareStore::new("/opt/fw");
        assert_eq!(store.root(), Path::new("/opt/fw"));
    }
}
