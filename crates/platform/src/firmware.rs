//! Firmware acquisition seam
//!
//! Firmware blobs are fetched by name, asynchronously, by whoever hosts the
//! driver (a kernel-style loader, a filesystem task, a test). The driver only
//! issues the request; the host later hands the bytes (or nothing, on
//! failure) back to the driver's completion method.

/// Request a firmware blob by name.
///
/// Implementations must not block waiting for the data. Completion is
/// delivered separately by the host.
pub trait FirmwareRequest {
    /// Queue a request for the firmware file `name`.
    fn request_firmware(&mut self, name: &str);
}

impl<F: FnMut(&str)> FirmwareRequest for F {
    fn request_firmware(&mut self, name: &str) {
        self(name);
    }
}
