//! RT5670 voice DSP control
//!
//! Drives the codec's embedded voice DSP through its three command
//! registers: single-word reads and writes with a bounded busy poll, and
//! "modes" (bundles of writes) replayed from a vendor firmware table.
//!
//! # Modules
//!
//! - [`command`] - command-word encoding
//! - [`port`] - command/poll engine ([`DspPort`])
//! - [`firmware`] - firmware table parser and mode loader
//! - [`mode`] - staged mode selection
//! - [`power`] - power-transition sequences and [`DspEvent`]
//! - [`controls`] - enumerated mixer controls
//! - [`widgets`] - audio-graph widgets and routes
//! - [`driver`] - [`VoiceDsp`], the host-facing driver
//!
//! # Example
//!
//! ```no_run
//! use platform::{I2cRegisterMap, DelayNs};
//! use voice_dsp::{DspConfig, DspEvent, VoiceDsp};
//!
//! fn bring_up<I: embedded_hal::i2c::I2c, D: DelayNs>(
//!     i2c: I,
//!     delay: D,
//!     firmware: &'static [u8],
//! ) -> Result<(), voice_dsp::DspError<I::Error>> {
//!     let mut dsp = VoiceDsp::probe(
//!         I2cRegisterMap::rt5670(i2c),
//!         delay,
//!         DspConfig::rt5670(),
//!         &mut |name: &str| tracing::info!(name, "firmware requested"),
//!     );
//!     dsp.firmware_loaded(Some(firmware));
//!     dsp.set_mode(1);
//!     dsp.handle_event(DspEvent::PostPowerUp)
//! }
//! ```
//!
//! # Features
//!
//! - `std`: pulls in the platform crate's host helpers
//! - `defmt`: Enable defmt derives

// ── Lint policy ─────────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)] // no .unwrap() in production code
#![deny(clippy::expect_used)] // no .expect() in production code
#![deny(clippy::panic)] // no panic!() in production code
#![deny(clippy::unreachable)] // no unreachable!() that isn't documented
#![deny(unused_must_use)]
// all Results must be handled
// ────────────────────────────────────────────────────────────────────────────
#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::print_stdout)]
#![allow(clippy::doc_markdown)] // register names in doc comments
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod command;
pub mod config;
pub mod controls;
pub mod driver;
pub mod error;
pub mod firmware;
pub mod mode;
pub mod port;
pub mod power;
pub mod widgets;

pub use command::{ClockRate, CommandWord, DspCommand};
pub use config::{DspConfig, PollPolicy, DSP_FIRMWARE_NAME};
pub use controls::{ControlId, EnumControl, CONTROLS};
pub use driver::VoiceDsp;
pub use error::{DspError, FirmwareError};
pub use firmware::{FirmwareImage, FirmwareSlot, ModeDescriptor, WriteEntry};
pub use mode::ModeSelection;
pub use port::DspPort;
pub use power::DspEvent;
pub use widgets::{Route, Widget, ROUTES, WIDGETS};
