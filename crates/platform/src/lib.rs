//! Hardware Abstraction Layer (HAL) for the RT5670 voice DSP driver
//!
//! This crate provides the narrow hardware seams the DSP driver talks
//! through, so the protocol logic can be developed and tested without a
//! codec on the bench.
//!
//! # Architecture Layers
//!
//! ```text
//! Host audio framework (widgets, controls, power sequencing)
//!         ↓
//! voice-dsp (command/poll engine, firmware tables, mode state)
//!         ↓
//! Platform HAL (this crate - register map + firmware acquisition)
//!         ↓
//! Bus layer (embedded-hal I²C)
//! ```
//!
//! # Modules
//!
//! - [`regmap`] - [`RegisterMap`] trait and the I²C-backed implementation
//! - [`rt5670`] - RT5670 register addresses and DSP command-word fields
//! - [`firmware`] - firmware acquisition request seam
//! - `firmware_local` - firmware directory store (`std` feature)
//! - `mocks` - spy implementations for tests (`std` feature)
//!
//! # Features
//!
//! - `std`: Enable standard library support (mocks, local firmware store)
//! - `defmt`: Enable defmt derives
//!
//! # Example
//!
//! ```no_run
//! use platform::{RegisterMap, rt5670};
//!
//! fn dsp_idle<R: RegisterMap>(regs: &mut R) -> Result<bool, R::Error> {
//!     let status = regs.read_register(rt5670::REG_DSP_CTRL1)?;
//!     Ok(status & rt5670::DSP_BUSY_MASK == 0)
//! }
//! ```

// ── Lint policy ─────────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)] // no .unwrap() in production code
#![deny(clippy::expect_used)] // no .expect() in production code
#![deny(clippy::panic)] // no panic!() in production code
#![deny(clippy::unreachable)] // no unreachable!() that isn't documented
#![deny(unused_must_use)]
// all Results must be handled
// ────────────────────────────────────────────────────────────────────────────
#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::print_stdout)] // prefer tracing/defmt over println! in lib code
// Pedantic lints suppressed for this hardware HAL crate:
#![allow(clippy::doc_markdown)] // hex addresses and register names in doc comments
#![allow(clippy::must_use_candidate)] // hardware accessors, callers decide
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod firmware;
pub mod regmap;
pub mod rt5670;

#[cfg(any(test, feature = "std"))]
pub mod firmware_local;

#[cfg(any(test, feature = "std"))]
pub mod mocks;

// Re-export main traits
pub use firmware::FirmwareRequest;
pub use regmap::{I2cRegisterMap, RegisterMap};

// The driver's only notion of time.
pub use embedded_hal::delay::DelayNs;
