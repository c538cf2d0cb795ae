use anyhow::Result;
use colored::Colorize;
use std::time::Instant;

use crate::cargo::{step, OnFailure};

/// Cortex-M target the driver crates must build for without `std`.
const EMBEDDED_TARGET: &str = "thumbv7em-none-eabihf";

pub fn run() -> Result<()> {
    println!();
    println!("{}", "🔍 Checking voice DSP builds...".cyan().bold());
    println!();

    let total_start = Instant::now();

    step(
        "Checking voice-dsp (no_std)",
        &[
            "check",
            "-p",
            "voice-dsp",
            "--target",
            EMBEDDED_TARGET,
            "--no-default-features",
        ],
        OnFailure::Abort,
    )?;
    step(
        "Checking voice-dsp with defmt",
        &[
            "check",
            "-p",
            "voice-dsp",
            "--target",
            EMBEDDED_TARGET,
            "--features",
            "defmt",
        ],
        OnFailure::Abort,
    )?;
    step(
        "Checking platform (no_std)",
        &[
            "check",
            "-p",
            "platform",
            "--target",
            EMBEDDED_TARGET,
            "--no-default-features",
        ],
        OnFailure::Abort,
    )?;
    step(
        "Checking workspace (host)",
        &["check", "--workspace", "--all-targets"],
        OnFailure::Abort,
    )?;

    // Lints and formatting are reported, not enforced.
    step(
        "Running clippy lints",
        &[
            "clippy",
            "--workspace",
            "--all-targets",
            "--",
            "-D",
            "warnings",
        ],
        OnFailure::Warn,
    )?;
    let fmt = step(
        "Checking code formatting",
        &["fmt", "--all", "--check"],
        OnFailure::Warn,
    )?;
    if fmt.is_none() {
        eprintln!("     Run 'cargo fmt --all' to fix");
    }

    println!(
        "{}",
        format!(
            "✓ All checks completed in {:.2}s",
            total_start.elapsed().as_secs_f64()
        )
        .green()
        .bold()
    );
    println!();

    Ok(())
}
