//! Shared runner for the cargo invocations behind each task.

use std::process::{Command, Output};
use std::time::Instant;

use anyhow::{Context, Result};
use colored::Colorize;

/// What to do when a step fails.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum OnFailure {
    /// Print the output and abort the task.
    Abort,
    /// Print a warning and carry on.
    Warn,
}

/// Run `cargo <args>` and report the outcome under `label`.
///
/// Returns the captured output on success, `None` for a tolerated failure.
pub fn step(label: &str, args: &[&str], on_failure: OnFailure) -> Result<Option<Output>> {
    println!("{}", format!("  {label}...").cyan());
    tracing::debug!(label, command = %args.join(" "), "running cargo");
    let start = Instant::now();

    let output = Command::new("cargo")
        .args(args)
        .output()
        .with_context(|| format!("Failed to run cargo {}", args.join(" ")))?;

    tracing::debug!(
        label,
        status = %output.status,
        elapsed_ms = start.elapsed().as_millis(),
        "cargo finished"
    );
    if output.status.success() {
        println!(
            "{}",
            format!(
                "  ✓ {label} passed in {:.2}s",
                start.elapsed().as_secs_f64()
            )
            .green()
        );
        println!();
        return Ok(Some(output));
    }

    match on_failure {
        OnFailure::Abort => {
            eprintln!("{}", format!("  ✗ {label} failed").red().bold());
            eprintln!();
            eprintln!("{}", String::from_utf8_lossy(&output.stdout));
            eprintln!("{}", String::from_utf8_lossy(&output.stderr));
            anyhow::bail!("{label} failed");
        }
        OnFailure::Warn => {
            eprintln!(
                "{}",
                format!("  ⚠ {label} reported problems").yellow().bold()
            );
            eprintln!("{}", String::from_utf8_lossy(&output.stderr));
            println!();
            Ok(None)
        }
    }
}
