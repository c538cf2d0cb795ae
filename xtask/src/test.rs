use anyhow::Result;
use colored::Colorize;
use std::time::Instant;

use crate::cargo::{step, OnFailure};

pub fn run(unit_only: bool, integration_only: bool) -> Result<()> {
    println!();
    println!("{}", "🧪 Running tests...".cyan().bold());
    println!();

    let total_start = Instant::now();

    let run_unit = !integration_only;
    let run_integration = !unit_only;

    if run_unit {
        let output = step(
            "Unit tests",
            &["test", "--lib", "--workspace"],
            OnFailure::Abort,
        )?;
        report_summary(output.as_ref());
    }

    if run_integration {
        // Every tests/*.rs suite: register protocol, firmware tables, driver sequences.
        let output = step(
            "Integration tests",
            &["test", "--workspace", "--test", "*"],
            OnFailure::Abort,
        )?;
        report_summary(output.as_ref());
    }

    if !unit_only && !integration_only {
        let output = step(
            "Doc tests",
            &["test", "--doc", "--workspace"],
            OnFailure::Warn,
        )?;
        report_summary(output.as_ref());
    }

    println!(
        "{}",
        format!(
            "✓ All tests completed in {:.2}s",
            total_start.elapsed().as_secs_f64()
        )
        .green()
        .bold()
    );
    println!();

    Ok(())
}

fn report_summary(output: Option<&std::process::Output>) {
    if let Some(output) = output {
        let stdout = String::from_utf8_lossy(&output.stdout);
        for summary in extract_test_summaries(&stdout) {
            println!("    {summary}");
        }
    }
}

fn extract_test_summaries(output: &str) -> Vec<String> {
    // Lines like "test result: ok. 5 passed; 0 failed; 0 ignored; 0 measured; 0 filtered out"
    output
        .lines()
        .filter_map(|line| line.split("test result:").nth(1))
        .map(|summary| summary.trim().to_string())
        .collect()
}

#[cfg(test)]
#[allow(clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn summaries_are_collected_per_binary() {
        let out = "running 3 tests\n\
                   test result: ok. 3 passed; 0 failed; 0 ignored; 0 measured; 0 filtered out\n\
                   running 1 test\n\
                   test result: ok. 1 passed; 0 failed; 0 ignored; 0 measured; 0 filtered out\n";
        let summaries = extract_test_summaries(out);
        assert_eq!(summaries.len(), 2);
        assert!(summaries[0].starts_with("ok. 3 passed"));
    }

    #[test]
    fn no_summary_lines() {
        let summaries = extract_test_summaries("error: could not compile");
        assert!(summaries.is_empty());
    }
}
