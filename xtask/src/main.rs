// Desktop/tooling crate: unwrap/expect/panic acceptable in non-embedded code.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod cargo;
mod check;
mod fw_info;
mod test;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "RT5670 voice DSP development tasks", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check host and no_std (thumbv7em) builds, clippy and formatting
    Check,
    /// Run all tests (unit, integration and doc)
    Test {
        /// Run only unit tests
        #[arg(long)]
        unit: bool,
        /// Run only integration tests
        #[arg(long)]
        integration: bool,
    },
    /// Print the mode table of a DSP firmware image and validate every mode
    FwInfo {
        /// Firmware file. Without it, the firmware is looked up by name in
        /// RT5670_FIRMWARE_PATH (default /lib/firmware).
        file: Option<std::path::PathBuf>,
        /// Firmware name to look up when no file is given
        #[arg(long, default_value = voice_dsp::DSP_FIRMWARE_NAME)]
        name: String,
        /// Also list every decoded write
        #[arg(long)]
        entries: bool,
    },
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Check => check::run(),
        Commands::Test { unit, integration } => test::run(unit, integration),
        Commands::FwInfo {
            file,
            name,
            entries,
        } => fw_info::run(file.as_deref(), &name, entries),
    }
}
