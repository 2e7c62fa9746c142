//! # Parquet Metadata Editor Entry Point
//!
//! Runs either as a command-line tool or as the desktop editor.
//!
//! ```text
//! main()
//!   │
//!   ├─> Parse CLI arguments (clap)
//!   │
//!   ├─> show / get / set / remove:
//!   │   └─> Run the command against the file and exit
//!   │
//!   └─> no command, or `open FILE`:
//!       └─> Launch the egui window
//! ```

#![warn(clippy::all, rust_2018_idioms)]
#![expect(clippy::print_stdout)] // Command output goes to stdout

mod cli;

use anyhow::Result;
use clap::Parser as _;
use parquet_metadata_editor::{gui, logging};
use std::path::PathBuf;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    match cli.command {
        None => run_gui(None),
        Some(cli::Commands::Open { file }) => run_gui(Some(file)),
        Some(command) => {
            // Set RUST_LOG=debug to see what the engine is doing.
            env_logger::init();
            cli::run_command(command)
        }
    }
}

/// Starts the desktop editor, optionally with `file` already open.
///
/// # Errors
///
/// Returns an error if the window cannot be created.
fn run_gui(file: Option<PathBuf>) -> Result<()> {
    let _log_guard = match logging::init() {
        Ok(guard) => Some(guard),
        Err(err) => {
            if env_logger::try_init().is_ok() {
                log::warn!("Falling back to env_logger: {err:#}");
            }
            None
        }
    };

    gui::run(file).map_err(|err| anyhow::anyhow!("Failed to start the editor window: {err}"))
}
