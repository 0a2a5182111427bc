//! tumorgen CLI
//!
//! # Usage
//!
//! ```bash
//! # Validate a config
//! tumorgen validate train.yaml
//!
//! # Show the resolved config
//! tumorgen info train.yaml
//!
//! # Inspect the newest checkpoint of a run
//! tumorgen checkpoint log/tumor --tensors
//!
//! # Short synthetic run in adversarial mode
//! tumorgen smoke --mode adversarial --steps 50 -o log/smoke
//! ```

use clap::Parser;
use std::process::ExitCode;
use tumorgen::cli::{run_command, Cli};

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run_command(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
