//! CLI command implementations

mod checkpoint;
mod info;
mod smoke;
mod validate;


use crate::cli::{init_tracing, Cli, Command, LogLevel};
use crate::error::Result;

/// Execute a CLI command based on the parsed arguments
pub fn run_command(cli: Cli) -> Result<()> {
    let log_level = LogLevel::from_flags(cli.verbose, cli.quiet);
    init_tracing(log_level);

    match cli.command {
        Command::Validate(args) => validate::run_validate(&args, log_level),
        Command::Info(args) => info::run_info(&args, log_level),
        Command::Checkpoint(args) => checkpoint::run_checkpoint(&args, log_level),
        Command::Smoke(args) => smoke::run_smoke(&args, log_level).map(|_| ()),
    }
}
