//! Command-line front end
//!
//! Argument parsing, subscriber setup and one handler per subcommand.

mod args;
mod commands;
mod logging;

pub use args::{CheckpointArgs, Cli, Command, ConfigArgs, SmokeArgs};
pub use commands::run_command;
pub use logging::{init_tracing, LogLevel};
