//! Validate command implementation

use crate::cli::logging::log;
use crate::cli::{ConfigArgs, LogLevel};
use crate::config::load_config;
use crate::error::Result;

pub fn run_validate(args: &ConfigArgs, level: LogLevel) -> Result<()> {
    let config = load_config(&args.config)?;
    log(
        level,
        LogLevel::Normal,
        &format!("Configuration is valid: {}", args.config.display()),
    );
    log(
        level,
        LogLevel::Verbose,
        &format!(
            "  mode {:?}, {} steps, batch {}",
            config.model.mode, config.training.max_step, config.data.batch_size
        ),
    );
    Ok(())
}
