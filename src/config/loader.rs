//! Loading training configuration from YAML files

use super::schema::TrainerConfig;
use super::validate::validate_config;
use crate::error::{Error, Result};
use std::fs;
use std::path::Path;

/// Load and validate a training configuration
///
/// # Example
///
/// ```no_run
/// use tumorgen::config::load_config;
///
/// let config = load_config("train.yaml")?;
/// println!("training for {} steps", config.training.max_step);
/// # Ok::<(), tumorgen::Error>(())
/// ```
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<TrainerConfig> {
    let path = path.as_ref();
    let yaml = fs::read_to_string(path).map_err(|e| {
        Error::Config(format!("Failed to read config file {}: {e}", path.display()))
    })?;
    parse_config(&yaml)
}

/// Parse and validate a configuration held in memory
pub fn parse_config(yaml: &str) -> Result<TrainerConfig> {
    let config: TrainerConfig = serde_yaml::from_str(yaml)
        .map_err(|e| Error::Config(format!("Failed to parse YAML config: {e}")))?;
    validate_config(&config)?;
    Ok(config)
}

/// Write a configuration next to the run artifacts
pub fn save_config<P: AsRef<Path>>(config: &TrainerConfig, path: P) -> Result<()> {
    let yaml = serde_yaml::to_string(config)?;
    fs::write(path, yaml)?;
    Ok(())
}
