//! Command-line arguments

use crate::config::TrainingMode;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// tumorgen: physics-regularized generative training for tumor growth fields
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "tumorgen")]
#[command(version)]
#[command(about = "Train generators of 3D tumor concentration fields")]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Validate a configuration file without training
    Validate(ConfigArgs),

    /// Display the resolved configuration
    Info(ConfigArgs),

    /// Inspect a checkpoint file or the newest one in a directory
    Checkpoint(CheckpointArgs),

    /// Short run on synthetic data with the reference networks
    Smoke(SmokeArgs),
}

/// Arguments for commands that read one configuration file
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct ConfigArgs {
    /// Path to the YAML configuration
    #[arg(value_name = "FILE")]
    pub config: PathBuf,
}

/// Arguments for the checkpoint command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct CheckpointArgs {
    /// Checkpoint file or model directory
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// List every parameter tensor
    #[arg(long)]
    pub tensors: bool,
}

/// Arguments for the smoke command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct SmokeArgs {
    /// Optional YAML configuration; small defaults otherwise
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Override the training mode
    #[arg(long, value_parser = parse_mode)]
    pub mode: Option<TrainingMode>,

    /// Override max_step
    #[arg(long)]
    pub steps: Option<u64>,

    /// Override the model directory
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Synthetic training samples
    #[arg(long, default_value_t = 32)]
    pub train_samples: usize,

    /// Synthetic validation samples
    #[arg(long, default_value_t = 8)]
    pub val_samples: usize,

    /// Seed for data and network initialisation
    #[arg(long, default_value_t = 0)]
    pub seed: u64,

    /// Continue from the newest checkpoint in the model directory
    #[arg(long)]
    pub resume: bool,

    /// Stop after this many validation rounds without improvement
    #[arg(long)]
    pub patience: Option<usize>,

    /// Load batches on the calling thread instead of prefetching
    #[arg(long)]
    pub sequential: bool,
}

fn parse_mode(s: &str) -> Result<TrainingMode, String> {
    match s.to_ascii_lowercase().as_str() {
        "plain" => Ok(TrainingMode::Plain),
        "adversarial" | "gan" => Ok(TrainingMode::Adversarial),
        "autoencoder" | "ae" => Ok(TrainingMode::Autoencoder),
        other => Err(format!(
            "unknown mode '{other}' (expected plain, adversarial or autoencoder)"
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_smoke_overrides() {
        let cli = Cli::try_parse_from([
            "tumorgen", "smoke", "--mode", "gan", "--steps", "12", "-o", "/tmp/run", "--resume",
        ])
        .unwrap();
        match cli.command {
            Command::Smoke(args) => {
                assert_eq!(args.mode, Some(TrainingMode::Adversarial));
                assert_eq!(args.steps, Some(12));
                assert_eq!(args.output, Some(PathBuf::from("/tmp/run")));
                assert!(args.resume);
                assert_eq!(args.train_samples, 32);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_unknown_mode_rejected() {
        assert!(Cli::try_parse_from(["tumorgen", "smoke", "--mode", "vae"]).is_err());
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::try_parse_from(["tumorgen", "validate", "run.yaml", "-q"]).unwrap();
        assert!(cli.quiet);
        assert_eq!(
            cli.command,
            Command::Validate(ConfigArgs {
                config: PathBuf::from("run.yaml")
            })
        );
    }
}
