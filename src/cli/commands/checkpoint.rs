//! Checkpoint command implementation

use crate::cli::logging::log;
use crate::cli::{CheckpointArgs, LogLevel};
use crate::error::{Error, Result};
use crate::io::{latest_checkpoint, load_checkpoint, Checkpoint};

/// Summary lines for a checkpoint
pub fn format_checkpoint(checkpoint: &Checkpoint, tensors: bool) -> String {
    let mut lines = vec![
        format!("Step: {}", checkpoint.step),
        format!("Learning rate: {:e}", checkpoint.lr),
        format!("Mode: {:?}", checkpoint.mode),
        format!("Saved: {}", checkpoint.timestamp.to_rfc3339()),
        format!("Parameters: {}", checkpoint.parameter_count()),
    ];
    for (network, records) in &checkpoint.networks {
        let count: usize = records.iter().map(|r| r.data.len()).sum();
        lines.push(format!("  {network}: {} tensors, {count} values", records.len()));
        if tensors {
            for r in records {
                lines.push(format!("    {} {:?}", r.name, r.shape));
            }
        }
    }
    lines.join("\n")
}

pub fn run_checkpoint(args: &CheckpointArgs, level: LogLevel) -> Result<()> {
    let path = if args.path.is_dir() {
        latest_checkpoint(&args.path)?.ok_or_else(|| {
            Error::Config(format!("no checkpoint in {}", args.path.display()))
        })?
    } else {
        args.path.clone()
    };
    let checkpoint = load_checkpoint(&path)?;
    log(level, LogLevel::Normal, &format!("Checkpoint: {}", path.display()));
    log(level, LogLevel::Normal, &format_checkpoint(&checkpoint, args.tensors));
    Ok(())
}
