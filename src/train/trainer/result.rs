//! Training result types

use std::path::PathBuf;

/// Result of a training run
#[derive(Debug, Clone)]
pub struct TrainResult {
    /// Step counter at exit (`max_step` unless a callback stopped the run)
    pub final_step: u64,
    /// Loss of the last optimization step
    pub final_loss: f32,
    /// Most recent validation loss
    pub val_loss: Option<f32>,
    /// Learning rate at exit
    pub final_lr: f32,
    /// Whether a callback stopped the run early
    pub stopped_early: bool,
    /// Path of the final checkpoint
    pub checkpoint: PathBuf,
    /// Total training time in seconds
    pub elapsed_secs: f64,
}
