//! Validation error types
//!
//! Defines all validation error variants for training specifications.

/// Validation error type
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid batch size: {0} (must be > 0)")]
    InvalidBatchSize(usize),

    #[error("Invalid validation set size: {0} (must be > 0)")]
    InvalidValSetSize(usize),

    #[error("Invalid volume shape: {0:?} (every axis must be >= 2)")]
    InvalidShape([usize; 3]),

    #[error("Invalid queue depth: {0} (must be > 0)")]
    InvalidQueueDepth(usize),

    #[error("Invalid optimizer: {0} (must be one of: adam, gd)")]
    InvalidOptimizer(String),

    #[error("Invalid Adam beta {0}: {1} (must be in [0.0, 1.0))")]
    InvalidBeta(&'static str, f32),

    #[error("Invalid learning rate {0}: {1} (must be > 0.0 and <= 1.0)")]
    InvalidLearningRate(&'static str, f32),

    #[error("Invalid learning-rate range: lr_min {min} exceeds lr_max {max}")]
    InvalidLearningRateRange { min: f32, max: f32 },

    #[error("Invalid lr_update_step: {0} (must be > 0 for the step policy)")]
    InvalidLrUpdateStep(u64),

    #[error("Invalid loss weight {0}: {1} (must be finite and >= 0.0)")]
    InvalidLossWeight(&'static str, f32),

    #[error("Invalid step range: start_step {start} must be below max_step {max}")]
    InvalidStepRange { start: u64, max: u64 },

    #[error("Invalid {0} interval: must be > 0")]
    InvalidInterval(&'static str),

    #[error("Invalid physics time step: {0} (must be > 0.0)")]
    InvalidTimeStep(f32),

    #[error("Invalid gray matter ratio: {0} (must be > 0.0)")]
    InvalidGrayMatterRatio(f32),

    #[error("Invalid latent dimension: {0} (must exceed the 3 parameter units)")]
    InvalidLatentDim(usize),

    #[error("Invalid sparsity target: {0} (must be in (0.0, 1.0))")]
    InvalidSparsity(f32),

    #[error("Physics residual is not available in autoencoder mode")]
    PhysicsWithAutoencoder,
}
