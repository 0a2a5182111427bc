//! Error types
//!
//! Every failure surfaces synchronously from the call that triggered it.
//! Numerical divergence is fatal: the training loop never retries.

use crate::config::ValidationError;
use thiserror::Error;

/// Result type alias for tumorgen operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while configuring or running a training job.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration could not be read or parsed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration parsed but holds an invalid value.
    #[error("Invalid configuration: {0}")]
    Validation(#[from] ValidationError),

    /// Loss became NaN or infinite.
    #[error("Model diverged at step {step}: loss = {loss}")]
    Diverged { step: u64, loss: f32 },

    /// Two tensors that must agree in shape do not.
    #[error("Shape mismatch for {what}: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        what: &'static str,
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    /// The batch source failed or was already stopped.
    #[error("Data source error: {0}")]
    DataSource(String),

    /// Filesystem error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON/YAML (de)serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// PNG encoding error.
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

impl Error {
    /// Build a shape mismatch error.
    pub fn shape(what: &'static str, expected: &[usize], actual: &[usize]) -> Self {
        Self::ShapeMismatch {
            what,
            expected: expected.to_vec(),
            actual: actual.to_vec(),
        }
    }

    /// Whether this error was caused by user input rather than by the run itself.
    pub fn is_user_error(&self) -> bool {
        matches!(self, Self::Config(_) | Self::Validation(_))
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(format!("JSON: {e}"))
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(e: serde_yaml::Error) -> Self {
        Self::Serialization(format!("YAML: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diverged_message() {
        let err = Error::Diverged { step: 42, loss: f32::NAN };
        let msg = err.to_string();
        assert!(msg.contains("step 42"));
        assert!(msg.contains("NaN"));
    }

    #[test]
    fn test_shape_helper() {
        let err = Error::shape("anatomy", &[2, 4, 4, 4, 3], &[1, 4, 4, 4, 3]);
        assert!(matches!(err, Error::ShapeMismatch { what: "anatomy", .. }));
        assert!(err.to_string().contains("[2, 4, 4, 4, 3]"));
    }

    #[test]
    fn test_user_error_classification() {
        assert!(Error::Config("bad".into()).is_user_error());
        assert!(Error::Validation(ValidationError::InvalidBatchSize(0)).is_user_error());
        assert!(!Error::Diverged { step: 0, loss: f32::INFINITY }.is_user_error());
    }
}
