//! Loss function trait

use crate::error::Result;
use ndarray::{Array, Dimension};

/// Scalar loss together with its gradient w.r.t. the predictions
#[derive(Debug, Clone)]
pub struct LossOutput<D: Dimension> {
    pub value: f32,
    pub grad: Array<f32, D>,
}

/// Trait for loss functions with an explicit backward pass
pub trait LossFn {
    /// Compute the loss and `dL/dpredictions`
    fn forward<D: Dimension>(
        &self,
        predictions: &Array<f32, D>,
        targets: &Array<f32, D>,
    ) -> Result<LossOutput<D>>;

    /// Name of the loss function
    fn name(&self) -> &'static str;
}
