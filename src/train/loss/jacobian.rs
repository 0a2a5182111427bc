//! Spatial-gradient consistency

use super::elementwise::L1Loss;
use super::traits::{LossFn, LossOutput};
use crate::error::Result;
use crate::physics::{jacobian, jacobian_adjoint};
use ndarray::{Array4, Array5, Ix4};

/// `mean(|jac(pred) - target_grad|)`, back-propagated through the stencil
#[derive(Debug, Clone, Copy, Default)]
pub struct JacobianL1Loss;

impl JacobianL1Loss {
    pub fn forward(&self, predictions: &Array4<f32>, target_grad: &Array5<f32>) -> Result<LossOutput<Ix4>> {
        let out = L1Loss.forward(&jacobian(predictions), target_grad)?;
        Ok(LossOutput {
            value: out.value,
            grad: jacobian_adjoint(&out.grad),
        })
    }

    pub fn name(&self) -> &'static str {
        "JacobianL1"
    }
}
