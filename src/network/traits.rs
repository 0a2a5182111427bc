//! Network seam
//!
//! The training loop never looks inside a network. It feeds inputs, reads
//! outputs, hands back the gradient of the loss w.r.t. those outputs and
//! lets the optimizer walk the parameter list. `backward` always receives
//! the same inputs as the matching `forward` and accumulates into the
//! parameter gradients until `zero_grad` is called.

use super::param::{zero_grads, Parameter};
use crate::error::Result;
use ndarray::{Array2, Array4, Array5};

/// Maps physical parameters and anatomy to a concentration field
pub trait Generator {
    /// `params [B, 3]`, `anatomy [B, X, Y, Z, C]` to `field [B, X, Y, Z]`
    fn forward(&self, params: &Array2<f32>, anatomy: &Array5<f32>) -> Result<Array4<f32>>;

    /// Accumulate parameter gradients given `dL/dfield`
    fn backward(
        &mut self,
        params: &Array2<f32>,
        anatomy: &Array5<f32>,
        grad_output: &Array4<f32>,
    ) -> Result<()>;

    fn parameters(&self) -> &[Parameter];

    fn parameters_mut(&mut self) -> &mut [Parameter];

    fn zero_grad(&mut self) {
        zero_grads(self.parameters_mut());
    }
}

/// Scores concentration fields as real or generated
pub trait Discriminator {
    /// `field [B, X, Y, Z]` to scores `[B, K]`
    fn forward(&self, field: &Array4<f32>) -> Result<Array2<f32>>;

    /// Accumulate parameter gradients given `dL/dscores`; returns `dL/dfield`
    fn backward(&mut self, field: &Array4<f32>, grad_output: &Array2<f32>)
        -> Result<Array4<f32>>;

    fn parameters(&self) -> &[Parameter];

    fn parameters_mut(&mut self) -> &mut [Parameter];

    fn zero_grad(&mut self) {
        zero_grads(self.parameters_mut());
    }
}

/// Output of one autoencoder pass
#[derive(Debug, Clone)]
pub struct Encoded {
    /// Reconstructed field `[B, X, Y, Z]`
    pub reconstruction: Array4<f32>,
    /// Latent code `[B, L]` with values in `(0, 1)`
    pub latent: Array2<f32>,
}

/// Compresses a field into a latent code and decodes it back
pub trait Autoencoder {
    /// Width of the latent code
    fn latent_dim(&self) -> usize;

    fn forward(&self, field: &Array4<f32>) -> Result<Encoded>;

    /// Accumulate parameter gradients given the gradients w.r.t. both outputs
    fn backward(
        &mut self,
        field: &Array4<f32>,
        grad_reconstruction: &Array4<f32>,
        grad_latent: &Array2<f32>,
    ) -> Result<()>;

    fn parameters(&self) -> &[Parameter];

    fn parameters_mut(&mut self) -> &mut [Parameter];

    fn zero_grad(&mut self) {
        zero_grads(self.parameters_mut());
    }
}
