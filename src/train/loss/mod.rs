//! Loss functions and per-mode loss composition
//!
//! - [`L1Loss`] / [`MSELoss`] - element-wise terms with explicit gradients
//! - [`JacobianL1Loss`] - L1 between spatial gradients
//! - [`KlSparsity`] - Bernoulli KL penalty on latent activations
//! - [`LossComposer`] - generator, discriminator and autoencoder objectives

mod composer;
mod elementwise;
mod jacobian;
mod sparsity;
mod traits;


pub use composer::{AutoencoderLoss, DiscriminatorLoss, GeneratorLoss, LossComposer, LossTerms};
pub use elementwise::{least_squares, L1Loss, MSELoss};
pub use jacobian::JacobianL1Loss;
pub use sparsity::KlSparsity;
pub use traits::{LossFn, LossOutput};
