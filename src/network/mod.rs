//! Network interfaces and reference implementations

mod param;
pub mod reference;
mod traits;

pub use param::{zero_grads, Parameter};
pub use traits::{Autoencoder, Discriminator, Encoded, Generator};
