//! Finite-difference operators and the reaction-diffusion residual

mod diffusivity;
mod residual;
mod stencil;

pub use diffusivity::{diffusivity, GRAY_MATTER, WHITE_MATTER};
pub use residual::{PhysicsGradients, PhysicsReport, PhysicsResidual};
pub use stencil::{jacobian, jacobian_adjoint, laplacian};
