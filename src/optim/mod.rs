//! Optimizers and learning-rate schedules

mod adam;
mod optimizer;
mod scheduler;
mod sgd;

pub use adam::Adam;
pub use optimizer::Optimizer;
pub use scheduler::{CosineAnnealingLR, LRScheduler, LrSchedule, StepDecayLR};
pub use sgd::GradientDescent;

use crate::config::OptimSpec;
use crate::error::{Error, Result};

/// Optimizer names accepted in configuration
pub const OPTIMIZER_NAMES: [&str; 2] = ["adam", "gd"];

/// Build the configured optimizer with an initial learning rate
pub fn build_optimizer(spec: &OptimSpec, lr: f32) -> Result<Box<dyn Optimizer>> {
    match spec.name.as_str() {
        "adam" => Ok(Box::new(Adam::new(lr, spec.beta1, spec.beta2, 1e-8))),
        "gd" => Ok(Box::new(GradientDescent::new(lr))),
        other => Err(Error::Config(format!(
            "unknown optimizer '{other}' (expected one of {OPTIMIZER_NAMES:?})"
        ))),
    }
}
