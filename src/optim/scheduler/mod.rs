//! Learning rate schedulers
//!
//! - `StepDecayLR` - Halve (or scale by gamma) every N steps, with a floor
//! - `CosineAnnealingLR` - Smooth cosine decay from lr_max to lr_min
//! - `LrSchedule` - The one schedule a run uses, built from configuration

mod cosine_annealing;
mod step_decay;

#[cfg(test)]
mod tests;

pub use cosine_annealing::CosineAnnealingLR;
pub use step_decay::StepDecayLR;

use crate::config::{LrPolicy, ScheduleSpec};
use crate::optim::Optimizer;

/// Learning rate scheduler trait
pub trait LRScheduler {
    /// Get the current learning rate
    fn get_lr(&self) -> f32;

    /// Advance by one training step
    fn step(&mut self);

    /// Training steps seen so far
    fn current_step(&self) -> u64;
}

/// Learning-rate schedule shared by every optimizer of a run
#[derive(Debug, Clone)]
pub enum LrSchedule {
    Step(StepDecayLR),
    Decay(CosineAnnealingLR),
}

impl LrSchedule {
    /// Build the configured policy, positioned at `start_step`
    pub fn from_spec(spec: &ScheduleSpec, max_step: u64, start_step: u64) -> Self {
        match spec.policy {
            LrPolicy::Step => Self::Step(
                StepDecayLR::new(spec.lr_max, spec.lr_update_step, 0.5)
                    .with_floor(spec.lr_lower_boundary)
                    .starting_at(start_step),
            ),
            LrPolicy::Decay => Self::Decay(
                CosineAnnealingLR::new(spec.lr_max, max_step, spec.lr_min).starting_at(start_step),
            ),
        }
    }

    /// Set the current rate on every optimizer
    pub fn apply(&self, optimizers: &mut [&mut dyn Optimizer]) {
        let lr = self.get_lr();
        for opt in optimizers.iter_mut() {
            opt.set_lr(lr);
        }
    }
}

impl LRScheduler for LrSchedule {
    fn get_lr(&self) -> f32 {
        match self {
            Self::Step(s) => s.get_lr(),
            Self::Decay(s) => s.get_lr(),
        }
    }

    fn step(&mut self) {
        match self {
            Self::Step(s) => s.step(),
            Self::Decay(s) => s.step(),
        }
    }

    fn current_step(&self) -> u64 {
        match self {
            Self::Step(s) => s.current_step(),
            Self::Decay(s) => s.current_step(),
        }
    }
}
