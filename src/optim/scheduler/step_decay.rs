//! Step decay learning rate scheduler

use super::LRScheduler;

/// Step Decay Learning Rate Scheduler
///
/// Multiplies the learning rate by gamma every `step_size` steps, i.e. right
/// after step `k * step_size - 1`, never going below `floor`.
///
/// Formula: lr_t = max(lr_initial * gamma^(floor(t / step_size)), floor)
#[derive(Debug, Clone)]
pub struct StepDecayLR {
    lr_initial: f32,
    gamma: f32,
    step_size: u64,
    floor: f32,
    current_step: u64,
}

impl StepDecayLR {
    /// Create a new step decay scheduler
    ///
    /// # Arguments
    /// * `lr_initial` - Initial learning rate
    /// * `step_size` - Decay LR every step_size steps
    /// * `gamma` - Multiplicative factor (0.5 halves the rate)
    pub fn new(lr_initial: f32, step_size: u64, gamma: f32) -> Self {
        Self { lr_initial, gamma, step_size, floor: 0.0, current_step: 0 }
    }

    /// Lower bound applied once decay has started
    pub fn with_floor(mut self, floor: f32) -> Self {
        self.floor = floor;
        self
    }

    /// Resume as if `step` steps had already run
    pub fn starting_at(mut self, step: u64) -> Self {
        self.current_step = step;
        self
    }
}

impl LRScheduler for StepDecayLR {
    fn get_lr(&self) -> f32 {
        if self.step_size == 0 {
            return self.lr_initial;
        }
        let num_decays = self.current_step / self.step_size;
        if num_decays == 0 {
            return self.lr_initial;
        }
        let exponent = i32::try_from(num_decays).unwrap_or(i32::MAX);
        (self.lr_initial * self.gamma.powi(exponent)).max(self.floor)
    }

    fn step(&mut self) {
        self.current_step += 1;
    }

    fn current_step(&self) -> u64 {
        self.current_step
    }
}
