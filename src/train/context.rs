//! Mutable run state shared between the driver and the step strategies

/// Step counter and learning rate of one run
///
/// Owned by the driver and lent to the strategy for each step; the
/// strategy is the only place the counter moves.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingContext {
    step: u64,
    max_step: u64,
    lr: f32,
    epochs_per_step: f32,
    last_loss: Option<f32>,
}

impl TrainingContext {
    pub fn new(start_step: u64, max_step: u64, lr: f32, epochs_per_step: f32) -> Self {
        Self {
            step: start_step,
            max_step,
            lr,
            epochs_per_step,
            last_loss: None,
        }
    }

    /// Current (next to run) step
    pub fn step(&self) -> u64 {
        self.step
    }

    pub fn max_step(&self) -> u64 {
        self.max_step
    }

    pub fn is_finished(&self) -> bool {
        self.step >= self.max_step
    }

    /// Whether `step` is the last one of the run
    pub fn is_final_step(&self, step: u64) -> bool {
        step + 1 == self.max_step
    }

    /// Derived epoch at the current step
    pub fn epoch(&self) -> f32 {
        self.step as f32 * self.epochs_per_step
    }

    pub fn lr(&self) -> f32 {
        self.lr
    }

    pub fn set_lr(&mut self, lr: f32) {
        self.lr = lr;
    }

    /// Loss of the most recent step
    pub fn last_loss(&self) -> Option<f32> {
        self.last_loss
    }

    /// Record a completed step
    pub(crate) fn complete_step(&mut self, loss: f32) {
        self.last_loss = Some(loss);
        self.step += 1;
    }
}
