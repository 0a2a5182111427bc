//! Stop when the validation loss plateaus

use super::traits::{CallbackAction, CallbackContext, TrainerCallback};

/// Stops the run after `patience` validation rounds without improvement
///
/// A round improves when the validation loss drops by more than
/// `min_delta` below the best one seen.
#[derive(Clone, Debug)]
pub struct EarlyStopping {
    patience: usize,
    min_delta: f32,
    best_loss: f32,
    rounds_without_improvement: usize,
}

impl EarlyStopping {
    pub fn new(patience: usize, min_delta: f32) -> Self {
        Self {
            patience,
            min_delta,
            best_loss: f32::INFINITY,
            rounds_without_improvement: 0,
        }
    }

    pub fn best_loss(&self) -> f32 {
        self.best_loss
    }

    fn observe(&mut self, loss: f32) {
        if loss < self.best_loss - self.min_delta {
            self.best_loss = loss;
            self.rounds_without_improvement = 0;
        } else {
            self.rounds_without_improvement += 1;
        }
    }
}

impl TrainerCallback for EarlyStopping {
    fn on_validation(&mut self, ctx: &CallbackContext) -> CallbackAction {
        let Some(loss) = ctx.val_loss else {
            return CallbackAction::Continue;
        };
        self.observe(loss);
        if self.rounds_without_improvement >= self.patience {
            tracing::info!(
                step = ctx.step,
                best_loss = self.best_loss,
                patience = self.patience,
                "early stopping"
            );
            CallbackAction::Stop
        } else {
            CallbackAction::Continue
        }
    }

    fn name(&self) -> &'static str {
        "EarlyStopping"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(val: f32) -> CallbackContext {
        CallbackContext {
            val_loss: Some(val),
            ..CallbackContext::default()
        }
    }

    #[test]
    fn test_stops_after_patience() {
        let mut es = EarlyStopping::new(2, 0.01);
        assert_eq!(es.on_validation(&at(1.0)), CallbackAction::Continue);
        assert_eq!(es.on_validation(&at(0.5)), CallbackAction::Continue);
        assert_eq!(es.on_validation(&at(0.495)), CallbackAction::Continue);
        assert_eq!(es.on_validation(&at(0.6)), CallbackAction::Stop);
        assert_eq!(es.best_loss(), 0.5);
    }

    #[test]
    fn test_improvement_resets_counter() {
        let mut es = EarlyStopping::new(2, 0.0);
        es.on_validation(&at(1.0));
        es.on_validation(&at(1.0));
        assert_eq!(es.on_validation(&at(0.9)), CallbackAction::Continue);
        assert_eq!(es.on_validation(&at(0.95)), CallbackAction::Continue);
    }

    #[test]
    fn test_ignores_rounds_without_validation() {
        let mut es = EarlyStopping::new(1, 0.0);
        let ctx = CallbackContext::default();
        assert_eq!(es.on_validation(&ctx), CallbackAction::Continue);
    }
}
