//! Progress callback for logging training progress

use super::traits::{CallbackAction, CallbackContext, TrainerCallback};

/// Prints the training and validation loss at every logging point
#[derive(Clone, Debug, Default)]
pub struct ProgressCallback {
    quiet: bool,
}

impl ProgressCallback {
    /// Create progress callback
    pub fn new() -> Self {
        Self { quiet: false }
    }

    /// Format lines without printing them
    pub fn quiet() -> Self {
        Self { quiet: true }
    }

    /// `[step/max_step/ep<epoch>] Training Loss: <loss>`
    pub fn training_line(ctx: &CallbackContext) -> String {
        format!(
            "[{}/{}/ep{:.2}] Training Loss: {:.6}",
            ctx.step, ctx.max_step, ctx.epoch, ctx.loss
        )
    }

    /// `[step/max_step/ep<epoch>] Validation Loss: <loss>`
    pub fn validation_line(ctx: &CallbackContext) -> Option<String> {
        ctx.val_loss.map(|val| {
            format!(
                "[{}/{}/ep{:.2}] Validation Loss: {:.6}",
                ctx.step, ctx.max_step, ctx.epoch, val
            )
        })
    }

    /// Closing line; an aborted run is not reported as finished
    pub fn end_line(ctx: &CallbackContext) -> String {
        let outcome = if ctx.aborted { "aborted" } else { "finished" };
        format!("Training {outcome} at step {} ({:.1}s)", ctx.step, ctx.elapsed_secs)
    }
}

impl TrainerCallback for ProgressCallback {
    fn on_validation(&mut self, ctx: &CallbackContext) -> CallbackAction {
        let train = Self::training_line(ctx);
        let val = Self::validation_line(ctx);
        tracing::info!(step = ctx.step, loss = ctx.loss, val_loss = ?ctx.val_loss, "progress");
        if !self.quiet {
            println!("{train}");
            if let Some(val) = val {
                println!("{val}");
            }
        }
        CallbackAction::Continue
    }

    fn on_train_end(&mut self, ctx: &CallbackContext) {
        if !self.quiet {
            println!("{}", Self::end_line(ctx));
        }
    }

    fn name(&self) -> &'static str {
        "ProgressCallback"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> CallbackContext {
        CallbackContext {
            step: 500,
            max_step: 300_000,
            epoch: 1.25,
            loss: 0.123_456_7,
            lr: 1e-4,
            val_loss: Some(0.2),
            elapsed_secs: 3.0,
            aborted: false,
        }
    }

    #[test]
    fn test_training_line_format() {
        assert_eq!(
            ProgressCallback::training_line(&ctx()),
            "[500/300000/ep1.25] Training Loss: 0.123457"
        );
    }

    #[test]
    fn test_validation_line_format() {
        assert_eq!(
            ProgressCallback::validation_line(&ctx()).unwrap(),
            "[500/300000/ep1.25] Validation Loss: 0.200000"
        );
        let no_val = CallbackContext { val_loss: None, ..ctx() };
        assert!(ProgressCallback::validation_line(&no_val).is_none());
    }

    #[test]
    fn test_end_line_reports_abort() {
        assert_eq!(
            ProgressCallback::end_line(&ctx()),
            "Training finished at step 500 (3.0s)"
        );
        let failed = CallbackContext { aborted: true, ..ctx() };
        assert_eq!(
            ProgressCallback::end_line(&failed),
            "Training aborted at step 500 (3.0s)"
        );
    }

    #[test]
    fn test_progress_callback_continues() {
        let mut pc = ProgressCallback::quiet();
        assert_eq!(pc.on_validation(&ctx()), CallbackAction::Continue);
        assert_eq!(pc.name(), "ProgressCallback");
    }
}
