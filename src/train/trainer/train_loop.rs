//! Warm-up, step loop, validation, sampling and finalization

use super::core::Trainer;
use super::result::TrainResult;
use crate::config::{save_config, TrainingMode};
use crate::data::{FieldBatch, Split};
use crate::error::{Error, Result};
use crate::io::{save_checkpoint, Checkpoint};
use crate::optim::LRScheduler;
use crate::sample::{autoencode, generate, save_image, write_ground_truth, ProbeSet, Projections};
use crate::summary::SummarySink;
use crate::train::callback::{CallbackAction, CallbackContext};
use crate::train::step::{ensure_finite, StepReport};
use std::fs;
use std::time::Instant;

/// Configuration snapshot written next to the run artifacts
pub const CONFIG_FILE: &str = "config.yaml";

impl Trainer {
    /// Run from the current step to `max_step`
    ///
    /// A non-finite loss aborts with `Error::Diverged`. The batch source is
    /// stopped exactly once on every path; on success the final checkpoint
    /// is written before that.
    pub fn train(&mut self) -> Result<TrainResult> {
        if self.finished {
            return Err(Error::Config("trainer has already run".into()));
        }
        self.finished = true;
        self.start_time = Some(Instant::now());
        tracing::info!(
            mode = ?self.strategy.mode(),
            start = self.ctx.step(),
            max_step = self.ctx.max_step(),
            "training started"
        );

        let outcome = match self.warm_up() {
            Ok(true) => self.finalize(true),
            Ok(false) => self.run_loop().and_then(|stopped| self.finalize(stopped)),
            Err(e) => Err(e),
        };
        self.source.stop();

        let last_loss = self.ctx.last_loss().unwrap_or(f32::NAN);
        let ctx = CallbackContext {
            aborted: outcome.is_err(),
            ..self.build_context(self.ctx.step(), last_loss, self.last_val_loss)
        };
        self.callbacks.on_train_end(&ctx);

        if let Err(e) = &outcome {
            tracing::error!(error = %e, step = self.ctx.step(), "training aborted");
        }
        outcome
    }

    /// Probe set, ground-truth artifacts and the one-shot ground-truth images
    fn warm_up(&mut self) -> Result<bool> {
        let dir = self.config.model_dir.clone();
        fs::create_dir_all(&dir)?;
        save_config(&self.config, dir.join(CONFIG_FILE))?;

        let ground_truth = self.source.probe_batch(self.config.data.batch_size)?;
        let probes = ProbeSet::build(ground_truth)?;
        let projections = write_ground_truth(&probes, &dir)?;
        if self.strategy.mode() == TrainingMode::Autoencoder {
            save_image(&projections.xym, dir.join("xym_gt.png"), probes.batch_size(), 1)?;
            save_image(&projections.zym, dir.join("zym_gt.png"), probes.batch_size(), 1)?;
        }
        self.record_images(self.ctx.step(), "x", &projections)?;
        self.probes = Some(probes);

        let ctx = self.build_context(self.ctx.step(), 0.0, None);
        Ok(self.callbacks.on_train_begin(&ctx) == CallbackAction::Stop)
    }

    /// Returns whether a callback stopped the loop early
    fn run_loop(&mut self) -> Result<bool> {
        let log_step = self.config.training.log_step;
        let test_step = self.config.training.test_step;

        while !self.ctx.is_finished() {
            let step = self.ctx.step();
            let batch = self.source.next_batch(Split::Train)?;
            let report = self.strategy.step(&batch, &mut self.ctx)?;

            let mut action = CallbackAction::Continue;
            if self.is_due(step, log_step) {
                action = self.log(step)?;
            }
            if self.is_due(step, test_step) {
                self.sample(step)?;
            }

            self.schedule.step();
            self.apply_lr();

            let ctx = self.build_context(step, report.loss, None);
            if self.callbacks.on_step_end(&ctx) == CallbackAction::Stop
                || action == CallbackAction::Stop
            {
                tracing::info!(step, "stop requested by callback");
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Every `every` steps after the first one, and always on the final step
    fn is_due(&self, step: u64, every: u64) -> bool {
        (step > 0 && step % every == 0) || self.ctx.is_final_step(step)
    }

    /// Fresh-batch training loss, validation, summaries and progress output
    fn log(&mut self, step: u64) -> Result<CallbackAction> {
        let batch = self.source.next_batch(Split::Train)?;
        let report = self.strategy.evaluate(&batch)?;
        ensure_finite(step, &[report.loss])?;

        let val_loss = self.validation_loss()?;
        ensure_finite(step, &[val_loss])?;
        self.last_val_loss = Some(val_loss);

        self.record_report(step, &batch, &report)?;
        self.summary.scalar(step, "validation_loss", val_loss)?;
        self.summary.flush()?;

        let ctx = self.build_context(step, report.loss, Some(val_loss));
        Ok(self.callbacks.on_validation(&ctx))
    }

    /// Mean loss over `ceil(val_set_size / batch_size)` validation batches
    pub fn validation_loss(&mut self) -> Result<f32> {
        let batches = self
            .config
            .data
            .val_set_size
            .div_ceil(self.config.data.batch_size.max(1))
            .max(1);
        let mut total = 0.0;
        for _ in 0..batches {
            let batch = self.source.next_batch(Split::Validation)?;
            total += self.strategy.evaluate(&batch)?.loss;
        }
        Ok(total / batches as f32)
    }

    fn sample(&mut self, step: u64) -> Result<()> {
        let probes = self
            .probes
            .as_ref()
            .ok_or_else(|| Error::Config("sampling requested before warm-up".into()))?;
        let dir = &self.config.model_dir;
        let projections = if let Some(generator) = self.strategy.generator() {
            generate(generator, probes, dir, step)?
        } else if let Some(autoencoder) = self.strategy.autoencoder() {
            autoencode(autoencoder, probes.ground_truth(), dir, step)?
        } else {
            return Ok(());
        };
        self.record_images(step, "G", &projections)?;

        let ctx = self.build_context(step, self.ctx.last_loss().unwrap_or(0.0), None);
        self.callbacks.on_sample(&ctx);
        Ok(())
    }

    fn record_images(&mut self, step: u64, suffix: &str, projections: &Projections) -> Result<()> {
        self.summary.image(step, &format!("xym/{suffix}"), &projections.xym)?;
        self.summary.image(step, &format!("zym/{suffix}"), &projections.zym)
    }

    /// Loss terms, misc scalars and histograms under their summary tags
    ///
    /// `y` holds the parameter inputs of the evaluated batch.
    fn record_report(&mut self, step: u64, batch: &FieldBatch, report: &StepReport) -> Result<()> {
        let terms = &report.terms;
        let sink = self.summary.as_mut();
        if self.strategy.mode() == TrainingMode::Autoencoder {
            sink.scalar(step, "loss/total_loss", report.loss)?;
            sink.scalar(step, "loss/loss_l1", terms.l1)?;
            sink.scalar(step, "loss/loss_j_l1", terms.jacobian_l1)?;
            if let Some(param) = terms.param {
                sink.scalar(step, "loss/loss_p", param)?;
            }
            if let Some(kl) = terms.sparsity {
                sink.scalar(step, "loss/loss_kl", kl)?;
            }
        } else {
            sink.scalar(step, "loss/g_loss", report.loss)?;
            sink.scalar(step, "loss/g_loss_l1", terms.l1)?;
            sink.scalar(step, "loss/g_loss_j_l1", terms.jacobian_l1)?;
            if let Some(physics) = terms.physics {
                sink.scalar(step, "loss/physics", physics)?;
            }
            if let Some(adversarial) = terms.adversarial {
                sink.scalar(step, "loss/g_loss_real", adversarial.sqrt())?;
            }
            if let Some((real, fake)) = report.discriminator {
                sink.scalar(step, "loss/d_loss_real", real.sqrt())?;
                sink.scalar(step, "loss/d_loss_fake", fake.sqrt())?;
            }
        }

        sink.scalar(step, "misc/epoch", step as f32 * self.epochs_per_step)?;
        sink.scalar(step, "misc/q", self.source.queue_depth() as f32)?;
        sink.scalar(step, "misc/g_lr", self.ctx.lr())?;
        let params = batch.params.to_array();
        sink.histogram(step, "y", &params.iter().copied().collect::<Vec<_>>())?;
        if let Some(latent) = &report.latent {
            sink.histogram(step, "z", &latent.iter().copied().collect::<Vec<_>>())?;
        }
        Ok(())
    }

    fn finalize(&mut self, stopped_early: bool) -> Result<TrainResult> {
        let checkpoint = Checkpoint::capture(
            self.ctx.step(),
            self.ctx.lr(),
            self.strategy.mode(),
            &self.strategy.networks(),
        );
        let path = save_checkpoint(&checkpoint, &self.config.model_dir)?;
        self.summary.flush()?;

        let elapsed_secs = self.start_time.map_or(0.0, |t| t.elapsed().as_secs_f64());
        tracing::info!(step = self.ctx.step(), elapsed_secs, "training finished");
        Ok(TrainResult {
            final_step: self.ctx.step(),
            final_loss: self.ctx.last_loss().unwrap_or(f32::NAN),
            val_loss: self.last_val_loss,
            final_lr: self.ctx.lr(),
            stopped_early,
            checkpoint: path,
            elapsed_secs,
        })
    }
}
