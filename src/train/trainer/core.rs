//! Core Trainer struct, constructors and builders

use crate::config::{validate_config, TrainerConfig};
use crate::data::BatchSource;
use crate::error::{Error, Result};
use crate::io::{latest_checkpoint, load_checkpoint, Checkpoint};
use crate::network::{Autoencoder, Discriminator, Generator};
use crate::optim::{LRScheduler, LrSchedule};
use crate::sample::ProbeSet;
use crate::summary::{NullSummary, SummarySink};
use crate::train::callback::{CallbackContext, CallbackManager, ProgressCallback, TrainerCallback};
use crate::train::context::TrainingContext;
use crate::train::step::{build_strategy, Networks, StepStrategy};
use std::path::Path;
use std::time::Instant;

/// Drives a run from warm-up to the final checkpoint
///
/// ```no_run
/// use tumorgen::config::TrainerConfig;
/// use tumorgen::data::{PrefetchSource, SyntheticStore};
/// use tumorgen::network::reference::AffineGenerator;
/// use tumorgen::train::Trainer;
///
/// let config = TrainerConfig::default();
/// let store = SyntheticStore::new(config.data.shape, 128, 32, 0);
/// let source = PrefetchSource::spawn(store, config.data.batch_size, config.data.queue_depth, 0)?;
/// let generator = AffineGenerator::new(config.data.shape, 0);
///
/// let mut trainer = Trainer::plain(config, generator, source)?;
/// let result = trainer.train()?;
/// println!("stopped at step {}", result.final_step);
/// # Ok::<(), tumorgen::Error>(())
/// ```
pub struct Trainer {
    pub(crate) config: TrainerConfig,
    pub(crate) strategy: Box<dyn StepStrategy>,
    pub(crate) source: Box<dyn BatchSource>,
    pub(crate) schedule: LrSchedule,
    pub(crate) ctx: TrainingContext,
    pub(crate) callbacks: CallbackManager,
    pub(crate) summary: Box<dyn SummarySink>,
    pub(crate) probes: Option<ProbeSet>,
    pub(crate) epochs_per_step: f32,
    pub(crate) last_val_loss: Option<f32>,
    pub(crate) start_time: Option<Instant>,
    pub(crate) finished: bool,
}

impl Trainer {
    /// Build from an already assembled step strategy
    ///
    /// A [`ProgressCallback`] is registered by default.
    pub fn from_strategy(
        config: TrainerConfig,
        strategy: Box<dyn StepStrategy>,
        source: Box<dyn BatchSource>,
    ) -> Result<Self> {
        validate_config(&config)?;
        if strategy.mode() != config.model.mode {
            return Err(Error::Config(format!(
                "strategy runs {:?} but the configuration asks for {:?}",
                strategy.mode(),
                config.model.mode
            )));
        }
        let training = &config.training;
        let schedule = LrSchedule::from_spec(&config.schedule, training.max_step, training.start_step);
        let epochs_per_step = source.epochs_per_step();
        let ctx = TrainingContext::new(
            training.start_step,
            training.max_step,
            schedule.get_lr(),
            epochs_per_step,
        );
        let mut callbacks = CallbackManager::new();
        callbacks.add(ProgressCallback::new());

        let mut trainer = Self {
            config,
            strategy,
            source,
            schedule,
            ctx,
            callbacks,
            summary: Box::new(NullSummary),
            probes: None,
            epochs_per_step,
            last_val_loss: None,
            start_time: None,
            finished: false,
        };
        trainer.apply_lr();
        Ok(trainer)
    }

    /// Build the strategy for the configured mode, then the trainer
    pub fn new(
        config: TrainerConfig,
        networks: Networks,
        source: impl BatchSource + 'static,
    ) -> Result<Self> {
        let lr = LrSchedule::from_spec(
            &config.schedule,
            config.training.max_step,
            config.training.start_step,
        )
        .get_lr();
        let strategy = build_strategy(&config, networks, lr)?;
        Self::from_strategy(config, strategy, Box::new(source))
    }

    /// Generator-only run
    pub fn plain(
        config: TrainerConfig,
        generator: impl Generator + 'static,
        source: impl BatchSource + 'static,
    ) -> Result<Self> {
        let networks = Networks::Generative {
            generator: Box::new(generator),
            discriminator: None,
        };
        Self::new(config, networks, source)
    }

    /// Generator run with an optional discriminator (adversarial mode needs one)
    pub fn generative<D: Discriminator + 'static>(
        config: TrainerConfig,
        generator: impl Generator + 'static,
        discriminator: Option<D>,
        source: impl BatchSource + 'static,
    ) -> Result<Self> {
        let networks = Networks::Generative {
            generator: Box::new(generator),
            discriminator: discriminator.map(|d| Box::new(d) as Box<dyn Discriminator>),
        };
        Self::new(config, networks, source)
    }

    /// Autoencoder run
    pub fn autoencoder(
        config: TrainerConfig,
        autoencoder: impl Autoencoder + 'static,
        source: impl BatchSource + 'static,
    ) -> Result<Self> {
        Self::new(config, Networks::Autoencoder(Box::new(autoencoder)), source)
    }

    /// Replace the summary sink (records are discarded by default)
    pub fn with_summary(mut self, sink: impl SummarySink + 'static) -> Self {
        self.summary = Box::new(sink);
        self
    }

    /// Drop the default progress output
    pub fn without_progress(mut self) -> Self {
        self.callbacks = CallbackManager::new();
        self
    }

    /// Add a callback to the trainer
    pub fn add_callback<C: TrainerCallback + 'static>(&mut self, callback: C) {
        self.callbacks.add(callback);
    }

    /// Restore parameters and position from a checkpoint file
    pub fn resume_from(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let checkpoint = load_checkpoint(path.as_ref())?;
        if checkpoint.mode != self.strategy.mode() {
            return Err(Error::Config(format!(
                "checkpoint was written in {:?} mode, trainer runs {:?}",
                checkpoint.mode,
                self.strategy.mode()
            )));
        }
        if checkpoint.step > self.config.training.max_step {
            return Err(Error::Config(format!(
                "checkpoint step {} is past max_step {}",
                checkpoint.step, self.config.training.max_step
            )));
        }
        checkpoint.restore(self.strategy.networks_mut())?;
        self.seek(&checkpoint);
        tracing::info!(
            path = %path.as_ref().display(),
            step = checkpoint.step,
            "resumed from checkpoint"
        );
        Ok(())
    }

    /// Resume from the newest checkpoint in the model directory, if there is one
    pub fn resume_latest(&mut self) -> Result<bool> {
        match latest_checkpoint(&self.config.model_dir)? {
            Some(path) => self.resume_from(path).map(|()| true),
            None => Ok(false),
        }
    }

    fn seek(&mut self, checkpoint: &Checkpoint) {
        let training = &mut self.config.training;
        training.start_step = checkpoint.step;
        self.schedule = LrSchedule::from_spec(&self.config.schedule, training.max_step, checkpoint.step);
        self.ctx = TrainingContext::new(
            checkpoint.step,
            training.max_step,
            self.schedule.get_lr(),
            self.epochs_per_step,
        );
        self.apply_lr();
    }

    /// Push the schedule's current rate to every optimizer and the context
    pub(crate) fn apply_lr(&mut self) {
        self.schedule.apply(&mut self.strategy.optimizers_mut());
        self.ctx.set_lr(self.schedule.get_lr());
    }

    pub fn config(&self) -> &TrainerConfig {
        &self.config
    }

    pub fn context(&self) -> &TrainingContext {
        &self.ctx
    }

    pub fn strategy(&self) -> &dyn StepStrategy {
        self.strategy.as_ref()
    }

    /// Probe set built during warm-up
    pub fn probes(&self) -> Option<&ProbeSet> {
        self.probes.as_ref()
    }

    pub fn callbacks(&self) -> &CallbackManager {
        &self.callbacks
    }

    /// Build callback context for a completed step
    pub(crate) fn build_context(&self, step: u64, loss: f32, val_loss: Option<f32>) -> CallbackContext {
        CallbackContext {
            step,
            max_step: self.ctx.max_step(),
            epoch: step as f32 * self.epochs_per_step,
            loss,
            lr: self.ctx.lr(),
            val_loss,
            elapsed_secs: self.start_time.map_or(0.0, |t| t.elapsed().as_secs_f64()),
            aborted: false,
        }
    }
}
