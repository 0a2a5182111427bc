//! Optimization step controller
//!
//! One [`StepStrategy`] per training mode, chosen once by
//! [`build_strategy`]. A strategy owns its networks and optimizers, checks
//! the step loss before touching any weight, and advances the step counter
//! exactly once per successful step.

mod adversarial;
mod autoencoder;
mod plain;


pub use adversarial::AdversarialStep;
pub use autoencoder::AutoencoderStep;
pub use plain::PlainStep;

use super::context::TrainingContext;
use super::loss::{GeneratorLoss, LossComposer, LossTerms};
use crate::config::{TrainerConfig, TrainingMode};
use crate::data::FieldBatch;
use crate::error::{Error, Result};
use crate::network::{Autoencoder, Discriminator, Generator, Parameter};
use crate::optim::{build_optimizer, Optimizer};
use ndarray::{Array2, Array4};

/// Losses and outputs of one step or evaluation
#[derive(Debug, Clone)]
pub struct StepReport {
    /// Objective of the trained network (generator or autoencoder)
    pub loss: f32,
    pub terms: LossTerms,
    /// Discriminator terms `(real, fake)` in adversarial mode
    pub discriminator: Option<(f32, f32)>,
    /// Generator output or reconstruction
    pub output: Array4<f32>,
    /// Autoencoder latent code
    pub latent: Option<Array2<f32>>,
}

/// The networks a run trains
pub enum Networks {
    Generative {
        generator: Box<dyn Generator>,
        discriminator: Option<Box<dyn Discriminator>>,
    },
    Autoencoder(Box<dyn Autoencoder>),
}

/// One training step for a fixed mode
pub trait StepStrategy {
    fn mode(&self) -> TrainingMode;

    /// Update the networks from `batch` and advance `ctx` by one step
    ///
    /// Returns `Error::Diverged` before any optimizer update when a loss is
    /// not finite.
    fn step(&mut self, batch: &FieldBatch, ctx: &mut TrainingContext) -> Result<StepReport>;

    /// Loss on `batch` without updating anything
    fn evaluate(&self, batch: &FieldBatch) -> Result<StepReport>;

    /// Every optimizer the learning-rate schedule drives
    fn optimizers_mut(&mut self) -> Vec<&mut dyn Optimizer>;

    /// Parameters per network name
    fn networks(&self) -> Vec<(&'static str, &[Parameter])>;

    fn networks_mut(&mut self) -> Vec<(&'static str, &mut [Parameter])>;

    /// Generator used for probe sampling (generative modes)
    fn generator(&self) -> Option<&dyn Generator> {
        None
    }

    /// Autoencoder used for reconstructions (autoencoder mode)
    fn autoencoder(&self) -> Option<&dyn Autoencoder> {
        None
    }
}

/// Select the strategy for the configured mode
pub fn build_strategy(
    config: &TrainerConfig,
    networks: Networks,
    lr: f32,
) -> Result<Box<dyn StepStrategy>> {
    let composer = LossComposer::from_config(config);
    let mode = config.model.mode;
    match (mode, networks) {
        (TrainingMode::Plain, Networks::Generative { generator, discriminator }) => {
            if discriminator.is_some() {
                tracing::warn!("discriminator supplied in plain mode; it will not be trained");
            }
            let optimizer = build_optimizer(&config.optimizer, lr)?;
            Ok(Box::new(PlainStep::new(generator, optimizer, composer)))
        }
        (
            TrainingMode::Adversarial,
            Networks::Generative {
                generator,
                discriminator: Some(discriminator),
            },
        ) => {
            let g_optim = build_optimizer(&config.optimizer, lr)?;
            let d_optim = build_optimizer(&config.optimizer, lr)?;
            Ok(Box::new(AdversarialStep::new(
                generator,
                discriminator,
                g_optim,
                d_optim,
                composer,
            )))
        }
        (TrainingMode::Adversarial, Networks::Generative { .. }) => Err(Error::Config(
            "adversarial mode requires a discriminator".into(),
        )),
        (TrainingMode::Autoencoder, Networks::Autoencoder(autoencoder)) => {
            let optimizer = build_optimizer(&config.optimizer, lr)?;
            Ok(Box::new(AutoencoderStep::new(autoencoder, optimizer, composer)))
        }
        (TrainingMode::Autoencoder, _) => Err(Error::Config(
            "autoencoder mode requires an autoencoder network".into(),
        )),
        (_, Networks::Autoencoder(_)) => Err(Error::Config(format!(
            "{mode:?} mode requires a generator network"
        ))),
    }
}

/// Generator forward pass(es) feeding the loss composer
pub(crate) struct GeneratorPass {
    pub params: Array2<f32>,
    pub prediction: Array4<f32>,
    /// `(params at t + dt, G(t + dt))` when the physics term is on
    pub advanced: Option<(Array2<f32>, Array4<f32>)>,
}

impl GeneratorPass {
    pub fn run(generator: &dyn Generator, composer: &LossComposer, batch: &FieldBatch) -> Result<Self> {
        let params = batch.params.to_array();
        let prediction = generator.forward(&params, &batch.anatomy)?;
        let advanced = match composer.physics() {
            Some(residual) => {
                let shifted = batch.params.advanced(residual.time_step()).to_array();
                let field = generator.forward(&shifted, &batch.anatomy)?;
                Some((shifted, field))
            }
            None => None,
        };
        Ok(Self {
            params,
            prediction,
            advanced,
        })
    }

    pub fn advanced_field(&self) -> Option<&Array4<f32>> {
        self.advanced.as_ref().map(|(_, field)| field)
    }

    /// Push the loss gradients back through the generator
    pub fn backward(
        &self,
        generator: &mut dyn Generator,
        batch: &FieldBatch,
        grad_prediction: &Array4<f32>,
        loss: &GeneratorLoss,
    ) -> Result<()> {
        generator.backward(&self.params, &batch.anatomy, grad_prediction)?;
        if let (Some((shifted, _)), Some(grad)) = (&self.advanced, &loss.grad_advanced) {
            generator.backward(shifted, &batch.anatomy, grad)?;
        }
        Ok(())
    }
}

/// Fail with `Error::Diverged` unless every loss is finite
pub(crate) fn ensure_finite(step: u64, losses: &[f32]) -> Result<()> {
    match losses.iter().find(|l| !l.is_finite()) {
        Some(&loss) => Err(Error::Diverged { step, loss }),
        None => Ok(()),
    }
}
