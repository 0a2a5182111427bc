//! Autoencoder training

use super::{ensure_finite, StepReport, StepStrategy};
use crate::config::TrainingMode;
use crate::data::FieldBatch;
use crate::error::Result;
use crate::network::{Autoencoder, Parameter};
use crate::optim::Optimizer;
use crate::train::context::TrainingContext;
use crate::train::loss::LossComposer;

/// One autoencoder update per step
pub struct AutoencoderStep {
    autoencoder: Box<dyn Autoencoder>,
    optimizer: Box<dyn Optimizer>,
    composer: LossComposer,
}

impl AutoencoderStep {
    pub fn new(
        autoencoder: Box<dyn Autoencoder>,
        optimizer: Box<dyn Optimizer>,
        composer: LossComposer,
    ) -> Self {
        Self {
            autoencoder,
            optimizer,
            composer,
        }
    }
}

impl StepStrategy for AutoencoderStep {
    fn mode(&self) -> TrainingMode {
        TrainingMode::Autoencoder
    }

    fn step(&mut self, batch: &FieldBatch, ctx: &mut TrainingContext) -> Result<StepReport> {
        let encoded = self.autoencoder.forward(&batch.field)?;
        let loss = self.composer.autoencoder(&encoded, batch)?;
        ensure_finite(ctx.step(), &[loss.total])?;

        self.autoencoder.zero_grad();
        self.autoencoder
            .backward(&batch.field, &loss.grad_reconstruction, &loss.grad_latent)?;
        self.optimizer.step(self.autoencoder.parameters_mut());
        ctx.complete_step(loss.total);

        Ok(StepReport {
            loss: loss.total,
            terms: loss.terms,
            discriminator: None,
            output: encoded.reconstruction,
            latent: Some(encoded.latent),
        })
    }

    fn evaluate(&self, batch: &FieldBatch) -> Result<StepReport> {
        let encoded = self.autoencoder.forward(&batch.field)?;
        let loss = self.composer.autoencoder(&encoded, batch)?;
        Ok(StepReport {
            loss: loss.total,
            terms: loss.terms,
            discriminator: None,
            output: encoded.reconstruction,
            latent: Some(encoded.latent),
        })
    }

    fn optimizers_mut(&mut self) -> Vec<&mut dyn Optimizer> {
        vec![self.optimizer.as_mut()]
    }

    fn networks(&self) -> Vec<(&'static str, &[Parameter])> {
        vec![("autoencoder", self.autoencoder.parameters())]
    }

    fn networks_mut(&mut self) -> Vec<(&'static str, &mut [Parameter])> {
        vec![("autoencoder", self.autoencoder.parameters_mut())]
    }

    fn autoencoder(&self) -> Option<&dyn Autoencoder> {
        Some(self.autoencoder.as_ref())
    }
}
