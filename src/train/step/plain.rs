//! Generator-only training

use super::{ensure_finite, GeneratorPass, StepReport, StepStrategy};
use crate::config::TrainingMode;
use crate::data::FieldBatch;
use crate::error::Result;
use crate::network::{Generator, Parameter};
use crate::optim::Optimizer;
use crate::train::context::TrainingContext;
use crate::train::loss::LossComposer;

/// One generator update per step
pub struct PlainStep {
    generator: Box<dyn Generator>,
    optimizer: Box<dyn Optimizer>,
    composer: LossComposer,
}

impl PlainStep {
    pub fn new(
        generator: Box<dyn Generator>,
        optimizer: Box<dyn Optimizer>,
        composer: LossComposer,
    ) -> Self {
        Self {
            generator,
            optimizer,
            composer,
        }
    }
}

impl StepStrategy for PlainStep {
    fn mode(&self) -> TrainingMode {
        TrainingMode::Plain
    }

    fn step(&mut self, batch: &FieldBatch, ctx: &mut TrainingContext) -> Result<StepReport> {
        let pass = GeneratorPass::run(self.generator.as_ref(), &self.composer, batch)?;
        let loss = self
            .composer
            .generator(&pass.prediction, batch, pass.advanced_field(), None)?;
        ensure_finite(ctx.step(), &[loss.total])?;

        self.generator.zero_grad();
        pass.backward(self.generator.as_mut(), batch, &loss.grad_prediction, &loss)?;
        self.optimizer.step(self.generator.parameters_mut());
        ctx.complete_step(loss.total);

        Ok(StepReport {
            loss: loss.total,
            terms: loss.terms,
            discriminator: None,
            output: pass.prediction,
            latent: None,
        })
    }

    fn evaluate(&self, batch: &FieldBatch) -> Result<StepReport> {
        let pass = GeneratorPass::run(self.generator.as_ref(), &self.composer, batch)?;
        let loss = self
            .composer
            .generator(&pass.prediction, batch, pass.advanced_field(), None)?;
        Ok(StepReport {
            loss: loss.total,
            terms: loss.terms,
            discriminator: None,
            output: pass.prediction,
            latent: None,
        })
    }

    fn optimizers_mut(&mut self) -> Vec<&mut dyn Optimizer> {
        vec![self.optimizer.as_mut()]
    }

    fn networks(&self) -> Vec<(&'static str, &[Parameter])> {
        vec![("generator", self.generator.parameters())]
    }

    fn networks_mut(&mut self) -> Vec<(&'static str, &mut [Parameter])> {
        vec![("generator", self.generator.parameters_mut())]
    }

    fn generator(&self) -> Option<&dyn Generator> {
        Some(self.generator.as_ref())
    }
}
