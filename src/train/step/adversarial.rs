//! Generator/discriminator alternation

use super::{ensure_finite, GeneratorPass, StepReport, StepStrategy};
use crate::config::TrainingMode;
use crate::data::FieldBatch;
use crate::error::Result;
use crate::network::{Discriminator, Generator, Parameter};
use crate::optim::Optimizer;
use crate::train::context::TrainingContext;
use crate::train::loss::{DiscriminatorLoss, GeneratorLoss, LossComposer};

/// Both networks updated every step from one frozen forward pass
///
/// The generator gradient flowing through the discriminator is taken with
/// the discriminator weights of the current step, before its own update,
/// so the two updates do not depend on each other's order.
pub struct AdversarialStep {
    generator: Box<dyn Generator>,
    discriminator: Box<dyn Discriminator>,
    g_optim: Box<dyn Optimizer>,
    d_optim: Box<dyn Optimizer>,
    composer: LossComposer,
}

struct Evaluation {
    pass: GeneratorPass,
    g_loss: GeneratorLoss,
    d_loss: DiscriminatorLoss,
}

impl AdversarialStep {
    pub fn new(
        generator: Box<dyn Generator>,
        discriminator: Box<dyn Discriminator>,
        g_optim: Box<dyn Optimizer>,
        d_optim: Box<dyn Optimizer>,
        composer: LossComposer,
    ) -> Self {
        Self {
            generator,
            discriminator,
            g_optim,
            d_optim,
            composer,
        }
    }

    fn run(&self, batch: &FieldBatch) -> Result<Evaluation> {
        let pass = GeneratorPass::run(self.generator.as_ref(), &self.composer, batch)?;
        let real_scores = self.discriminator.forward(&batch.field)?;
        let fake_scores = self.discriminator.forward(&pass.prediction)?;
        let g_loss = self.composer.generator(
            &pass.prediction,
            batch,
            pass.advanced_field(),
            Some(&fake_scores),
        )?;
        let d_loss = self.composer.discriminator(&real_scores, &fake_scores)?;
        Ok(Evaluation {
            pass,
            g_loss,
            d_loss,
        })
    }

    fn report(eval: Evaluation) -> StepReport {
        StepReport {
            loss: eval.g_loss.total,
            terms: eval.g_loss.terms,
            discriminator: Some((eval.d_loss.real, eval.d_loss.fake)),
            output: eval.pass.prediction,
            latent: None,
        }
    }
}

impl StepStrategy for AdversarialStep {
    fn mode(&self) -> TrainingMode {
        TrainingMode::Adversarial
    }

    fn step(&mut self, batch: &FieldBatch, ctx: &mut TrainingContext) -> Result<StepReport> {
        let eval = self.run(batch)?;
        ensure_finite(ctx.step(), &[eval.g_loss.total, eval.d_loss.total])?;
        let prediction = &eval.pass.prediction;

        // dL_g/dpred through the discriminator; its parameter grads are discarded
        let mut grad_prediction = eval.g_loss.grad_prediction.clone();
        if let Some(grad_scores) = &eval.g_loss.grad_scores {
            self.discriminator.zero_grad();
            let through_d = self.discriminator.backward(prediction, grad_scores)?;
            grad_prediction += &through_d;
        }

        self.discriminator.zero_grad();
        self.discriminator.backward(&batch.field, &eval.d_loss.grad_real)?;
        self.discriminator.backward(prediction, &eval.d_loss.grad_fake)?;
        self.d_optim.step(self.discriminator.parameters_mut());

        self.generator.zero_grad();
        eval.pass
            .backward(self.generator.as_mut(), batch, &grad_prediction, &eval.g_loss)?;
        self.g_optim.step(self.generator.parameters_mut());

        ctx.complete_step(eval.g_loss.total);
        Ok(Self::report(eval))
    }

    fn evaluate(&self, batch: &FieldBatch) -> Result<StepReport> {
        self.run(batch).map(Self::report)
    }

    fn optimizers_mut(&mut self) -> Vec<&mut dyn Optimizer> {
        vec![self.g_optim.as_mut(), self.d_optim.as_mut()]
    }

    fn networks(&self) -> Vec<(&'static str, &[Parameter])> {
        vec![
            ("generator", self.generator.parameters()),
            ("discriminator", self.discriminator.parameters()),
        ]
    }

    fn networks_mut(&mut self) -> Vec<(&'static str, &mut [Parameter])> {
        vec![
            ("generator", self.generator.parameters_mut()),
            ("discriminator", self.discriminator.parameters_mut()),
        ]
    }

    fn generator(&self) -> Option<&dyn Generator> {
        Some(self.generator.as_ref())
    }
}
