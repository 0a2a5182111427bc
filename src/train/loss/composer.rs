//! Loss composition per training mode
//!
//! Every objective is a weighted sum of named terms. Alongside the scalar
//! the composer returns the gradient of the total w.r.t. each network
//! output it consumed, ready to hand to the network's `backward`.

use super::elementwise::{least_squares, L1Loss, MSELoss};
use super::jacobian::JacobianL1Loss;
use super::sparsity::KlSparsity;
use super::traits::LossFn;
use crate::config::{LossWeights, TrainerConfig, TrainingMode};
use crate::data::{FieldBatch, PARAM_COUNT};
use crate::error::{Error, Result};
use crate::network::Encoded;
use crate::physics::PhysicsResidual;
use ndarray::{s, Array2, Array4};

/// Unweighted value of each term that contributed to a loss
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LossTerms {
    pub l1: f32,
    pub jacobian_l1: f32,
    pub physics: Option<f32>,
    /// Generator real-target term `mean((D(pred) - 1)^2)`
    pub adversarial: Option<f32>,
    /// Autoencoder latent-tail regression
    pub param: Option<f32>,
    /// Autoencoder KL sparsity
    pub sparsity: Option<f32>,
}

/// Generator objective and its gradients
#[derive(Debug, Clone)]
pub struct GeneratorLoss {
    pub total: f32,
    pub terms: LossTerms,
    /// `dL/dpred`
    pub grad_prediction: Array4<f32>,
    /// `dL/dG(t + dt)`, present when the physics term is on
    pub grad_advanced: Option<Array4<f32>>,
    /// `dL/dD(pred)`, present in adversarial mode
    pub grad_scores: Option<Array2<f32>>,
}

/// Discriminator objective `mean((D(real) - 1)^2) + mean(D(pred)^2)`
#[derive(Debug, Clone)]
pub struct DiscriminatorLoss {
    pub total: f32,
    pub real: f32,
    pub fake: f32,
    pub grad_real: Array2<f32>,
    pub grad_fake: Array2<f32>,
}

/// Autoencoder objective and its gradients
#[derive(Debug, Clone)]
pub struct AutoencoderLoss {
    pub total: f32,
    pub terms: LossTerms,
    pub grad_reconstruction: Array4<f32>,
    pub grad_latent: Array2<f32>,
}

/// Assembles the per-mode objectives from weighted terms
#[derive(Debug, Clone)]
pub struct LossComposer {
    weights: LossWeights,
    physics: Option<PhysicsResidual>,
    sparsity: Option<KlSparsity>,
}

impl LossComposer {
    pub fn new(weights: LossWeights) -> Self {
        Self {
            weights,
            physics: None,
            sparsity: None,
        }
    }

    /// Add the reaction-diffusion residual (weight 1.0) to the generator loss
    pub fn with_physics(mut self, residual: PhysicsResidual) -> Self {
        self.physics = Some(residual);
        self
    }

    /// Add the KL sparsity penalty to the autoencoder loss
    pub fn with_sparsity(mut self, target: f32) -> Self {
        self.sparsity = Some(KlSparsity::new(target));
        self
    }

    pub fn from_config(config: &TrainerConfig) -> Self {
        let mut composer = Self::new(config.loss);
        if config.model.physics {
            composer = composer.with_physics(PhysicsResidual::from_spec(&config.physics));
        }
        if config.model.sparse && config.model.mode == TrainingMode::Autoencoder {
            composer = composer.with_sparsity(config.model.sparsity);
        }
        composer
    }

    pub fn weights(&self) -> &LossWeights {
        &self.weights
    }

    pub fn physics(&self) -> Option<&PhysicsResidual> {
        self.physics.as_ref()
    }

    /// `w1 * L1 + w2 * jacobian L1 [+ physics] [+ w3 * mean((D(pred) - 1)^2)]`
    ///
    /// `advanced` is required when physics is on; `fake_scores` switches on
    /// the adversarial term.
    pub fn generator(
        &self,
        prediction: &Array4<f32>,
        batch: &FieldBatch,
        advanced: Option<&Array4<f32>>,
        fake_scores: Option<&Array2<f32>>,
    ) -> Result<GeneratorLoss> {
        let w = &self.weights;
        let l1 = L1Loss.forward(prediction, &batch.field)?;
        let jac = JacobianL1Loss.forward(prediction, &batch.grad)?;

        let mut terms = LossTerms {
            l1: l1.value,
            jacobian_l1: jac.value,
            ..LossTerms::default()
        };
        let mut total = w.w1 * l1.value + w.w2 * jac.value;
        let mut grad_prediction = l1.grad * w.w1;
        grad_prediction.scaled_add(w.w2, &jac.grad);

        let mut grad_advanced = None;
        if let Some(residual) = &self.physics {
            let advanced = advanced.ok_or_else(|| {
                Error::Config("physics residual needs the generator output at t + dt".into())
            })?;
            let report = residual.evaluate(prediction, advanced, &batch.anatomy, &batch.params)?;
            let grads = residual.gradients(&report, prediction, &batch.params);
            terms.physics = Some(report.loss);
            total += report.loss;
            grad_prediction += &grads.concentration;
            grad_advanced = Some(grads.advanced);
        }

        let mut grad_scores = None;
        if let Some(scores) = fake_scores {
            let adv = least_squares(scores, 1.0)?;
            terms.adversarial = Some(adv.value);
            total += w.w3 * adv.value;
            grad_scores = Some(adv.grad * w.w3);
        }

        Ok(GeneratorLoss {
            total,
            terms,
            grad_prediction,
            grad_advanced,
            grad_scores,
        })
    }

    pub fn discriminator(
        &self,
        real_scores: &Array2<f32>,
        fake_scores: &Array2<f32>,
    ) -> Result<DiscriminatorLoss> {
        let real = least_squares(real_scores, 1.0)?;
        let fake = least_squares(fake_scores, 0.0)?;
        Ok(DiscriminatorLoss {
            total: real.value + fake.value,
            real: real.value,
            fake: fake.value,
            grad_real: real.grad,
            grad_fake: fake.grad,
        })
    }

    /// `w1 * L1 + w2 * jacobian L1 + w4 * mean((params - z_tail)^2) [+ w5 * KL]`
    ///
    /// The last three latent units regress the physical parameters; the
    /// sparsity penalty covers the remaining units.
    pub fn autoencoder(&self, encoded: &Encoded, batch: &FieldBatch) -> Result<AutoencoderLoss> {
        let w = &self.weights;
        let latent = &encoded.latent;
        let (rows, latent_dim) = latent.dim();
        if latent_dim <= PARAM_COUNT || rows != batch.size() {
            return Err(Error::shape(
                "latent code",
                &[batch.size(), PARAM_COUNT + 1],
                latent.shape(),
            ));
        }
        let head = latent_dim - PARAM_COUNT;

        let l1 = L1Loss.forward(&encoded.reconstruction, &batch.field)?;
        let jac = JacobianL1Loss.forward(&encoded.reconstruction, &batch.grad)?;
        let tail = latent.slice(s![.., head..]).to_owned();
        let param = MSELoss.forward(&tail, &batch.params.to_array())?;

        let mut terms = LossTerms {
            l1: l1.value,
            jacobian_l1: jac.value,
            param: Some(param.value),
            ..LossTerms::default()
        };
        let mut total = w.w1 * l1.value + w.w2 * jac.value + w.w4 * param.value;
        let mut grad_reconstruction = l1.grad * w.w1;
        grad_reconstruction.scaled_add(w.w2, &jac.grad);

        let mut grad_latent = Array2::zeros(latent.raw_dim());
        grad_latent
            .slice_mut(s![.., head..])
            .assign(&(param.grad * w.w4));

        if let Some(kl) = &self.sparsity {
            let (value, grad) = kl.forward(latent.slice(s![.., ..head]));
            terms.sparsity = Some(value);
            total += w.w5 * value;
            grad_latent
                .slice_mut(s![.., ..head])
                .assign(&(grad * w.w5));
        }

        Ok(AutoencoderLoss {
            total,
            terms,
            grad_reconstruction,
            grad_latent,
        })
    }
}
