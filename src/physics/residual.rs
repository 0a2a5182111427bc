//! Reaction-diffusion residual
//!
//! For a predicted concentration `u` the Fisher-Kolmogorov equation
//!
//! ```text
//! du/dt = D(anatomy) * lap(u) + rho * u * (1 - u)
//! ```
//!
//! should hold voxel-wise. The loss is the mean squared residual, with
//! `du/dt` estimated by a forward difference in the time parameter: the
//! generator is evaluated a second time at `t + dt` (`advanced`).

use super::diffusivity::diffusivity;
use super::stencil::laplacian;
use crate::config::PhysicsSpec;
use crate::data::ParamBatch;
use crate::error::{Error, Result};
use ndarray::{Array4, Array5, Zip};

/// PDE-consistency evaluator
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicsResidual {
    time_step: f32,
    gray_matter_ratio: f32,
}

/// Intermediate tensors of one residual evaluation
#[derive(Debug, Clone)]
pub struct PhysicsReport {
    /// Mean squared residual
    pub loss: f32,
    /// Forward-difference time derivative
    pub du_dt: Array4<f32>,
    /// Diffusivity field `D(anatomy)`
    pub diffusivity: Array4<f32>,
    /// `D * lap(u)`
    pub diffusion: Array4<f32>,
    /// `rho * u * (1 - u)`
    pub proliferation: Array4<f32>,
    /// `du/dt - (diffusion + proliferation)`
    pub residual: Array4<f32>,
}

/// Gradients of the residual loss w.r.t. both generator evaluations
#[derive(Debug, Clone)]
pub struct PhysicsGradients {
    /// w.r.t. the field at `t`
    pub concentration: Array4<f32>,
    /// w.r.t. the field at `t + dt`
    pub advanced: Array4<f32>,
}

impl PhysicsResidual {
    pub fn new(time_step: f32, gray_matter_ratio: f32) -> Self {
        Self {
            time_step,
            gray_matter_ratio,
        }
    }

    pub fn from_spec(spec: &PhysicsSpec) -> Self {
        Self::new(spec.time_step, spec.gray_matter_ratio)
    }

    /// Finite-difference step in the time parameter
    pub fn time_step(&self) -> f32 {
        self.time_step
    }

    /// Evaluate the residual of `concentration` given the field `advanced`
    /// predicted for the same samples at `t + dt`.
    pub fn evaluate(
        &self,
        concentration: &Array4<f32>,
        advanced: &Array4<f32>,
        anatomy: &Array5<f32>,
        params: &ParamBatch,
    ) -> Result<PhysicsReport> {
        let shape = concentration.shape();
        if advanced.shape() != shape {
            return Err(Error::shape("advanced field", shape, advanced.shape()));
        }
        if &anatomy.shape()[..4] != shape {
            return Err(Error::shape("anatomy", shape, &anatomy.shape()[..4]));
        }

        let d = diffusivity(anatomy, params, self.gray_matter_ratio)?;
        let rho = per_sample(concentration, params.iter().map(|p| p.proliferation));

        let du_dt = (advanced - concentration) / self.time_step;
        let diffusion = &d * &laplacian(concentration);
        let proliferation = Zip::from(concentration)
            .and(&rho)
            .map_collect(|&u, &r| r * u * (1.0 - u));
        let residual = &du_dt - &diffusion - &proliferation;
        let loss = residual.mapv(|r| r * r).mean().unwrap_or(0.0);

        Ok(PhysicsReport {
            loss,
            du_dt,
            diffusivity: d,
            diffusion,
            proliferation,
            residual,
        })
    }

    /// Back-propagate the residual loss of a report to both fields.
    ///
    /// With `r = (adv - u)/dt - D*lap(u) - rho*u*(1-u)` and `L = mean(r^2)`:
    /// `dL/du = -a/dt - lap(D*a) - rho*(1 - 2u)*a` and `dL/dadv = a/dt`,
    /// where `a = 2r/N`. The Laplacian is self-adjoint.
    pub fn gradients(
        &self,
        report: &PhysicsReport,
        concentration: &Array4<f32>,
        params: &ParamBatch,
    ) -> PhysicsGradients {
        let n = report.residual.len().max(1) as f32;
        let a = &report.residual * (2.0 / n);
        let rho = per_sample(concentration, params.iter().map(|p| p.proliferation));

        let through_diffusion = laplacian(&(&report.diffusivity * &a));
        let mut grad_u = &a * (-1.0 / self.time_step) - &through_diffusion;
        Zip::from(&mut grad_u)
            .and(&a)
            .and(concentration)
            .and(&rho)
            .for_each(|g, &a, &u, &r| *g -= r * (1.0 - 2.0 * u) * a);

        PhysicsGradients {
            concentration: grad_u,
            advanced: &a / self.time_step,
        }
    }
}

/// Broadcast one scalar per sample over the volume of `like`.
fn per_sample(like: &Array4<f32>, values: impl Iterator<Item = f32>) -> Array4<f32> {
    let values: Vec<f32> = values.collect();
    Array4::from_shape_fn(like.dim(), |(b, ..)| values.get(b).copied().unwrap_or(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::PhysicalParams;
    use approx::assert_relative_eq;

    fn anatomy(shape: (usize, usize, usize, usize)) -> Array5<f32> {
        let (b, x, y, z) = shape;
        Array5::from_shape_fn((b, x, y, z, 3), |(.., c)| if c == 0 { 1.0 } else { 0.0 })
    }

    fn field(shape: (usize, usize, usize, usize), phase: f32) -> Array4<f32> {
        Array4::from_shape_fn(shape, |(b, x, y, z)| {
            0.5 + 0.4 * ((b as f32) + 0.7 * x as f32 + 1.3 * y as f32 + 0.4 * z as f32 + phase).sin()
        })
    }

    #[test]
    fn test_shape_checks() {
        let eval = PhysicsResidual::new(0.1, 10.0);
        let u = field((1, 3, 3, 3), 0.0);
        let adv = field((1, 3, 3, 4), 0.0);
        let params = ParamBatch::new(vec![PhysicalParams::default()]);
        assert!(eval.evaluate(&u, &adv, &anatomy((1, 3, 3, 3)), &params).is_err());
        assert!(eval
            .evaluate(&u, &u, &anatomy((1, 3, 3, 2)), &params)
            .is_err());
    }

    #[test]
    fn test_steady_state_has_zero_residual() {
        // u = 1 is a fixed point of the logistic term; with D = 0 nothing moves
        let eval = PhysicsResidual::new(0.01, 10.0);
        let u = Array4::from_elem((1, 3, 3, 3), 1.0);
        let params = ParamBatch::new(vec![PhysicalParams::new(0.0, 0.7, 0.2)]);
        let report = eval.evaluate(&u, &u, &anatomy((1, 3, 3, 3)), &params).unwrap();
        assert_relative_eq!(report.loss, 0.0);
    }

    #[test]
    fn test_report_terms_compose() {
        let eval = PhysicsResidual::new(0.05, 10.0);
        let u = field((2, 3, 4, 3), 0.0);
        let adv = field((2, 3, 4, 3), 0.1);
        let params = ParamBatch::new(vec![
            PhysicalParams::new(0.3, 0.5, 0.2),
            PhysicalParams::new(0.1, 0.9, 0.6),
        ]);
        let r = eval.evaluate(&u, &adv, &anatomy((2, 3, 4, 3)), &params).unwrap();
        let rebuilt = &r.du_dt - &r.diffusion - &r.proliferation;
        for (a, b) in rebuilt.iter().zip(r.residual.iter()) {
            assert_relative_eq!(a, b, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_gradients_match_finite_differences() {
        let eval = PhysicsResidual::new(0.1, 10.0);
        let shape = (1, 3, 3, 2);
        let u = field(shape, 0.0);
        let adv = field(shape, 0.3);
        let anat = anatomy(shape);
        let params = ParamBatch::new(vec![PhysicalParams::new(0.4, 0.8, 0.5)]);

        let report = eval.evaluate(&u, &adv, &anat, &params).unwrap();
        let grads = eval.gradients(&report, &u, &params);

        let h = 1e-2;
        for idx in [[0, 0, 0, 0], [0, 1, 1, 1], [0, 2, 1, 0]] {
            let mut up = u.clone();
            up[idx] += h;
            let mut down = u.clone();
            down[idx] -= h;
            let lp = eval.evaluate(&up, &adv, &anat, &params).unwrap().loss;
            let lm = eval.evaluate(&down, &adv, &anat, &params).unwrap().loss;
            let numeric = (lp - lm) / (2.0 * h);
            assert_relative_eq!(grads.concentration[idx], numeric, epsilon = 2e-2, max_relative = 2e-2);

            let mut up = adv.clone();
            up[idx] += h;
            let mut down = adv.clone();
            down[idx] -= h;
            let lp = eval.evaluate(&u, &up, &anat, &params).unwrap().loss;
            let lm = eval.evaluate(&u, &down, &anat, &params).unwrap().loss;
            let numeric = (lp - lm) / (2.0 * h);
            assert_relative_eq!(grads.advanced[idx], numeric, epsilon = 2e-2, max_relative = 2e-2);
        }
    }
}
