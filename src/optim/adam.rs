//! Adam optimizer

use super::Optimizer;
use crate::network::Parameter;
use ndarray::ArrayD;

/// Adam with bias-corrected step size
///
/// m_t = β1 * m + (1 - β1) * g
/// v_t = β2 * v + (1 - β2) * g²
/// θ_t = θ - lr * √(1 - β2^t) / (1 - β1^t) * m_t / (√v_t + ε)
#[derive(Debug, Clone)]
pub struct Adam {
    lr: f32,
    beta1: f32,
    beta2: f32,
    epsilon: f32,
    t: u64,
    m: Vec<Option<ArrayD<f32>>>, // First moment
    v: Vec<Option<ArrayD<f32>>>, // Second moment
}

impl Adam {
    /// Create a new Adam optimizer
    pub fn new(lr: f32, beta1: f32, beta2: f32, epsilon: f32) -> Self {
        Self { lr, beta1, beta2, epsilon, t: 0, m: Vec::new(), v: Vec::new() }
    }

    /// Create Adam with the usual defaults (β1 = 0.9, β2 = 0.999)
    pub fn default_params(lr: f32) -> Self {
        Self::new(lr, 0.9, 0.999, 1e-8)
    }

    /// Number of updates applied so far
    #[must_use]
    pub fn step_count(&self) -> u64 {
        self.t
    }

    #[must_use]
    pub fn beta1(&self) -> f32 {
        self.beta1
    }

    #[must_use]
    pub fn beta2(&self) -> f32 {
        self.beta2
    }

    fn ensure_moments(&mut self, len: usize) {
        if self.m.len() < len {
            self.m.resize(len, None);
            self.v.resize(len, None);
        }
    }
}

impl Optimizer for Adam {
    fn step(&mut self, params: &mut [Parameter]) {
        self.ensure_moments(params.len());
        self.t += 1;

        // Bias correction factors
        let lr_t = self.lr
            * ((1.0 - self.beta2.powi(self.t as i32)).sqrt()
                / (1.0 - self.beta1.powi(self.t as i32)));

        for (i, param) in params.iter_mut().enumerate() {
            let Some(grad) = param.grad() else {
                continue;
            };

            let m_t = match &self.m[i] {
                Some(m) => m * self.beta1 + grad * (1.0 - self.beta1),
                None => grad * (1.0 - self.beta1),
            };
            let grad_sq = grad * grad;
            let v_t = match &self.v[i] {
                Some(v) => v * self.beta2 + &grad_sq * (1.0 - self.beta2),
                None => &grad_sq * (1.0 - self.beta2),
            };

            let update = &m_t / &(v_t.mapv(f32::sqrt) + self.epsilon) * lr_t;
            *param.value_mut() -= &update;

            self.m[i] = Some(m_t);
            self.v[i] = Some(v_t);
        }
    }

    fn lr(&self) -> f32 {
        self.lr
    }

    fn set_lr(&mut self, lr: f32) {
        self.lr = lr;
    }

    fn name(&self) -> &'static str {
        "adam"
    }
}
