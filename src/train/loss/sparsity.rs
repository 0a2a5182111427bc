//! KL sparsity penalty on latent activations

use ndarray::{Array2, ArrayView2, Axis};

const EPS: f32 = 1e-6;

/// `sum_j KL(Bernoulli(s) || Bernoulli(q_j))` with `q_j = mean_b z[b, j]`
#[derive(Debug, Clone, Copy)]
pub struct KlSparsity {
    target: f32,
}

impl KlSparsity {
    pub fn new(target: f32) -> Self {
        Self { target }
    }

    /// Penalty and its gradient w.r.t. the activations `[B, K]`
    pub fn forward(&self, activations: ArrayView2<'_, f32>) -> (f32, Array2<f32>) {
        let batch = activations.nrows().max(1) as f32;
        let s = self.target;
        let q = activations
            .mean_axis(Axis(0))
            .unwrap_or_else(|| ndarray::Array1::zeros(activations.ncols()))
            .mapv(|q| q.clamp(EPS, 1.0 - EPS));

        let value = q
            .iter()
            .map(|&q| s * (s / q).ln() + (1.0 - s) * ((1.0 - s) / (1.0 - q)).ln())
            .sum();
        let dq = q.mapv(|q| (-s / q + (1.0 - s) / (1.0 - q)) / batch);
        let grad = Array2::from_shape_fn(activations.dim(), |(_, j)| dq[j]);
        (value, grad)
    }
}
