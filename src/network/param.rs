//! Trainable parameters

use crate::error::{Error, Result};
use ndarray::{ArrayD, ArrayView, Dimension};
use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// A named weight tensor together with its accumulated gradient
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    name: String,
    value: ArrayD<f32>,
    #[serde(skip)]
    grad: Option<ArrayD<f32>>,
}

impl Parameter {
    pub fn new(name: impl Into<String>, value: ArrayD<f32>) -> Self {
        Self {
            name: name.into(),
            value,
            grad: None,
        }
    }

    /// Zero-initialized parameter
    pub fn zeros(name: impl Into<String>, shape: &[usize]) -> Self {
        Self::new(name, ArrayD::zeros(shape))
    }

    /// Uniform initialization in `[-scale, scale)`
    pub fn uniform(name: impl Into<String>, shape: &[usize], scale: f32, rng: &mut StdRng) -> Self {
        let value = ArrayD::from_shape_simple_fn(shape, || rng.random_range(-scale..scale));
        Self::new(name, value)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &ArrayD<f32> {
        &self.value
    }

    pub fn value_mut(&mut self) -> &mut ArrayD<f32> {
        &mut self.value
    }

    /// View the value with a static dimensionality
    pub fn view_as<D: Dimension>(&self) -> Result<ArrayView<'_, f32, D>> {
        self.value
            .view()
            .into_dimensionality::<D>()
            .map_err(|_| Error::shape("parameter rank", &[D::NDIM.unwrap_or(0)], &[self.value.ndim()]))
    }

    pub fn shape(&self) -> &[usize] {
        self.value.shape()
    }

    pub fn len(&self) -> usize {
        self.value.len()
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Accumulated gradient, `None` until something was accumulated
    pub fn grad(&self) -> Option<&ArrayD<f32>> {
        self.grad.as_ref()
    }

    /// Mutable gradient buffer, allocated on first use
    pub fn grad_mut(&mut self) -> &mut ArrayD<f32> {
        let shape = self.value.raw_dim();
        self.grad.get_or_insert_with(|| ArrayD::zeros(shape))
    }

    /// Add `grad` to the accumulated gradient
    pub fn accumulate(&mut self, grad: &ArrayD<f32>) -> Result<()> {
        if grad.shape() != self.value.shape() {
            return Err(Error::shape("parameter gradient", self.value.shape(), grad.shape()));
        }
        *self.grad_mut() += grad;
        Ok(())
    }

    pub fn zero_grad(&mut self) {
        self.grad = None;
    }
}

/// Zero every gradient in a parameter list
pub fn zero_grads(params: &mut [Parameter]) {
    for p in params {
        p.zero_grad();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_grad_lazily_allocated() {
        let mut p = Parameter::zeros("w", &[2, 3]);
        assert!(p.grad().is_none());
        p.grad_mut()[&[1, 2][..]] += 4.0;
        assert_eq!(p.grad().unwrap()[&[1, 2][..]], 4.0);
        p.zero_grad();
        assert!(p.grad().is_none());
    }

    #[test]
    fn test_accumulate_checks_shape() {
        let mut p = Parameter::zeros("b", &[3]);
        p.accumulate(&ArrayD::ones(vec![3])).unwrap();
        p.accumulate(&ArrayD::ones(vec![3])).unwrap();
        assert_eq!(p.grad().unwrap()[&[0][..]], 2.0);
        assert!(p.accumulate(&ArrayD::ones(vec![4])).is_err());
    }

    #[test]
    fn test_view_as_rank() {
        let p = Parameter::zeros("w", &[2, 3]);
        assert_eq!(p.view_as::<ndarray::Ix2>().unwrap().dim(), (2, 3));
        assert!(p.view_as::<ndarray::Ix3>().is_err());
    }

    #[test]
    fn test_uniform_is_seeded_and_bounded() {
        let a = Parameter::uniform("w", &[10], 0.1, &mut StdRng::seed_from_u64(3));
        let b = Parameter::uniform("w", &[10], 0.1, &mut StdRng::seed_from_u64(3));
        assert_eq!(a, b);
        assert!(a.value().iter().all(|v| v.abs() <= 0.1));
    }
}
