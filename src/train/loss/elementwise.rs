//! Mean squared and mean absolute error

use super::traits::{LossFn, LossOutput};
use crate::error::{Error, Result};
use ndarray::{Array, Dimension, Zip};

fn check_shapes<D: Dimension>(predictions: &Array<f32, D>, targets: &Array<f32, D>) -> Result<f32> {
    if predictions.shape() != targets.shape() {
        return Err(Error::shape("loss target", predictions.shape(), targets.shape()));
    }
    Ok(predictions.len().max(1) as f32)
}

/// Mean Squared Error Loss
///
/// L = mean((predictions - targets)^2), dL/dp = 2 * (p - t) / n
#[derive(Debug, Clone, Copy, Default)]
pub struct MSELoss;

impl LossFn for MSELoss {
    fn forward<D: Dimension>(
        &self,
        predictions: &Array<f32, D>,
        targets: &Array<f32, D>,
    ) -> Result<LossOutput<D>> {
        let n = check_shapes(predictions, targets)?;
        let diff = Zip::from(predictions).and(targets).map_collect(|&p, &t| p - t);
        let value = diff.iter().map(|d| d * d).sum::<f32>() / n;
        Ok(LossOutput { value, grad: diff * (2.0 / n) })
    }

    fn name(&self) -> &'static str {
        "MSE"
    }
}

/// L1 Loss (Mean Absolute Error)
///
/// L = mean(|predictions - targets|), dL/dp = sign(p - t) / n with sign(0) = 0
#[derive(Debug, Clone, Copy, Default)]
pub struct L1Loss;

impl LossFn for L1Loss {
    fn forward<D: Dimension>(
        &self,
        predictions: &Array<f32, D>,
        targets: &Array<f32, D>,
    ) -> Result<LossOutput<D>> {
        let n = check_shapes(predictions, targets)?;
        let mut value = 0.0;
        let grad = Zip::from(predictions).and(targets).map_collect(|&p, &t| {
            let d = p - t;
            value += d.abs();
            if d > 0.0 {
                1.0 / n
            } else if d < 0.0 {
                -1.0 / n
            } else {
                0.0
            }
        });
        Ok(LossOutput { value: value / n, grad })
    }

    fn name(&self) -> &'static str {
        "L1"
    }
}

/// Least-squares adversarial term: `mean((scores - label)^2)`
pub fn least_squares<D: Dimension>(scores: &Array<f32, D>, label: f32) -> Result<LossOutput<D>> {
    MSELoss.forward(scores, &Array::from_elem(scores.raw_dim(), label))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::{arr1, arr2};

    #[test]
    fn test_mse_value_and_grad() {
        let out = MSELoss.forward(&arr1(&[1.0, 2.0, 3.0]), &arr1(&[1.5, 2.0, 2.0])).unwrap();
        assert_abs_diff_eq!(out.value, (0.25 + 0.0 + 1.0) / 3.0, epsilon = 1e-6);
        assert_abs_diff_eq!(out.grad[0], 2.0 * -0.5 / 3.0, epsilon = 1e-6);
        assert_abs_diff_eq!(out.grad[2], 2.0 / 3.0, epsilon = 1e-6);
    }

    #[test]
    fn test_l1_value_and_subgradient() {
        let out = L1Loss.forward(&arr2(&[[1.0, 2.0], [3.0, 4.0]]), &arr2(&[[0.0, 2.0], [5.0, 4.5]])).unwrap();
        assert_abs_diff_eq!(out.value, (1.0 + 0.0 + 2.0 + 0.5) / 4.0, epsilon = 1e-6);
        assert_eq!(out.grad, arr2(&[[0.25, 0.0], [-0.25, -0.25]]));
    }

    #[test]
    fn test_shape_mismatch() {
        assert!(L1Loss.forward(&arr1(&[1.0, 2.0]), &arr1(&[1.0])).is_err());
    }

    #[test]
    fn test_least_squares_labels() {
        let scores = arr2(&[[1.0, 0.0]]);
        assert_abs_diff_eq!(least_squares(&scores, 1.0).unwrap().value, 0.5, epsilon = 1e-6);
        assert_abs_diff_eq!(least_squares(&scores, 0.0).unwrap().value, 0.5, epsilon = 1e-6);
    }

    #[test]
    fn test_names() {
        assert_eq!(MSELoss.name(), "MSE");
        assert_eq!(L1Loss.name(), "L1");
    }
}
