//! Plain gradient descent

use super::Optimizer;
use crate::network::Parameter;

/// `theta -= lr * grad`
#[derive(Debug, Clone)]
pub struct GradientDescent {
    lr: f32,
}

impl GradientDescent {
    /// Create a new gradient descent optimizer
    pub fn new(lr: f32) -> Self {
        Self { lr }
    }
}

impl Optimizer for GradientDescent {
    fn step(&mut self, params: &mut [Parameter]) {
        for param in params.iter_mut() {
            if let Some(grad) = param.grad().cloned() {
                param.value_mut().scaled_add(-self.lr, &grad);
            }
        }
    }

    fn lr(&self) -> f32 {
        self.lr
    }

    fn set_lr(&mut self, lr: f32) {
        self.lr = lr;
    }

    fn name(&self) -> &'static str {
        "gd"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::ArrayD;

    #[test]
    fn test_descends_along_gradient() {
        let mut opt = GradientDescent::new(0.5);
        let mut params = vec![Parameter::new("w", ArrayD::from_elem(vec![2], 1.0))];
        params[0].accumulate(&ArrayD::from_elem(vec![2], 0.4)).unwrap();
        opt.step(&mut params);
        assert_abs_diff_eq!(params[0].value()[&[1][..]], 0.8, epsilon = 1e-6);
    }

    #[test]
    fn test_skips_parameters_without_grad() {
        let mut opt = GradientDescent::new(1.0);
        let mut params = vec![Parameter::new("w", ArrayD::from_elem(vec![1], 3.0))];
        opt.step(&mut params);
        assert_eq!(params[0].value()[&[0][..]], 3.0);
    }

    #[test]
    fn test_quadratic_convergence() {
        // f(w) = w^2
        let mut opt = GradientDescent::new(0.1);
        let mut params = vec![Parameter::new("w", ArrayD::from_elem(vec![1], 2.0))];
        for _ in 0..100 {
            let grad = params[0].value() * 2.0;
            opt.zero_grad(&mut params);
            params[0].accumulate(&grad).unwrap();
            opt.step(&mut params);
        }
        assert!(params[0].value()[&[0][..]].abs() < 1e-3);
    }
}
