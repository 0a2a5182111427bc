//! Optimizer trait

use crate::network::Parameter;

/// Trait for optimization algorithms
///
/// An optimizer is bound to one network: per-parameter state is indexed by
/// position in the slice handed to [`Optimizer::step`].
pub trait Optimizer: Send {
    /// Apply one update from the accumulated gradients
    ///
    /// Parameters without a gradient are left untouched.
    fn step(&mut self, params: &mut [Parameter]);

    /// Zero out all gradients
    fn zero_grad(&mut self, params: &mut [Parameter]) {
        for param in params {
            param.zero_grad();
        }
    }

    /// Get learning rate
    fn lr(&self) -> f32;

    /// Set learning rate
    fn set_lr(&mut self, lr: f32);

    /// Configuration name
    fn name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::ArrayD;

    /// Minimal optimizer implementation for testing default trait methods
    struct TestOptimizer {
        learning_rate: f32,
    }

    impl Optimizer for TestOptimizer {
        fn step(&mut self, params: &mut [Parameter]) {
            for param in params {
                if let Some(grad) = param.grad().cloned() {
                    param.value_mut().scaled_add(-self.learning_rate, &grad);
                }
            }
        }

        fn lr(&self) -> f32 {
            self.learning_rate
        }

        fn set_lr(&mut self, lr: f32) {
            self.learning_rate = lr;
        }

        fn name(&self) -> &'static str {
            "test"
        }
    }

    #[test]
    fn test_default_zero_grad() {
        let mut opt = TestOptimizer { learning_rate: 0.1 };
        let mut params = vec![Parameter::zeros("a", &[2]), Parameter::zeros("b", &[3])];
        for p in &mut params {
            p.accumulate(&ArrayD::ones(p.shape().to_vec())).unwrap();
        }
        opt.step(&mut params);
        assert_eq!(params[0].value()[&[0][..]], -0.1);
        opt.zero_grad(&mut params);
        assert!(params.iter().all(|p| p.grad().is_none()));
    }
}
