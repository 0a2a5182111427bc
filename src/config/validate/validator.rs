//! Configuration validation logic
//!
//! Validates training specifications for correctness before execution.

use super::error::ValidationError;
use crate::config::schema::{LrPolicy, TrainerConfig, TrainingMode};
use crate::optim::OPTIMIZER_NAMES;

/// Validate a training specification
///
/// Checks:
/// - Sizes and intervals are non-zero
/// - Learning rates and loss weights are in range
/// - The optimizer name is known
/// - The mode combination is supported
pub fn validate_config(config: &TrainerConfig) -> Result<(), ValidationError> {
    let data = &config.data;
    if data.batch_size == 0 {
        return Err(ValidationError::InvalidBatchSize(data.batch_size));
    }
    if data.val_set_size == 0 {
        return Err(ValidationError::InvalidValSetSize(data.val_set_size));
    }
    if data.shape.iter().any(|&n| n < 2) {
        return Err(ValidationError::InvalidShape(data.shape));
    }
    if data.queue_depth == 0 {
        return Err(ValidationError::InvalidQueueDepth(data.queue_depth));
    }

    let optim = &config.optimizer;
    if !OPTIMIZER_NAMES.contains(&optim.name.as_str()) {
        return Err(ValidationError::InvalidOptimizer(optim.name.clone()));
    }
    for (name, beta) in [("beta1", optim.beta1), ("beta2", optim.beta2)] {
        if !(0.0..1.0).contains(&beta) {
            return Err(ValidationError::InvalidBeta(name, beta));
        }
    }

    validate_schedule(config)?;

    let w = &config.loss;
    for (name, weight) in [("w1", w.w1), ("w2", w.w2), ("w3", w.w3), ("w4", w.w4), ("w5", w.w5)] {
        if !weight.is_finite() || weight < 0.0 {
            return Err(ValidationError::InvalidLossWeight(name, weight));
        }
    }

    let training = &config.training;
    if training.start_step >= training.max_step {
        return Err(ValidationError::InvalidStepRange {
            start: training.start_step,
            max: training.max_step,
        });
    }
    if training.log_step == 0 {
        return Err(ValidationError::InvalidInterval("log_step"));
    }
    if training.test_step == 0 {
        return Err(ValidationError::InvalidInterval("test_step"));
    }

    if config.model.physics {
        if config.model.mode == TrainingMode::Autoencoder {
            return Err(ValidationError::PhysicsWithAutoencoder);
        }
        if config.physics.time_step <= 0.0 || !config.physics.time_step.is_finite() {
            return Err(ValidationError::InvalidTimeStep(config.physics.time_step));
        }
        if config.physics.gray_matter_ratio <= 0.0 {
            return Err(ValidationError::InvalidGrayMatterRatio(
                config.physics.gray_matter_ratio,
            ));
        }
    }

    if config.model.mode == TrainingMode::Autoencoder {
        if config.model.latent_dim <= crate::data::PARAM_COUNT {
            return Err(ValidationError::InvalidLatentDim(config.model.latent_dim));
        }
        let s = config.model.sparsity;
        if config.model.sparse && !(s > 0.0 && s < 1.0) {
            return Err(ValidationError::InvalidSparsity(s));
        }
    }

    Ok(())
}

fn validate_schedule(config: &TrainerConfig) -> Result<(), ValidationError> {
    let schedule = &config.schedule;
    if schedule.lr_max <= 0.0 || schedule.lr_max > 1.0 {
        return Err(ValidationError::InvalidLearningRate("lr_max", schedule.lr_max));
    }
    match schedule.policy {
        LrPolicy::Step => {
            if schedule.lr_update_step == 0 {
                return Err(ValidationError::InvalidLrUpdateStep(schedule.lr_update_step));
            }
            if schedule.lr_lower_boundary <= 0.0 || schedule.lr_lower_boundary > 1.0 {
                return Err(ValidationError::InvalidLearningRate(
                    "lr_lower_boundary",
                    schedule.lr_lower_boundary,
                ));
            }
        }
        LrPolicy::Decay => {
            if schedule.lr_min < 0.0 {
                return Err(ValidationError::InvalidLearningRate("lr_min", schedule.lr_min));
            }
            if schedule.lr_min > schedule.lr_max {
                return Err(ValidationError::InvalidLearningRateRange {
                    min: schedule.lr_min,
                    max: schedule.lr_max,
                });
            }
        }
    }
    Ok(())
}
