//! Unit tests for configuration validation

use super::error::ValidationError;
use super::validator::validate_config;
use crate::config::schema::*;

fn create_valid_config() -> TrainerConfig {
    let mut config = TrainerConfig::default();
    config.data.shape = [8, 8, 8];
    config.training.max_step = 100;
    config.training.log_step = 10;
    config.training.test_step = 20;
    config
}

#[test]
fn test_valid_config() {
    assert!(validate_config(&create_valid_config()).is_ok());
}

#[test]
fn test_invalid_batch_size() {
    let mut config = create_valid_config();
    config.data.batch_size = 0;
    let err = validate_config(&config).unwrap_err();
    assert!(matches!(err, ValidationError::InvalidBatchSize(0)));
}

#[test]
fn test_invalid_shape() {
    let mut config = create_valid_config();
    config.data.shape = [8, 1, 8];
    assert_eq!(
        validate_config(&config).unwrap_err(),
        ValidationError::InvalidShape([8, 1, 8])
    );
}

#[test]
fn test_invalid_optimizer() {
    let mut config = create_valid_config();
    config.optimizer.name = "rmsprop".to_string();
    let err = validate_config(&config).unwrap_err();
    assert!(matches!(err, ValidationError::InvalidOptimizer(ref n) if n == "rmsprop"));
}

#[test]
fn test_gd_optimizer_accepted() {
    let mut config = create_valid_config();
    config.optimizer.name = "gd".to_string();
    assert!(validate_config(&config).is_ok());
}

#[test]
fn test_invalid_learning_rate() {
    let mut config = create_valid_config();
    config.schedule.lr_max = 0.0;
    assert!(matches!(
        validate_config(&config),
        Err(ValidationError::InvalidLearningRate("lr_max", _))
    ));
}

#[test]
fn test_decay_range_inverted() {
    let mut config = create_valid_config();
    config.schedule.lr_min = 0.5;
    config.schedule.lr_max = 0.1;
    assert!(matches!(
        validate_config(&config),
        Err(ValidationError::InvalidLearningRateRange { .. })
    ));
}

#[test]
fn test_step_policy_requires_interval() {
    let mut config = create_valid_config();
    config.schedule.policy = LrPolicy::Step;
    config.schedule.lr_update_step = 0;
    assert_eq!(
        validate_config(&config).unwrap_err(),
        ValidationError::InvalidLrUpdateStep(0)
    );
}

#[test]
fn test_negative_weight_rejected() {
    let mut config = create_valid_config();
    config.loss.w3 = -1.0;
    assert_eq!(
        validate_config(&config).unwrap_err(),
        ValidationError::InvalidLossWeight("w3", -1.0)
    );
}

#[test]
fn test_nan_weight_rejected() {
    let mut config = create_valid_config();
    config.loss.w2 = f32::NAN;
    assert!(matches!(
        validate_config(&config),
        Err(ValidationError::InvalidLossWeight("w2", _))
    ));
}

#[test]
fn test_start_step_must_precede_max_step() {
    let mut config = create_valid_config();
    config.training.start_step = 100;
    assert_eq!(
        validate_config(&config).unwrap_err(),
        ValidationError::InvalidStepRange { start: 100, max: 100 }
    );
}

#[test]
fn test_zero_intervals_rejected() {
    let mut config = create_valid_config();
    config.training.log_step = 0;
    assert_eq!(
        validate_config(&config).unwrap_err(),
        ValidationError::InvalidInterval("log_step")
    );

    let mut config = create_valid_config();
    config.training.test_step = 0;
    assert_eq!(
        validate_config(&config).unwrap_err(),
        ValidationError::InvalidInterval("test_step")
    );
}

#[test]
fn test_physics_with_autoencoder_rejected() {
    let mut config = create_valid_config();
    config.model.mode = TrainingMode::Autoencoder;
    config.model.physics = true;
    assert_eq!(
        validate_config(&config).unwrap_err(),
        ValidationError::PhysicsWithAutoencoder
    );
}

#[test]
fn test_physics_time_step_positive() {
    let mut config = create_valid_config();
    config.model.physics = true;
    config.physics.time_step = 0.0;
    assert_eq!(
        validate_config(&config).unwrap_err(),
        ValidationError::InvalidTimeStep(0.0)
    );
}

#[test]
fn test_autoencoder_latent_dim() {
    let mut config = create_valid_config();
    config.model.mode = TrainingMode::Autoencoder;
    config.model.latent_dim = 3;
    assert_eq!(
        validate_config(&config).unwrap_err(),
        ValidationError::InvalidLatentDim(3)
    );
}

#[test]
fn test_autoencoder_sparsity_range() {
    let mut config = create_valid_config();
    config.model.mode = TrainingMode::Autoencoder;
    config.model.sparse = true;
    config.model.sparsity = 1.0;
    assert_eq!(
        validate_config(&config).unwrap_err(),
        ValidationError::InvalidSparsity(1.0)
    );
}
