//! Property-based tests for configuration validation

use super::error::ValidationError;
use super::validator::validate_config;
use crate::config::schema::*;
use proptest::prelude::*;

fn arb_valid_config() -> impl Strategy<Value = TrainerConfig> {
    (
        1usize..64,      // batch_size
        1e-6f32..1.0,    // lr_max
        1u64..10_000,    // max_step
        1u64..500,       // log_step
        0.0f32..10.0,    // w1
        0.0f32..10.0,    // w2
    )
        .prop_map(|(batch_size, lr_max, max_step, log_step, w1, w2)| {
            let mut config = TrainerConfig::default();
            config.data.batch_size = batch_size;
            config.schedule.lr_max = lr_max;
            config.schedule.lr_min = 0.0;
            config.training.max_step = max_step;
            config.training.log_step = log_step;
            config.training.test_step = log_step;
            config.loss.w1 = w1;
            config.loss.w2 = w2;
            config
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_valid_config_passes(config in arb_valid_config()) {
        prop_assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn prop_zero_batch_size_fails(config in arb_valid_config()) {
        let mut config = config;
        config.data.batch_size = 0;
        prop_assert!(matches!(
            validate_config(&config),
            Err(ValidationError::InvalidBatchSize(0))
        ));
    }

    #[test]
    fn prop_negative_weight_fails(config in arb_valid_config(), w in -100.0f32..-1e-6) {
        let mut config = config;
        config.loss.w4 = w;
        prop_assert!(matches!(
            validate_config(&config),
            Err(ValidationError::InvalidLossWeight("w4", _))
        ));
    }
}
