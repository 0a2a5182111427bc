//! Declarative training configuration
//!
//! A run is described by one YAML document:
//!
//! ```yaml
//! model_dir: log/tumor
//! data:
//!   shape: [64, 64, 64]
//!   batch_size: 8
//!   val_set_size: 64
//! model:
//!   mode: adversarial
//!   physics: true
//! optimizer:
//!   name: adam
//! schedule:
//!   policy: step
//!   lr_max: 0.0001
//!   lr_update_step: 120000
//! training:
//!   max_step: 300000
//!   log_step: 500
//!   test_step: 1000
//! ```

mod loader;
mod schema;
mod validate;

pub use loader::{load_config, parse_config, save_config};
pub use schema::{
    DataConfig, LossWeights, LrPolicy, ModelConfig, OptimSpec, PhysicsSpec, ScheduleSpec,
    TrainerConfig, TrainingMode, TrainingParams,
};
pub use validate::{validate_config, ValidationError};
