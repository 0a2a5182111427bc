//! Training: loss composition, per-mode step strategies and the loop driver
//!
//! - [`loss`] - loss terms and the per-mode [`LossComposer`]
//! - [`step`] - one [`StepStrategy`] per training mode
//! - [`callback`] - progress output and other loop observers
//! - [`Trainer`] - warm-up, step loop, validation, sampling, checkpoint
//!
//! # Example
//!
//! ```no_run
//! use tumorgen::config::{TrainerConfig, TrainingMode};
//! use tumorgen::data::{PrefetchSource, SyntheticStore};
//! use tumorgen::network::reference::DenseAutoencoder;
//! use tumorgen::train::{EarlyStopping, Trainer};
//!
//! let mut config = TrainerConfig::default();
//! config.model.mode = TrainingMode::Autoencoder;
//! let store = SyntheticStore::new(config.data.shape, 256, 64, 1);
//! let source = PrefetchSource::spawn(store, config.data.batch_size, config.data.queue_depth, 1)?;
//! let autoencoder = DenseAutoencoder::new(config.data.shape, config.model.latent_dim, 1);
//!
//! let mut trainer = Trainer::autoencoder(config, autoencoder, source)?;
//! trainer.add_callback(EarlyStopping::new(5, 1e-4));
//! let result = trainer.train()?;
//! # Ok::<(), tumorgen::Error>(())
//! ```

pub mod callback;
mod context;
pub mod loss;
pub mod step;
mod trainer;

pub use callback::{
    CallbackAction, CallbackContext, CallbackManager, EarlyStopping, ProgressCallback,
    TrainerCallback,
};
pub use context::TrainingContext;
pub use loss::{LossComposer, LossTerms};
pub use step::{build_strategy, Networks, StepReport, StepStrategy};
pub use trainer::{TrainResult, Trainer, CONFIG_FILE};
