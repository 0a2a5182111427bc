//! # tumorgen: physics-regularized generative training for tumor growth fields
//!
//! Trains a generator that maps physical parameters (diffusion coefficient,
//! proliferation rate, time) and a brain-anatomy volume to a predicted 3D
//! tumor concentration field. The objective combines a reconstruction term,
//! a spatial-gradient consistency term, an optional reaction-diffusion
//! residual and an optional adversarial term.
//!
//! ## Modules
//!
//! - `config`: YAML training configuration and validation
//! - `data`: parameter records, batches, background prefetch source
//! - `network`: the seam to the neural architectures (plus reference networks)
//! - `physics`: finite-difference stencils and the PDE residual
//! - `optim`: optimizers and learning-rate schedules
//! - `train`: loss composition, per-mode step strategies, the training loop
//! - `sample`: probe-set generation and PNG artifacts
//! - `summary`: scalar/image/histogram record sinks
//! - `io`: checkpoints
//! - `cli`: the `tumorgen` command-line front end
//!
//! # Example
//!
//! ```no_run
//! use tumorgen::config::load_config;
//! use tumorgen::data::{PrefetchSource, SyntheticStore};
//! use tumorgen::network::reference::{AffineGenerator, PatchDiscriminator};
//! use tumorgen::train::Trainer;
//!
//! let config = load_config("train.yaml")?;
//! let store = SyntheticStore::new(config.data.shape, 64, 16, 7);
//! let source = PrefetchSource::spawn(store, config.data.batch_size, config.data.queue_depth, 7)?;
//! let generator = AffineGenerator::new(config.data.shape, 7);
//! let discriminator = PatchDiscriminator::new(7);
//!
//! let mut trainer = Trainer::generative(config, generator, Some(discriminator), source)?;
//! let result = trainer.train()?;
//! println!("finished at step {} (loss {:.4})", result.final_step, result.final_loss);
//! # Ok::<(), tumorgen::Error>(())
//! ```

pub mod cli;
pub mod config;
pub mod data;
pub mod error;
pub mod io;
pub mod network;
pub mod optim;
pub mod physics;
pub mod sample;
pub mod summary;
pub mod train;

pub use error::{Error, Result};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
