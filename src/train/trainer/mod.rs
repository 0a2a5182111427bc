//! Trainer abstraction for the training loop
//!
//! The [`Trainer`] owns the step strategy, the batch source, the schedule
//! and the sinks. A run goes through three phases:
//! - warm-up: probe set, ground-truth samples and images
//! - running: one strategy step per iteration, with logging, validation
//!   and sampling on their cadence and a schedule update after every step
//! - finalizing: checkpoint, then the batch source is stopped
//!
//! The batch source is stopped exactly once whether the run succeeds or not.

mod core;
mod result;
mod train_loop;


pub use core::Trainer;
pub use result::TrainResult;
pub use train_loop::CONFIG_FILE;
