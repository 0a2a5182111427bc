//! Callback system for training events
//!
//! Callbacks observe the loop (progress output, early stopping, custom
//! hooks) without the driver knowing about them. A callback may ask the
//! loop to stop early; the run is then finalized as if it had reached
//! `max_step`.

mod early_stopping;
mod manager;
mod progress;
mod traits;

pub use early_stopping::EarlyStopping;
pub use manager::CallbackManager;
pub use progress::ProgressCallback;
pub use traits::{CallbackAction, CallbackContext, TrainerCallback};
