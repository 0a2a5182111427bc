//! Checkpoint persistence
//!
//! A checkpoint is a JSON snapshot of every trainable parameter of every
//! network, named `model.ckpt-<step>` inside the model directory.

mod checkpoint;
mod load;
mod save;

pub use checkpoint::{Checkpoint, TensorRecord, CHECKPOINT_PREFIX};
pub use load::{latest_checkpoint, load_checkpoint};
pub use save::save_checkpoint;
