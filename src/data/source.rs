//! Batch source traits

use super::batch::{FieldBatch, Sample, Split};
use crate::error::Result;

/// Read access to a dataset
///
/// The on-disk layout belongs to the implementor; the training loop only
/// ever asks for samples by split and index.
pub trait SampleStore: Send + Sync + 'static {
    /// Number of samples in a split
    fn len(&self, split: Split) -> usize;

    /// Load one sample
    fn load(&self, split: Split, index: usize) -> Result<Sample>;

    /// Whether a split is empty
    fn is_empty(&self, split: Split) -> bool {
        self.len(split) == 0
    }
}

/// Streaming supply of minibatches consumed by the training loop
pub trait BatchSource {
    /// Next minibatch of a split; blocks until one is available
    fn next_batch(&mut self, split: Split) -> Result<FieldBatch>;

    /// A random training batch of `size` samples, fetched outside the queue
    fn probe_batch(&mut self, size: usize) -> Result<FieldBatch>;

    /// Fraction of an epoch consumed by one training step
    fn epochs_per_step(&self) -> f32;

    /// Training batches currently waiting in the queue
    fn queue_depth(&self) -> usize;

    /// Stop background production; safe to call more than once
    fn stop(&mut self);
}

impl<B: BatchSource + ?Sized> BatchSource for Box<B> {
    fn next_batch(&mut self, split: Split) -> Result<FieldBatch> {
        (**self).next_batch(split)
    }

    fn probe_batch(&mut self, size: usize) -> Result<FieldBatch> {
        (**self).probe_batch(size)
    }

    fn epochs_per_step(&self) -> f32 {
        (**self).epochs_per_step()
    }

    fn queue_depth(&self) -> usize {
        (**self).queue_depth()
    }

    fn stop(&mut self) {
        (**self).stop();
    }
}
