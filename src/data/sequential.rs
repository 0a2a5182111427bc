//! Synchronous batch source without background threads
//!
//! Walks each split in index order and wraps around. Useful for
//! reproducible runs and for debugging a store.

use super::batch::{FieldBatch, Split};
use super::source::{BatchSource, SampleStore};
use crate::error::{Error, Result};

/// Deterministic in-thread [`BatchSource`]
pub struct SequentialSource<S: SampleStore> {
    store: S,
    batch_size: usize,
    train_cursor: usize,
    validation_cursor: usize,
    stopped: bool,
}

impl<S: SampleStore> SequentialSource<S> {
    pub fn new(store: S, batch_size: usize) -> Self {
        Self {
            store,
            batch_size: batch_size.max(1),
            train_cursor: 0,
            validation_cursor: 0,
            stopped: false,
        }
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    fn take(&mut self, split: Split, count: usize) -> Result<FieldBatch> {
        if self.stopped {
            return Err(Error::DataSource("batch source already stopped".into()));
        }
        let len = self.store.len(split);
        if len == 0 {
            return Err(Error::DataSource(format!("{split:?} split is empty")));
        }
        let cursor = match split {
            Split::Train => &mut self.train_cursor,
            Split::Validation => &mut self.validation_cursor,
        };
        let indices: Vec<usize> = (0..count).map(|k| (*cursor + k) % len).collect();
        *cursor = (*cursor + count) % len;

        let samples = indices
            .into_iter()
            .map(|i| self.store.load(split, i))
            .collect::<Result<Vec<_>>>()?;
        FieldBatch::stack(&samples)
    }
}

impl<S: SampleStore> BatchSource for SequentialSource<S> {
    fn next_batch(&mut self, split: Split) -> Result<FieldBatch> {
        self.take(split, self.batch_size)
    }

    /// The first `size` training samples, independent of the cursor
    fn probe_batch(&mut self, size: usize) -> Result<FieldBatch> {
        let len = self.store.len(Split::Train);
        if len == 0 {
            return Err(Error::DataSource("Train split is empty".into()));
        }
        let samples = (0..size)
            .map(|i| self.store.load(Split::Train, i % len))
            .collect::<Result<Vec<_>>>()?;
        FieldBatch::stack(&samples)
    }

    fn epochs_per_step(&self) -> f32 {
        let len = self.store.len(Split::Train);
        if len == 0 {
            return 0.0;
        }
        self.batch_size as f32 / len as f32
    }

    fn queue_depth(&self) -> usize {
        0
    }

    fn stop(&mut self) {
        self.stopped = true;
    }
}
