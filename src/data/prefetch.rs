//! Background prefetch over a bounded channel
//!
//! One producer thread per split assembles batches from a [`SampleStore`]
//! and pushes them into a `sync_channel`. The consumer only receives and,
//! at shutdown, raises the stop flag, drops its receiver so a producer
//! blocked on a full queue wakes up, and joins the thread.
//!
//! A batch counts towards the queue depth only once `send` has returned, so
//! a producer blocked on a full queue is not reported as a queued batch. The
//! consumer may receive a batch before it is counted; the counter is signed
//! and reads are clamped to `0..=capacity`.

use super::batch::{FieldBatch, Split};
use super::source::{BatchSource, SampleStore};
use crate::error::{Error, Result};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::sync::atomic::{AtomicBool, AtomicIsize, Ordering};
use std::sync::mpsc::{self, Receiver, SyncSender};
use std::sync::Arc;
use std::thread;

struct Producer {
    rx: Option<Receiver<Result<FieldBatch>>>,
    capacity: usize,
    depth: Arc<AtomicIsize>,
    stop: Arc<AtomicBool>,
    handle: Option<thread::JoinHandle<()>>,
}

impl Producer {
    fn spawn<S: SampleStore>(
        store: Arc<S>,
        split: Split,
        batch_size: usize,
        capacity: usize,
        seed: u64,
    ) -> Result<Self> {
        let capacity = capacity.max(1);
        let (tx, rx) = mpsc::sync_channel(capacity);
        let depth = Arc::new(AtomicIsize::new(0));
        let stop = Arc::new(AtomicBool::new(false));

        let worker = Worker {
            store,
            split,
            batch_size: batch_size.max(1),
            depth: Arc::clone(&depth),
            stop: Arc::clone(&stop),
        };
        let handle = thread::Builder::new()
            .name(format!("prefetch-{split:?}").to_lowercase())
            .spawn(move || worker.run(&tx, seed))?;

        Ok(Self {
            rx: Some(rx),
            capacity,
            depth,
            stop,
            handle: Some(handle),
        })
    }

    fn recv(&self) -> Result<FieldBatch> {
        let rx = self
            .rx
            .as_ref()
            .ok_or_else(|| Error::DataSource("batch source already stopped".into()))?;
        let batch = rx
            .recv()
            .map_err(|_| Error::DataSource("prefetch thread exited".into()))?;
        self.depth.fetch_sub(1, Ordering::AcqRel);
        batch
    }

    fn depth(&self) -> usize {
        usize::try_from(self.depth.load(Ordering::Acquire))
            .unwrap_or(0)
            .min(self.capacity)
    }

    fn shutdown(&mut self) {
        self.stop.store(true, Ordering::Release);
        drop(self.rx.take());
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                tracing::warn!("prefetch thread panicked during shutdown");
            }
        }
    }
}

struct Worker<S> {
    store: Arc<S>,
    split: Split,
    batch_size: usize,
    depth: Arc<AtomicIsize>,
    stop: Arc<AtomicBool>,
}

impl<S: SampleStore> Worker<S> {
    fn run(self, tx: &SyncSender<Result<FieldBatch>>, seed: u64) {
        let len = self.store.len(self.split);
        if len == 0 {
            let empty = Error::DataSource(format!("{:?} split is empty", self.split));
            if tx.send(Err(empty)).is_ok() {
                self.depth.fetch_add(1, Ordering::AcqRel);
            }
            return;
        }

        let mut rng = StdRng::seed_from_u64(seed);
        let mut order: Vec<usize> = (0..len).collect();
        let mut cursor = len;

        while !self.stop.load(Ordering::Acquire) {
            let mut indices = Vec::with_capacity(self.batch_size);
            while indices.len() < self.batch_size {
                if cursor >= len {
                    order.shuffle(&mut rng);
                    cursor = 0;
                }
                indices.push(order[cursor]);
                cursor += 1;
            }

            let batch = indices
                .iter()
                .map(|&i| self.store.load(self.split, i))
                .collect::<Result<Vec<_>>>()
                .and_then(|samples| FieldBatch::stack(&samples));

            if tx.send(batch).is_err() {
                return;
            }
            self.depth.fetch_add(1, Ordering::AcqRel);
        }
    }
}

/// [`BatchSource`] backed by two prefetch threads (train and validation)
pub struct PrefetchSource<S: SampleStore> {
    store: Arc<S>,
    train: Producer,
    validation: Producer,
    batch_size: usize,
    probe_rng: StdRng,
    stopped: bool,
}

impl<S: SampleStore> PrefetchSource<S> {
    /// Start producing batches of `batch_size` with at most `capacity`
    /// batches queued per split
    pub fn spawn(store: S, batch_size: usize, capacity: usize, seed: u64) -> Result<Self> {
        let store = Arc::new(store);
        let train = Producer::spawn(Arc::clone(&store), Split::Train, batch_size, capacity, seed)?;
        let validation = Producer::spawn(
            Arc::clone(&store),
            Split::Validation,
            batch_size,
            capacity,
            seed.wrapping_add(1),
        )?;
        tracing::debug!(batch_size, capacity, "prefetch threads started");

        Ok(Self {
            store,
            train,
            validation,
            batch_size,
            probe_rng: StdRng::seed_from_u64(seed.wrapping_add(2)),
            stopped: false,
        })
    }

    /// Whether [`BatchSource::stop`] has been called
    pub fn is_stopped(&self) -> bool {
        self.stopped
    }
}

impl<S: SampleStore> BatchSource for PrefetchSource<S> {
    fn next_batch(&mut self, split: Split) -> Result<FieldBatch> {
        match split {
            Split::Train => self.train.recv(),
            Split::Validation => self.validation.recv(),
        }
    }

    fn probe_batch(&mut self, size: usize) -> Result<FieldBatch> {
        let len = self.store.len(Split::Train);
        if len == 0 {
            return Err(Error::DataSource("Train split is empty".into()));
        }
        let samples = (0..size)
            .map(|_| {
                let index = self.probe_rng.random_range(0..len);
                self.store.load(Split::Train, index)
            })
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
        self.train.depth()
    }

    fn stop(&mut self) {
        if self.stopped {
            return;
        }
        self.stopped = true;
        self.train.shutdown();
        self.validation.shutdown();
        tracing::debug!("prefetch threads stopped");
    }
}

impl<S: SampleStore> Drop for PrefetchSource<S> {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::SyntheticStore;
    use std::time::Duration;

    fn source(capacity: usize) -> PrefetchSource<SyntheticStore> {
        let store = SyntheticStore::new([4, 4, 4], 6, 3, 11);
        PrefetchSource::spawn(store, 2, capacity, 11).unwrap()
    }

    #[test]
    fn test_next_batch_shapes() {
        let mut src = source(2);
        let batch = src.next_batch(Split::Train).unwrap();
        assert_eq!(batch.size(), 2);
        assert_eq!(batch.volume_shape(), [4, 4, 4]);
        let val = src.next_batch(Split::Validation).unwrap();
        assert!(val.sample_ids.iter().all(|id| id.starts_with("val")));
        src.stop();
    }

    #[test]
    fn test_epochs_per_step() {
        let src = source(1);
        assert!((src.epochs_per_step() - 2.0 / 6.0).abs() < 1e-6);
    }

    fn settled_depth(src: &PrefetchSource<SyntheticStore>, expected: usize) -> usize {
        for _ in 0..400 {
            if src.queue_depth() == expected {
                break;
            }
            thread::sleep(Duration::from_millis(5));
        }
        src.queue_depth()
    }

    #[test]
    fn test_queue_fills_up_to_capacity() {
        let src = source(3);
        assert_eq!(settled_depth(&src, 3), 3);
        // the producer is now blocked on a full queue and must not count
        thread::sleep(Duration::from_millis(100));
        assert_eq!(src.queue_depth(), 3);
    }

    #[test]
    fn test_depth_tracks_consumption() {
        let mut src = source(2);
        assert_eq!(settled_depth(&src, 2), 2);
        for _ in 0..5 {
            src.next_batch(Split::Train).unwrap();
            assert!(src.queue_depth() <= 2);
        }
        assert_eq!(settled_depth(&src, 2), 2);
        src.stop();
    }

    #[test]
    fn test_stop_is_idempotent() {
        let mut src = source(1);
        src.stop();
        assert!(src.is_stopped());
        src.stop();
        assert!(src.next_batch(Split::Train).is_err());
    }

    #[test]
    fn test_probe_batch_bypasses_queue() {
        let mut src = source(1);
        let probe = src.probe_batch(5).unwrap();
        assert_eq!(probe.size(), 5);
        assert!(probe.sample_ids.iter().all(|id| id.starts_with("train")));
    }

    #[test]
    fn test_empty_split_reports_error() {
        let store = SyntheticStore::new([4, 4, 4], 0, 2, 1);
        let mut src = PrefetchSource::spawn(store, 2, 1, 1).unwrap();
        assert!(matches!(src.next_batch(Split::Train), Err(Error::DataSource(_))));
        assert!(src.next_batch(Split::Validation).is_ok());
    }
}
