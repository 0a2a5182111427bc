//! In-memory and discarding sinks

use super::record::SummaryRecord;
use super::traits::SummarySink;
use crate::error::Result;
use std::sync::{Arc, Mutex, PoisonError};

/// Discards every record
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSummary;

impl SummarySink for NullSummary {
    fn write(&mut self, _record: SummaryRecord) -> Result<()> {
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Keeps records in memory; clones share the same buffer
#[derive(Debug, Default, Clone)]
pub struct InMemorySummary {
    records: Arc<Mutex<Vec<SummaryRecord>>>,
}

impl InMemorySummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<SummaryRecord> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// `(step, value)` of every scalar written under `tag`
    pub fn scalars(&self, tag: &str) -> Vec<(u64, f32)> {
        self.records()
            .iter()
            .filter(|r| r.tag == tag)
            .filter_map(|r| r.as_scalar().map(|v| (r.step, v)))
            .collect()
    }
}

impl SummarySink for InMemorySummary {
    fn write(&mut self, record: SummaryRecord) -> Result<()> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(record);
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_records() {
        let sink = InMemorySummary::new();
        let mut handle = sink.clone();
        handle.scalar(3, "misc/epoch", 0.5).unwrap();
        handle.scalar(4, "misc/epoch", 0.75).unwrap();
        handle.scalar(4, "misc/g_lr", 1e-4).unwrap();
        assert_eq!(sink.scalars("misc/epoch"), vec![(3, 0.5), (4, 0.75)]);
    }

    #[test]
    fn test_null_accepts_everything() {
        let mut sink = NullSummary;
        sink.scalar(0, "x", 1.0).unwrap();
        sink.histogram(0, "y", &[]).unwrap();
        sink.flush().unwrap();
    }
}
