//! Summary sink trait definitions

use super::record::SummaryRecord;
use crate::error::Result;
use ndarray::Array3;

/// Step-tagged scalar/image/histogram sink
pub trait SummarySink: Send {
    /// Append one fully built record
    fn write(&mut self, record: SummaryRecord) -> Result<()>;

    /// Flush pending writes
    fn flush(&mut self) -> Result<()>;

    fn scalar(&mut self, step: u64, tag: &str, value: f32) -> Result<()> {
        self.write(SummaryRecord::scalar(step, tag, value))
    }

    /// `images [N, H, W]`, tiled one row per batch
    fn image(&mut self, step: u64, tag: &str, images: &Array3<f32>) -> Result<()> {
        self.write(SummaryRecord::image(step, tag, images))
    }

    fn histogram(&mut self, step: u64, tag: &str, values: &[f32]) -> Result<()> {
        self.write(SummaryRecord::histogram(step, tag, values))
    }
}
