//! Step-tagged training summaries
//!
//! Scalars, image grids and histograms keyed by a tag such as
//! `loss/g_loss` or `xym/G`.

mod jsonl;
mod memory;
mod record;
mod traits;

pub use jsonl::{JsonlSummaryWriter, SUMMARY_FILE};
pub use memory::{InMemorySummary, NullSummary};
pub use record::{Histogram, SummaryRecord, SummaryValue, HISTOGRAM_BUCKETS};
pub use traits::SummarySink;
