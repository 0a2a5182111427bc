//! Training data: parameter records, batches and the streaming batch source

mod batch;
mod params;
mod prefetch;
mod sequential;
mod source;
mod synthetic;

pub use batch::{FieldBatch, Sample, Split};
pub use params::{ParamBatch, PhysicalParams, PARAM_COUNT};
pub use prefetch::PrefetchSource;
pub use sequential::SequentialSource;
pub use source::{BatchSource, SampleStore};
pub use synthetic::SyntheticStore;
