use anyhow::Result;
use arrow::record_batch::RecordBatch;

use crate::datasets::DatasetMetadata;

pub mod local;

pub use local::LocalSink;

/// Destination for finished, validated tables.
pub trait Sink {
    /// Store the table under the dataset id.
    fn upload(&self, id: &str, batch: &RecordBatch) -> Result<()>;

    /// Publish the dataset's descriptive metadata.
    fn publish(&self, metadata: &DatasetMetadata) -> Result<()>;
}
