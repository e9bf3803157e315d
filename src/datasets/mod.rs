// src/datasets/mod.rs

use arrow::{error::ArrowError, record_batch::RecordBatch};
use serde::{de::DeserializeOwned, ser::Serializer, Serialize};

use crate::schema::TableSchema;

pub mod consumer_sentiment;
pub mod inflation_expectations;
pub mod sentiment_components;

pub use consumer_sentiment::{ConsumerSentiment, ConsumerSentimentRecord};
pub use inflation_expectations::{InflationExpectations, InflationExpectationsRecord};
pub use sentiment_components::{SentimentComponents, SentimentComponentsRecord};

/// Survey year column, shared by every source file.
pub const YEAR_COLUMN: &str = "YYYY";
/// Month-name column, shared by every source file.
pub const MONTH_COLUMN: &str = "Month";
/// Output column holding the canonical `YYYY-MM` month.
pub const MONTH_OUTPUT: &str = "month";
/// Every output table must carry at least this many records.
pub const MIN_ROWS: usize = 100;

/// Raw snapshot keys, in processing order.
pub const SOURCE_KEYS: [&str; 3] = [
    ConsumerSentiment::KEY,
    SentimentComponents::KEY,
    InflationExpectations::KEY,
];

/// Date columns every typed source row exposes.
pub trait SourceRow {
    fn year(&self) -> &str;
    fn month(&self) -> &str;
}

/// Per-dataset description driving the generic processor:
/// which columns to read, which rows to admit and how records become a table.
pub trait Dataset {
    /// One line of the source CSV, deserialized by header name.
    type Row: DeserializeOwned + SourceRow;
    /// One admitted output record.
    type Record;

    /// Key of this source in the raw snapshot.
    const KEY: &'static str;
    /// Human label used in logs and errors.
    const LABEL: &'static str;
    /// Numeric source columns, beyond year and month.
    const VALUE_COLUMNS: &'static [&'static str];

    fn metadata() -> &'static DatasetMetadata;

    fn schema() -> &'static TableSchema;

    /// Build the record for an in-range row with a valid month, or `None`
    /// when the row fails the dataset's null-admission rule.
    fn admit(month: String, row: Self::Row) -> Option<Self::Record>;

    fn to_batch(records: &[Self::Record]) -> Result<RecordBatch, ArrowError>;

    fn required_columns() -> Vec<&'static str> {
        let mut cols = vec![YEAR_COLUMN, MONTH_COLUMN];
        cols.extend_from_slice(Self::VALUE_COLUMNS);
        cols
    }
}

/// Static description published alongside each output table.
#[derive(Debug, Serialize)]
pub struct DatasetMetadata {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    #[serde(serialize_with = "serialize_descriptions")]
    pub column_descriptions: &'static [(&'static str, &'static str)],
}

fn serialize_descriptions<S: Serializer>(
    cols: &[(&'static str, &'static str)],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_map(cols.iter().copied())
}

/// Declared schema for a published dataset id.
pub fn schema_for(id: &str) -> Option<&'static TableSchema> {
    if id == ConsumerSentiment::metadata().id {
        Some(ConsumerSentiment::schema())
    } else if id == SentimentComponents::metadata().id {
        Some(SentimentComponents::schema())
    } else if id == InflationExpectations::metadata().id {
        Some(InflationExpectations::schema())
    } else {
        None
    }
}
