use arrow::{
    array::{ArrayRef, Float64Array, StringArray},
    error::ArrowError,
    record_batch::RecordBatch,
};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::{Dataset, DatasetMetadata, SourceRow, MIN_ROWS, MONTH_OUTPUT};
use crate::process::convert::deserialize_value;
use crate::schema::{build_arrow_schema, ColumnType, TableSchema};

/// One line of `tbmics.csv`.
#[derive(Debug, Deserialize)]
pub struct ConsumerSentimentRow {
    #[serde(rename = "YYYY", default)]
    pub year: String,
    #[serde(rename = "Month", default)]
    pub month: String,
    #[serde(rename = "ICS_ALL", default, deserialize_with = "deserialize_value")]
    pub ics_all: Option<f64>,
}

impl SourceRow for ConsumerSentimentRow {
    fn year(&self) -> &str {
        &self.year
    }

    fn month(&self) -> &str {
        &self.month
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConsumerSentimentRecord {
    pub month: String,
    pub index: f64,
}

pub static METADATA: DatasetMetadata = DatasetMetadata {
    id: "umich_consumer_sentiment",
    title: "University of Michigan Consumer Sentiment Index (Monthly)",
    description: "Monthly Index of Consumer Sentiment (ICS) from the University of Michigan \
                  Survey of Consumers. Measures consumer confidence about personal finances \
                  and business conditions.",
    column_descriptions: &[
        ("month", "Month of survey (YYYY-MM)"),
        ("index", "Index of Consumer Sentiment (1966=100)"),
    ],
};

static SCHEMA: Lazy<TableSchema> = Lazy::new(|| {
    TableSchema::new(
        &[(MONTH_OUTPUT, ColumnType::String), ("index", ColumnType::Double)],
        &[MONTH_OUTPUT, "index"],
        MIN_ROWS,
    )
});

/// Overall Index of Consumer Sentiment.
pub struct ConsumerSentiment;

impl Dataset for ConsumerSentiment {
    type Row = ConsumerSentimentRow;
    type Record = ConsumerSentimentRecord;

    const KEY: &'static str = "consumer_sentiment";
    const LABEL: &'static str = "consumer sentiment";
    const VALUE_COLUMNS: &'static [&'static str] = &["ICS_ALL"];

    fn metadata() -> &'static DatasetMetadata {
        &METADATA
    }

    fn schema() -> &'static TableSchema {
        &SCHEMA
    }

    fn admit(month: String, row: Self::Row) -> Option<Self::Record> {
        let index = row.ics_all?;
        Some(ConsumerSentimentRecord { month, index })
    }

    fn to_batch(records: &[Self::Record]) -> Result<RecordBatch, ArrowError> {
        let months: StringArray = records.iter().map(|r| Some(r.month.as_str())).collect();
        let index: Float64Array = records.iter().map(|r| Some(r.index)).collect();
        RecordBatch::try_new(
            build_arrow_schema(Self::schema()),
            vec![Arc::new(months) as ArrayRef, Arc::new(index) as ArrayRef],
        )
    }
}
