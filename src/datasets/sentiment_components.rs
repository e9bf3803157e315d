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

/// One line of `tbmiccice.csv`.
#[derive(Debug, Deserialize)]
pub struct SentimentComponentsRow {
    #[serde(rename = "YYYY", default)]
    pub year: String,
    #[serde(rename = "Month", default)]
    pub month: String,
    #[serde(rename = "ICC", default, deserialize_with = "deserialize_value")]
    pub icc: Option<f64>,
    #[serde(rename = "ICE", default, deserialize_with = "deserialize_value")]
    pub ice: Option<f64>,
}

impl SourceRow for SentimentComponentsRow {
    fn year(&self) -> &str {
        &self.year
    }

    fn month(&self) -> &str {
        &self.month
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SentimentComponentsRecord {
    pub month: String,
    pub index_current_conditions: Option<f64>,
    pub index_expectations: Option<f64>,
}

pub static METADATA: DatasetMetadata = DatasetMetadata {
    id: "umich_sentiment_components",
    title: "University of Michigan Sentiment Components (Monthly)",
    description: "Component indices from the University of Michigan Survey of Consumers. \
                  ICC measures current conditions, ICE measures consumer expectations.",
    column_descriptions: &[
        ("month", "Month of survey (YYYY-MM)"),
        ("index_current_conditions", "Index of Current Economic Conditions"),
        ("index_expectations", "Index of Consumer Expectations"),
    ],
};

static SCHEMA: Lazy<TableSchema> = Lazy::new(|| {
    TableSchema::new(
        &[
            (MONTH_OUTPUT, ColumnType::String),
            ("index_current_conditions", ColumnType::Double),
            ("index_expectations", ColumnType::Double),
        ],
        &[MONTH_OUTPUT],
        MIN_ROWS,
    )
});

/// Current-conditions (ICC) and expectations (ICE) components.
pub struct SentimentComponents;

impl Dataset for SentimentComponents {
    type Row = SentimentComponentsRow;
    type Record = SentimentComponentsRecord;

    const KEY: &'static str = "sentiment_components";
    const LABEL: &'static str = "sentiment components";
    const VALUE_COLUMNS: &'static [&'static str] = &["ICC", "ICE"];

    fn metadata() -> &'static DatasetMetadata {
        &METADATA
    }

    fn schema() -> &'static TableSchema {
        &SCHEMA
    }

    fn admit(month: String, row: Self::Row) -> Option<Self::Record> {
        if row.icc.is_none() && row.ice.is_none() {
            return None;
        }
        Some(SentimentComponentsRecord {
            month,
            index_current_conditions: row.icc,
            index_expectations: row.ice,
        })
    }

    fn to_batch(records: &[Self::Record]) -> Result<RecordBatch, ArrowError> {
        let months: StringArray = records.iter().map(|r| Some(r.month.as_str())).collect();
        let icc: Float64Array = records.iter().map(|r| r.index_current_conditions).collect();
        let ice: Float64Array = records.iter().map(|r| r.index_expectations).collect();
        RecordBatch::try_new(
            build_arrow_schema(Self::schema()),
            vec![
                Arc::new(months) as ArrayRef,
                Arc::new(icc) as ArrayRef,
                Arc::new(ice) as ArrayRef,
            ],
        )
    }
}
