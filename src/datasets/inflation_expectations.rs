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

/// One line of `tbmpx1px5.csv`.
#[derive(Debug, Deserialize)]
pub struct InflationExpectationsRow {
    #[serde(rename = "YYYY", default)]
    pub year: String,
    #[serde(rename = "Month", default)]
    pub month: String,
    #[serde(rename = "PX_MD", default, deserialize_with = "deserialize_value")]
    pub px_md: Option<f64>,
    #[serde(rename = "PX5_MD", default, deserialize_with = "deserialize_value")]
    pub px5_md: Option<f64>,
}

impl SourceRow for InflationExpectationsRow {
    fn year(&self) -> &str {
        &self.year
    }

    fn month(&self) -> &str {
        &self.month
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InflationExpectationsRecord {
    pub month: String,
    pub inflation_1yr: Option<f64>,
    pub inflation_5yr: Option<f64>,
}

pub static METADATA: DatasetMetadata = DatasetMetadata {
    id: "umich_inflation_expectations",
    title: "University of Michigan Inflation Expectations (Monthly)",
    description: "Consumer inflation expectations from the University of Michigan Survey of \
                  Consumers. Median expected price changes over 1-year and 5-year horizons.",
    column_descriptions: &[
        ("month", "Month of survey (YYYY-MM)"),
        ("inflation_1yr", "Expected inflation over next 12 months (percent)"),
        ("inflation_5yr", "Expected inflation over next 5 years (percent)"),
    ],
};

static SCHEMA: Lazy<TableSchema> = Lazy::new(|| {
    TableSchema::new(
        &[
            (MONTH_OUTPUT, ColumnType::String),
            ("inflation_1yr", ColumnType::Double),
            ("inflation_5yr", ColumnType::Double),
        ],
        &[MONTH_OUTPUT],
        MIN_ROWS,
    )
});

/// Median expected price change, 1-year (PX_MD) and 5-year (PX5_MD) horizons.
pub struct InflationExpectations;

impl Dataset for InflationExpectations {
    type Row = InflationExpectationsRow;
    type Record = InflationExpectationsRecord;

    const KEY: &'static str = "inflation_expectations";
    const LABEL: &'static str = "inflation expectations";
    const VALUE_COLUMNS: &'static [&'static str] = &["PX_MD", "PX5_MD"];

    fn metadata() -> &'static DatasetMetadata {
        &METADATA
    }

    fn schema() -> &'static TableSchema {
        &SCHEMA
    }

    fn admit(month: String, row: Self::Row) -> Option<Self::Record> {
        if row.px_md.is_none() && row.px5_md.is_none() {
            return None;
        }
        Some(InflationExpectationsRecord {
            month,
            inflation_1yr: row.px_md,
            inflation_5yr: row.px5_md,
        })
    }

    fn to_batch(records: &[Self::Record]) -> Result<RecordBatch, ArrowError> {
        let months: StringArray = records.iter().map(|r| Some(r.month.as_str())).collect();
        let one_year: Float64Array = records.iter().map(|r| r.inflation_1yr).collect();
        let five_year: Float64Array = records.iter().map(|r| r.inflation_5yr).collect();
        RecordBatch::try_new(
            build_arrow_schema(Self::schema()),
            vec![
                Arc::new(months) as ArrayRef,
                Arc::new(one_year) as ArrayRef,
                Arc::new(five_year) as ArrayRef,
            ],
        )
    }
}
