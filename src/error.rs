use arrow::{datatypes::DataType, error::ArrowError};
use thiserror::Error;

use crate::schema::ColumnType;

/// A table that breaks its declared schema or the month format rule.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("missing column `{0}`")]
    MissingColumn(String),

    #[error("column `{column}` is {actual}, expected {expected}")]
    WrongType {
        column: String,
        expected: ColumnType,
        actual: DataType,
    },

    #[error("column `{column}` has {count} null values")]
    NullValues { column: String, count: usize },

    #[error("insufficient rows: {actual} < {min}")]
    TooFewRows { actual: usize, min: usize },

    #[error("column `{column}` row {row}: {value:?} is not a YYYY-MM month")]
    InvalidMonth {
        column: String,
        row: usize,
        value: String,
    },
}

/// Failure of one dataset run, or of the whole transform phase.
#[derive(Error, Debug)]
pub enum TransformError {
    #[error("raw snapshot has no `{0}` source")]
    MissingRawKey(String),

    #[error("{dataset}: source is missing columns {missing:?}")]
    MissingColumns {
        dataset: &'static str,
        missing: Vec<String>,
    },

    #[error("{dataset}: malformed CSV: {source}")]
    Csv {
        dataset: &'static str,
        #[source]
        source: csv::Error,
    },

    #[error("No {label} data found")]
    NoData { label: &'static str },

    #[error("{dataset}: validation failed: {source}")]
    Validation {
        dataset: &'static str,
        #[source]
        source: ValidationError,
    },

    #[error("{dataset}: building table: {source}")]
    Table {
        dataset: &'static str,
        #[source]
        source: ArrowError,
    },

    #[error("{dataset}: output failed: {source}")]
    Output {
        dataset: &'static str,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },
}

impl TransformError {
    /// Errors that abort the whole transform phase rather than one dataset.
    pub fn is_run_fatal(&self) -> bool {
        matches!(self, TransformError::MissingRawKey(_))
    }
}
