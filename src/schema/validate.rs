use arrow::{
    array::{Array, LargeStringArray, StringArray},
    record_batch::RecordBatch,
};
use once_cell::sync::Lazy;
use regex::Regex;

use super::arrow::accepts;
use super::types::TableSchema;
use crate::error::ValidationError;

static MONTH_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-(0[1-9]|1[0-2])$").expect("month pattern should compile"));

/// True for canonical `YYYY-MM` strings with a month in `01..=12`.
pub fn is_valid_month(value: &str) -> bool {
    MONTH_PATTERN.is_match(value)
}

/// Structural check: declared columns and types, not-null columns, minimum row count.
pub fn validate(batch: &RecordBatch, schema: &TableSchema) -> Result<(), ValidationError> {
    let arrow_schema = batch.schema();

    for col in &schema.columns {
        let field = arrow_schema
            .field_with_name(&col.name)
            .map_err(|_| ValidationError::MissingColumn(col.name.clone()))?;
        if !accepts(col.ty, field.data_type()) {
            return Err(ValidationError::WrongType {
                column: col.name.clone(),
                expected: col.ty,
                actual: field.data_type().clone(),
            });
        }
    }

    for name in &schema.not_null {
        let array = batch
            .column_by_name(name)
            .ok_or_else(|| ValidationError::MissingColumn(name.clone()))?;
        if array.null_count() > 0 {
            return Err(ValidationError::NullValues {
                column: name.clone(),
                count: array.null_count(),
            });
        }
    }

    if batch.num_rows() < schema.min_rows {
        return Err(ValidationError::TooFewRows {
            actual: batch.num_rows(),
            min: schema.min_rows,
        });
    }

    Ok(())
}

/// Semantic check: every value in `column` is a well-formed `YYYY-MM` month.
pub fn assert_valid_month(batch: &RecordBatch, column: &str) -> Result<(), ValidationError> {
    let array = batch
        .column_by_name(column)
        .ok_or_else(|| ValidationError::MissingColumn(column.to_string()))?;

    let values: Box<dyn Iterator<Item = Option<&str>> + '_> =
        if let Some(arr) = array.as_any().downcast_ref::<StringArray>() {
            Box::new(arr.iter())
        } else if let Some(arr) = array.as_any().downcast_ref::<LargeStringArray>() {
            Box::new(arr.iter())
        } else {
            return Err(ValidationError::WrongType {
                column: column.to_string(),
                expected: super::ColumnType::String,
                actual: array.data_type().clone(),
            });
        };

    for (row, value) in values.enumerate() {
        match value {
            Some(v) if is_valid_month(v) => {}
            other => {
                return Err(ValidationError::InvalidMonth {
                    column: column.to_string(),
                    row,
                    value: other.unwrap_or_default().to_string(),
                })
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ColumnType;
    use arrow::{
        array::{ArrayRef, Float32Array, Float64Array},
        datatypes::{DataType, Field, Schema},
    };
    use std::sync::Arc;

    fn schema(min_rows: usize) -> TableSchema {
        TableSchema::new(
            &[("month", ColumnType::String), ("index", ColumnType::Double)],
            &["month", "index"],
            min_rows,
        )
    }

    fn batch(months: Vec<Option<&str>>, values: Vec<Option<f64>>) -> RecordBatch {
        let fields = vec![
            Field::new("month", DataType::Utf8, true),
            Field::new("index", DataType::Float64, true),
        ];
        RecordBatch::try_new(
            Arc::new(Schema::new(fields)),
            vec![
                Arc::new(StringArray::from(months)) as ArrayRef,
                Arc::new(Float64Array::from(values)) as ArrayRef,
            ],
        )
        .unwrap()
    }

    #[test]
    fn accepts_well_formed_table() {
        let b = batch(
            vec![Some("2020-01"), Some("2020-02")],
            vec![Some(95.5), Some(90.0)],
        );
        validate(&b, &schema(2)).unwrap();
        assert_valid_month(&b, "month").unwrap();
    }

    #[test]
    fn rejects_short_tables() {
        let b = batch(vec![Some("2020-01")], vec![Some(95.5)]);
        let err = validate(&b, &schema(100)).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::TooFewRows { actual: 1, min: 100 }
        ));
    }

    #[test]
    fn rejects_nulls_in_not_null_columns() {
        let b = batch(vec![Some("2020-01"), Some("2020-02")], vec![Some(1.0), None]);
        let err = validate(&b, &schema(1)).unwrap_err();
        assert!(matches!(err, ValidationError::NullValues { ref column, count: 1 } if column == "index"));
    }

    #[test]
    fn rejects_missing_and_mistyped_columns() {
        let only_month = RecordBatch::try_new(
            Arc::new(Schema::new(vec![Field::new("month", DataType::Utf8, true)])),
            vec![Arc::new(StringArray::from(vec!["2020-01"])) as ArrayRef],
        )
        .unwrap();
        assert!(matches!(
            validate(&only_month, &schema(0)),
            Err(ValidationError::MissingColumn(ref c)) if c == "index"
        ));

        let float32 = RecordBatch::try_new(
            Arc::new(Schema::new(vec![
                Field::new("month", DataType::Utf8, true),
                Field::new("index", DataType::Float32, true),
            ])),
            vec![
                Arc::new(StringArray::from(vec!["2020-01"])) as ArrayRef,
                Arc::new(Float32Array::from(vec![1.0f32])) as ArrayRef,
            ],
        )
        .unwrap();
        assert!(matches!(
            validate(&float32, &schema(0)),
            Err(ValidationError::WrongType { expected: ColumnType::Double, .. })
        ));
    }

    #[test]
    fn rejects_malformed_months() {
        for bad in ["2020-13", "2020-00", "2020-1", "20-01", "2020/01", "2020-01-01"] {
            let b = batch(vec![Some("2020-01"), Some(bad)], vec![Some(1.0), Some(2.0)]);
            let err = assert_valid_month(&b, "month").unwrap_err();
            assert!(
                matches!(err, ValidationError::InvalidMonth { row: 1, ref value, .. } if value == bad),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn null_month_is_malformed() {
        let b = batch(vec![None], vec![Some(1.0)]);
        assert!(assert_valid_month(&b, "month").is_err());
    }
}
