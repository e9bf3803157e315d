// src/schema/arrow.rs

use arrow::datatypes::{DataType, Field as ArrowField, Schema as ArrowSchema, SchemaRef};
use std::sync::Arc;

use super::types::{ColumnType, TableSchema};

/// Map a declared column type onto the Arrow type we build tables with.
pub fn map_to_arrow_type(ty: ColumnType) -> DataType {
    match ty {
        ColumnType::String => DataType::Utf8,
        ColumnType::Double => DataType::Float64,
    }
}

/// Whether an Arrow column satisfies a declared type.
pub fn accepts(ty: ColumnType, dt: &DataType) -> bool {
    match ty {
        ColumnType::String => matches!(dt, DataType::Utf8 | DataType::LargeUtf8 | DataType::Utf8View),
        ColumnType::Double => matches!(dt, DataType::Float64),
    }
}

/// Build an Arrow schema from a declared table schema.
///
/// Every field is nullable; not-null rules are enforced by the validator.
pub fn build_arrow_schema(schema: &TableSchema) -> SchemaRef {
    let fields: Vec<ArrowField> = schema
        .columns
        .iter()
        .map(|col| ArrowField::new(&col.name, map_to_arrow_type(col.ty), true))
        .collect();

    Arc::new(ArrowSchema::new(fields))
}
