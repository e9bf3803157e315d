// src/schema/types.rs

use serde::{Deserialize, Serialize};
use std::fmt;

/// Semantic column type understood by the validator.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Copy, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    String,
    Double,
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnType::String => f.write_str("string"),
            ColumnType::Double => f.write_str("double"),
        }
    }
}

/// A single declared column.
#[derive(Debug, PartialEq, Clone, Eq, Hash)]
pub struct Column {
    pub name: String,
    pub ty: ColumnType,
}

/// Declared shape of an output table:
/// `{"columns": {name: type}, "not_null": [name...], "min_rows": n}`.
///
/// Column order is kept as declared; it is also the Arrow field order.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct TableSchema {
    #[serde(with = "column_map")]
    pub columns: Vec<Column>,
    #[serde(default)]
    pub not_null: Vec<String>,
    #[serde(default)]
    pub min_rows: usize,
}

impl TableSchema {
    pub fn new(columns: &[(&str, ColumnType)], not_null: &[&str], min_rows: usize) -> Self {
        Self {
            columns: columns
                .iter()
                .map(|(name, ty)| Column {
                    name: name.to_string(),
                    ty: *ty,
                })
                .collect(),
            not_null: not_null.iter().map(|n| n.to_string()).collect(),
            min_rows,
        }
    }
}

/// `columns` travels as an ordered JSON object.
mod column_map {
    use super::{Column, ColumnType};
    use serde::de::{MapAccess, Visitor};
    use serde::{Deserializer, Serializer};
    use std::fmt;

    pub fn serialize<S: Serializer>(cols: &[Column], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(cols.iter().map(|c| (c.name.as_str(), c.ty)))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Column>, D::Error> {
        struct ColumnsVisitor;

        impl<'de> Visitor<'de> for ColumnsVisitor {
            type Value = Vec<Column>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of column name to column type")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut cols = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((name, ty)) = map.next_entry::<String, ColumnType>()? {
                    cols.push(Column { name, ty });
                }
                Ok(cols)
            }
        }

        deserializer.deserialize_map(ColumnsVisitor)
    }
}
