pub mod arrow;
pub mod types;
pub mod validate;

pub use arrow::{build_arrow_schema, map_to_arrow_type};
pub use types::{Column, ColumnType, TableSchema};
pub use validate::{assert_valid_month, is_valid_month, validate};
