use arrow::array::Array;
use arrow::compute::concat_batches;
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use sentiment_ingest::{
    datasets::{schema_for, MONTH_OUTPUT},
    schema::{assert_valid_month, validate},
};
use std::{env, fs::File, path::Path, process::exit};

fn main() {
    // Expect a Parquet file and the dataset id it was written for.
    let args: Vec<String> = env::args().collect();
    if args.len() != 3 {
        eprintln!("Usage: {} <PARQUET_FILE> <DATASET_ID>", args[0]);
        exit(1);
    }
    if let Err(e) = inspect_output(Path::new(&args[1]), &args[2]) {
        eprintln!("Error: {}", e);
        exit(1);
    }
}

/// Read a written table back, print its shape and re-run validation.
fn inspect_output(path: &Path, dataset_id: &str) -> Result<(), Box<dyn std::error::Error>> {
    let schema = schema_for(dataset_id).ok_or_else(|| format!("unknown dataset {}", dataset_id))?;

    let file = File::open(path)?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    let arrow_schema = builder.schema().clone();
    let batches: Vec<RecordBatch> = builder.build()?.collect::<Result<_, _>>()?;
    let table = concat_batches(&arrow_schema, &batches)?;

    println!("=== {} ({}) ===", path.display(), dataset_id);
    println!("Rows:    {}", table.num_rows());
    println!("Batches: {}", batches.len());
    println!();
    println!("=== Columns ===");
    for field in arrow_schema.fields() {
        let nulls = table
            .column_by_name(field.name())
            .map(|c| c.null_count())
            .unwrap_or_default();
        println!("{}", column_line(field.name(), field.data_type(), nulls));
    }
    println!();

    validate(&table, schema)?;
    assert_valid_month(&table, MONTH_OUTPUT)?;
    println!("✔ valid against {} schema", dataset_id);
    Ok(())
}

fn column_line(name: &str, data_type: &DataType, nulls: usize) -> String {
    // DataType's Display ignores width, so pad the rendered string
    format!(
        "- {:<28} | {:<8} | nulls: {}",
        name,
        data_type.to_string(),
        nulls
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_lines_are_aligned() {
        let month = column_line("month", &DataType::Utf8, 0);
        let index = column_line("index", &DataType::Float64, 3);
        assert_eq!(month.find("| nulls"), index.find("| nulls"));
        assert!(month.starts_with("- month "));
        assert!(index.ends_with("| nulls: 3"));
    }
}
