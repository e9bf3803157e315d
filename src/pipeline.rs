// src/pipeline.rs

use arrow::record_batch::RecordBatch;
use tracing::{error, info};

use crate::datasets::{
    ConsumerSentiment, Dataset, InflationExpectations, SentimentComponents, MONTH_OUTPUT,
    SOURCE_KEYS,
};
use crate::error::TransformError;
use crate::output::Sink;
use crate::process::process_csv;
use crate::schema::{assert_valid_month, validate};
use crate::snapshot::RawSnapshot;

/// Result of one dataset run.
#[derive(Debug)]
pub struct DatasetOutcome {
    pub id: &'static str,
    pub result: Result<usize, TransformError>,
}

/// Per-dataset outcomes of one transform phase, in processing order.
#[derive(Debug, Default)]
pub struct RunReport {
    pub outcomes: Vec<DatasetOutcome>,
}

impl RunReport {
    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(|o| o.result.is_ok())
    }

    pub fn failures(&self) -> impl Iterator<Item = (&'static str, &TransformError)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (o.id, e)))
    }
}

/// CSV text → validated table. Pure: no output side effects.
pub fn build_table<D: Dataset>(csv_text: &str) -> Result<RecordBatch, TransformError> {
    let processed = process_csv::<D>(csv_text)?;

    let batch = D::to_batch(&processed.records).map_err(|source| TransformError::Table {
        dataset: D::KEY,
        source,
    })?;

    validate(&batch, D::schema())
        .and_then(|_| assert_valid_month(&batch, MONTH_OUTPUT))
        .map_err(|source| TransformError::Validation {
            dataset: D::KEY,
            source,
        })?;
    info!("Validated {} {} records", batch.num_rows(), D::LABEL);

    Ok(batch)
}

/// Build, validate, upload, then publish one dataset. Returns the row count.
pub fn run_dataset<D: Dataset>(csv_text: &str, sink: &dyn Sink) -> Result<usize, TransformError> {
    let batch = build_table::<D>(csv_text)?;
    let output_error = |e: anyhow::Error| TransformError::Output {
        dataset: D::KEY,
        source: e.into(),
    };

    let metadata = D::metadata();
    sink.upload(metadata.id, &batch).map_err(output_error)?;
    sink.publish(metadata).map_err(output_error)?;
    Ok(batch.num_rows())
}

fn run_source<D: Dataset>(snapshot: &RawSnapshot, sink: &dyn Sink) -> DatasetOutcome {
    let result = snapshot
        .source(D::KEY)
        .and_then(|text| run_dataset::<D>(text, sink));
    if let Err(e) = &result {
        error!(dataset = D::KEY, "{}", e);
    }
    DatasetOutcome {
        id: D::metadata().id,
        result,
    }
}

/// Run all three datasets in order against one raw snapshot.
///
/// A missing source key fails the whole phase before anything is written.
/// Any other failure is scoped to its dataset: it is recorded in the report
/// and the remaining datasets still run.
pub fn transform(snapshot: &RawSnapshot, sink: &dyn Sink) -> Result<RunReport, TransformError> {
    for key in SOURCE_KEYS {
        snapshot.source(key)?;
    }

    let outcomes = vec![
        run_source::<ConsumerSentiment>(snapshot, sink),
        run_source::<SentimentComponents>(snapshot, sink),
        run_source::<InflationExpectations>(snapshot, sink),
    ];
    Ok(RunReport { outcomes })
}
