// src/process/mod.rs
use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::{debug, info};

use crate::datasets::{Dataset, SourceRow};
use crate::error::TransformError;

pub mod convert;
pub mod date_parser;

use date_parser::{normalize_month, parse_year_lenient};

/// Survey years before this are never admitted.
pub const START_YEAR: i32 = 1978;

/// Why a row was left out of the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Skip {
    PreCutoff,
    BadDate,
    MissingValues,
}

/// Per-reason counters for rows left out of one run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SkipStats {
    pub pre_cutoff: usize,
    pub bad_date: usize,
    pub missing_values: usize,
}

impl SkipStats {
    fn count(&mut self, reason: Skip) {
        match reason {
            Skip::PreCutoff => self.pre_cutoff += 1,
            Skip::BadDate => self.bad_date += 1,
            Skip::MissingValues => self.missing_values += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.pre_cutoff + self.bad_date + self.missing_values
    }
}

/// Admitted records, in source order, plus what was dropped.
#[derive(Debug)]
pub struct Processed<R> {
    pub records: Vec<R>,
    pub skipped: SkipStats,
}

/// Year cutoff, then month normalisation, then the dataset's own null rule.
pub fn admit_row<D: Dataset>(row: D::Row) -> Result<D::Record, Skip> {
    if parse_year_lenient(row.year()) < START_YEAR {
        return Err(Skip::PreCutoff);
    }
    let month = match normalize_month(row.month(), row.year()) {
        Ok(Some(month)) => month,
        Ok(None) | Err(_) => return Err(Skip::BadDate),
    };
    D::admit(month, row).ok_or(Skip::MissingValues)
}

/// Parse one source CSV into admitted records.
///
/// Row-level noise is dropped and counted. A header without the dataset's
/// required columns, a broken CSV stream, or zero admitted rows fail the run.
#[tracing::instrument(level = "info", skip(csv_text), fields(dataset = D::KEY))]
pub fn process_csv<D: Dataset>(csv_text: &str) -> Result<Processed<D::Record>, TransformError> {
    let csv_error = |source| TransformError::Csv {
        dataset: D::KEY,
        source,
    };

    let mut rdr = ReaderBuilder::new()
        .flexible(true) // ragged lines read as missing trailing fields
        .trim(Trim::Headers)
        .from_reader(csv_text.as_bytes());

    let headers = rdr.headers().map_err(csv_error)?.clone();
    let missing: Vec<String> = D::required_columns()
        .into_iter()
        .filter(|col| !headers.iter().any(|h| h == *col))
        .map(str::to_string)
        .collect();
    if !missing.is_empty() {
        return Err(TransformError::MissingColumns {
            dataset: D::KEY,
            missing,
        });
    }

    let mut records = Vec::new();
    let mut skipped = SkipStats::default();
    let mut record = StringRecord::new();

    while rdr.read_record(&mut record).map_err(csv_error)? {
        while record.len() < headers.len() {
            record.push_field("");
        }
        let row: D::Row = record.deserialize(Some(&headers)).map_err(csv_error)?;
        match admit_row::<D>(row) {
            Ok(rec) => records.push(rec),
            Err(reason) => skipped.count(reason),
        }
    }

    debug!(
        total = skipped.total(),
        pre_cutoff = skipped.pre_cutoff,
        bad_date = skipped.bad_date,
        missing_values = skipped.missing_values,
        "skipped rows"
    );

    if records.is_empty() {
        return Err(TransformError::NoData { label: D::LABEL });
    }

    info!("Transformed {} {} observations", records.len(), D::LABEL);
    Ok(Processed { records, skipped })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datasets::{
        ConsumerSentiment, ConsumerSentimentRecord, InflationExpectations, SentimentComponents,
    };
    use tracing_subscriber::{EnvFilter, FmtSubscriber};

    fn init_test_logging() {
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(
                EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| EnvFilter::new("info,sentiment_ingest::process=debug")),
            )
            .with_test_writer()
            .finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
    }

    #[test]
    fn three_row_fixture_keeps_one_record() {
        init_test_logging();
        let csv = "YYYY,Month,ICS_ALL\n\
                   2020,January,95.5\n\
                   1975,June,80\n\
                   2020,February,.\n";

        let out = process_csv::<ConsumerSentiment>(csv).unwrap();
        assert_eq!(
            out.records,
            vec![ConsumerSentimentRecord {
                month: "2020-01".into(),
                index: 95.5
            }]
        );
        assert_eq!(
            out.skipped,
            SkipStats {
                pre_cutoff: 1,
                bad_date: 0,
                missing_values: 1
            }
        );
    }

    #[test]
    fn pre_cutoff_rows_never_survive() {
        let csv = "Month,YYYY,ICC,ICE\n\
                   January,1977,90,80\n\
                   December,1977,91,81\n\
                   January,1978,92,82\n";
        let out = process_csv::<SentimentComponents>(csv).unwrap();
        assert_eq!(out.records.len(), 1);
        assert_eq!(out.records[0].month, "1978-01");
        assert_eq!(out.skipped.pre_cutoff, 2);
    }

    #[test]
    fn pre_cutoff_inflation_rows_are_dropped_even_when_complete() {
        let csv = "YYYY,Month,PX_MD,PX5_MD\n\
                   1977,November,6.1,5.9\n\
                   1977,December,6.3,6.0\n\
                   1978,January,7.0,\n";
        let out = process_csv::<InflationExpectations>(csv).unwrap();
        assert_eq!(out.records.len(), 1);
        assert_eq!(out.records[0].month, "1978-01");
        assert_eq!(out.records[0].inflation_1yr, Some(7.0));
        assert_eq!(out.skipped.pre_cutoff, 2);
        assert_eq!(out.skipped.total(), 2);
    }

    #[test]
    fn years_past_four_digits_are_formatted_not_skipped() {
        let csv = "YYYY,Month,ICS_ALL\n\
                   300000,January,90\n";
        let out = process_csv::<ConsumerSentiment>(csv).unwrap();
        assert_eq!(out.records[0].month, "300000-01");
        assert_eq!(out.skipped.bad_date, 0);
    }

    #[test]
    fn bad_dates_are_skipped_not_fatal() {
        let csv = "YYYY,Month,ICS_ALL\n\
                   abc,January,90\n\
                   2001,Janvier,90\n\
                   2001,january,90\n\
                   2001,March,88.2\n";
        let out = process_csv::<ConsumerSentiment>(csv).unwrap();
        assert_eq!(out.records.len(), 1);
        assert_eq!(out.skipped.pre_cutoff, 1);
        assert_eq!(out.skipped.bad_date, 2);
        assert_eq!(out.skipped.total(), 3);
    }

    #[test]
    fn partial_components_are_kept() {
        let csv = "YYYY,Month,ICC,ICE\n\
                   1990,March,,80.1\n\
                   1990,April,.,.\n\
                   1990,May,101.2,n/a\n";
        let out = process_csv::<SentimentComponents>(csv).unwrap();
        assert_eq!(out.records.len(), 2);
        assert_eq!(out.records[0].index_current_conditions, None);
        assert_eq!(out.records[0].index_expectations, Some(80.1));
        assert_eq!(out.records[1].index_current_conditions, Some(101.2));
        assert_eq!(out.records[1].index_expectations, None);
        assert_eq!(out.skipped.missing_values, 1);
    }

    #[test]
    fn keeps_source_order_and_duplicates() {
        let csv = "YYYY,Month,PX_MD,PX5_MD\n\
                   2021,May,4.6,3.0\n\
                   2021,April,3.4,2.7\n\
                   2021,May,4.6,3.0\n";
        let out = process_csv::<InflationExpectations>(csv).unwrap();
        let months: Vec<&str> = out.records.iter().map(|r| r.month.as_str()).collect();
        assert_eq!(months, ["2021-05", "2021-04", "2021-05"]);
    }

    #[test]
    fn tolerates_ragged_rows_and_padded_headers() {
        let csv = "Month, YYYY ,ICC,ICE\n\
                   June,1999,95.1\n\
                   July,1999\n";
        let out = process_csv::<SentimentComponents>(csv).unwrap();
        assert_eq!(out.records.len(), 1);
        assert_eq!(out.records[0].index_current_conditions, Some(95.1));
        assert_eq!(out.records[0].index_expectations, None);
        assert_eq!(out.skipped.missing_values, 1);
    }

    #[test]
    fn no_admissible_rows_is_fatal() {
        let csv = "YYYY,Month,ICS_ALL\n1960,January,90\n2020,February,.\n";
        let err = process_csv::<ConsumerSentiment>(csv).unwrap_err();
        assert!(matches!(err, TransformError::NoData { .. }));
        assert_eq!(err.to_string(), "No consumer sentiment data found");
    }

    #[test]
    fn missing_columns_are_fatal() {
        let csv = "YYYY,Month,PX_MD\n2020,January,2.0\n";
        let err = process_csv::<InflationExpectations>(csv).unwrap_err();
        match err {
            TransformError::MissingColumns { dataset, missing } => {
                assert_eq!(dataset, "inflation_expectations");
                assert_eq!(missing, ["PX5_MD"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
