use anyhow::{Context, Result};
use arrow::record_batch::RecordBatch;
use parquet::{arrow::ArrowWriter, basic::Compression, file::properties::WriterProperties};
use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};
use tracing::info;

use super::Sink;
use crate::datasets::DatasetMetadata;

/// Writes `<id>.parquet` and `<id>.metadata.json` into one directory.
pub struct LocalSink {
    out_dir: PathBuf,
}

impl LocalSink {
    pub fn new(out_dir: impl Into<PathBuf>) -> Result<Self> {
        let out_dir = out_dir.into();
        fs::create_dir_all(&out_dir)
            .with_context(|| format!("creating output directory {:?}", &out_dir))?;
        Ok(Self { out_dir })
    }

    pub fn table_path(&self, id: &str) -> PathBuf {
        self.out_dir.join(format!("{}.parquet", id))
    }

    pub fn metadata_path(&self, id: &str) -> PathBuf {
        self.out_dir.join(format!("{}.metadata.json", id))
    }

    fn tmp_path(&self, target: &Path) -> PathBuf {
        let name = target
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.out_dir.join(format!(".{}.tmp", name))
    }
}

impl Sink for LocalSink {
    fn upload(&self, id: &str, batch: &RecordBatch) -> Result<()> {
        let path = self.table_path(id);
        let tmp_path = self.tmp_path(&path);

        let file =
            File::create(&tmp_path).with_context(|| format!("creating {:?}", &tmp_path))?;
        let props = WriterProperties::builder()
            .set_compression(Compression::SNAPPY)
            .build();
        let mut writer = ArrowWriter::try_new(file, batch.schema(), Some(props))
            .context("creating Arrow writer")?;
        writer.write(batch).context("writing table")?;
        writer.close().context("closing Arrow writer")?;

        fs::rename(&tmp_path, &path)
            .with_context(|| format!("renaming {:?} -> {:?}", tmp_path, path))?;
        info!(rows = batch.num_rows(), path = %path.display(), "uploaded {}", id);
        Ok(())
    }

    fn publish(&self, metadata: &DatasetMetadata) -> Result<()> {
        let path = self.metadata_path(metadata.id);
        let tmp_path = self.tmp_path(&path);

        let mut tmp =
            File::create(&tmp_path).with_context(|| format!("creating {:?}", &tmp_path))?;
        serde_json::to_writer_pretty(&mut tmp, metadata).context("serializing metadata")?;
        tmp.write_all(b"\n")?;

        fs::rename(&tmp_path, &path)
            .with_context(|| format!("renaming {:?} -> {:?}", tmp_path, path))?;
        info!(path = %path.display(), "published {}", metadata.id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datasets::{ConsumerSentiment, ConsumerSentimentRecord, Dataset};
    use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
    use tempfile::tempdir;

    #[test]
    fn writes_table_and_metadata() -> Result<()> {
        let dir = tempdir()?;
        let sink = LocalSink::new(dir.path().join("out"))?;

        let records: Vec<ConsumerSentimentRecord> = (1..=12)
            .map(|m| ConsumerSentimentRecord {
                month: format!("2020-{:02}", m),
                index: 80.0 + m as f64,
            })
            .collect();
        let batch = ConsumerSentiment::to_batch(&records)?;

        sink.upload("umich_consumer_sentiment", &batch)?;
        sink.publish(ConsumerSentiment::metadata())?;

        let file = File::open(sink.table_path("umich_consumer_sentiment"))?;
        let reader = ParquetRecordBatchReaderBuilder::try_new(file)?.build()?;
        let read: Vec<RecordBatch> = reader.collect::<Result<_, _>>()?;
        assert_eq!(read.iter().map(|b| b.num_rows()).sum::<usize>(), 12);
        assert_eq!(read[0].schema().fields(), batch.schema().fields());

        let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(
            sink.metadata_path("umich_consumer_sentiment"),
        )?)?;
        assert_eq!(
            json["title"],
            "University of Michigan Consumer Sentiment Index (Monthly)"
        );
        assert_eq!(json["column_descriptions"]["month"], "Month of survey (YYYY-MM)");

        let leftovers = fs::read_dir(dir.path().join("out"))?
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .count();
        assert_eq!(leftovers, 0);
        Ok(())
    }
}
