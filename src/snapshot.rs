// src/snapshot.rs

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use crate::error::TransformError;

/// File stem of the persisted raw payload.
pub const SNAPSHOT_NAME: &str = "sentiment_data";

/// Raw CSV text of every source file from one fetch, keyed by source key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawSnapshot {
    pub fetched_at: DateTime<Utc>,
    pub files: BTreeMap<String, String>,
}

impl RawSnapshot {
    pub fn new(files: BTreeMap<String, String>) -> Self {
        Self {
            fetched_at: Utc::now(),
            files,
        }
    }

    /// CSV text for `key`. A missing key breaks the ingest/transform contract.
    pub fn source(&self, key: &str) -> Result<&str, TransformError> {
        self.files
            .get(key)
            .map(String::as_str)
            .ok_or_else(|| TransformError::MissingRawKey(key.to_string()))
    }

    pub fn path_in(dir: &Path) -> PathBuf {
        dir.join(format!("{}.json", SNAPSHOT_NAME))
    }

    /// Write to `<dir>/sentiment_data.json` via a temp file and rename.
    pub fn save(&self, dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
        let path = Self::path_in(dir);
        let tmp_path = dir.join(format!(".{}.json.tmp", SNAPSHOT_NAME));

        let mut tmp = fs::File::create(&tmp_path)
            .with_context(|| format!("creating {}", tmp_path.display()))?;
        serde_json::to_writer(&mut tmp, self).context("serializing raw snapshot")?;
        tmp.write_all(b"\n")?;
        tmp.sync_all()?;

        fs::rename(&tmp_path, &path)
            .with_context(|| format!("renaming {} -> {}", tmp_path.display(), path.display()))?;
        Ok(path)
    }

    pub fn load(dir: &Path) -> Result<Self> {
        let path = Self::path_in(dir);
        let file = fs::File::open(&path)
            .with_context(|| format!("opening raw snapshot {}", path.display()))?;
        serde_json::from_reader(file).with_context(|| format!("parsing {}", path.display()))
    }
}
