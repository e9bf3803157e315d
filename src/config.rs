use anyhow::{bail, Context, Result};
use std::{env, fs, path::PathBuf};
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://www.sca.isr.umich.edu/files";
pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Runtime settings, read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Root for `raw/` (fetched payloads) and `out/` (finished tables).
    pub data_dir: PathBuf,
    pub base_url: String,
    pub log_level: String,
}

impl Config {
    /// `SENTIMENT_DATA_DIR`, `SENTIMENT_BASE_URL`, `LOG_LEVEL`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str, default: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };
        Self {
            data_dir: PathBuf::from(get("SENTIMENT_DATA_DIR", DEFAULT_DATA_DIR)),
            base_url: get("SENTIMENT_BASE_URL", DEFAULT_BASE_URL),
            log_level: get("LOG_LEVEL", DEFAULT_LOG_LEVEL),
        }
    }

    pub fn raw_dir(&self) -> PathBuf {
        self.data_dir.join("raw")
    }

    pub fn out_dir(&self) -> PathBuf {
        self.data_dir.join("out")
    }

    /// Check the environment before any phase runs: the base URL must be an
    /// absolute http(s) URL, and the working directories must be creatable.
    pub fn validate(&self) -> Result<Url> {
        let base = Url::parse(&self.base_url)
            .with_context(|| format!("SENTIMENT_BASE_URL {:?} is not a URL", self.base_url))?;
        if !matches!(base.scheme(), "http" | "https") {
            bail!("SENTIMENT_BASE_URL must be http(s), got {}", base.scheme());
        }

        for dir in [self.data_dir.clone(), self.raw_dir(), self.out_dir()] {
            fs::create_dir_all(&dir).with_context(|| format!("creating {}", dir.display()))?;
        }
        Ok(base)
    }
}
