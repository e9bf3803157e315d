// src/fetch/mod.rs

use anyhow::{Context, Result};
use reqwest::Client;
use std::collections::BTreeMap;
use tokio::task;
use tracing::info;
use url::Url;

use crate::snapshot::RawSnapshot;

/// Survey of Consumers export files and the snapshot key each lands under.
pub static SOURCE_FILES: &[(&str, &str)] = &[
    ("tbmics.csv", "consumer_sentiment"),
    ("tbmiccice.csv", "sentiment_components"),
    ("tbmpx1px5.csv", "inflation_expectations"),
];

/// `{base}/{file}`, independent of a trailing slash on `base`.
pub fn source_url(base: &Url, file: &str) -> Result<Url> {
    let joined = format!("{}/{}", base.as_str().trim_end_matches('/'), file);
    Url::parse(&joined).with_context(|| format!("building URL for {}", file))
}

/// Download every source file and bundle the bodies into one snapshot.
/// Any failed or non-2xx download fails the whole fetch.
pub async fn fetch_snapshot(client: &Client, base: &Url) -> Result<RawSnapshot> {
    let mut handles = Vec::with_capacity(SOURCE_FILES.len());

    for &(file, key) in SOURCE_FILES {
        let client = client.clone();
        let url = source_url(base, file)?;
        handles.push(task::spawn(async move {
            info!(%url, "fetching {}", file);
            let text = client
                .get(url.clone())
                .send()
                .await
                .with_context(|| format!("GET {}", url))?
                .error_for_status()
                .with_context(|| format!("GET {}", url))?
                .text()
                .await
                .with_context(|| format!("reading body from {}", url))?;
            info!(bytes = text.len(), "fetched {}", file);
            Ok::<_, anyhow::Error>((key.to_string(), text))
        }));
    }

    let mut files = BTreeMap::new();
    for handle in handles {
        let (key, text) = handle.await??;
        files.insert(key, text);
    }

    Ok(RawSnapshot::new(files))
}
