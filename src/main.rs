use anyhow::{bail, Result};
use clap::Parser;
use reqwest::Client;
use sentiment_ingest::{
    config::Config, fetch::fetch_snapshot, output::LocalSink, pipeline, snapshot::RawSnapshot,
};
use tokio::time::Instant;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

/// Fetch and normalise the University of Michigan Survey of Consumers tables.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Only fetch the raw CSV files
    #[arg(long, conflicts_with = "transform_only")]
    ingest_only: bool,

    /// Only transform the last fetched snapshot
    #[arg(long)]
    transform_only: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = Config::from_env();

    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.as_str()));
    fmt::Subscriber::builder().with_env_filter(env).init();

    // ─── 2) check environment ────────────────────────────────────────
    let base_url = config.validate()?;
    info!(data_dir = %config.data_dir.display(), %base_url, "startup");

    // ─── 3) ingest ───────────────────────────────────────────────────
    if !args.transform_only {
        info!("=== Phase 1: Ingest ===");
        let start = Instant::now();
        let snapshot = fetch_snapshot(&Client::new(), &base_url).await?;
        let path = snapshot.save(&config.raw_dir())?;
        info!(elapsed = ?start.elapsed(), "saved raw snapshot to {}", path.display());
    }

    // ─── 4) transform ────────────────────────────────────────────────
    if !args.ingest_only {
        info!("=== Phase 2: Transform ===");
        let snapshot = RawSnapshot::load(&config.raw_dir())?;
        let sink = LocalSink::new(config.out_dir())?;
        let report = pipeline::transform(&snapshot, &sink)?;

        for outcome in &report.outcomes {
            if let Ok(rows) = &outcome.result {
                info!(rows, "{} done", outcome.id);
            }
        }
        let failed: Vec<&str> = report.failures().map(|(id, _)| id).collect();
        if !failed.is_empty() {
            error!(?failed, "transform finished with failures");
            bail!(
                "{} of {} datasets failed: {}",
                failed.len(),
                report.outcomes.len(),
                failed.join(", ")
            );
        }
    }

    info!("all done");
    Ok(())
}
