//! Offline tool: fill the conversational flags on persisted transcript JSON
//! with a local Ollama model.
//!
//! One model call per utterance makes this the slow pass, so it takes a
//! `--start`/`--end` range over the sorted file list; run one worker per
//! range (and per `OLLAMA_HOST`) to split a corpus across GPUs.

use std::path::PathBuf;

use aircheck_common::observability::{LogConfig, init_logging};
use aircheck_enrich::{DEFAULT_MODEL, DEFAULT_OLLAMA_URL, OllamaClient, enrich_dir};
use anyhow::Result;
use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "aircheck-enrich", version)]
struct Args {
    /// Directory holding the persisted transcript JSON files.
    #[arg(long)]
    json_dir: PathBuf,

    /// Directory the enriched copies are written to.
    #[arg(long)]
    out_dir: PathBuf,

    /// Index of the first file (in sorted order) to process.
    #[arg(long, default_value_t = 0)]
    start: usize,

    /// Index past the last file to process; defaults to the end of the list.
    #[arg(long)]
    end: Option<usize>,

    /// Ollama model used for the classifications.
    #[arg(long, default_value = DEFAULT_MODEL)]
    model: String,

    /// Base URL of the Ollama server.
    #[arg(long, env = "OLLAMA_HOST", default_value = DEFAULT_OLLAMA_URL)]
    host: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(LogConfig {
        app_name: "aircheck-enrich",
        emit_stderr: true,
        ..Default::default()
    })?;

    let client = OllamaClient::new(&args.host, &args.model)?;
    // Fail fast on a missing server rather than timing out per utterance.
    client.probe().await?;
    tracing::info!(
        target: "enrich",
        host = %args.host,
        model = %args.model,
        "enrich starting"
    );

    let report = enrich_dir(&client, &args.json_dir, &args.out_dir, args.start, args.end).await?;
    tracing::info!(
        target: "enrich",
        scanned = report.scanned,
        enriched = report.enriched,
        failed = report.failed,
        "enrich complete"
    );
    Ok(())
}
