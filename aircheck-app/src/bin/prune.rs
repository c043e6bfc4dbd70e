//! Offline tool: delete persisted transcript JSON with too few utterances.

use std::path::PathBuf;

use aircheck_common::observability::{LogConfig, init_logging};
use aircheck_store::prune_below;
use anyhow::Result;
use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "aircheck-prune", version)]
struct Args {
    /// Directory holding the persisted transcript JSON files.
    #[arg(long)]
    json_dir: PathBuf,

    /// Files with fewer utterances than this are deleted.
    #[arg(long, default_value_t = 5)]
    min_utterances: usize,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(LogConfig {
        app_name: "aircheck-prune",
        emit_stderr: true,
        ..Default::default()
    })?;

    let report = prune_below(&args.json_dir, args.min_utterances)?;
    tracing::info!(
        target: "store",
        scanned = report.scanned,
        removed = report.removed,
        min_utterances = args.min_utterances,
        "prune complete"
    );
    Ok(())
}
