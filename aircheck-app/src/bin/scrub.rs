//! Offline tool: strip the injected ad-player script fragment from persisted
//! transcript JSON.

use std::path::PathBuf;

use aircheck_common::observability::{LogConfig, init_logging};
use aircheck_store::scrub_fragment;
use anyhow::Result;
use clap::Parser;

/// The script snippet the site injects into article bodies; on paragraph
/// layouts it survives extraction as utterance text.
const DEFAULT_FRAGMENT: &str = "window.loadAnvatoPlayer({});";

#[derive(Debug, Parser)]
#[command(name = "aircheck-scrub", version)]
struct Args {
    /// Directory holding the persisted transcript JSON files.
    #[arg(long)]
    json_dir: PathBuf,

    /// Literal fragment to remove wherever it appears.
    #[arg(long, default_value = DEFAULT_FRAGMENT)]
    fragment: String,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(LogConfig {
        app_name: "aircheck-scrub",
        emit_stderr: true,
        ..Default::default()
    })?;

    let report = scrub_fragment(&args.json_dir, &args.fragment)?;
    tracing::info!(
        target: "store",
        scanned = report.scanned,
        rewritten = report.rewritten,
        "scrub complete"
    );
    Ok(())
}
