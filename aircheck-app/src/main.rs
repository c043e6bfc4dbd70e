use anyhow::Result;
use aircheck_common::observability::{LogConfig, init_logging};
use aircheck_config::{AircheckConfig, AircheckConfigLoader};
use clap::Parser;
use pipeline::Pipeline;

mod pipeline;

/// Harvest broadcast-transcript articles: page the listing API, fetch each
/// article, extract utterances, persist three representations.
#[derive(Debug, Parser)]
#[command(name = "aircheck", version)]
struct Args {
    /// Path to the harvester configuration file.
    #[arg(long, default_value = "aircheck.yaml")]
    config: String,

    /// Override the configured listing page cap.
    #[arg(long)]
    max_pages: Option<u32>,

    /// Duplicate log events to stderr.
    #[arg(long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let cfg: AircheckConfig = AircheckConfigLoader::new().with_file(&args.config).load()?;

    let log_path = init_logging(LogConfig {
        emit_stderr: args.verbose,
        ..Default::default()
    })?;
    tracing::info!(target: "pipeline", log = %log_path.display(), "aircheck starting");

    let pipeline = Pipeline::from_config(&cfg, args.max_pages)?;
    let report = pipeline.run().await?;

    tracing::info!(
        target: "pipeline",
        listed = report.listed,
        written = report.written,
        skipped = report.skipped,
        failed = report.failed,
        "harvest complete"
    );
    Ok(())
}
