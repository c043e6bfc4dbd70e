//! Tracing setup shared by the harvester and the offline tools.
//!
//! Everything logs through one daily-rolling file sink so a harvest run and
//! the prune/scrub passes that follow it can be read as a single timeline.
//! [`init_logging`] is idempotent: the first caller configures the global
//! subscriber, later callers just get the resolved log path back.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::Context;
use chrono::Local;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::{
    EnvFilter, Layer, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt,
};

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();
static LOG_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Keeps per-request chatter from reqwest's internals out of harvest logs
/// unless `RUST_LOG` asks for it.
const DEFAULT_FILTER: &str = "info,hyper=warn,hyper_util=warn,reqwest=warn";

/// Output encoding for structured logs.
#[derive(Debug, Clone, Copy)]
pub enum LogFormat {
    Text,
    Json,
}

/// Configuration passed to [`init_logging`].
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Binary name; names the log file and the fallback directory.
    pub app_name: &'static str,
    /// Explicit log directory. When `None` the `AIRCHECK_LOG_DIR`
    /// environment variable is consulted, then `~/.local/share/<app_name>`.
    pub log_dir: Option<PathBuf>,
    /// Duplicate events to `stderr` (the offline tools turn this on; the
    /// harvester only under `--verbose`).
    pub emit_stderr: bool,
    pub format: LogFormat,
    /// Filter applied when `RUST_LOG` is unset.
    pub default_filter: &'static str,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            app_name: "aircheck",
            log_dir: None,
            emit_stderr: false,
            format: LogFormat::Text,
            default_filter: DEFAULT_FILTER,
        }
    }
}

/// Install the global `tracing` subscriber and return the log file path for
/// the current day.
pub fn init_logging(config: LogConfig) -> anyhow::Result<PathBuf> {
    if let Some(path) = LOG_PATH.get() {
        return Ok(path.clone());
    }

    let log_dir = resolve_log_dir(config.app_name, config.log_dir.as_deref());
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("failed to create log directory: {}", log_dir.display()))?;

    let log_filename = format!("{}.log", config.app_name);
    // rolling::daily suffixes the file with the date; report today's.
    let full_path = log_dir.join(format!("{log_filename}.{}", Local::now().format("%Y-%m-%d")));

    let appender = rolling::daily(&log_dir, &log_filename);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let _ = LOG_GUARD.set(guard);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.default_filter));

    let mut layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> = Vec::new();
    layers.push(match config.format {
        LogFormat::Text => fmt::layer().with_writer(writer).with_ansi(false).boxed(),
        LogFormat::Json => fmt::layer().json().with_writer(writer).boxed(),
    });
    if config.emit_stderr {
        layers.push(match config.format {
            LogFormat::Text => fmt::layer().with_writer(std::io::stderr).boxed(),
            LogFormat::Json => fmt::layer().json().with_writer(std::io::stderr).boxed(),
        });
    }
    layers.push(env_filter.boxed());

    Registry::default()
        .with(layers)
        .try_init()
        .map_err(|e| anyhow::anyhow!("tracing setup failed: {e}"))?;

    let _ = LOG_PATH.set(full_path.clone());
    Ok(full_path)
}

/// Precedence: explicit directory, then `AIRCHECK_LOG_DIR`, then the
/// per-user data directory. Tildes and `$VAR`s expand in the first two.
fn resolve_log_dir(app_name: &str, explicit: Option<&Path>) -> PathBuf {
    let configured = explicit
        .map(|p| p.to_string_lossy().into_owned())
        .or_else(|| std::env::var("AIRCHECK_LOG_DIR").ok());

    match configured {
        Some(dir) => PathBuf::from(shellexpand::tilde(&dir).into_owned()),
        None => match std::env::var("HOME") {
            Ok(home) => PathBuf::from(home)
                .join(".local")
                .join("share")
                .join(app_name),
            Err(_) => PathBuf::from(".").join(app_name),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_dir_beats_environment() {
        let resolved = resolve_log_dir("aircheck", Some(Path::new("/var/log/aircheck")));
        assert_eq!(resolved, PathBuf::from("/var/log/aircheck"));
    }

    #[test]
    fn tilde_expands_against_home() {
        if let Ok(home) = std::env::var("HOME") {
            let resolved = resolve_log_dir("aircheck", Some(Path::new("~/logs")));
            assert_eq!(resolved, PathBuf::from(home).join("logs"));
        }
    }

    #[test]
    fn fallback_is_the_per_user_data_dir() {
        if let Ok(home) = std::env::var("HOME") {
            if std::env::var("AIRCHECK_LOG_DIR").is_err() {
                let resolved = resolve_log_dir("aircheck-prune", None);
                assert_eq!(
                    resolved,
                    PathBuf::from(home)
                        .join(".local")
                        .join("share")
                        .join("aircheck-prune")
                );
            }
        }
    }
}
