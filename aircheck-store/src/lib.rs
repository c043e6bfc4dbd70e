//! On-disk persistence for harvested transcripts, plus the offline
//! post-processing passes that run over the persisted JSON.
//!
//! Each article is written in three representations — an HTML wrapper, the
//! plain body text, and the structured transcript JSON — into three distinct
//! directories, keyed by a sanitized filename derived from publication date
//! and headline. Re-runs are idempotent: an article whose text output
//! already exists is skipped.

mod filename;
mod persist;
mod postprocess;

pub use filename::sanitize_filename;
pub use persist::{ArticleStore, SaveOutcome};
pub use postprocess::{PruneReport, ScrubReport, prune_below, scrub_fragment};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("json error at {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

impl StoreError {
    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            source,
        }
    }

    pub(crate) fn json(path: &std::path::Path, source: serde_json::Error) -> Self {
        Self::Json {
            path: path.display().to_string(),
            source,
        }
    }
}
