//! LLM-backed enrichment of persisted transcripts.
//!
//! The extraction core deliberately leaves the conversational flags
//! (`isInterview`, `isQuestion`, `isAnswer`, `isLastSentenceInterrupted`) at
//! their defaults; this crate fills them in an offline pass over the
//! persisted JSON, one local-model call per utterance plus one per file for
//! the interview classification. A model that fails or answers garbage
//! leaves the defaults in place; enrichment never invents data and never
//! aborts a batch.

pub mod classify;
pub mod enrich;
pub mod ollama;
pub mod respond;

use std::path::PathBuf;

use thiserror::Error;

pub use classify::{ContextWindow, UtteranceAnalysis, classify_interview, classify_utterance};
pub use enrich::{EnrichReport, enrich_dir, enrich_transcript};
pub use ollama::{DEFAULT_MODEL, DEFAULT_OLLAMA_URL, OllamaClient};

/// Failure modes of the enrichment pass. Model-side nonsense (unparseable
/// answers) is not an error; it degrades to the field defaults.
#[derive(Debug, Error)]
pub enum EnrichError {
    #[error("client build failed: {0}")]
    Build(String),
    #[error("no Ollama server reachable at {base_url}: {message}")]
    Connect { base_url: String, message: String },
    #[error("Ollama returned HTTP {0}")]
    Api(reqwest::StatusCode),
    #[error("Ollama response not decodable: {0}")]
    Decode(String),
    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl EnrichError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Json {
            path: path.into(),
            source,
        }
    }
}
