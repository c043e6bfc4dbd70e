//! The batch pass: read persisted transcript JSON, fill the conversational
//! flags, write the enriched copy.
//!
//! Enrichment is slow (one model call per utterance), so the pass supports
//! `start..end` file ranges over the sorted directory listing; several
//! workers pointed at different ranges (and different Ollama hosts) can
//! split a corpus.

use std::fs;
use std::path::{Path, PathBuf};

use aircheck_extract::{Transcript, Utterance};

use crate::EnrichError;
use crate::classify::{ContextWindow, UtteranceAnalysis, classify_interview, classify_utterance};
use crate::ollama::OllamaClient;

/// Counters for one enrichment run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct EnrichReport {
    pub scanned: usize,
    pub enriched: usize,
    pub failed: usize,
}

/// Fill the flags on one transcript in place. Model failures leave the
/// defaults; this never errors.
pub async fn enrich_transcript(client: &OllamaClient, transcript: &mut Transcript) {
    transcript.is_interview =
        classify_interview(client, &transcript.headline, &transcript.utterances).await;

    for idx in 0..transcript.utterances.len() {
        let analysis = {
            let window = ContextWindow::at(&transcript.utterances, idx);
            classify_utterance(client, &window).await
        };
        if let Some(analysis) = analysis {
            apply_analysis(&mut transcript.utterances, idx, analysis);
        }
    }
}

/// Write one utterance's flags back, routing `did_interrupt` to the
/// *previous* utterance (it is the previous speaker who was cut off).
pub fn apply_analysis(utterances: &mut [Utterance], idx: usize, analysis: UtteranceAnalysis) {
    utterances[idx].is_question = analysis.is_question;
    utterances[idx].is_answer = analysis.is_answer;
    if analysis.did_interrupt && idx > 0 {
        utterances[idx - 1].is_last_sentence_interrupted = true;
    }
}

/// Enrich the `start..end` slice of the sorted JSON files in `json_dir`,
/// writing results under the same file names in `out_dir`. A file that
/// cannot be read or parsed is logged and skipped.
pub async fn enrich_dir(
    client: &OllamaClient,
    json_dir: &Path,
    out_dir: &Path,
    start: usize,
    end: Option<usize>,
) -> Result<EnrichReport, EnrichError> {
    fs::create_dir_all(out_dir).map_err(|e| EnrichError::io(out_dir, e))?;

    let files = json_files(json_dir)?;
    let batch = select_range(&files, start, end);
    tracing::info!(
        target: "enrich",
        available = files.len(),
        start,
        batch = batch.len(),
        model = client.model(),
        "enrich.batch_start"
    );

    let mut report = EnrichReport::default();
    for path in batch {
        report.scanned += 1;
        match enrich_file(client, path, out_dir).await {
            Ok(()) => report.enriched += 1,
            Err(err) => {
                report.failed += 1;
                tracing::warn!(
                    target: "enrich",
                    path = %path.display(),
                    error = %err,
                    "enrich.file_failed"
                );
            }
        }
    }
    Ok(report)
}

async fn enrich_file(
    client: &OllamaClient,
    path: &Path,
    out_dir: &Path,
) -> Result<(), EnrichError> {
    let raw = fs::read_to_string(path).map_err(|e| EnrichError::io(path, e))?;
    let mut transcript: Transcript =
        serde_json::from_str(&raw).map_err(|e| EnrichError::json(path, e))?;

    enrich_transcript(client, &mut transcript).await;

    let out_path = match path.file_name() {
        Some(name) => out_dir.join(name),
        None => return Err(EnrichError::io(path, std::io::Error::other("no file name"))),
    };
    let json =
        serde_json::to_string_pretty(&transcript).map_err(|e| EnrichError::json(&out_path, e))?;
    fs::write(&out_path, json).map_err(|e| EnrichError::io(&out_path, e))?;

    tracing::info!(
        target: "enrich",
        path = %out_path.display(),
        utterances = transcript.utterances.len(),
        is_interview = transcript.is_interview,
        "enrich.written"
    );
    Ok(())
}

/// Clamp `start..end` against the file list; an out-of-range start yields an
/// empty batch, not an error.
fn select_range(files: &[PathBuf], start: usize, end: Option<usize>) -> &[PathBuf] {
    let end = end.unwrap_or(files.len()).min(files.len());
    let start = start.min(end);
    &files[start..end]
}

fn json_files(dir: &Path) -> Result<Vec<PathBuf>, EnrichError> {
    let mut out = Vec::new();
    let entries = fs::read_dir(dir).map_err(|e| EnrichError::io(dir, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| EnrichError::io(dir, e))?;
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) == Some("json") {
            out.push(path);
        }
    }
    // Sorted listing keeps worker ranges disjoint across invocations.
    out.sort();
    Ok(out)
}
