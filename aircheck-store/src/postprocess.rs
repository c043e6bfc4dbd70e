//! Offline passes over persisted transcript JSON.
//!
//! These run after a harvest, not during it: pruning drops files with too
//! little dialogue to be useful, and scrubbing strips a known advertising
//! script fragment that the site injects into article bodies (it survives
//! extraction as utterance text on some layouts).

use std::fs;
use std::path::Path;

use aircheck_extract::Transcript;

use crate::StoreError;

/// Result of a prune pass.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PruneReport {
    pub scanned: usize,
    pub removed: usize,
}

/// Result of a scrub pass.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ScrubReport {
    pub scanned: usize,
    pub rewritten: usize,
}

/// Delete every transcript JSON in `json_dir` whose utterance count is below
/// `min_utterances`.
pub fn prune_below(json_dir: &Path, min_utterances: usize) -> Result<PruneReport, StoreError> {
    let mut report = PruneReport::default();
    for path in json_files(json_dir)? {
        report.scanned += 1;
        let raw = fs::read_to_string(&path).map_err(|e| StoreError::io(&path, e))?;
        let transcript: Transcript =
            serde_json::from_str(&raw).map_err(|e| StoreError::json(&path, e))?;
        if transcript.utterances.len() < min_utterances {
            fs::remove_file(&path).map_err(|e| StoreError::io(&path, e))?;
            report.removed += 1;
            tracing::info!(
                target: "store",
                path = %path.display(),
                utterances = transcript.utterances.len(),
                min_utterances,
                "prune.removed"
            );
        }
    }
    Ok(report)
}

/// Strip a literal `fragment` from every utterance and from the body text,
/// rewriting files in place. No pattern language: the injected script is a
/// fixed byte sequence and literal matching cannot misfire on dialogue.
pub fn scrub_fragment(json_dir: &Path, fragment: &str) -> Result<ScrubReport, StoreError> {
    let mut report = ScrubReport::default();
    for path in json_files(json_dir)? {
        report.scanned += 1;
        let raw = fs::read_to_string(&path).map_err(|e| StoreError::io(&path, e))?;
        let mut transcript: Transcript =
            serde_json::from_str(&raw).map_err(|e| StoreError::json(&path, e))?;

        let mut touched = false;
        if transcript.body_text.contains(fragment) {
            transcript.body_text = transcript.body_text.replace(fragment, "");
            touched = true;
        }
        for utterance in &mut transcript.utterances {
            if utterance.sentences.contains(fragment) {
                utterance.sentences = utterance.sentences.replace(fragment, "").trim().to_string();
                touched = true;
            }
        }

        if touched {
            let json = serde_json::to_string_pretty(&transcript)
                .map_err(|e| StoreError::json(&path, e))?;
            fs::write(&path, json).map_err(|e| StoreError::io(&path, e))?;
            report.rewritten += 1;
            tracing::info!(target: "store", path = %path.display(), "scrub.rewritten");
        }
    }
    Ok(report)
}

fn json_files(dir: &Path) -> Result<Vec<std::path::PathBuf>, StoreError> {
    let mut out = Vec::new();
    let entries = fs::read_dir(dir).map_err(|e| StoreError::io(dir, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| StoreError::io(dir, e))?;
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) == Some("json") {
            out.push(path);
        }
    }
    // Deterministic scan order helps log diffing between runs.
    out.sort();
    Ok(out)
}
