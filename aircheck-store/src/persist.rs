//! Three-sink article persistence.

use std::fs;
use std::path::{Path, PathBuf};

use aircheck_extract::Transcript;
use chrono::NaiveDate;

use crate::StoreError;
use crate::filename::sanitize_filename;

/// What happened to one article on save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// All three representations written under this stem.
    Written(String),
    /// The text output already existed; nothing was touched.
    SkippedExisting(String),
}

/// Writes each transcript as HTML wrapper + plain text + JSON, one directory
/// per representation.
#[derive(Debug, Clone)]
pub struct ArticleStore {
    html_dir: PathBuf,
    text_dir: PathBuf,
    json_dir: PathBuf,
}

impl ArticleStore {
    pub fn new(
        html_dir: impl Into<PathBuf>,
        text_dir: impl Into<PathBuf>,
        json_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            html_dir: html_dir.into(),
            text_dir: text_dir.into(),
            json_dir: json_dir.into(),
        }
    }

    /// Create the three output directories if missing.
    pub fn ensure_dirs(&self) -> Result<(), StoreError> {
        for dir in [&self.html_dir, &self.text_dir, &self.json_dir] {
            fs::create_dir_all(dir).map_err(|e| StoreError::io(dir, e))?;
        }
        Ok(())
    }

    /// Persist one transcript under a stem derived from `date` + headline.
    ///
    /// The text file is the idempotence marker: when it already exists the
    /// article is skipped wholesale (re-runs must not clobber or duplicate).
    pub fn save(&self, transcript: &Transcript, date: NaiveDate) -> Result<SaveOutcome, StoreError> {
        let stem = sanitize_filename(date, &transcript.headline);

        let text_path = self.text_dir.join(format!("{stem}.txt"));
        if text_path.exists() {
            tracing::info!(target: "store", %stem, "store.skip_existing");
            return Ok(SaveOutcome::SkippedExisting(stem));
        }

        let html_path = self.html_dir.join(format!("{stem}.html"));
        let json_path = self.json_dir.join(format!("{stem}.json"));

        fs::write(&text_path, &transcript.body_text)
            .map_err(|e| StoreError::io(&text_path, e))?;
        fs::write(&html_path, html_wrapper(transcript))
            .map_err(|e| StoreError::io(&html_path, e))?;
        let json = serde_json::to_string_pretty(transcript)
            .map_err(|e| StoreError::json(&json_path, e))?;
        fs::write(&json_path, json).map_err(|e| StoreError::io(&json_path, e))?;

        tracing::info!(
            target: "store",
            %stem,
            utterances = transcript.utterances.len(),
            "store.written"
        );
        Ok(SaveOutcome::Written(stem))
    }

    pub fn json_dir(&self) -> &Path {
        &self.json_dir
    }
}

/// Minimal standalone HTML document around the body text, for eyeballing a
/// harvested article in a browser.
fn html_wrapper(transcript: &Transcript) -> String {
    let headline = escape_html(&transcript.headline);
    let body = escape_html(&transcript.body_text);
    format!(
        "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>{headline}</title></head>\n\
         <body>\n<h1>{headline}</h1>\n<pre>{body}</pre>\n</body>\n</html>\n"
    )
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use aircheck_extract::Utterance;
    use tempfile::TempDir;

    fn transcript() -> Transcript {
        Transcript {
            headline: "Doyle & the budget".into(),
            body_text: "DOYLE: Hello\nmore".into(),
            utterances: vec![Utterance::new("DOYLE", "Hello more")],
            is_interview: false,
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
    }

    #[test]
    fn save_writes_all_three_representations() {
        let tmp = TempDir::new().unwrap();
        let store = ArticleStore::new(
            tmp.path().join("html"),
            tmp.path().join("text"),
            tmp.path().join("json"),
        );
        store.ensure_dirs().unwrap();

        let outcome = store.save(&transcript(), date()).unwrap();
        let stem = match outcome {
            SaveOutcome::Written(stem) => stem,
            other => panic!("expected Written, got {other:?}"),
        };
        assert_eq!(stem, "2024-05-01_Doyle_the_budget");

        let text = std::fs::read_to_string(tmp.path().join("text").join(format!("{stem}.txt")))
            .unwrap();
        assert_eq!(text, "DOYLE: Hello\nmore");

        let html = std::fs::read_to_string(tmp.path().join("html").join(format!("{stem}.html")))
            .unwrap();
        assert!(html.contains("<title>Doyle &amp; the budget</title>"));

        let json: serde_json::Value = serde_json::from_str(
            &std::fs::read_to_string(tmp.path().join("json").join(format!("{stem}.json"))).unwrap(),
        )
        .unwrap();
        assert_eq!(json["utterances"][0]["speaker"], "DOYLE");
    }

    #[test]
    fn save_skips_when_text_output_exists() {
        let tmp = TempDir::new().unwrap();
        let store = ArticleStore::new(
            tmp.path().join("html"),
            tmp.path().join("text"),
            tmp.path().join("json"),
        );
        store.ensure_dirs().unwrap();

        let first = store.save(&transcript(), date()).unwrap();
        assert!(matches!(first, SaveOutcome::Written(_)));

        let second = store.save(&transcript(), date()).unwrap();
        assert!(matches!(second, SaveOutcome::SkippedExisting(_)));
    }
}
