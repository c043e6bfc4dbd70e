//! Whole-document extraction: strategy selection, normalization, assembly,
//! and the document-scope `<pre>` fallback cascade.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

use crate::assemble::{SpeakerPattern, assemble_utterances};
use crate::layout::{PRE_SELECTOR, Strategy, select_strategy};
use crate::lines::{paragraph_lines, pre_lines};
use crate::transcript::{Transcript, Utterance};

/// Structural selector locating the main article-body wrapper.
pub const ARTICLE_BODY_SELECTOR: &str = ".article-body";

/// Body-text sentinel emitted when no layout strategy applied.
pub const NO_BODY_TEXT: &str = "No body text found";

static BODY_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(ARTICLE_BODY_SELECTOR).expect("article-body selector parses"));

/// Extract a transcript from one article page.
///
/// Never fails: pages that match none of the documented layouts produce the
/// [`NO_BODY_TEXT`] sentinel and an empty utterance list. The headline is
/// supplied by the caller (it comes from the listing API, not the page).
pub fn extract_transcript(html: &str, headline: &str) -> Transcript {
    let doc = Html::parse_document(html);
    let body = doc.select(&BODY_SELECTOR).next();

    let (strategy, body_lines, utterances) = match body {
        Some(container) => primary_pass(&container),
        None => (Strategy::None, Vec::new(), Vec::new()),
    };

    tracing::debug!(
        target: "extract",
        headline,
        strategy = ?strategy,
        lines = body_lines.len(),
        utterances = utterances.len(),
        "extract.primary"
    );

    // Fallback cascade: an empty primary result retries against a
    // document-scope <pre>, independent of the body container.
    let (body_lines, utterances) = if utterances.is_empty() {
        match fallback_pass(&doc) {
            Some((fb_lines, fb_utterances)) => {
                tracing::debug!(
                    target: "extract",
                    headline,
                    lines = fb_lines.len(),
                    utterances = fb_utterances.len(),
                    "extract.fallback"
                );
                (fb_lines, fb_utterances)
            }
            None => (body_lines, utterances),
        }
    } else {
        (body_lines, utterances)
    };

    let body_text = if body_lines.is_empty() {
        // Strategy NONE still reports the container's rendered text when any.
        body.map(container_text)
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| NO_BODY_TEXT.to_string())
    } else {
        body_lines.join("\n")
    };

    Transcript {
        headline: headline.to_string(),
        body_text,
        utterances,
        is_interview: false,
    }
}

/// Run the strategy selected from the body container.
fn primary_pass(container: &ElementRef) -> (Strategy, Vec<String>, Vec<Utterance>) {
    match select_strategy(container) {
        Strategy::Pre => {
            // select_strategy only returns Pre when a <pre> exists
            let lines = container
                .select(&PRE_SELECTOR)
                .next()
                .map(|pre| pre_lines(&pre))
                .unwrap_or_default();
            let utterances = assemble_utterances(&lines, SpeakerPattern::Strict);
            (Strategy::Pre, lines, utterances)
        }
        Strategy::Paragraphs => {
            let lines = paragraph_lines(container);
            let utterances = assemble_utterances(&lines, SpeakerPattern::Mixed);
            (Strategy::Paragraphs, lines, utterances)
        }
        Strategy::None => (Strategy::None, Vec::new(), Vec::new()),
    }
}

/// Re-attempt against any preformatted element at document scope. Returns
/// `None` when there is no such element or it too yields nothing.
fn fallback_pass(doc: &Html) -> Option<(Vec<String>, Vec<Utterance>)> {
    let pre = doc.select(&PRE_SELECTOR).next()?;
    let lines = pre_lines(&pre);
    let utterances = assemble_utterances(&lines, SpeakerPattern::Strict);
    if utterances.is_empty() {
        return None;
    }
    Some((lines, utterances))
}

fn container_text(container: ElementRef) -> String {
    container.text().collect::<String>().trim().to_string()
}
