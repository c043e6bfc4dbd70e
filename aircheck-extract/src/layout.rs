//! Layout selection: decide which normalization path handles a body
//! container.

use std::sync::LazyLock;

use scraper::{ElementRef, Selector};

pub(crate) static PRE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("pre").expect("pre selector parses"));
pub(crate) static P_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("p").expect("p selector parses"));

/// Extraction strategy for one article body.
///
/// `None` is a valid, low-information outcome, not an error: the container's
/// rendered text is still reported as body text, just without utterances.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Body carries a preformatted block; newlines are line boundaries.
    Pre,
    /// Body is paragraph markup; `<br>` runs are line boundaries.
    Paragraphs,
    /// Neither structure present.
    None,
}

/// Inspect the body container and pick a strategy from the structural cues
/// present. Preformatted blocks win over paragraphs.
pub fn select_strategy(body: &ElementRef) -> Strategy {
    if body.select(&PRE_SELECTOR).next().is_some() {
        Strategy::Pre
    } else if body.select(&P_SELECTOR).next().is_some() {
        Strategy::Paragraphs
    } else {
        Strategy::None
    }
}
