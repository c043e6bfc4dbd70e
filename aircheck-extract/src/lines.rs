//! Line normalization: turn a chosen HTML fragment into an ordered sequence
//! of plain-text lines.
//!
//! Order is preserved exactly as encountered; nothing is reordered or
//! deduplicated here, and (for preformatted sources) nothing is trimmed —
//! trimming is the assembler's job.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html};

use crate::layout::P_SELECTOR;

static NEWLINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\r\n|\n").expect("NEWLINE_RE compiles"));
static LINE_BREAK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<br\s*/?>").expect("LINE_BREAK_RE compiles"));

/// Lines of a preformatted element: raw text content split on any newline
/// sequence (`\r\n` or `\n`).
pub fn pre_lines(pre: &ElementRef) -> Vec<String> {
    let raw: String = pre.text().collect();
    NEWLINE_RE.split(&raw).map(str::to_string).collect()
}

/// Lines of a paragraph-based body: for each `<p>` in document order, split
/// its inner markup on `<br>`-style markers and render each fragment to
/// plain text.
pub fn paragraph_lines(container: &ElementRef) -> Vec<String> {
    let mut out = Vec::new();
    for p in container.select(&P_SELECTOR) {
        let inner = p.inner_html();
        for fragment in LINE_BREAK_RE.split(&inner) {
            out.push(fragment_to_text(fragment));
        }
    }
    out
}

/// Render one markup fragment to plain text: tags stripped, entities
/// decoded. The single seam between the assembler and the HTML parser.
pub fn fragment_to_text(fragment: &str) -> String {
    let parsed = Html::parse_fragment(fragment);
    parsed.root_element().text().collect()
}
