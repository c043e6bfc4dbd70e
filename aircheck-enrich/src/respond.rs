//! Salvaging JSON out of free-form model output.
//!
//! Local models wrap their answers in markdown fences, `<think>` blocks and
//! conversational filler no matter how firmly the prompt forbids it. The
//! extractor here peels those layers off; when nothing parseable remains the
//! caller retries or falls back to defaults.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value as JsonValue;

static THINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<think>.*?</think>").expect("think-block regex parses"));

static CODE_FENCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```(?:json)?\s*(\{.*?\})\s*```").expect("code-fence regex parses")
});

/// Pull the first JSON object out of a model response, or `None` when there
/// is nothing parseable. Order: strip `<think>` blocks, prefer a fenced
/// block, otherwise take the outermost `{...}` span.
pub fn extract_json(response: &str) -> Option<JsonValue> {
    let cleaned = THINK_RE.replace_all(response, "");

    if let Some(caps) = CODE_FENCE_RE.captures(&cleaned) {
        if let Ok(v) = serde_json::from_str(&caps[1]) {
            return Some(v);
        }
    }

    let start = cleaned.find('{')?;
    let end = cleaned.rfind('}')?;
    if end <= start {
        return None;
    }
    serde_json::from_str(&cleaned[start..=end]).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn bare_json_parses() {
        let v = extract_json(r#"{ "isInterview": true }"#).unwrap();
        assert_eq!(v, json!({ "isInterview": true }));
    }

    #[test]
    fn fenced_block_wins_over_surrounding_chatter() {
        let response = "Sure! Here is the result:\n```json\n{ \"isQuestion\": true }\n```\nLet me know if you need more.";
        let v = extract_json(response).unwrap();
        assert_eq!(v, json!({ "isQuestion": true }));
    }

    #[test]
    fn think_blocks_are_stripped_first() {
        let response =
            "<think>{ \"isQuestion\": false } hmm no wait</think>\n{ \"isQuestion\": true }";
        let v = extract_json(response).unwrap();
        assert_eq!(v, json!({ "isQuestion": true }));
    }

    #[test]
    fn outermost_braces_are_the_fallback() {
        let response = "The answer is { \"isAnswer\": true } as requested.";
        let v = extract_json(response).unwrap();
        assert_eq!(v, json!({ "isAnswer": true }));
    }

    #[test]
    fn unparseable_responses_yield_none() {
        assert!(extract_json("I cannot answer that.").is_none());
        assert!(extract_json("{ broken").is_none());
        assert!(extract_json("").is_none());
    }
}
