//! Utterance assembly: a single-pass scanner over normalized lines.
//!
//! The only state is the index of the utterance currently open for
//! continuations. Each extraction invocation owns its own scan; nothing is
//! shared or carried across documents.

use std::sync::LazyLock;

use regex::Regex;

use crate::transcript::Utterance;

// Speaker charset: letters, spaces and .,'()- up to the first colon. The
// class cannot contain ':' itself, so the first colon always terminates the
// capture; a speaker name legitimately containing a colon is misattributed
// (known limitation of the source format).
static STRICT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Z][A-Z .,'()-]*):(.*)$").expect("STRICT_RE compiles"));
static MIXED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z][A-Za-z .,'()-]*):(.*)$").expect("MIXED_RE compiles"));

/// Production cues that close the open utterance. Matched by case-insensitive
/// containment anywhere in the line.
const NARRATION_MARKERS: [&str; 4] = ["voice-over", "on camera", "begin video", "end video"];

/// Which speaker-line shape a pass accepts.
///
/// Preformatted transcripts upcase their speaker labels, so the `<pre>`
/// passes demand an uppercase-leading token; paragraph layouts are looser
/// and mix case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeakerPattern {
    Strict,
    Mixed,
}

impl SpeakerPattern {
    fn regex(self) -> &'static Regex {
        match self {
            SpeakerPattern::Strict => &STRICT_RE,
            SpeakerPattern::Mixed => &MIXED_RE,
        }
    }
}

fn is_narration(line: &str) -> bool {
    let lower = line.to_lowercase();
    NARRATION_MARKERS.iter().any(|m| lower.contains(m))
}

/// Scan `lines` in order into speaker-attributed utterances.
///
/// Per trimmed line:
/// 1. empty lines are skipped;
/// 2. a speaker line (`SPEAKER: text`, non-empty remainder) opens a new
///    utterance — a trailing-colon line with no content does not;
/// 3. a narration cue closes the open utterance and is discarded; this fires
///    even for bracketed cues like `(ON CAMERA)`;
/// 4. other `[`/`(`-prefixed lines (stage directions) are skipped without
///    touching state;
/// 5. anything else continues the open utterance, or is dropped when none
///    is open.
///
/// Pure function of its input: re-running it over the same lines yields an
/// identical sequence.
pub fn assemble_utterances(lines: &[String], pattern: SpeakerPattern) -> Vec<Utterance> {
    let re = pattern.regex();
    let mut out: Vec<Utterance> = Vec::new();
    // Index of the utterance accepting continuations, if any.
    let mut current: Option<usize> = None;

    for raw in lines {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(caps) = re.captures(line) {
            let rest = caps[2].trim();
            if !rest.is_empty() {
                out.push(Utterance::new(caps[1].trim(), rest));
                current = Some(out.len() - 1);
                continue;
            }
            // Empty remainder: not a speaker line after all, fall through.
        }

        if is_narration(line) {
            current = None;
            continue;
        }

        if line.starts_with('[') || line.starts_with('(') {
            continue;
        }

        if let Some(idx) = current {
            out[idx].append_line(line);
        }
        // No open utterance: the line has nowhere to go and is dropped.
    }

    tracing::trace!(
        target: "extract",
        lines = lines.len(),
        utterances = out.len(),
        pattern = ?pattern,
        "assemble.done"
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(xs: &[&str]) -> Vec<String> {
        xs.iter().map(|s| s.to_string()).collect()
    }

    fn strict(xs: &[&str]) -> Vec<Utterance> {
        assemble_utterances(&lines(xs), SpeakerPattern::Strict)
    }

    #[test]
    fn continuation_appends_with_single_space() {
        let out = strict(&["JOHN: Hello", "more text"]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].speaker, "JOHN");
        assert_eq!(out[0].sentences, "Hello more text");
    }

    #[test]
    fn narration_cue_closes_open_utterance() {
        let out = strict(&["JOHN: Hello", "(on camera)", "more text"]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].sentences, "Hello");
    }

    #[test]
    fn narration_cue_matches_case_insensitively_anywhere() {
        let out = strict(&["JOHN: Hello", "(BEGIN VIDEO CLIP)", "stray", "ANNA: Hi"]);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].sentences, "Hello");
        assert_eq!(out[1].speaker, "ANNA");
    }

    #[test]
    fn bracketed_stage_direction_is_skipped_without_state_change() {
        let out = strict(&["JOHN: Hello", "[inaudible]", "still talking"]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].sentences, "Hello still talking");
    }

    #[test]
    fn empty_remainder_does_not_open_an_utterance() {
        let out = strict(&["BREAKING NEWS:"]);
        assert!(out.is_empty());
    }

    #[test]
    fn empty_remainder_line_continues_the_open_utterance() {
        // A matched-but-empty speaker line falls through to continuation.
        let out = strict(&["JOHN: Hello", "BREAKING NEWS:"]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].sentences, "Hello BREAKING NEWS:");
    }

    #[test]
    fn orphan_continuation_is_dropped_not_buffered() {
        let out = strict(&["no speaker yet", "JOHN: Hello"]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].sentences, "Hello");
    }

    #[test]
    fn strict_rejects_lowercase_leading_speakers() {
        let out = strict(&["John Smith: Hello"]);
        assert!(out.is_empty());

        let mixed = assemble_utterances(&lines(&["John Smith: Hello"]), SpeakerPattern::Mixed);
        assert_eq!(mixed.len(), 1);
        assert_eq!(mixed[0].speaker, "John Smith");
    }

    #[test]
    fn punctuated_speaker_labels_match() {
        let out = strict(&["DR. O'BRIEN (RET.): Thank you."]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].speaker, "DR. O'BRIEN (RET.)");
        assert_eq!(out[0].sentences, "Thank you.");
    }

    #[test]
    fn first_colon_wins_for_colon_bearing_text() {
        let out = strict(&["SMITH: the vote closed at 9:30 tonight"]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].speaker, "SMITH");
        assert_eq!(out[0].sentences, "the vote closed at 9:30 tonight");
    }

    #[test]
    fn mid_sentence_colons_do_not_open_utterances() {
        // Anchoring at start of line: a URL-ish token fails the charset.
        let out = strict(&["JOHN: Hello", "see https://example.com: details"]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].sentences, "Hello see https://example.com: details");
    }

    #[test]
    fn same_speaker_may_recur() {
        let out = strict(&["JOHN: one", "ANNA: two", "JOHN: three"]);
        assert_eq!(out.len(), 3);
        assert_eq!(out[0].speaker, "JOHN");
        assert_eq!(out[2].speaker, "JOHN");
    }

    #[test]
    fn assembly_is_idempotent_over_its_input() {
        let input = lines(&[
            "JOHN: Hello",
            "continued",
            "(END VIDEO)",
            "orphan",
            "ANNA: Hi there",
        ]);
        let a = assemble_utterances(&input, SpeakerPattern::Strict);
        let b = assemble_utterances(&input, SpeakerPattern::Strict);
        assert_eq!(a, b);
    }
}
