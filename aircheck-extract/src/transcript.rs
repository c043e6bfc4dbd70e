//! Output data model: one transcript per article, utterances in dialogue
//! order.
//!
//! Field names follow the published JSON shape the downstream analysis
//! scripts read (`bodyText`, `sentences`, `timeStamp`, ...). The flag fields
//! on [`Utterance`] and `isInterview` on [`Transcript`] are reserved for a
//! later enrichment stage; this crate always emits their defaults.

use serde::{Deserialize, Serialize};

/// One attributed unit of dialogue: a speaker label plus accumulated text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Utterance {
    pub speaker: String,
    /// Free text; continuation lines are appended with a single space.
    pub sentences: String,
    #[serde(rename = "timeStamp", default)]
    pub time_stamp: String,
    #[serde(rename = "isLastSentenceInterrupted", default)]
    pub is_last_sentence_interrupted: bool,
    #[serde(rename = "isQuestion", default)]
    pub is_question: bool,
    #[serde(rename = "isAnswer", default)]
    pub is_answer: bool,
}

impl Utterance {
    /// A fresh utterance opened by a speaker line. Reserved fields start at
    /// their defaults; only a downstream consumer fills them.
    pub fn new(speaker: &str, first_text: &str) -> Self {
        Self {
            speaker: speaker.to_string(),
            sentences: first_text.to_string(),
            time_stamp: String::new(),
            is_last_sentence_interrupted: false,
            is_question: false,
            is_answer: false,
        }
    }

    /// Append a continuation line with a single separating space.
    pub fn append_line(&mut self, line: &str) {
        self.sentences.push(' ');
        self.sentences.push_str(line);
    }
}

/// Extraction result for one article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transcript {
    pub headline: String,
    /// Newline-join of the normalized lines behind the returned utterances,
    /// or a sentinel when no layout strategy applied.
    #[serde(rename = "bodyText")]
    pub body_text: String,
    pub utterances: Vec<Utterance>,
    /// Reserved: never computed here, always `false`.
    #[serde(rename = "isInterview", default)]
    pub is_interview: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utterance_serializes_with_published_field_names() {
        let u = Utterance::new("JOHN DOE", "Good evening.");
        let v = serde_json::to_value(&u).unwrap();
        assert_eq!(
            v,
            serde_json::json!({
                "speaker": "JOHN DOE",
                "sentences": "Good evening.",
                "timeStamp": "",
                "isLastSentenceInterrupted": false,
                "isQuestion": false,
                "isAnswer": false,
            })
        );
    }

    #[test]
    fn append_line_uses_single_space() {
        let mut u = Utterance::new("JOHN", "Hello");
        u.append_line("more text");
        assert_eq!(u.sentences, "Hello more text");
    }

    #[test]
    fn transcript_serializes_with_published_field_names() {
        let t = Transcript {
            headline: "Nightly roundup".into(),
            body_text: "JOHN: Hello".into(),
            utterances: vec![Utterance::new("JOHN", "Hello")],
            is_interview: false,
        };
        let v = serde_json::to_value(&t).unwrap();
        assert_eq!(v["bodyText"], "JOHN: Hello");
        assert_eq!(v["isInterview"], false);
        assert_eq!(v["utterances"][0]["speaker"], "JOHN");
    }
}
