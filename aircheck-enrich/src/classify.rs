//! Prompt construction and answer decoding for the two classification tasks:
//! whole-file interview detection and per-utterance conversational flags.

use aircheck_extract::Utterance;
use serde::Deserialize;
use serde_json::Value as JsonValue;

use crate::ollama::OllamaClient;
use crate::respond::extract_json;

/// Attempts per model call before giving up on a parseable answer.
const MAX_ATTEMPTS: usize = 3;

/// Utterances shown to the interview classifier.
const INTERVIEW_SAMPLE: usize = 6;

/// Placeholder for a neighbor that does not exist (start/end of transcript).
const ABSENT: &str = "N/A";

/// Flags the model assigns to one utterance. Missing fields decode as
/// `false`; the model gets no benefit of the doubt.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UtteranceAnalysis {
    pub is_question: bool,
    pub is_answer: bool,
    /// True when the current speaker cut the previous one off; applied to
    /// the *previous* utterance's interrupted flag.
    pub did_interrupt: bool,
}

#[derive(Debug, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct InterviewAnalysis {
    is_interview: bool,
}

impl Default for InterviewAnalysis {
    fn default() -> Self {
        Self {
            is_interview: false,
        }
    }
}

/// The four-utterance context the per-utterance prompt is built from: two
/// back, the current one, one ahead.
#[derive(Debug, Clone, Copy)]
pub struct ContextWindow<'a> {
    pub pre_previous: (&'a str, &'a str),
    pub previous: (&'a str, &'a str),
    pub current: (&'a str, &'a str),
    pub next: (&'a str, &'a str),
}

impl<'a> ContextWindow<'a> {
    /// Build the window centered on `idx`. Neighbors outside the transcript
    /// appear as the `N/A` placeholder.
    pub fn at(utterances: &'a [Utterance], idx: usize) -> Self {
        let neighbor = |i: Option<usize>| -> (&'a str, &'a str) {
            match i.and_then(|i| utterances.get(i)) {
                Some(u) => (u.speaker.as_str(), u.sentences.as_str()),
                None => (ABSENT, ABSENT),
            }
        };
        Self {
            pre_previous: neighbor(idx.checked_sub(2)),
            previous: neighbor(idx.checked_sub(1)),
            current: neighbor(Some(idx)),
            next: neighbor(idx.checked_add(1)),
        }
    }
}

fn interview_prompt(headline: &str, utterances: &[Utterance]) -> String {
    let mut sample = String::new();
    for u in utterances.iter().take(INTERVIEW_SAMPLE) {
        sample.push_str(&format!("Speaker {}: {}\n", u.speaker, u.sentences));
    }

    format!(
        "You are an expert linguistic data processor. I am providing a sample of a transcript.\n\
         \n\
         HEADLINE: {headline}\n\
         TRANSCRIPT SAMPLE:\n\
         {sample}\n\
         Your Task:\n\
         Analyze the text context and determine the \"isInterview\" status based on this rule:\n\
         - Set to true if the transcript represents a conversation/interview (Host vs Guest).\n\
         - Set to false if it is a monologue or report.\n\
         \n\
         Return ONLY a valid JSON object, no markdown, no extra text:\n\
         {{ \"isInterview\": true }}"
    )
}

fn utterance_prompt(window: &ContextWindow<'_>) -> String {
    let (pp_speaker, pp_text) = window.pre_previous;
    let (p_speaker, p_text) = window.previous;
    let (c_speaker, c_text) = window.current;
    let (n_speaker, n_text) = window.next;

    format!(
        "You are an expert linguistic data processor. Analyze this conversation flow centered on the CURRENT SPEAKER.\n\
         \n\
         --- CONTEXT WINDOW ---\n\
         1. PRE-PREVIOUS SPEAKER ({pp_speaker}): \"{pp_text}\"\n\
         2. PREVIOUS SPEAKER ({p_speaker}): \"{p_text}\"\n\
         \n\
         >>> 3. CURRENT SPEAKER ({c_speaker}) [ANALYZE THIS]: \"{c_text}\" <<<\n\
         \n\
         4. NEXT SPEAKER ({n_speaker}): \"{n_text}\"\n\
         ----------------------\n\
         \n\
         Your Task:\n\
         Analyze the \"CURRENT SPEAKER\" text based on the surrounding context and return a JSON object with booleans updated correctly based on these rules:\n\
         \n\
         1. \"isQuestion\": Set to true if the CURRENT SPEAKER is asking a question.\n\
         2. \"isAnswer\": Set to true if the CURRENT SPEAKER is responding to a question posed by the PREVIOUS or PRE-PREVIOUS speaker.\n\
         3. \"didInterrupt\": Set to true ONLY if the CURRENT SPEAKER cut off or interrupted the PREVIOUS SPEAKER (implying the PREVIOUS SPEAKER's sentence was left incomplete).\n\
         \n\
         Return ONLY a valid JSON object. Do not write explanations.\n\
         Example format:\n\
         {{\n  \"isQuestion\": true,\n  \"isAnswer\": false,\n  \"didInterrupt\": false\n}}"
    )
}

/// Call the model until it produces a parseable JSON object, up to
/// [`MAX_ATTEMPTS`]. Transport errors and unparseable answers both count as
/// a failed attempt.
async fn generate_json_with_retry(client: &OllamaClient, prompt: &str) -> Option<JsonValue> {
    for attempt in 1..=MAX_ATTEMPTS {
        match client.generate(prompt).await {
            Ok(response) => {
                if let Some(v) = extract_json(&response) {
                    return Some(v);
                }
                tracing::warn!(
                    target: "enrich",
                    attempt,
                    max_attempts = MAX_ATTEMPTS,
                    "enrich.unparseable_answer"
                );
            }
            Err(err) => {
                tracing::warn!(
                    target: "enrich",
                    attempt,
                    max_attempts = MAX_ATTEMPTS,
                    error = %err,
                    "enrich.model_call_failed"
                );
            }
        }
    }
    None
}

/// Decide whether a transcript is an interview from its headline and the
/// opening utterances. Defaults to `false` when the model never answers
/// usably.
pub async fn classify_interview(
    client: &OllamaClient,
    headline: &str,
    utterances: &[Utterance],
) -> bool {
    let prompt = interview_prompt(headline, utterances);
    match generate_json_with_retry(client, &prompt).await {
        Some(v) => {
            serde_json::from_value::<InterviewAnalysis>(v)
                .unwrap_or_default()
                .is_interview
        }
        None => {
            tracing::warn!(target: "enrich", headline, "enrich.interview_defaulted");
            false
        }
    }
}

/// Classify one utterance in its context window. `None` means the model
/// never produced a usable answer; the caller keeps the defaults.
pub async fn classify_utterance(
    client: &OllamaClient,
    window: &ContextWindow<'_>,
) -> Option<UtteranceAnalysis> {
    let prompt = utterance_prompt(window);
    let v = generate_json_with_retry(client, &prompt).await?;
    Some(serde_json::from_value(v).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utterances() -> Vec<Utterance> {
        vec![
            Utterance::new("DOYLE", "Welcome back."),
            Utterance::new("REILLY", "Thanks for having me."),
            Utterance::new("DOYLE", "Where does the budget stand?"),
        ]
    }

    #[test]
    fn window_at_the_start_uses_placeholders() {
        let us = utterances();
        let w = ContextWindow::at(&us, 0);
        assert_eq!(w.pre_previous, ("N/A", "N/A"));
        assert_eq!(w.previous, ("N/A", "N/A"));
        assert_eq!(w.current, ("DOYLE", "Welcome back."));
        assert_eq!(w.next, ("REILLY", "Thanks for having me."));
    }

    #[test]
    fn window_at_the_end_has_no_next() {
        let us = utterances();
        let w = ContextWindow::at(&us, 2);
        assert_eq!(w.pre_previous, ("DOYLE", "Welcome back."));
        assert_eq!(w.previous, ("REILLY", "Thanks for having me."));
        assert_eq!(w.next, ("N/A", "N/A"));
    }

    #[test]
    fn analysis_decodes_published_field_names_with_defaults() {
        let a: UtteranceAnalysis =
            serde_json::from_str(r#"{ "isQuestion": true, "didInterrupt": true }"#).unwrap();
        assert!(a.is_question);
        assert!(!a.is_answer);
        assert!(a.did_interrupt);

        let empty: UtteranceAnalysis = serde_json::from_str("{}").unwrap();
        assert_eq!(empty, UtteranceAnalysis::default());
    }

    #[test]
    fn prompts_carry_the_window_and_sample() {
        let us = utterances();
        let w = ContextWindow::at(&us, 1);
        let p = utterance_prompt(&w);
        assert!(p.contains("CURRENT SPEAKER (REILLY)"));
        assert!(p.contains("\"didInterrupt\""));

        let ip = interview_prompt("Budget showdown", &us);
        assert!(ip.contains("HEADLINE: Budget showdown"));
        assert!(ip.contains("Speaker DOYLE: Welcome back."));
    }
}
