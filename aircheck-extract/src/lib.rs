//! Utterance extraction from loosely-formatted broadcast-transcript HTML.
//!
//! Transcript pages mark speaker turns with textual conventions
//! (`SPEAKER NAME: text`) rather than markup, and the conventions differ
//! between page layouts. This crate recovers structure from that noise:
//!
//! - [`layout`]: pick an extraction strategy from the article-body container
//! - [`lines`]: flatten the chosen HTML fragment into ordered plain-text lines
//! - [`assemble`]: scan the lines into speaker-attributed [`Utterance`]s
//! - [`extract`]: tie the above together, with a document-scope `<pre>`
//!   fallback when the primary pass comes up empty
//!
//! The engine is synchronous and pure: it takes an already-fetched document
//! string, owns no shared state, and never fails — unrecognized input
//! degrades to an empty transcript. Callers may run it concurrently across
//! independent documents.

pub mod assemble;
pub mod extract;
pub mod layout;
pub mod lines;
pub mod transcript;

pub use assemble::{SpeakerPattern, assemble_utterances};
pub use extract::{ARTICLE_BODY_SELECTOR, NO_BODY_TEXT, extract_transcript};
pub use layout::Strategy;
pub use transcript::{Transcript, Utterance};
