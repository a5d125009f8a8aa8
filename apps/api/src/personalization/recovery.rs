//! JSON Recovery Engine: pulls a JSON document out of free-form model output.
//!
//! Strategies, in order, each tried only when the previous one failed:
//! 1. the whole (trimmed, normalized) text
//! 2. each ```-fenced segment, minus an optional leading `json` tag
//! 3. the span from the first `{` to the last `}`
//!
//! When none of them parse, the trimmed text comes back as `Recovered::Text`.
//! The engine only ever parses substrings of its input; it never invents structure.

use serde_json::Value;
use tracing::debug;

use crate::personalization::normalize::normalize_json_candidate;

const FENCE: &str = "```";
const LANGUAGE_TAG: &str = "json";

/// Outcome of recovery: either a structured document or the unparsed text.
#[derive(Debug, Clone, PartialEq)]
pub enum Recovered {
    /// A JSON object or array.
    Document(Value),
    /// No strategy produced a document. Holds the trimmed input.
    Text(String),
}

/// Runs the recovery strategies against `text`.
pub fn extract_json_from_text(text: &str) -> Recovered {
    let text = text.trim();

    if let Some(document) = parse_candidate(text) {
        debug!("Recovered JSON from whole response");
        return Recovered::Document(document);
    }

    if text.contains(FENCE) {
        for segment in text.split(FENCE) {
            let segment = segment.trim();
            if segment.is_empty() {
                continue;
            }
            if let Some(document) = parse_candidate(strip_language_tag(segment)) {
                debug!("Recovered JSON from fenced block");
                return Recovered::Document(document);
            }
        }
    }

    if let (Some(first), Some(last)) = (text.find('{'), text.rfind('}')) {
        if last > first {
            if let Some(document) = parse_candidate(&text[first..=last]) {
                debug!("Recovered JSON from brace span {first}..={last}");
                return Recovered::Document(document);
            }
        }
    }

    debug!("No JSON document recovered from {} chars of output", text.len());
    Recovered::Text(text.to_string())
}

/// Normalizes and parses a candidate. Scalars are not documents.
fn parse_candidate(candidate: &str) -> Option<Value> {
    let normalized = normalize_json_candidate(candidate);
    match serde_json::from_str::<Value>(&normalized) {
        Ok(value @ (Value::Object(_) | Value::Array(_))) => Some(value),
        _ => None,
    }
}

/// Drops a leading `json` language tag (any case) from a fenced segment.
fn strip_language_tag(segment: &str) -> &str {
    match segment.get(..LANGUAGE_TAG.len()) {
        Some(tag) if tag.eq_ignore_ascii_case(LANGUAGE_TAG) => {
            segment[LANGUAGE_TAG.len()..].trim()
        }
        _ => segment,
    }
}
