//! Tree Reconciler: merges untrusted annotations onto the trusted canonical tree.
//!
//! The output always has the canonical structure and every item always carries
//! both `check` and a complete `personalization`:
//! - item has an annotation: each field is validated on its own and defaults
//!   individually when absent or malformed
//! - item has no annotation: the sentinel record is filled in, but only where the
//!   item does not already carry a value

use serde_json::Value;

use crate::models::roadmap::UNRANKED_PRIORITY;
use crate::models::{Item, Personalization, Roadmap, Status};
use crate::personalization::extractor::{AnnotationMap, RawAnnotation};

/// Returns an annotated copy of `canonical`. The input is never modified.
pub fn apply_personalization(canonical: &Roadmap, annotations: &AnnotationMap) -> Roadmap {
    let mut result = canonical.clone();

    for item in result.items_mut() {
        match item.id().and_then(|id| annotations.get(&id)) {
            Some(annotation) => apply_annotation(item, annotation),
            None => apply_sentinel(item),
        }
    }

    result
}

fn apply_annotation(item: &mut Item, annotation: &RawAnnotation) {
    item.check = Some(match &annotation.check {
        Some(value) => coerce_bool(value),
        None => item.check.unwrap_or(false),
    });
    item.personalization = Some(personalization_from(annotation.personalization.as_ref()));
}

fn apply_sentinel(item: &mut Item) {
    item.check.get_or_insert(false);
    item.personalization.get_or_insert_with(Personalization::sentinel);
}

/// Builds a full record from whatever the model sent. A non-object record is
/// treated as an empty one.
fn personalization_from(raw: Option<&Value>) -> Personalization {
    let field = |key: &str| raw.and_then(|r| r.get(key)).filter(|v| !v.is_null());

    Personalization {
        status: field("status")
            .and_then(Value::as_str)
            .and_then(Status::from_label)
            .unwrap_or(Status::NotAssigned),
        priority: field("priority")
            .and_then(coerce_priority)
            .unwrap_or(UNRANKED_PRIORITY),
        personalized_description: field("personalized_description")
            .and_then(coerce_text)
            .unwrap_or_default(),
        reason: field("reason").and_then(coerce_text).unwrap_or_default(),
    }
}

/// Truthiness, with the usual spellings of booleans inside strings honoured.
fn coerce_bool(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "" | "false" | "no" | "0" => false,
            _ => true,
        },
        Value::Array(list) => !list.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// Non-negative integers only; integral floats and numeric strings are accepted.
fn coerce_priority(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| {
                n.as_f64()
                    .filter(|f| *f >= 0.0 && f.fract() == 0.0)
                    .map(|f| f as u64)
            })
            .and_then(|p| u32::try_from(p).ok()),
        Value::String(s) => s.trim().parse::<u32>().ok(),
        _ => None,
    }
}

fn coerce_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
