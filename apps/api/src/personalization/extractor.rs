//! Annotation Extractor: flattens whatever roadmap-shaped document the model
//! returned into `item id → {check, personalization}`.
//!
//! Values are copied verbatim. Validation is the reconciler's job.

use std::collections::HashMap;

use serde_json::Value;

use crate::models::roadmap::item_key;

/// Raw annotation fields found on one item of the model's document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawAnnotation {
    pub check: Option<Value>,
    pub personalization: Option<Value>,
}

pub type AnnotationMap = HashMap<String, RawAnnotation>;

/// Walks `stages → areas → items` of `document`.
///
/// Anything that is not shaped like a roadmap yields an empty map. Items with no
/// id, or carrying neither annotation field, are skipped. When an id repeats, the
/// last occurrence wins.
pub fn extract_item_annotations(document: &Value) -> AnnotationMap {
    let mut annotations = AnnotationMap::new();

    let Some(stages) = document.get("stages").and_then(Value::as_array) else {
        return annotations;
    };

    for item in stages
        .iter()
        .flat_map(|stage| children(stage, "areas"))
        .flat_map(|area| children(area, "items"))
    {
        let Some(id) = item.get("id").and_then(item_key) else {
            continue;
        };

        let annotation = RawAnnotation {
            check: non_null(item.get("check")),
            personalization: non_null(item.get("personalization")),
        };
        if annotation.check.is_none() && annotation.personalization.is_none() {
            continue;
        }

        annotations.insert(id, annotation);
    }

    annotations
}

/// Child list under `key`; missing or non-array children count as empty.
fn children<'a>(node: &'a Value, key: &str) -> impl Iterator<Item = &'a Value> {
    node.get(key)
        .and_then(Value::as_array)
        .map(|list| list.as_slice())
        .unwrap_or_default()
        .iter()
}

fn non_null(value: Option<&Value>) -> Option<Value> {
    value.filter(|v| !v.is_null()).cloned()
}
