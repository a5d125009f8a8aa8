//! Runs the personalization core on one model response:
//! recover → extract → reconcile.
//!
//! Pure and synchronous. Never fails: the worst outcome is the canonical roadmap.

use tracing::{info, warn};

use crate::models::Roadmap;
use crate::personalization::extractor::extract_item_annotations;
use crate::personalization::reconcile::apply_personalization;
use crate::personalization::recovery::{extract_json_from_text, Recovered};

/// How a response was turned into the returned roadmap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// A document was recovered and reconciled onto the canonical tree.
    Reconciled { annotated_items: usize },
    /// Nothing parseable came back; the canonical roadmap is returned untouched.
    Unparsed,
}

#[derive(Debug, Clone)]
pub struct Personalized {
    pub roadmap: Roadmap,
    pub outcome: Outcome,
}

/// Personalizes `canonical` from the raw text of a model response.
pub fn personalize_from_response(canonical: &Roadmap, raw_answer: &str) -> Personalized {
    let document = match extract_json_from_text(raw_answer) {
        Recovered::Document(document) => document,
        Recovered::Text(text) => {
            warn!(
                "Model response for career '{}' held no JSON document ({} chars); returning canonical roadmap",
                canonical.career_id(),
                text.len()
            );
            return Personalized {
                roadmap: canonical.clone(),
                outcome: Outcome::Unparsed,
            };
        }
    };

    let annotations = extract_item_annotations(&document);
    let roadmap = apply_personalization(canonical, &annotations);
    let summary = roadmap.summary();

    info!(
        "Reconciled career '{}': {} annotations for {} items ({} assigned, {} checked, {} unranked)",
        canonical.career_id(),
        annotations.len(),
        summary.items,
        summary.assigned,
        summary.checked,
        summary.unranked
    );

    Personalized {
        roadmap,
        outcome: Outcome::Reconciled {
            annotated_items: annotations.len(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::roadmap::fixtures::{
        item_ids, ml_roadmap, ML_ROADMAP_JSON, SPARSE_ROADMAP_JSON,
    };
    use crate::models::Status;
    use serde_json::Value;

    fn children_mut<'a>(node: &'a mut Value, key: &str) -> impl Iterator<Item = &'a mut Value> {
        node.get_mut(key)
            .and_then(Value::as_array_mut)
            .into_iter()
            .flatten()
    }

    /// Serializes `result`, checks every item carries both annotation fields,
    /// then strips them so the rest can be compared with the canonical file.
    fn without_annotations(result: &Roadmap) -> Value {
        let mut value = serde_json::to_value(result).unwrap();
        for stage in children_mut(&mut value, "stages") {
            for area in children_mut(stage, "areas") {
                for item in children_mut(area, "items") {
                    let item = item.as_object_mut().unwrap();
                    assert!(item.remove("check").is_some_and(|c| c.is_boolean()));
                    assert!(item.remove("personalization").is_some_and(|p| p.is_object()));
                }
            }
        }
        value
    }

    fn assert_same_shape_and_complete(result: &Roadmap, canonical: &Roadmap) {
        assert_eq!(result.stages().len(), canonical.stages().len());
        for (stage, canonical_stage) in result.stages().iter().zip(canonical.stages()) {
            assert_eq!(stage.areas().len(), canonical_stage.areas().len());
        }
        assert_eq!(item_ids(result), item_ids(canonical));
        for item in result.items() {
            assert!(item.check.is_some());
            assert!(item.personalization.is_some());
        }
    }

    #[test]
    fn test_any_recovered_document_yields_complete_roadmap() {
        let canonical = ml_roadmap();
        let responses = [
            "{}",
            "[]",
            "{\"stages\": 5}",
            "Here is the result:\n```json\n{\"stages\": []}\n```",
            "{\"stages\": [{\"areas\": [{\"items\": [{\"id\": \"ml-101\", \"check\": 1},\n, ...\n]}]}]}",
            "noise {\"stages\": [{\"areas\": [{\"items\": [{\"id\": \"zzz\"}]}]}]} noise",
        ];
        for response in responses {
            let personalized = personalize_from_response(&canonical, response);
            assert!(
                matches!(personalized.outcome, Outcome::Reconciled { .. }),
                "{response:?} was not recovered"
            );
            assert_same_shape_and_complete(&personalized.roadmap, &canonical);
        }
    }

    #[test]
    fn test_descriptive_fields_match_canonical_file_exactly() {
        let answer = r#"{"stages": [{"areas": [{"items": [
            {"id": "bare", "check": true, "name": "Renamed by the model",
             "personalization": {"status": "optional", "priority": 2}},
            {"id": 42, "check": false, "skill_tags": ["invented"]}
        ]}]}]}"#;
        for raw in [ML_ROADMAP_JSON, SPARSE_ROADMAP_JSON] {
            let expected: Value = serde_json::from_str(raw).unwrap();
            let canonical: Roadmap = serde_json::from_str(raw).unwrap();

            let reconciled = personalize_from_response(&canonical, answer);
            assert!(matches!(reconciled.outcome, Outcome::Reconciled { .. }));
            assert_eq!(without_annotations(&reconciled.roadmap), expected);

            let unparsed = personalize_from_response(&canonical, "no json here");
            assert_eq!(unparsed.outcome, Outcome::Unparsed);
            assert_eq!(serde_json::to_value(&unparsed.roadmap).unwrap(), expected);
        }
    }

    #[test]
    fn test_sparse_items_are_annotated_by_id() {
        let canonical: Roadmap = serde_json::from_str(SPARSE_ROADMAP_JSON).unwrap();
        let answer = r#"{"stages": [{"areas": [{"items": [
            {"id": "bare", "check": true, "personalization": {"status": "optional", "priority": 2}},
            {"id": "42", "check": true}
        ]}]}]}"#;
        let roadmap = personalize_from_response(&canonical, answer).roadmap;
        let by_id = |id: &str| roadmap.items().find(|i| i.id().as_deref() == Some(id)).unwrap();

        assert_eq!(by_id("bare").check, Some(true));
        assert_eq!(
            by_id("bare").personalization.as_ref().unwrap().status,
            Status::Optional
        );
        assert_eq!(by_id("42").check, Some(true));
        assert_eq!(by_id("nulls").check, Some(false));

        let unnamed = roadmap.items().find(|i| i.id().is_none()).unwrap();
        assert!(unnamed.personalization.as_ref().unwrap().is_sentinel());
    }

    #[test]
    fn test_unparseable_response_returns_canonical() {
        let canonical = ml_roadmap();
        for response in ["", "I'm sorry, I can't help with that.", "{\"stages\": ["] {
            let personalized = personalize_from_response(&canonical, response);
            assert_eq!(personalized.outcome, Outcome::Unparsed);
            assert_eq!(personalized.roadmap, canonical);
        }
    }

    #[test]
    fn test_fenced_empty_stages_gives_sentinels() {
        let canonical = ml_roadmap();
        let text = "Here is the result:\n```json\n{\"stages\": []}\n```";
        let personalized = personalize_from_response(&canonical, text);
        assert_eq!(
            personalized.outcome,
            Outcome::Reconciled { annotated_items: 0 }
        );
        assert!(personalized
            .roadmap
            .items()
            .all(|i| i.check == Some(false)
                && i.personalization.as_ref().is_some_and(|p| p.is_sentinel())));
    }

    #[test]
    fn test_echoed_canonical_is_all_sentinel() {
        let canonical = ml_roadmap();
        let echoed = serde_json::to_string_pretty(&canonical).unwrap();
        let personalized = personalize_from_response(&canonical, &echoed);
        assert_eq!(
            personalized.outcome,
            Outcome::Reconciled { annotated_items: 0 }
        );
        let summary = personalized.roadmap.summary();
        assert_eq!(summary.assigned, 0);
        assert_eq!(summary.checked, 0);
        assert_eq!(summary.unranked, summary.items);
    }

    #[test]
    fn test_partial_truncated_answer_is_merged() {
        let canonical = ml_roadmap();
        let text = r#"Sure, here is the personalized roadmap:
```json
{
  "career_id": "machine_learning",
  "stages": [
    {
      "areas": [
        {
          "items": [
            {
              "id": "ml-101",
              "check": true,
              "personalization": {
                "status": "already_mastered",
                "priority": 0,
                "personalized_description": "...",
                "reason": "strong GPA"
              }
            },
            {
              "id": "ml-102",
              "check": false,
              "personalization": {
                "status": "high_priority",
                "priority": 1,
                "personalized_description": "Start here."
              }
            },
            ...
          ]
        }
      ]
    }
  ]
}
```"#;
        let personalized = personalize_from_response(&canonical, text);
        assert_eq!(
            personalized.outcome,
            Outcome::Reconciled { annotated_items: 2 }
        );
        let roadmap = &personalized.roadmap;
        assert_same_shape_and_complete(roadmap, &canonical);

        let ml101 = roadmap.items().find(|i| i.id().as_deref() == Some("ml-101")).unwrap();
        assert_eq!(ml101.check, Some(true));
        let p101 = ml101.personalization.as_ref().unwrap();
        assert_eq!(p101.status, Status::AlreadyMastered);
        assert_eq!(p101.priority, 0);

        let p102 = roadmap
            .items()
            .find(|i| i.id().as_deref() == Some("ml-102"))
            .and_then(|i| i.personalization.clone())
            .unwrap();
        assert_eq!(p102.status, Status::HighPriority);
        assert_eq!(p102.personalized_description, "Start here.");
        assert_eq!(p102.reason, "");

        let ml202 = roadmap.items().find(|i| i.id().as_deref() == Some("ml-202")).unwrap();
        assert!(ml202.personalization.as_ref().unwrap().is_sentinel());
    }
}
