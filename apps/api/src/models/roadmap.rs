//! Roadmap tree: Roadmap → Stage → Area → Item.
//!
//! Only `Item.check` and `Item.personalization` are ever written by the service.
//! Each level types nothing but its child list; every descriptive field (`id`,
//! `name`, `skill_tags`, `estimated_hours`, ...) stays as the raw JSON value in
//! `extra`, so it is serialized back exactly as the canonical file had it.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Sentinel priority for items that were never ranked.
pub const UNRANKED_PRIORITY: u32 = 999;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Roadmap {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stages: Option<Vec<Stage>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub areas: Option<Vec<Area>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Area {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<Item>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A leaf learning unit. The unit of personalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub personalization: Option<Personalization>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Normalizes an `id` value into a lookup key. Job files use strings, models
/// sometimes emit bare numbers. Empty strings and other types have no key.
pub fn item_key(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

impl Item {
    pub fn id(&self) -> Option<String> {
        self.extra.get("id").and_then(item_key)
    }
}

impl Stage {
    pub fn areas(&self) -> &[Area] {
        self.areas.as_deref().unwrap_or_default()
    }
}

impl Area {
    pub fn items(&self) -> &[Item] {
        self.items.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    AlreadyMastered,
    HighPriority,
    MediumPriority,
    LowPriority,
    Optional,
    NotAssigned,
}

impl Status {
    /// Parses a status label, tolerating case and surrounding whitespace.
    /// Unknown labels yield `None`.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "already_mastered" => Some(Status::AlreadyMastered),
            "high_priority" => Some(Status::HighPriority),
            "medium_priority" => Some(Status::MediumPriority),
            "low_priority" => Some(Status::LowPriority),
            "optional" => Some(Status::Optional),
            "not_assigned" => Some(Status::NotAssigned),
            _ => None,
        }
    }
}

/// The four-field recommendation attached to an item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Personalization {
    pub status: Status,
    /// 0 = most urgent. `UNRANKED_PRIORITY` when unranked.
    pub priority: u32,
    pub personalized_description: String,
    pub reason: String,
}

impl Personalization {
    /// The record used when no annotation is available for an item.
    pub fn sentinel() -> Self {
        Self {
            status: Status::NotAssigned,
            priority: UNRANKED_PRIORITY,
            personalized_description: String::new(),
            reason: String::new(),
        }
    }

    pub fn is_sentinel(&self) -> bool {
        *self == Self::sentinel()
    }
}

/// Structural and annotation counts over a roadmap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RoadmapSummary {
    pub stages: usize,
    pub areas: usize,
    pub items: usize,
    /// Items carrying a status other than `not_assigned`.
    pub assigned: usize,
    /// Items with `check == true`.
    pub checked: usize,
    /// Items with no personalization or only the sentinel record.
    pub unranked: usize,
}

impl Roadmap {
    pub fn career_id(&self) -> &str {
        self.extra
            .get("career_id")
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    pub fn stages(&self) -> &[Stage] {
        self.stages.as_deref().unwrap_or_default()
    }

    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.stages()
            .iter()
            .flat_map(|s| s.areas().iter())
            .flat_map(|a| a.items().iter())
    }

    pub fn items_mut(&mut self) -> impl Iterator<Item = &mut Item> {
        self.stages
            .iter_mut()
            .flatten()
            .flat_map(|s| s.areas.iter_mut().flatten())
            .flat_map(|a| a.items.iter_mut().flatten())
    }

    pub fn summary(&self) -> RoadmapSummary {
        let mut summary = RoadmapSummary {
            stages: self.stages().len(),
            areas: self.stages().iter().map(|s| s.areas().len()).sum(),
            ..RoadmapSummary::default()
        };
        for item in self.items() {
            summary.items += 1;
            if item.check == Some(true) {
                summary.checked += 1;
            }
            match &item.personalization {
                Some(p) if p.is_sentinel() => summary.unranked += 1,
                Some(p) if p.status != Status::NotAssigned => summary.assigned += 1,
                Some(_) => {}
                None => summary.unranked += 1,
            }
        }
        summary
    }
}
