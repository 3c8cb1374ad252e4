//! Normalisation of package "inclusions" into a display list.
//!
//! Content editors have stored inclusions as free text, as JSON text, as arrays
//! of strings or objects, and as key/value maps. Each known shape gets its own
//! normaliser; anything else is surfaced as raw text rather than dropped.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The finite set of shapes an inclusions payload can take.
#[derive(Debug, Clone, PartialEq)]
pub enum InclusionShape {
    Empty,
    Text(String),
    List(Vec<Value>),
    KeyValue(Map<String, Value>),
    Unrecognized(Value),
}

/// One line of the normalised inclusions list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InclusionEntry {
    Item {
        label: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        detail: Option<String>,
    },
    /// Unrecognised content, rendered as-is.
    Raw { text: String },
}

impl InclusionEntry {
    pub fn item(label: impl Into<String>) -> Self {
        InclusionEntry::Item {
            label: label.into(),
            detail: None,
        }
    }

    pub fn item_with_detail(label: impl Into<String>, detail: impl Into<String>) -> Self {
        InclusionEntry::Item {
            label: label.into(),
            detail: Some(detail.into()),
        }
    }

    pub fn raw(text: impl Into<String>) -> Self {
        InclusionEntry::Raw { text: text.into() }
    }
}

const LABEL_KEYS: [&str; 3] = ["name", "title", "label"];
const DETAIL_KEYS: [&str; 2] = ["description", "detail"];

impl InclusionShape {
    /// Classify a raw payload. JSON text holding an array or object is decoded
    /// once and classified by its inner shape.
    pub fn classify(value: &Value) -> Self {
        match value {
            Value::Null => InclusionShape::Empty,
            Value::String(s) if s.trim().is_empty() => InclusionShape::Empty,
            Value::String(s) => match decode_embedded(s) {
                Some(Value::Array(items)) => InclusionShape::List(items),
                Some(Value::Object(map)) => InclusionShape::KeyValue(map),
                _ => InclusionShape::Text(s.clone()),
            },
            Value::Array(items) => InclusionShape::List(items.clone()),
            Value::Object(map) => InclusionShape::KeyValue(map.clone()),
            other => InclusionShape::Unrecognized(other.clone()),
        }
    }

    pub fn normalize(&self) -> Vec<InclusionEntry> {
        match self {
            InclusionShape::Empty => Vec::new(),
            InclusionShape::Text(text) => normalize_text(text),
            InclusionShape::List(items) => items.iter().flat_map(normalize_list_item).collect(),
            InclusionShape::KeyValue(map) => map
                .iter()
                .filter_map(|(key, value)| normalize_pair(key, value))
                .collect(),
            InclusionShape::Unrecognized(value) => vec![InclusionEntry::raw(value.to_string())],
        }
    }
}

/// Classify and normalise in one step.
pub fn normalize_inclusions(value: &Value) -> Vec<InclusionEntry> {
    InclusionShape::classify(value).normalize()
}

fn decode_embedded(text: &str) -> Option<Value> {
    let trimmed = text.trim_start();
    if trimmed.starts_with('[') || trimmed.starts_with('{') {
        serde_json::from_str(trimmed).ok()
    } else {
        None
    }
}

fn normalize_text(text: &str) -> Vec<InclusionEntry> {
    text.lines()
        .map(|line| line.trim().trim_start_matches(['-', '*', '•']).trim())
        .filter(|line| !line.is_empty())
        .map(InclusionEntry::item)
        .collect()
}

fn normalize_list_item(item: &Value) -> Vec<InclusionEntry> {
    match item {
        Value::Null => Vec::new(),
        Value::String(s) => normalize_text(s),
        Value::Object(map) => {
            let label = LABEL_KEYS
                .iter()
                .find_map(|k| map.get(*k).and_then(Value::as_str))
                .map(str::trim)
                .filter(|s| !s.is_empty());
            let detail = DETAIL_KEYS
                .iter()
                .find_map(|k| map.get(*k).and_then(Value::as_str))
                .map(str::trim)
                .filter(|s| !s.is_empty());
            match (label, detail) {
                (Some(label), Some(detail)) => vec![InclusionEntry::item_with_detail(label, detail)],
                (Some(label), None) => vec![InclusionEntry::item(label)],
                _ => vec![InclusionEntry::raw(item.to_string())],
            }
        }
        other => vec![InclusionEntry::raw(other.to_string())],
    }
}

fn normalize_pair(key: &str, value: &Value) -> Option<InclusionEntry> {
    match value {
        Value::Bool(true) => Some(InclusionEntry::item(key)),
        // Explicitly excluded.
        Value::Bool(false) | Value::Null => None,
        Value::String(s) if s.trim().is_empty() => Some(InclusionEntry::item(key)),
        Value::String(s) => Some(InclusionEntry::item_with_detail(key, s.trim())),
        Value::Number(n) => Some(InclusionEntry::item_with_detail(key, n.to_string())),
        other => Some(InclusionEntry::raw(format!("{}: {}", key, other))),
    }
}
