//! Raw record ingestion.
//!
//! Sources hand over untrusted JSON. Anything that is not a list degrades to an empty event set,
//! and individual records that cannot be placed on a calendar are skipped. Loose fields (`author`,
//! `labels`) are resolved into typed values here, once.

use crate::date::parse_iso_date;
use crate::event::{Author, Event, Labels, Section};
use serde_json::Value;

fn str_field<'a>(record: &'a Value, key: &str) -> Option<&'a str> {
    record.get(key)?.as_str()
}

fn id_field(record: &Value) -> Option<String> {
    match record.get("id")? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn resolve_author(raw: Option<&Value>) -> Option<Author> {
    match raw? {
        Value::String(name) if !name.trim().is_empty() => Some(Author {
            name: name.trim().to_string(),
            id: None,
        }),
        Value::Object(map) => {
            let name = map.get("name")?.as_str()?.trim();
            if name.is_empty() {
                return None;
            }
            let id = match map.get("id") {
                Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
                Some(Value::Number(n)) => Some(n.to_string()),
                _ => None,
            };
            Some(Author {
                name: name.to_string(),
                id,
            })
        }
        _ => None,
    }
}

fn resolve_labels(raw: Option<&Value>) -> Option<Labels> {
    match raw? {
        Value::String(s) if !s.trim().is_empty() => Some(Labels::One(s.clone())),
        Value::Array(items) => {
            let items: Vec<String> = items
                .iter()
                .filter_map(|v| v.as_str())
                .filter(|s| !s.trim().is_empty())
                .map(str::to_string)
                .collect();
            (!items.is_empty()).then_some(Labels::Many(items))
        }
        _ => None,
    }
}

fn resolve_images(raw: Option<&Value>) -> Vec<String> {
    let Some(Value::Array(items)) = raw else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|v| v.as_str())
        .map(str::to_string)
        .collect()
}

/// Converts one raw record. Returns `None` for records without a usable id or date.
pub fn event_from_value(record: &Value) -> Option<Event> {
    let Some(id) = id_field(record) else {
        tracing::warn!(record = %record, "skipping event without an id");
        return None;
    };
    let raw_date = str_field(record, "date").unwrap_or_default();
    let date = match parse_iso_date(raw_date) {
        Ok(d) => d,
        Err(err) => {
            tracing::warn!(id = %id, %err, "skipping event with an unusable date");
            return None;
        }
    };

    Some(Event {
        id,
        date,
        title: str_field(record, "title").unwrap_or_default().to_string(),
        text: str_field(record, "text").unwrap_or_default().to_string(),
        section: Section::from_raw(str_field(record, "section")),
        images: resolve_images(record.get("images")),
        video: str_field(record, "video")
            .filter(|s| !s.trim().is_empty())
            .map(str::to_string),
        author: resolve_author(record.get("author")),
        labels: resolve_labels(record.get("labels")),
    })
}

/// Converts an already-parsed payload. Non-list payloads yield an empty set.
pub fn events_from_value(payload: &Value) -> Vec<Event> {
    let Some(records) = payload.as_array() else {
        tracing::warn!("event payload is not a list; rendering an empty timeline");
        return Vec::new();
    };
    records.iter().filter_map(event_from_value).collect()
}

/// Parses raw bytes leniently: malformed JSON degrades to an empty set.
pub fn events_from_slice(bytes: &[u8]) -> Vec<Event> {
    match serde_json::from_slice::<Value>(bytes) {
        Ok(payload) => events_from_value(&payload),
        Err(err) => {
            tracing::error!(%err, "failed to parse event payload");
            Vec::new()
        }
    }
}

/// Strict variant for callers that want to surface JSON syntax errors.
pub fn events_from_slice_strict(bytes: &[u8]) -> crate::Result<Vec<Event>> {
    let payload: Value = serde_json::from_slice(bytes)?;
    Ok(events_from_value(&payload))
}
