use crate::date::format_iso_date;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const HIGHLIGHTS: &str = "highlights";

/// Section an entry belongs to. Missing or blank sections ingest as [`Section::Highlights`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Section {
    #[default]
    Highlights,
    Named(String),
}

impl Section {
    pub fn from_raw(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            None | Some("") | Some(HIGHLIGHTS) => Self::Highlights,
            Some(other) => Self::Named(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Highlights => HIGHLIGHTS,
            Self::Named(name) => name,
        }
    }

    pub fn is_highlights(&self) -> bool {
        matches!(self, Self::Highlights)
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Section {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Section {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(Self::from_raw(raw.as_deref()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl Author {
    /// Roster deep link for authors that carry an id.
    pub fn roster_href(&self) -> Option<String> {
        self.id.as_deref().map(|id| format!("./roster.html#{id}"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Labels {
    One(String),
    Many(Vec<String>),
}

impl Labels {
    pub fn display(&self) -> String {
        match self {
            Self::One(s) => s.clone(),
            Self::Many(items) => items.join(", "),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::One(s) => s.trim().is_empty(),
            Self::Many(items) => items.iter().all(|s| s.trim().is_empty()),
        }
    }
}

/// One dated entry. Immutable once ingested.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub date: NaiveDate,
    pub title: String,
    pub text: String,
    #[serde(default)]
    pub section: Section,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub video: Option<String>,
    #[serde(default)]
    pub author: Option<Author>,
    #[serde(default)]
    pub labels: Option<Labels>,
}

impl Event {
    /// Minimal constructor, mostly for tests and programmatic sources.
    pub fn new(id: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            id: id.into(),
            date,
            title: String::new(),
            text: String::new(),
            section: Section::Highlights,
            images: Vec::new(),
            video: None,
            author: None,
            labels: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_section(mut self, section: Section) -> Self {
        self.section = section;
        self
    }

    pub fn with_labels(mut self, labels: Labels) -> Self {
        self.labels = Some(labels);
        self
    }

    pub fn anchor(&self) -> String {
        entry_anchor(&self.id)
    }

    /// Text for the card pill: labels when present, otherwise the section name.
    pub fn pill_text(&self) -> String {
        match &self.labels {
            Some(labels) if !labels.is_empty() => labels.display(),
            _ => self.section.as_str().to_string(),
        }
    }
}

/// Day-level deep-link anchor, e.g. `d-2026-01-05`.
pub fn day_anchor(day: NaiveDate) -> String {
    format!("d-{}", format_iso_date(day))
}

/// Entry-level deep-link anchor, e.g. `e-42`.
pub fn entry_anchor(id: &str) -> String {
    format!("e-{id}")
}
