//! List-style views over the same event set: one section in date order, and a per-day digest
//! newest first. Both share the deep-link anchors used by timeline cards.

use crate::event::{Event, Section, day_anchor};
use crate::group::group_by_date;
use chrono::NaiveDate;
use serde::Serialize;

pub const EMPTY_STATE_TEXT: &str = "No entries yet.";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionEntry {
    pub anchor: String,
    /// Byline link into the roster, for authors with an id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_href: Option<String>,
    pub event: Event,
}

impl SectionEntry {
    fn new(event: &Event) -> Self {
        Self {
            anchor: event.anchor(),
            author_href: event.author.as_ref().and_then(|a| a.roster_href()),
            event: event.clone(),
        }
    }
}

/// Entries of one section, ascending by date (stable for same-day entries).
pub fn section_list(events: &[Event], section: &Section) -> Vec<SectionEntry> {
    let mut picked: Vec<&Event> = events.iter().filter(|e| &e.section == section).collect();
    picked.sort_by_key(|e| e.date);
    picked
        .into_iter()
        .map(SectionEntry::new)
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DigestDay {
    pub day: NaiveDate,
    pub anchor: String,
    pub count_label: String,
    pub entries: Vec<SectionEntry>,
}

pub fn entry_count_label(n: usize) -> String {
    if n == 1 {
        "1 entry".to_string()
    } else {
        format!("{n} entries")
    }
}

/// Days of one section, newest first; entries keep the `(date, id)` group order.
pub fn highlights_digest(events: &[Event], section: &Section) -> Vec<DigestDay> {
    let picked: Vec<Event> = events
        .iter()
        .filter(|e| &e.section == section)
        .cloned()
        .collect();
    let groups = group_by_date(&picked);

    groups
        .iter()
        .rev()
        .map(|g| DigestDay {
            day: g.day,
            anchor: day_anchor(g.day),
            count_label: entry_count_label(g.events.len()),
            entries: g
                .events
                .iter()
                .map(SectionEntry::new)
                .collect(),
        })
        .collect()
}
