use crate::date::DateRange;
use crate::event::Event;
use chrono::NaiveDate;
use std::collections::{BTreeMap, HashMap};

/// Events sharing one calendar day, ordered by `(date, id)`; duplicate ids fall back to
/// `(title, text, section)`.
#[derive(Debug, Clone, PartialEq)]
pub struct DayGroup {
    pub day: NaiveDate,
    pub events: Vec<Event>,
}

impl DayGroup {
    /// The card's representative: the first highlight, else the first member.
    pub fn primary(&self) -> Option<&Event> {
        self.events
            .iter()
            .find(|e| e.section.is_highlights())
            .or_else(|| self.events.first())
    }

    /// Same-day events folded into the card badge.
    pub fn extra_count(&self) -> usize {
        self.events.len().saturating_sub(1)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateId {
    pub id: String,
    pub occurrences: usize,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct DayGroups {
    groups: BTreeMap<NaiveDate, DayGroup>,
    duplicates: Vec<DuplicateId>,
}

impl DayGroups {
    pub fn get(&self, day: NaiveDate) -> Option<&DayGroup> {
        self.groups.get(&day)
    }

    /// Distinct days, ascending.
    pub fn days(&self) -> Vec<NaiveDate> {
        self.groups.keys().copied().collect()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &DayGroup> {
        self.groups.values()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Ids seen more than once in the input; such entries are kept but their anchors collide.
    pub fn duplicates(&self) -> &[DuplicateId] {
        &self.duplicates
    }
}

/// Groups events by day. The result does not depend on input order.
pub fn group_by_date(events: &[Event]) -> DayGroups {
    let mut groups: BTreeMap<NaiveDate, DayGroup> = BTreeMap::new();
    let mut seen: HashMap<&str, usize> = HashMap::new();

    for e in events {
        *seen.entry(e.id.as_str()).or_default() += 1;
        groups
            .entry(e.date)
            .or_insert_with(|| DayGroup {
                day: e.date,
                events: Vec::new(),
            })
            .events
            .push(e.clone());
    }

    for group in groups.values_mut() {
        group.events.sort_by(|a, b| {
            a.date
                .cmp(&b.date)
                .then_with(|| a.id.cmp(&b.id))
                .then_with(|| a.title.cmp(&b.title))
                .then_with(|| a.text.cmp(&b.text))
                .then_with(|| a.section.as_str().cmp(b.section.as_str()))
        });
    }

    let mut duplicates: Vec<DuplicateId> = seen
        .into_iter()
        .filter(|(_, n)| *n > 1)
        .map(|(id, occurrences)| DuplicateId {
            id: id.to_string(),
            occurrences,
        })
        .collect();
    duplicates.sort_by(|a, b| a.id.cmp(&b.id));
    for dup in &duplicates {
        tracing::warn!(id = %dup.id, occurrences = dup.occurrences, "duplicate event id");
    }

    DayGroups { groups, duplicates }
}

/// Keeps events inside `range` and stable-sorts them ascending by date.
pub fn filter_to_range(events: &[Event], range: &DateRange) -> Vec<Event> {
    let mut out: Vec<Event> = events
        .iter()
        .filter(|e| range.contains(e.date))
        .cloned()
        .collect();
    out.sort_by_key(|e| e.date);
    out
}
