#![forbid(unsafe_code)]

//! Headless timeline model: event ingestion, the date axis and day grouping.
//!
//! Everything here is pure data. Placement (lanes, slots, stems) lives in `chronolane-render`.

pub mod axis;
pub mod config;
pub mod date;
pub mod error;
pub mod event;
pub mod group;
pub mod ingest;
pub mod views;

pub use axis::{AxisModel, MonthTick, MonthTicks};
pub use config::{LayoutConfig, TimelineConfig};
pub use date::{DateRange, parse_iso_date};
pub use error::{Error, Result};
pub use event::{Author, Event, Labels, Section, day_anchor, entry_anchor};
pub use group::{DayGroup, DayGroups, DuplicateId, filter_to_range, group_by_date};
