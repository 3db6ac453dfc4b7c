#![forbid(unsafe_code)]

//! `chronolane` lays out dated entries along a horizontal axis: one dot per day, one card per
//! day, cards packed above and below the axis so they never overlap, and stems sized from the
//! committed card geometry.
//!
//! The crate re-exports the data model from `chronolane-core`, adds pluggable event sources
//! ([`source`]) and the latest-wins render pipeline ([`render`]).

pub use chronolane_core::*;

pub mod render;
pub mod session;
pub mod source;

pub use session::{PassTicket, RenderSession};
pub use source::{
    EventSource, FileSource, SourceError, StaticSource, load_events, load_events_strict,
    source_from_location,
};
