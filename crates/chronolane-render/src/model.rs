use chrono::NaiveDate;
use chronolane_core::{AxisModel, DuplicateId, MonthTick};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Side of the axis a card stacks on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lane {
    Top,
    Bottom,
}

impl Lane {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Bottom => "bottom",
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            Self::Top => Self::Bottom,
            Self::Bottom => Self::Top,
        }
    }
}

impl fmt::Display for Lane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Summary content shown on a day card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardContent {
    /// ISO date.
    pub heading: String,
    pub title: String,
    pub primary_id: String,
    pub primary_anchor: String,
    /// Same-day entries beyond the primary.
    pub extra_count: usize,
    /// `"+N"` when `extra_count > 0`.
    pub badge: Option<String>,
    pub pill: String,
    pub href: String,
}

/// One card (and its axis dot) per distinct day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementRecord {
    pub day: NaiveDate,
    /// Day-level anchor, e.g. `d-2026-01-05`; unique per plan.
    pub anchor: String,
    pub x_px: f64,
    pub lane: Lane,
    pub slot: usize,
    /// Card top edge; a function of `lane` and `slot` only.
    pub y_px: f64,
    pub card: CardContent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderPlan {
    pub axis: AxisModel,
    pub track_width_px: f64,
    pub line_y: f64,
    pub month_ticks: Vec<MonthTick>,
    /// Ascending by day.
    pub records: Vec<PlacementRecord>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub duplicate_ids: Vec<String>,
}

impl RenderPlan {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub(crate) fn duplicate_id_list(dups: &[DuplicateId]) -> Vec<String> {
        dups.iter().map(|d| d.id.clone()).collect()
    }
}

/// Geometry of one card as committed by a render target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasuredCard {
    pub anchor: String,
    pub lane: Lane,
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

/// Read-back of committed layout. Only [`crate::target::RenderTarget::commit`] produces one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutSnapshot {
    pub axis_center_y: f64,
    pub cards: Vec<MeasuredCard>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StemLength {
    /// Day anchor of the card.
    pub record_id: String,
    pub length_px: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn from_points(points: impl IntoIterator<Item = (f64, f64)>) -> Option<Self> {
        let mut it = points.into_iter();
        let (x0, y0) = it.next()?;
        let mut b = Self {
            min_x: x0,
            min_y: y0,
            max_x: x0,
            max_y: y0,
        };
        for (x, y) in it {
            b.min_x = b.min_x.min(x);
            b.min_y = b.min_y.min(y);
            b.max_x = b.max_x.max(x);
            b.max_y = b.max_y.max(y);
        }
        Some(b)
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}
