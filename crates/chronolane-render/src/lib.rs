#![forbid(unsafe_code)]

pub mod lanes;
pub mod model;
pub mod placement;
pub mod stems;
pub mod svg;
pub mod target;
pub mod text;

pub use lanes::{LaneAllocator, LaneState};
pub use model::{
    Bounds, CardContent, Lane, LayoutSnapshot, MeasuredCard, PlacementRecord, RenderPlan,
    StemLength,
};
pub use placement::{plan_timeline, slot_y};
pub use stems::{raw_stem, reconcile_stems};
pub use svg::SvgTarget;
pub use target::{RenderTarget, render_into};

use crate::text::{DeterministicTextMeasurer, TextMeasurer};
use chronolane_core::LayoutConfig;
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("non-finite x position {x} on the {lane} lane")]
    InvalidPosition { lane: Lane, x: f64 },
    #[error("placement requests must be in non-decreasing x: {x} after {previous} on the {lane} lane")]
    NonAscendingInput { lane: Lane, previous: f64, x: f64 },
    #[error("layout not committed for {anchor}")]
    MeasurementNotReady { anchor: String },
    #[error("{lane} card {anchor} crosses the axis by {distance}px")]
    CardCrossesAxis {
        anchor: String,
        lane: Lane,
        distance: f64,
    },
    #[error("render target has nothing materialized")]
    NotMaterialized,
    #[error("render target geometry has not been committed")]
    NotCommitted,
    #[error(transparent)]
    Core(#[from] chronolane_core::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Clone)]
pub struct LayoutOptions {
    pub text_measurer: Arc<dyn TextMeasurer + Send + Sync>,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            text_measurer: Arc::new(DeterministicTextMeasurer::default()),
        }
    }
}

/// Renders `plan` into a fresh [`SvgTarget`] and returns the SVG document.
pub fn render_svg(
    plan: &RenderPlan,
    cfg: &LayoutConfig,
    mount_id: &str,
    options: &LayoutOptions,
) -> Result<String> {
    let mut target = SvgTarget::with_measurer(mount_id, *cfg, options.text_measurer.clone());
    render_into(&mut target, plan, cfg.stem_floor)?;
    target.to_svg()
}
