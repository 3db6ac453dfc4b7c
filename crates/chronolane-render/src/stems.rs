//! Connector lengths from committed geometry.

use crate::model::{Lane, LayoutSnapshot, MeasuredCard, RenderPlan, StemLength};
use crate::{Error, Result};
use std::collections::HashMap;

/// Distance from a card's inward edge to the axis center line, before clamping.
pub fn raw_stem(card: &MeasuredCard, axis_center_y: f64) -> f64 {
    match card.lane {
        Lane::Top => axis_center_y - card.bottom,
        Lane::Bottom => card.top - axis_center_y,
    }
}

/// Computes one stem per planned card from a committed snapshot.
///
/// Stems are rounded to whole pixels and never shorter than `stem_floor`. Missing or non-finite
/// geometry means layout was not committed and fails with [`Error::MeasurementNotReady`]; a
/// finite negative distance means the card overlaps the axis and fails with
/// [`Error::CardCrossesAxis`].
pub fn reconcile_stems(
    plan: &RenderPlan,
    snapshot: &LayoutSnapshot,
    stem_floor: f64,
) -> Result<Vec<StemLength>> {
    if !snapshot.axis_center_y.is_finite() {
        return Err(Error::MeasurementNotReady {
            anchor: "axis".to_string(),
        });
    }

    let by_anchor: HashMap<&str, &MeasuredCard> = snapshot
        .cards
        .iter()
        .map(|c| (c.anchor.as_str(), c))
        .collect();

    let mut out: Vec<StemLength> = Vec::with_capacity(plan.records.len());
    for record in &plan.records {
        let Some(card) = by_anchor.get(record.anchor.as_str()) else {
            return Err(Error::MeasurementNotReady {
                anchor: record.anchor.clone(),
            });
        };
        if !card.top.is_finite() || !card.bottom.is_finite() {
            return Err(Error::MeasurementNotReady {
                anchor: record.anchor.clone(),
            });
        }

        let raw = raw_stem(card, snapshot.axis_center_y);
        if raw < 0.0 {
            return Err(Error::CardCrossesAxis {
                anchor: record.anchor.clone(),
                lane: card.lane,
                distance: raw,
            });
        }
        let length = raw.round().max(stem_floor.round()).max(0.0);
        out.push(StemLength {
            record_id: record.anchor.clone(),
            length_px: length as u32,
        });
    }
    Ok(out)
}
