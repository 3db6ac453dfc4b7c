//! The seam between placement and whatever draws the timeline.
//!
//! Rendering is two-phase. `materialize` creates elements from a plan; `commit` is the barrier
//! after which geometry is final and the only way to obtain a [`LayoutSnapshot`]. Stems are
//! computed from that snapshot and written back with `apply_stems`.

use crate::model::{LayoutSnapshot, RenderPlan, StemLength};
use crate::stems::reconcile_stems;
use crate::Result;

pub trait RenderTarget {
    /// Opaque id of the mount point.
    fn mount_id(&self) -> &str;

    /// Drops all previously rendered output.
    fn clear(&mut self);

    /// Creates ticks and labels, one dot and one card per record.
    fn materialize(&mut self, plan: &RenderPlan) -> Result<()>;

    /// Layout barrier: returns committed geometry.
    fn commit(&mut self) -> Result<LayoutSnapshot>;

    fn apply_stems(&mut self, stems: &[StemLength]) -> Result<()>;
}

/// Runs both phases against `target`, rebuilding it from scratch.
pub fn render_into(
    target: &mut dyn RenderTarget,
    plan: &RenderPlan,
    stem_floor: f64,
) -> Result<Vec<StemLength>> {
    target.clear();
    target.materialize(plan)?;
    let snapshot = target.commit()?;
    let stems = reconcile_stems(plan, &snapshot, stem_floor)?;
    target.apply_stems(&stems)?;
    tracing::debug!(
        mount = target.mount_id(),
        cards = plan.records.len(),
        "rendered timeline"
    );
    Ok(stems)
}
