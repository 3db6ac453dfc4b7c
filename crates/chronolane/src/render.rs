//! The full two-phase pipeline: fetch, plan, materialize, commit, reconcile stems.

pub use chronolane_render::model::{
    Bounds, CardContent, Lane, LayoutSnapshot, MeasuredCard, PlacementRecord, RenderPlan,
    StemLength,
};
pub use chronolane_render::text::{DeterministicTextMeasurer, TextMeasurer, TextStyle};
pub use chronolane_render::{
    LaneAllocator, LayoutOptions, RenderTarget, SvgTarget, plan_timeline, reconcile_stems,
};

use crate::session::RenderSession;
use crate::source::{EventSource, SourceError, load_events};
use chronolane_core::{DateRange, Event, LayoutConfig, TimelineConfig};
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum TimelineError {
    #[error(transparent)]
    Core(#[from] chronolane_core::Error),
    #[error(transparent)]
    Render(#[from] chronolane_render::Error),
    #[error(transparent)]
    Source(#[from] SourceError),
}

pub type Result<T> = std::result::Result<T, TimelineError>;

/// Converts an arbitrary string into a conservative SVG `id` token for the mount point.
///
/// Unsupported characters become `-`, and the id is prefixed with `t-` unless it starts with an
/// ASCII letter.
pub fn sanitize_mount_id(raw: &str) -> String {
    let raw = raw.trim();
    if raw.is_empty() {
        return "t-untitled".to_string();
    }

    let mut out = String::with_capacity(raw.len() + 4);
    for ch in raw.chars() {
        let ok = ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' || ch == ':' || ch == '.';
        out.push(if ok { ch } else { '-' });
    }

    let starts_ok = out.chars().next().is_some_and(|c| c.is_ascii_alphabetic());
    if !starts_ok {
        out.insert_str(0, "t-");
    }

    while out.contains("--") {
        out = out.replace("--", "-");
    }
    let out = out.trim_matches('-');
    if out.is_empty() || out == "t" {
        return "t-untitled".to_string();
    }
    out.to_string()
}

/// Bundles layout configuration, measurement options and the latest-wins session for one mount
/// point.
///
/// Clones share the session, so a pass started from any clone supersedes earlier passes from all
/// of them. All work except the fetch is CPU-bound and runtime-agnostic.
#[derive(Clone)]
pub struct TimelineRenderer {
    pub layout: LayoutConfig,
    pub options: LayoutOptions,
    session: Arc<RenderSession>,
}

impl Default for TimelineRenderer {
    fn default() -> Self {
        Self {
            layout: LayoutConfig::default(),
            options: LayoutOptions::default(),
            session: Arc::new(RenderSession::new()),
        }
    }
}

impl TimelineRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: &TimelineConfig) -> Result<Self> {
        self.layout = LayoutConfig::from_config(config)?;
        Ok(self)
    }

    pub fn with_layout(mut self, layout: LayoutConfig) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_text_measurer(mut self, measurer: Arc<dyn TextMeasurer + Send + Sync>) -> Self {
        self.options.text_measurer = measurer;
        self
    }

    pub fn session(&self) -> &RenderSession {
        &self.session
    }

    /// Plans already-loaded events. Executor-free.
    pub fn plan_sync(&self, events: &[Event], range: DateRange) -> Result<RenderPlan> {
        Ok(plan_timeline(events, range, &self.layout)?)
    }

    /// Fetches events and plans them, or returns `Ok(None)` when a newer pass started while the
    /// fetch was in flight.
    ///
    /// Fetch and decode failures degrade to an empty plan.
    pub async fn prepare(
        &self,
        source: &dyn EventSource,
        range: DateRange,
    ) -> Result<Option<RenderPlan>> {
        let ticket = self.session.begin();
        let events = load_events(source).await;
        if !self.session.is_current(ticket) {
            tracing::debug!(
                pass = ticket.get(),
                source = %source.describe(),
                "discarding superseded render pass"
            );
            return Ok(None);
        }
        Ok(Some(self.plan_sync(&events, range)?))
    }

    /// Rebuilds `target` from `plan` and returns the reconciled stems.
    pub fn render_plan_into(
        &self,
        target: &mut dyn RenderTarget,
        plan: &RenderPlan,
    ) -> Result<Vec<StemLength>> {
        Ok(chronolane_render::render_into(
            target,
            plan,
            self.layout.stem_floor,
        )?)
    }

    pub async fn render_into(
        &self,
        source: &dyn EventSource,
        range: DateRange,
        target: &mut dyn RenderTarget,
    ) -> Result<Option<Vec<StemLength>>> {
        let Some(plan) = self.prepare(source, range).await? else {
            return Ok(None);
        };
        self.render_plan_into(target, &plan).map(Some)
    }

    /// Synchronous SVG render of already-loaded events (executor-free).
    pub fn render_svg_sync(
        &self,
        events: &[Event],
        range: DateRange,
        mount_id: &str,
    ) -> Result<String> {
        let plan = self.plan_sync(events, range)?;
        self.render_plan_svg(&plan, mount_id)
    }

    pub fn render_plan_svg(&self, plan: &RenderPlan, mount_id: &str) -> Result<String> {
        Ok(chronolane_render::render_svg(
            plan,
            &self.layout,
            &sanitize_mount_id(mount_id),
            &self.options,
        )?)
    }

    pub async fn render_svg(
        &self,
        source: &dyn EventSource,
        range: DateRange,
        mount_id: &str,
    ) -> Result<Option<String>> {
        let Some(plan) = self.prepare(source, range).await? else {
            return Ok(None);
        };
        self.render_plan_svg(&plan, mount_id).map(Some)
    }
}
