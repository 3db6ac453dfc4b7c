//! Headless SVG render target.
//!
//! Every card has the same `cardHeight`, which never exceeds one slot step. Titles are wrapped by
//! text measurement and clamped with an ellipsis to the lines that fit. Stems are reconciled
//! against these committed boxes, not against the plan.

use crate::model::{
    Bounds, Lane, LayoutSnapshot, MeasuredCard, PlacementRecord, RenderPlan, StemLength,
};
use crate::target::RenderTarget;
use crate::text::{DeterministicTextMeasurer, TextMeasurer, TextStyle, clamp_lines, wrap_lines};
use crate::{Error, Result};
use chronolane_core::{LayoutConfig, MonthTick};
use std::collections::HashMap;
use std::fmt::Write as _;
use std::sync::Arc;

const CARD_PADDING: f64 = 4.0;
/// Heading, badge and pill rows use a smaller font than the title.
const SMALL_TEXT_SCALE: f64 = 0.8;
const VIEWBOX_MARGIN: f64 = 20.0;
const TICK_HALF_HEIGHT: f64 = 8.0;

#[derive(Debug, Clone)]
struct CardBox {
    anchor: String,
    lane: Lane,
    dot_x: f64,
    left: f64,
    top: f64,
    width: f64,
    height: f64,
    heading: String,
    title_lines: Vec<String>,
    badge: Option<String>,
    pill: String,
    href: String,
    primary_anchor: String,
}

impl CardBox {
    fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

#[derive(Debug, Clone)]
struct Scene {
    track_width: f64,
    line_y: f64,
    ticks: Vec<MonthTick>,
    cards: Vec<CardBox>,
    stems: HashMap<String, u32>,
    committed: bool,
}

pub struct SvgTarget {
    mount_id: String,
    cfg: LayoutConfig,
    measurer: Arc<dyn TextMeasurer + Send + Sync>,
    scene: Option<Scene>,
}

impl SvgTarget {
    pub fn new(mount_id: impl Into<String>, cfg: LayoutConfig) -> Self {
        Self::with_measurer(mount_id, cfg, Arc::new(DeterministicTextMeasurer::default()))
    }

    pub fn with_measurer(
        mount_id: impl Into<String>,
        cfg: LayoutConfig,
        measurer: Arc<dyn TextMeasurer + Send + Sync>,
    ) -> Self {
        Self {
            mount_id: mount_id.into(),
            cfg,
            measurer,
            scene: None,
        }
    }

    pub fn card_count(&self) -> usize {
        self.scene.as_ref().map_or(0, |s| s.cards.len())
    }

    pub fn stem(&self, anchor: &str) -> Option<u32> {
        self.scene.as_ref()?.stems.get(anchor).copied()
    }

    fn title_style(&self) -> TextStyle {
        TextStyle::sized(self.cfg.font_size)
    }

    fn small_style(&self) -> TextStyle {
        TextStyle::sized(self.cfg.font_size * SMALL_TEXT_SCALE)
    }

    fn line_height(&self, style: &TextStyle) -> f64 {
        self.measurer.measure("", style).height
    }

    /// Title lines that fit between the heading row and the pill row.
    fn title_capacity(&self) -> usize {
        let small = self.line_height(&self.small_style());
        let title = self.line_height(&self.title_style());
        let avail = self.cfg.card_height - CARD_PADDING * 2.0 - small * 2.0;
        if !(avail > 0.0 && title > 0.0) {
            return 0;
        }
        (avail / title).floor() as usize
    }

    fn build_card(&self, record: &PlacementRecord) -> CardBox {
        let style = self.title_style();
        let content_width = (self.cfg.card_width - CARD_PADDING * 2.0).max(1.0);
        let wrapped = wrap_lines(
            &record.card.title,
            content_width,
            &style,
            self.measurer.as_ref(),
        );
        let title_lines = clamp_lines(
            wrapped,
            self.title_capacity(),
            content_width,
            &style,
            self.measurer.as_ref(),
        );

        CardBox {
            anchor: record.anchor.clone(),
            lane: record.lane,
            dot_x: record.x_px,
            left: record.x_px - self.cfg.card_width / 2.0,
            top: record.y_px,
            width: self.cfg.card_width,
            height: self.cfg.card_height,
            heading: record.card.heading.clone(),
            title_lines,
            badge: record.card.badge.clone(),
            pill: record.card.pill.clone(),
            href: record.card.href.clone(),
            primary_anchor: record.card.primary_anchor.clone(),
        }
    }

    /// Serializes the committed scene.
    pub fn to_svg(&self) -> Result<String> {
        let Some(scene) = self.scene.as_ref() else {
            return Err(Error::NotMaterialized);
        };
        if !scene.committed {
            return Err(Error::NotCommitted);
        }

        let dot_r = self.cfg.dot_size / 2.0;
        let label_lh = self.line_height(&self.small_style());
        let mut points: Vec<(f64, f64)> = vec![
            (0.0, scene.line_y - TICK_HALF_HEIGHT - label_lh),
            (scene.track_width, scene.line_y + TICK_HALF_HEIGHT + label_lh),
        ];
        for c in &scene.cards {
            points.push((c.left, c.top));
            points.push((c.left + c.width, c.bottom()));
        }
        let b = Bounds::from_points(points).unwrap_or(Bounds {
            min_x: 0.0,
            min_y: 0.0,
            max_x: 100.0,
            max_y: 100.0,
        });
        let vb_x = b.min_x - VIEWBOX_MARGIN;
        let vb_y = b.min_y - VIEWBOX_MARGIN;
        let vb_w = (b.width() + VIEWBOX_MARGIN * 2.0).max(1.0);
        let vb_h = (b.height() + VIEWBOX_MARGIN * 2.0).max(1.0);

        let id = escape_attr(&self.mount_id);
        let mut out = String::new();
        let _ = write!(
            &mut out,
            r#"<svg id="{id}" class="timeline" xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="{x} {y} {w} {h}" role="graphics-document document" aria-roledescription="timeline">"#,
            x = fmt(vb_x),
            y = fmt(vb_y),
            w = fmt(vb_w),
            h = fmt(vb_h),
        );
        let _ = write!(
            &mut out,
            "<style>{}</style>",
            timeline_css(&self.mount_id, self.cfg.font_size)
        );

        out.push_str(r#"<g class="track">"#);
        let _ = write!(
            &mut out,
            r#"<line class="axis" x1="0" y1="{y}" x2="{x2}" y2="{y}"/>"#,
            y = fmt(scene.line_y),
            x2 = fmt(scene.track_width),
        );

        for t in &scene.ticks {
            let _ = write!(
                &mut out,
                r#"<line class="month-tick" x1="{x}" y1="{y1}" x2="{x}" y2="{y2}"/><text class="month-label" x="{x}" y="{ty}" text-anchor="middle">{label}</text>"#,
                x = fmt(t.x),
                y1 = fmt(scene.line_y - TICK_HALF_HEIGHT),
                y2 = fmt(scene.line_y + TICK_HALF_HEIGHT),
                ty = fmt(scene.line_y + TICK_HALF_HEIGHT + label_lh),
                label = escape_xml(&t.label),
            );
        }

        for c in &scene.cards {
            let _ = write!(
                &mut out,
                r#"<circle class="dot" data-anchor="{a}" cx="{x}" cy="{y}" r="{r}"/>"#,
                a = escape_attr(&c.anchor),
                x = fmt(c.dot_x),
                y = fmt(scene.line_y),
                r = fmt(dot_r),
            );
        }

        for c in &scene.cards {
            if let Some(stem) = scene.stems.get(&c.anchor) {
                let stem = f64::from(*stem);
                let (y1, y2) = match c.lane {
                    Lane::Top => (c.bottom(), c.bottom() + stem),
                    Lane::Bottom => (c.top - stem, c.top),
                };
                let _ = write!(
                    &mut out,
                    r#"<line class="stem" x1="{x}" y1="{y1}" x2="{x}" y2="{y2}"/>"#,
                    x = fmt(c.dot_x),
                    y1 = fmt(y1),
                    y2 = fmt(y2),
                );
            }
            self.render_card(&mut out, c);
        }

        out.push_str("</g></svg>");
        Ok(out)
    }

    fn render_card(&self, out: &mut String, c: &CardBox) {
        let small_lh = self.line_height(&self.small_style());
        let title_lh = self.line_height(&self.title_style());
        let _ = write!(
            out,
            r#"<g id="{id}" class="event {lane}" data-entry="{entry}" transform="translate({x}, {y})">"#,
            id = escape_attr(&c.anchor),
            lane = c.lane.as_str(),
            entry = escape_attr(&c.primary_anchor),
            x = fmt(c.left),
            y = fmt(c.top),
        );
        let _ = write!(
            out,
            r#"<rect class="card" width="{w}" height="{h}" rx="8" ry="8"/>"#,
            w = fmt(c.width),
            h = fmt(c.height),
        );

        let y = CARD_PADDING + small_lh * 0.8;
        let _ = write!(
            out,
            r#"<text class="card-heading" x="{x}" y="{y}">{t}</text>"#,
            x = fmt(CARD_PADDING),
            y = fmt(y),
            t = escape_xml(&c.heading),
        );
        if let Some(badge) = &c.badge {
            let _ = write!(
                out,
                r#"<text class="badge" x="{x}" y="{y}" text-anchor="end">{t}</text>"#,
                x = fmt(c.width - CARD_PADDING),
                y = fmt(y),
                t = escape_xml(badge),
            );
        }

        out.push_str(r#"<text class="card-title">"#);
        for (i, line) in c.title_lines.iter().enumerate() {
            let y = CARD_PADDING + small_lh + i as f64 * title_lh + title_lh * 0.8;
            let _ = write!(
                out,
                r#"<tspan x="{x}" y="{y}">{t}</tspan>"#,
                x = fmt(CARD_PADDING),
                y = fmt(y),
                t = escape_xml(line),
            );
        }
        out.push_str("</text>");

        let y = c.height - CARD_PADDING - small_lh * 0.2;
        let _ = write!(
            out,
            r#"<a class="pill-link" href="{href}"><text class="pill" x="{x}" y="{y}">{t}</text></a>"#,
            href = escape_attr(&c.href),
            x = fmt(CARD_PADDING),
            y = fmt(y),
            t = escape_xml(&c.pill),
        );
        out.push_str("</g>");
    }
}

impl RenderTarget for SvgTarget {
    fn mount_id(&self) -> &str {
        &self.mount_id
    }

    fn clear(&mut self) {
        self.scene = None;
    }

    fn materialize(&mut self, plan: &RenderPlan) -> Result<()> {
        let cards = plan
            .records
            .iter()
            .map(|r| self.build_card(r))
            .collect::<Vec<_>>();
        self.scene = Some(Scene {
            track_width: plan.track_width_px,
            line_y: plan.line_y,
            ticks: plan.month_ticks.clone(),
            cards,
            stems: HashMap::new(),
            committed: false,
        });
        Ok(())
    }

    fn commit(&mut self) -> Result<LayoutSnapshot> {
        let Some(scene) = self.scene.as_mut() else {
            return Err(Error::NotMaterialized);
        };
        scene.committed = true;
        Ok(LayoutSnapshot {
            axis_center_y: scene.line_y,
            cards: scene
                .cards
                .iter()
                .map(|c| MeasuredCard {
                    anchor: c.anchor.clone(),
                    lane: c.lane,
                    left: c.left,
                    right: c.left + c.width,
                    top: c.top,
                    bottom: c.bottom(),
                })
                .collect(),
        })
    }

    fn apply_stems(&mut self, stems: &[StemLength]) -> Result<()> {
        let Some(scene) = self.scene.as_mut() else {
            return Err(Error::NotMaterialized);
        };
        if !scene.committed {
            return Err(Error::NotCommitted);
        }
        for stem in stems {
            if !scene.cards.iter().any(|c| c.anchor == stem.record_id) {
                tracing::warn!(anchor = %stem.record_id, "stem for a card that was not rendered");
                continue;
            }
            scene.stems.insert(stem.record_id.clone(), stem.length_px);
        }
        Ok(())
    }
}

fn timeline_css(id: &str, font_size: f64) -> String {
    let id = escape_xml(id);
    let title = fmt(font_size);
    let small = fmt(font_size * SMALL_TEXT_SCALE);
    format!(
        "#{id} .axis{{stroke:#333;stroke-width:2px;}}\
#{id} .month-tick{{stroke:#999;stroke-width:1px;}}\
#{id} .month-label{{font-size:{small}px;fill:#555;}}\
#{id} .dot{{fill:#1f6feb;stroke:#fff;stroke-width:2px;}}\
#{id} .stem{{stroke:#1f6feb;stroke-width:1.5px;}}\
#{id} .card{{fill:#fff;stroke:#d0d7de;}}\
#{id} .card-heading{{font-weight:bold;font-size:{small}px;}}\
#{id} .card-title{{font-size:{title}px;}}\
#{id} .badge{{fill:#57606a;font-size:{small}px;}}\
#{id} .pill{{fill:#0969da;font-size:{small}px;}}"
    )
}

fn fmt(v: f64) -> String {
    if !v.is_finite() {
        return "0".to_string();
    }

    let mut v = if v.abs() < 1e-9 { 0.0 } else { v };
    let nearest = v.round();
    if (v - nearest).abs() < 1e-6 {
        v = nearest;
    }
    let s = format!("{}", (v * 1000.0).round() / 1000.0);
    if s == "-0" { "0".to_string() } else { s }
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn escape_attr(text: &str) -> String {
    escape_xml(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fmt_drops_float_noise() {
        assert_eq!(fmt(100.0000000001), "100");
        assert_eq!(fmt(-0.0), "0");
        assert_eq!(fmt(12.3456), "12.346");
        assert_eq!(fmt(f64::NAN), "0");
    }

    #[test]
    fn escape_xml_covers_markup_characters() {
        assert_eq!(
            escape_xml(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
    }
}
