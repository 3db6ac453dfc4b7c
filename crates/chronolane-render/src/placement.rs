use crate::lanes::LaneAllocator;
use crate::model::{CardContent, Lane, PlacementRecord, RenderPlan};
use crate::Result;
use chronolane_core::date::format_iso_date;
use chronolane_core::{
    AxisModel, DateRange, DayGroup, Event, LayoutConfig, day_anchor, filter_to_range,
    group_by_date,
};

/// Card top edge for a slot. Top-lane slots stack upward, bottom-lane slots downward.
pub fn slot_y(lane: Lane, slot: usize, cfg: &LayoutConfig) -> f64 {
    let offset = slot as f64 * cfg.slot_step;
    match lane {
        Lane::Top => cfg.top_base_offset - offset,
        Lane::Bottom => cfg.bottom_base_offset + offset,
    }
}

fn card_href(primary: &Event) -> String {
    if primary.section.is_highlights() {
        format!("./highlights.html#{}", day_anchor(primary.date))
    } else {
        format!("./{}.html#{}", primary.section.as_str(), primary.anchor())
    }
}

fn card_content(group: &DayGroup, primary: &Event) -> CardContent {
    let extra_count = group.extra_count();
    CardContent {
        heading: format_iso_date(group.day),
        title: primary.title.clone(),
        primary_id: primary.id.clone(),
        primary_anchor: primary.anchor(),
        extra_count,
        badge: (extra_count > 0).then(|| format!("+{extra_count}")),
        pill: primary.pill_text(),
        href: card_href(primary),
    }
}

/// Builds the placement plan for `events` over `range`: one record per distinct day, alternating
/// sides starting at the bottom, slots packed per lane.
///
/// Pure function of its inputs; re-running on the same data yields identical records.
pub fn plan_timeline(events: &[Event], range: DateRange, cfg: &LayoutConfig) -> Result<RenderPlan> {
    cfg.validate()?;
    let axis = AxisModel::from_config(range, cfg);
    let month_ticks = axis.month_ticks().collect::<Vec<_>>();

    let in_range = filter_to_range(events, &range);
    let groups = group_by_date(&in_range);

    let mut lanes = LaneAllocator::new(cfg.min_gap());
    let mut lane = Lane::Bottom;
    let mut records: Vec<PlacementRecord> = Vec::with_capacity(groups.len());

    for group in groups.iter() {
        let Some(primary) = group.primary() else {
            continue;
        };
        let x_px = axis.day_to_x(group.day);
        let slot = lanes.allocate(lane, x_px)?;

        records.push(PlacementRecord {
            day: group.day,
            anchor: day_anchor(group.day),
            x_px,
            lane,
            slot,
            y_px: slot_y(lane, slot, cfg),
            card: card_content(group, primary),
        });
        lane = lane.flipped();
    }

    tracing::debug!(
        range = %range,
        events = in_range.len(),
        cards = records.len(),
        top_slots = lanes.lane(Lane::Top).slot_count(),
        bottom_slots = lanes.lane(Lane::Bottom).slot_count(),
        "planned timeline"
    );

    Ok(RenderPlan {
        track_width_px: axis.track_width_px(),
        line_y: cfg.line_y,
        axis,
        month_ticks,
        records,
        duplicate_ids: RenderPlan::duplicate_id_list(groups.duplicates()),
    })
}
