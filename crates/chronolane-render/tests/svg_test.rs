use chronolane_core::{DateRange, Event, LayoutConfig, parse_iso_date};
use chronolane_render::text::DeterministicTextMeasurer;
use chronolane_render::{
    Error, Lane, LayoutOptions, RenderPlan, RenderTarget, SvgTarget, plan_timeline, render_into,
    render_svg,
};
use std::sync::Arc;

fn plan(titles: &[(&str, &str)]) -> RenderPlan {
    let events: Vec<Event> = titles
        .iter()
        .enumerate()
        .map(|(i, (date, title))| {
            Event::new(format!("{i}"), parse_iso_date(date).unwrap()).with_title(*title)
        })
        .collect();
    plan_timeline(
        &events,
        DateRange::parse("2026-01-01", "2026-01-03").unwrap(),
        &LayoutConfig::default(),
    )
    .unwrap()
}

fn consecutive() -> RenderPlan {
    plan(&[
        ("2026-01-01", "entry 1"),
        ("2026-01-02", "entry 2"),
        ("2026-01-03", "entry 3"),
    ])
}

#[test]
fn render_into_reconciles_against_committed_cards() {
    let cfg = LayoutConfig::default();
    let mut target = SvgTarget::new("timeline", cfg);
    let stems = render_into(&mut target, &consecutive(), cfg.stem_floor).unwrap();

    let lengths: Vec<u32> = stems.iter().map(|s| s.length_px).collect();
    // Bottom cards start 70px below the axis; 52px top cards end 128px above it.
    assert_eq!(lengths, [70, 128, 70]);
    assert_eq!(target.card_count(), 3);
    assert_eq!(target.stem("d-2026-01-02"), Some(128));
}

fn card_title(svg: &str, anchor: &str) -> Vec<String> {
    let doc = roxmltree::Document::parse(svg).unwrap();
    let card = doc
        .descendants()
        .find(|n| n.attribute("id") == Some(anchor))
        .unwrap();
    card.descendants()
        .filter(|n| n.has_tag_name("tspan"))
        .filter_map(|n| n.text().map(str::to_string))
        .collect()
}

#[test]
fn long_titles_are_clamped_to_the_fixed_card_height() {
    let cfg = LayoutConfig::default();
    let long = "a title long enough to wrap across several lines of the card";
    let p = plan(&[("2026-01-01", "x"), ("2026-01-02", long)]);

    let mut target = SvgTarget::new("timeline", cfg);
    let stems = render_into(&mut target, &p, cfg.stem_floor).unwrap();
    let lengths: Vec<u32> = stems.iter().map(|s| s.length_px).collect();
    assert_eq!(lengths, [70, 128]);

    let svg = target.to_svg().unwrap();
    let title = card_title(&svg, "d-2026-01-02");
    assert_eq!(title.len(), 1);
    assert!(title[0].ends_with('…'));

    let doc = roxmltree::Document::parse(&svg).unwrap();
    let heights: Vec<&str> = doc
        .descendants()
        .filter(|n| n.has_tag_name("rect") && n.attribute("class") == Some("card"))
        .filter_map(|n| n.attribute("height"))
        .collect();
    assert_eq!(heights, ["52", "52"]);
}

#[test]
fn crowded_year_cards_never_overlap_each_other_or_the_axis() {
    let cfg = LayoutConfig::default();
    let mut events = Vec::new();
    let mut day = parse_iso_date("2026-01-01").unwrap();
    for i in 0..120 {
        let title = if i % 3 == 0 {
            "a title long enough to wrap across several lines of the card"
        } else {
            "short"
        };
        events.push(Event::new(format!("e{i}"), day).with_title(title));
        if i % 4 == 0 {
            events.push(Event::new(format!("e{i}-b"), day).with_title("second"));
        }
        day = day.succ_opt().unwrap();
    }
    let range = DateRange::parse("2026-01-01", "2026-12-31").unwrap();
    let p = plan_timeline(&events, range, &cfg).unwrap();
    assert!(p.records.iter().any(|r| r.slot >= 5));

    let mut target = SvgTarget::new("timeline", cfg);
    let stems = render_into(&mut target, &p, cfg.stem_floor).unwrap();
    assert_eq!(stems.len(), 120);
    assert!(stems.iter().all(|s| s.length_px >= 12));

    let snapshot = target.commit().unwrap();
    let axis = snapshot.axis_center_y;
    for card in &snapshot.cards {
        assert!(card.bottom - card.top <= cfg.slot_step);
        match card.lane {
            Lane::Top => assert!(card.bottom < axis, "{} reaches the axis", card.anchor),
            Lane::Bottom => assert!(card.top > axis, "{} reaches the axis", card.anchor),
        }
    }
    for (i, a) in snapshot.cards.iter().enumerate() {
        for b in &snapshot.cards[i + 1..] {
            let overlap_x = a.left < b.right && b.left < a.right;
            let overlap_y = a.top < b.bottom && b.top < a.bottom;
            assert!(
                !(overlap_x && overlap_y),
                "{} overlaps {}",
                a.anchor,
                b.anchor
            );
        }
    }
}

#[test]
fn rerender_replaces_previous_output() {
    let cfg = LayoutConfig::default();
    let mut target = SvgTarget::new("timeline", cfg);
    render_into(&mut target, &consecutive(), cfg.stem_floor).unwrap();
    render_into(&mut target, &plan(&[("2026-01-02", "only")]), cfg.stem_floor).unwrap();
    assert_eq!(target.card_count(), 1);
    assert_eq!(target.stem("d-2026-01-01"), None);
}

#[test]
fn phases_must_run_in_order() {
    let cfg = LayoutConfig::default();
    let mut target = SvgTarget::new("timeline", cfg);
    assert!(matches!(target.commit(), Err(Error::NotMaterialized)));
    assert!(matches!(target.to_svg(), Err(Error::NotMaterialized)));

    target.materialize(&consecutive()).unwrap();
    assert!(matches!(target.apply_stems(&[]), Err(Error::NotCommitted)));
    assert!(matches!(target.to_svg(), Err(Error::NotCommitted)));

    let snapshot = target.commit().unwrap();
    assert_eq!(snapshot.axis_center_y, 250.0);
    assert_eq!(snapshot.cards.len(), 3);
    target.apply_stems(&[]).unwrap();
    assert!(target.to_svg().is_ok());
}

#[test]
fn svg_document_has_dots_cards_and_stems() {
    let cfg = LayoutConfig::default();
    let svg = render_svg(
        &plan(&[("2026-01-01", "Tom & Jerry <3"), ("2026-01-02", "entry 2")]),
        &cfg,
        "my-timeline",
        &LayoutOptions::default(),
    )
    .unwrap();

    let doc = roxmltree::Document::parse(&svg).unwrap();
    let root = doc.root_element();
    assert_eq!(root.attribute("id"), Some("my-timeline"));

    let count_class = |tag: &str, class: &str| {
        doc.descendants()
            .filter(|n| n.has_tag_name(tag) && n.attribute("class") == Some(class))
            .count()
    };
    assert_eq!(count_class("circle", "dot"), 2);
    assert_eq!(count_class("line", "stem"), 2);
    assert_eq!(count_class("g", "event bottom"), 1);
    assert_eq!(count_class("g", "event top"), 1);
    assert_eq!(count_class("line", "month-tick"), 1);

    let card = doc
        .descendants()
        .find(|n| n.attribute("id") == Some("d-2026-01-01"))
        .unwrap();
    assert_eq!(card.attribute("data-entry"), Some("e-0"));
    let title: String = card
        .descendants()
        .filter(|n| n.has_tag_name("tspan"))
        .filter_map(|n| n.text())
        .collect();
    assert_eq!(title, "Tom & Jerry <3");

    let href = card
        .descendants()
        .find(|n| n.has_tag_name("a"))
        .and_then(|n| n.attribute("href"));
    assert_eq!(href, Some("./highlights.html#d-2026-01-01"));
}

#[test]
fn card_geometry_does_not_depend_on_the_measurer() {
    let cfg = LayoutConfig::default();
    let wide = LayoutOptions {
        text_measurer: Arc::new(DeterministicTextMeasurer {
            char_width_factor: 3.0,
            line_height_factor: 0.0,
        }),
    };
    let mut narrow_target = SvgTarget::new("t", cfg);
    let mut wide_target = SvgTarget::with_measurer("t", cfg, wide.text_measurer.clone());
    let p = plan(&[("2026-01-01", "x"), ("2026-01-02", "several short words here")]);

    let narrow = render_into(&mut narrow_target, &p, cfg.stem_floor).unwrap();
    let wide_stems = render_into(&mut wide_target, &p, cfg.stem_floor).unwrap();
    assert_eq!(narrow, wide_stems);

    // 42px per column leaves five columns per line.
    let svg = render_svg(&p, &cfg, "t", &wide).unwrap();
    assert_eq!(card_title(&svg, "d-2026-01-02"), ["seve…"]);
}
