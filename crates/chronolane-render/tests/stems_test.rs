use chronolane_core::{DateRange, Event, LayoutConfig, parse_iso_date};
use chronolane_render::{
    Error, Lane, LayoutSnapshot, MeasuredCard, RenderPlan, plan_timeline, reconcile_stems,
};

fn two_card_plan() -> RenderPlan {
    let events = vec![
        Event::new("a", parse_iso_date("2026-01-01").unwrap()),
        Event::new("b", parse_iso_date("2026-01-03").unwrap()),
    ];
    plan_timeline(
        &events,
        DateRange::parse("2026-01-01", "2026-01-03").unwrap(),
        &LayoutConfig::default(),
    )
    .unwrap()
}

fn card(anchor: &str, lane: Lane, top: f64, bottom: f64) -> MeasuredCard {
    MeasuredCard {
        anchor: anchor.to_string(),
        lane,
        left: 0.0,
        right: 220.0,
        top,
        bottom,
    }
}

#[test]
fn stems_measure_to_the_axis_center() {
    let plan = two_card_plan();
    let snapshot = LayoutSnapshot {
        axis_center_y: 250.0,
        cards: vec![
            card("d-2026-01-01", Lane::Bottom, 320.0, 400.0),
            card("d-2026-01-03", Lane::Top, 70.0, 149.6),
        ],
    };
    let stems = reconcile_stems(&plan, &snapshot, 12.0).unwrap();
    let lengths: Vec<(&str, u32)> = stems
        .iter()
        .map(|s| (s.record_id.as_str(), s.length_px))
        .collect();
    assert_eq!(lengths, [("d-2026-01-01", 70), ("d-2026-01-03", 100)]);
}

#[test]
fn short_stems_are_raised_to_the_floor() {
    let plan = two_card_plan();
    let snapshot = LayoutSnapshot {
        axis_center_y: 250.0,
        cards: vec![
            card("d-2026-01-01", Lane::Bottom, 254.0, 330.0),
            card("d-2026-01-03", Lane::Top, 180.0, 250.0),
        ],
    };
    let stems = reconcile_stems(&plan, &snapshot, 12.0).unwrap();
    assert_eq!(stems[0].length_px, 12);
    assert_eq!(stems[1].length_px, 12);
}

#[test]
fn a_card_crossing_the_axis_is_an_error() {
    let plan = two_card_plan();
    let snapshot = LayoutSnapshot {
        axis_center_y: 250.0,
        cards: vec![
            card("d-2026-01-01", Lane::Bottom, 320.0, 372.0),
            card("d-2026-01-03", Lane::Top, 200.0, 262.0),
        ],
    };
    match reconcile_stems(&plan, &snapshot, 12.0).unwrap_err() {
        Error::CardCrossesAxis {
            anchor,
            lane,
            distance,
        } => {
            assert_eq!(anchor, "d-2026-01-03");
            assert_eq!(lane, Lane::Top);
            assert_eq!(distance, -12.0);
        }
        other => panic!("unexpected error: {other}"),
    }

    let snapshot = LayoutSnapshot {
        axis_center_y: 250.0,
        cards: vec![
            card("d-2026-01-01", Lane::Bottom, 249.5, 300.0),
            card("d-2026-01-03", Lane::Top, 70.0, 122.0),
        ],
    };
    assert!(matches!(
        reconcile_stems(&plan, &snapshot, 12.0),
        Err(Error::CardCrossesAxis { .. })
    ));
}

#[test]
fn missing_geometry_is_not_ready() {
    let plan = two_card_plan();
    let snapshot = LayoutSnapshot {
        axis_center_y: 250.0,
        cards: vec![card("d-2026-01-01", Lane::Bottom, 320.0, 400.0)],
    };
    let err = reconcile_stems(&plan, &snapshot, 12.0).unwrap_err();
    match err {
        Error::MeasurementNotReady { anchor } => assert_eq!(anchor, "d-2026-01-03"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn unmeasured_values_are_not_ready() {
    let plan = two_card_plan();
    let snapshot = LayoutSnapshot {
        axis_center_y: 250.0,
        cards: vec![
            card("d-2026-01-01", Lane::Bottom, f64::NAN, f64::NAN),
            card("d-2026-01-03", Lane::Top, 70.0, 150.0),
        ],
    };
    assert!(matches!(
        reconcile_stems(&plan, &snapshot, 12.0),
        Err(Error::MeasurementNotReady { .. })
    ));

    let no_axis = LayoutSnapshot {
        axis_center_y: f64::NAN,
        cards: Vec::new(),
    };
    assert!(reconcile_stems(&plan, &no_axis, 12.0).is_err());
}
