use chronolane_core::{Error, LayoutConfig, TimelineConfig};
use serde_json::json;

#[test]
fn empty_config_resolves_to_documented_defaults() {
    let cfg = LayoutConfig::from_config(&TimelineConfig::default()).unwrap();
    assert_eq!(cfg, LayoutConfig::default());
    assert_eq!(cfg.min_gap(), 220.0 + 18.0 + 20.0);
}

#[test]
fn overrides_accept_numbers_and_px_strings() {
    let config = TimelineConfig::from_value(json!({
        "pxPerDay": 5,
        "cardWidth": "180px",
        "slotStep": null
    }));
    let cfg = LayoutConfig::from_config(&config).unwrap();
    assert_eq!(cfg.px_per_day, 5.0);
    assert_eq!(cfg.card_width, 180.0);
    assert_eq!(cfg.slot_step, 56.0);
}

#[test]
fn invalid_values_are_rejected() {
    let config = TimelineConfig::from_value(json!({ "cardGap": -4 }));
    assert!(matches!(
        LayoutConfig::from_config(&config),
        Err(Error::InvalidConfig { .. })
    ));

    let config = TimelineConfig::from_value(json!({ "cardWidth": 0 }));
    assert!(LayoutConfig::from_config(&config).is_err());

    assert!(TimelineConfig::from_json_str("[1, 2]").is_err());
}

#[test]
fn deep_merge_layers_overrides_onto_a_base() {
    let mut config = TimelineConfig::from_value(json!({ "pxPerDay": 2, "cardGap": 10 }));
    config.deep_merge(&json!({ "cardGap": 30 }));
    config.set_value("padding", json!(40));
    let cfg = LayoutConfig::from_config(&config).unwrap();
    assert_eq!(cfg.px_per_day, 2.0);
    assert_eq!(cfg.card_gap, 30.0);
    assert_eq!(cfg.padding, 40.0);
    assert_eq!(config.as_value()["padding"], json!(40));
}

#[test]
fn card_height_must_fit_inside_one_slot_and_off_the_axis() {
    let cfg = LayoutConfig::from_config(&TimelineConfig::default()).unwrap();
    assert_eq!(cfg.card_height, 52.0);
    assert!(cfg.card_height <= cfg.slot_step);

    let config = TimelineConfig::from_value(json!({ "cardHeight": 80.4 }));
    assert!(matches!(
        LayoutConfig::from_config(&config),
        Err(Error::InvalidConfig { .. })
    ));

    let config = TimelineConfig::from_value(json!({ "cardHeight": 56, "topBaseOffset": 200 }));
    assert!(LayoutConfig::from_config(&config).is_err());

    let config = TimelineConfig::from_value(json!({ "bottomBaseOffset": 240 }));
    assert!(LayoutConfig::from_config(&config).is_err());

    let config = TimelineConfig::from_value(json!({ "cardHeight": 80, "slotStep": 90 }));
    assert_eq!(LayoutConfig::from_config(&config).unwrap().card_height, 80.0);
}
