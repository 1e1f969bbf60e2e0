use cems_chart::api::{ControllerConfig, HistoricalRange};

#[test]
fn empty_json_yields_defaults() {
    let config = ControllerConfig::from_json_str("{}").expect("defaults");
    assert_eq!(config, ControllerConfig::default());
    assert_eq!(config.live_window_ms, 300_000);
    assert_eq!(config.buffer.min_step_ms, 5_000);
}

#[test]
fn partial_json_overrides_only_named_fields() {
    let config = ControllerConfig::from_json_str(
        r#"{"live_window_ms": 600000, "stack_id": "stack-2", "buffer": {"min_step_ms": 1000}}"#,
    )
    .expect("config");

    assert_eq!(config.live_window_ms, 600_000);
    assert_eq!(config.stack_id.as_deref(), Some("stack-2"));
    assert_eq!(config.buffer.min_step_ms, 1_000);
    assert_eq!(config.buffer.hard_cap, 10_000);
}

#[test]
fn window_outside_presets_is_rejected() {
    assert!(ControllerConfig::from_json_str(r#"{"live_window_ms": 1234}"#).is_err());
    assert!(ControllerConfig::from_json_str(r#"{"live_window_presets_ms": []}"#).is_err());
    assert!(ControllerConfig::from_json_str(r#"{"historical_limit": 0}"#).is_err());
}

#[test]
fn config_survives_json_round_trip() {
    let config = ControllerConfig {
        utc_offset_minutes: 420,
        ..ControllerConfig::default()
    };
    let json = config.to_json_string_pretty().expect("serialize");
    assert_eq!(ControllerConfig::from_json_str(&json).expect("parse"), config);
}

#[test]
fn capacities_scale_with_window() {
    let config = ControllerConfig::default();

    assert_eq!(config.live_prune_capacity(120_000), 44);
    assert_eq!(config.live_prune_capacity(1_200_000), 260);
    assert_eq!(config.render_capacity(300_000), 120);
    assert_eq!(config.render_capacity(1_200_000), 140);
}

#[test]
fn historical_ranges_use_short_wire_names() {
    let encoded = serde_json::to_string(&HistoricalRange::FiveDays).expect("encode");
    assert_eq!(encoded, r#""5d""#);

    let decoded: HistoricalRange = serde_json::from_str(r#""6m""#).expect("decode");
    assert_eq!(decoded, HistoricalRange::SixMonths);

    let (start, end) = HistoricalRange::OneDay.bounds(100_000_000);
    assert_eq!(end - start, 86_400_000);
}
