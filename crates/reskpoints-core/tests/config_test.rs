use reskpoints_core::config::*;
use reskpoints_core::constants::MAX_DURATION_SECS;

#[test]
fn config_loads_from_empty_toml_with_all_defaults() {
    let config = ReskConfig::from_toml("").unwrap();

    assert_eq!(config.correlation.window_secs, 900);
    assert_eq!(config.correlation.adjacent_affinity, 0.4);
    assert_eq!(config.correlation.same_component_affinity, 1.0);
    assert_eq!(config.correlation.redundancy_cutoff, 0.95);

    assert_eq!(config.scoring.temporal_weight, 0.4);
    assert_eq!(config.scoring.affinity_weight, 0.4);
    assert_eq!(config.scoring.history_weight, 0.2);
    assert_eq!(config.scoring.history_saturation, 10);
    assert_eq!(config.scoring.materialization_threshold, 0.3);

    assert_eq!(config.analysis.decay_factor, 0.7);
    assert_eq!(config.analysis.min_impact, 0.05);
    assert_eq!(config.analysis.max_backward_depth, 5);
    assert!(config.analysis.deadline_ms.is_none());
    assert!(config.analysis.prefer_origins);

    assert_eq!(config.retention.horizon_secs, 86_400);
    assert_eq!(config.observability.log_level, "info");
    assert!(config.dependencies.is_empty());
}

#[test]
fn config_loads_partial_toml_with_overrides() {
    let toml = r#"
[correlation]
window_secs = 600

[analysis]
decay_factor = 0.5
deadline_ms = 250

[dependencies]
api = ["db", "cache"]
"#;
    let config = ReskConfig::from_toml(toml).unwrap();
    assert_eq!(config.correlation.window_secs, 600);
    assert_eq!(config.correlation.window(), chrono::Duration::seconds(600));
    // Non-overridden fields keep defaults
    assert_eq!(config.correlation.adjacent_affinity, 0.4);
    assert_eq!(config.analysis.decay_factor, 0.5);
    assert_eq!(config.analysis.deadline_ms, Some(250));
    assert_eq!(config.analysis.min_impact, 0.05);
    assert_eq!(
        config.dependencies.get("api"),
        Some(&vec!["db".to_string(), "cache".to_string()])
    );
}

#[test]
fn config_rejects_out_of_range_weight() {
    let err = ReskConfig::from_toml("[scoring]\ntemporal_weight = 1.5\n").unwrap_err();
    assert!(err.to_string().contains("scoring.temporal_weight"));
}

#[test]
fn config_rejects_zero_window() {
    assert!(ReskConfig::from_toml("[correlation]\nwindow_secs = 0\n").is_err());
}

#[test]
fn config_rejects_durations_beyond_the_bound() {
    let err = ReskConfig::from_toml("[correlation]\nwindow_secs = 10000000000000\n").unwrap_err();
    assert!(err.to_string().contains("correlation.window_secs"));
    let err = ReskConfig::from_toml("[retention]\nhorizon_secs = 9000000000000000000\n").unwrap_err();
    assert!(err.to_string().contains("retention.horizon_secs"));

    let limit = format!("[correlation]\nwindow_secs = {MAX_DURATION_SECS}\n");
    assert!(ReskConfig::from_toml(&limit).is_ok());
}

#[test]
fn unvalidated_durations_saturate_instead_of_wrapping() {
    let mut config = ReskConfig::default();
    config.correlation.window_secs = u64::MAX;
    config.retention.horizon_secs = 10_000_000_000_000_000;
    assert_eq!(config.correlation.window(), chrono::Duration::MAX);
    assert_eq!(config.retention.horizon(), chrono::Duration::MAX);
    assert!(config.validate().is_err());
}

#[test]
fn config_rejects_excessive_depth() {
    assert!(ReskConfig::from_toml("[analysis]\nmax_backward_depth = 1000\n").is_err());
}

#[test]
fn config_rejects_malformed_toml() {
    let err = ReskConfig::from_toml("[correlation\nwindow_secs = ").unwrap_err();
    assert!(matches!(err, reskpoints_core::ReskError::ConfigError(_)));
}

#[test]
fn config_serde_roundtrip() {
    let mut config = ReskConfig::default();
    config
        .dependencies
        .insert("api".into(), vec!["db".into()]);
    let toml_str = toml::to_string(&config).unwrap();
    let roundtripped = ReskConfig::from_toml(&toml_str).unwrap();
    assert_eq!(roundtripped.correlation.window_secs, config.correlation.window_secs);
    assert_eq!(roundtripped.dependencies, config.dependencies);
}
