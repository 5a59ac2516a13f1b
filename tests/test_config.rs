use boardscan::{AnalysisConfig, BrandConfig, ConfigError, QualityThresholds};

#[test]
fn defaults_match_documented_thresholds() {
    let t = QualityThresholds::default();
    assert_eq!((t.min_width, t.min_height), (800, 600));
    assert_eq!((t.min_file_size, t.max_file_size), (50_000, 10_000_000));
    assert_eq!((t.min_brightness, t.max_brightness), (30.0, 220.0));
    assert_eq!(t.min_sharpness, 0.3);

    let config = AnalysisConfig::default();
    assert_eq!(config.detection.min_board_area, 0.05);
    assert_eq!(config.detection.max_board_area, 0.80);
    assert_eq!(config.detection.edge_threshold, 100.0);
    assert_eq!(config.detection.contour_min_area, 1000);
    assert!(config.validate().is_ok());
}

#[test]
fn partial_json_keeps_remaining_defaults() -> anyhow::Result<()> {
    let config = AnalysisConfig::from_json_str(r#"{"thresholds": {"minWidth": 640}, "detection": {"edgeThreshold": 80}}"#)?;

    assert_eq!(config.thresholds.min_width, 640);
    assert_eq!(config.thresholds.min_height, 600);
    assert_eq!(config.detection.edge_threshold, 80.0);
    assert_eq!(config.fallback.quantization_step, 32);
    assert_eq!(config.sharpness_working_size.width, 400);
    Ok(())
}

#[test]
fn inverted_board_ratio_band_is_rejected() {
    let err = AnalysisConfig::from_json_str(r#"{"detection": {"minBoardArea": 0.9, "maxBoardArea": 0.5}}"#).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
}

#[test]
fn inverted_file_size_bounds_are_rejected() {
    let err = AnalysisConfig::from_json_str(r#"{"thresholds": {"minFileSize": 10, "maxFileSize": 5}}"#).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
}

#[test]
fn zero_quantization_step_is_rejected() {
    let err = AnalysisConfig::from_json_str(r#"{"fallback": {"quantizationStep": 0}}"#).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
}

#[test]
fn malformed_json_is_a_parse_error() {
    let err = AnalysisConfig::from_json_str("{not json").unwrap_err();
    assert!(matches!(err, ConfigError::Json(_)));
}

#[test]
fn brand_config_uses_camel_case() -> anyhow::Result<()> {
    let brand: BrandConfig = serde_json::from_str(r##"{"logoRequired": true, "requiredColors": ["#ffcc00"]}"##)?;
    assert!(brand.logo_required);
    assert_eq!(brand.required_colors, vec!["#ffcc00".to_string()]);

    let empty: BrandConfig = serde_json::from_str("{}")?;
    assert_eq!(empty, BrandConfig::default());
    Ok(())
}
