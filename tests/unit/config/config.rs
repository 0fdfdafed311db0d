use super::*;
use crate::record::Preset;

#[test]
fn missing_file_gives_defaults() {
    let cfg = AppConfig::load(Path::new("target/config-tests/does-not-exist.json")).unwrap();
    assert_eq!(cfg, AppConfig::default());
}

#[test]
fn partial_json_fills_defaults() {
    let cfg = AppConfig::from_json(
        r#"{ "font_size": 40, "theme": "sepia", "record": { "preset": "tiktok", "prefer_mp4": false } }"#,
    )
    .unwrap();
    assert_eq!(cfg.font_size, 40);
    assert_eq!(cfg.theme, Theme::Sepia);
    assert_eq!(cfg.record.preset, Preset::Tiktok);
    assert!(!cfg.record.prefer_mp4);
    assert_eq!(cfg.record.bitrate, RecordConfig::default().bitrate);
    assert_eq!(cfg.viewport_height, 540.0);
}

#[test]
fn out_of_range_values_are_rejected() {
    assert!(matches!(
        AppConfig::from_json(r#"{ "font_size": 8 }"#).unwrap_err(),
        ReelError::Validation(_)
    ));
    assert!(AppConfig::from_json(r#"{ "speed": 11.0 }"#).is_err());
    assert!(AppConfig::from_json(r#"{ "record": { "bitrate": 0 } }"#).is_err());
    assert!(matches!(
        AppConfig::from_json(r#"{ "colour": "red" }"#).unwrap_err(),
        ReelError::Serde(_)
    ));
}

#[test]
fn save_then_load() {
    let path = PathBuf::from("target/config-tests/saved.json");
    let cfg = AppConfig {
        speed: 2.5,
        font_path: Some(PathBuf::from("fonts/x.ttf")),
        ..AppConfig::default()
    };
    cfg.save(&path).unwrap();
    assert_eq!(AppConfig::load(&path).unwrap(), cfg);
}
