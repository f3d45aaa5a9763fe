//! Integration tests for musictext-config file handling.

use musictext_config::{ConfigError, RenderConfig, ValidationError};
use std::fs;
use tempfile::TempDir;

#[test]
fn save_then_load_from_disk() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("config.toml");

    let config = RenderConfig::default()
        .with_sample_rate(48000)
        .with_tempo(100.0)
        .with_store_dir(dir.path().join("songs"));
    config.save(&path).unwrap();

    assert!(path.is_file());
    let loaded = RenderConfig::load(&path).unwrap();
    assert_eq!(loaded, config);
    assert_eq!(loaded.to_settings().beat_samples(), 28800);
}

#[test]
fn missing_file_is_a_read_error() {
    let dir = TempDir::new().unwrap();
    let err = RenderConfig::load(dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::ReadFile { .. }));
}

#[test]
fn load_or_default_tolerates_missing_file() {
    let dir = TempDir::new().unwrap();
    let config = RenderConfig::load_or_default(dir.path().join("absent.toml")).unwrap();
    assert_eq!(config, RenderConfig::default());
}

#[test]
fn load_or_default_still_reports_bad_toml() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "sample_rate = [").unwrap();
    let err = RenderConfig::load_or_default(&path).unwrap_err();
    assert!(matches!(err, ConfigError::TomlParse(_)));
}

#[test]
fn hand_written_file_validates() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(
        &path,
        "# slow and quiet\ntempo_bpm = 60.0\namplitude = 0.005\n",
    )
    .unwrap();

    let config = RenderConfig::load(&path).unwrap();
    config.validate().unwrap();
    let settings = config.to_settings();
    assert_eq!(settings.beat_samples(), 44100);
    assert_eq!(settings.amplitude, 0.005);
}

#[test]
fn validation_error_converts_into_config_error() {
    let config = RenderConfig::default().with_tempo(0.0);
    let err: ConfigError = config.validate().unwrap_err().into();
    match err {
        ConfigError::Validation(ValidationError::OutOfRange { param, .. }) => {
            assert_eq!(param, "tempo_bpm");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn save_reports_uncreatable_config_dir() {
    let dir = TempDir::new().unwrap();
    let blocker = dir.path().join("musictext");
    fs::write(&blocker, "not a directory").unwrap();

    let err = RenderConfig::default()
        .save(blocker.join("sub").join("config.toml"))
        .unwrap_err();
    assert!(matches!(err, ConfigError::CreateDir { .. }), "{err}");
}
