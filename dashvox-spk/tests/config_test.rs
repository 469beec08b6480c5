//! Tests for loading narration configuration from files and the environment

use dashvox_spk::config::{API_KEY_ENV, ENDPOINT_ENV, VOICE_ENV};
use dashvox_spk::{NarrationConfig, NarrationCoordinator, SpeechError};
use std::io::Write;
use tokio_test::assert_ok;

fn write_config(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_from_file_overrides_defaults() {
    let file = write_config(
        r#"
default_voice = "Rachel"

[cloud]
api_key = "file_key"
model_id = "eleven_turbo_v2"
timeout_secs = 10

[cloud.voice_settings]
stability = 0.7
speed = 1.1

[local]
language = "en-US"
rate = 1.2

[timing]
pause_min_ms = 2500
pause_max_ms = 3000
"#,
    );

    let config = assert_ok!(NarrationConfig::from_file(file.path()));
    assert_eq!(config.default_voice, "Rachel");
    assert_eq!(config.cloud.credential(), Some("file_key"));
    assert_eq!(config.cloud.model_id, "eleven_turbo_v2");
    assert_eq!(config.cloud.timeout_secs, 10);
    assert_eq!(config.cloud.voice_settings.stability, 0.7);
    assert_eq!(config.cloud.voice_settings.similarity_boost, 0.5);
    assert_eq!(config.cloud.voice_settings.speed, Some(1.1));
    assert_eq!(config.local.language, "en-US");
    assert_eq!(config.timing.pause_max_ms, 3000);
    assert_eq!(config.timing.reveal_min_ms, 1000);
    assert_ok!(config.validate());
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = NarrationConfig::from_file(dir.path().join("absent.toml"));
    assert!(matches!(result, Err(SpeechError::Io(_))));
}

#[test]
fn test_coordinator_rejects_invalid_config() {
    let file = write_config(
        r#"
[timing]
reveal_min_ms = 3000
reveal_max_ms = 1000
"#,
    );
    let config = assert_ok!(NarrationConfig::from_file(file.path()));
    let result = NarrationCoordinator::from_config(&config);
    assert!(matches!(result, Err(SpeechError::Config(_))));

    let mut config = NarrationConfig::default();
    config.local.volume = 3.0;
    assert!(NarrationCoordinator::from_config(&config).is_err());
}

#[test]
fn test_windows_outside_narration_bounds_are_rejected() {
    let file = write_config(
        r#"
[timing]
pause_min_ms = 0
pause_max_ms = 0
reveal_min_ms = 0
reveal_max_ms = 0
"#,
    );
    let config = assert_ok!(NarrationConfig::from_file(file.path()));
    assert!(config.validate().is_err());
    assert!(matches!(
        NarrationCoordinator::from_config(&config),
        Err(SpeechError::Config(_))
    ));

    let file = write_config(
        r#"
[timing]
pause_min_ms = 500
pause_max_ms = 800
"#,
    );
    let config = assert_ok!(NarrationConfig::from_file(file.path()));
    assert!(config.validate().is_err());
}

#[test]
fn test_coordinator_from_default_config() {
    let config = NarrationConfig::default();
    let coordinator = assert_ok!(NarrationCoordinator::from_config(&config));
    assert_eq!(coordinator.default_voice(), "Adam");
    assert!(coordinator.backend().name().starts_with("ElevenLabs TTS -> "));
}

// The only test in this binary that touches the process environment.
#[test]
fn test_environment_takes_precedence() {
    std::env::set_var(API_KEY_ENV, "env_key");
    std::env::set_var(ENDPOINT_ENV, "http://127.0.0.1:8080");
    std::env::set_var(VOICE_ENV, "Josh");

    let mut config = NarrationConfig::default();
    config.cloud.api_key = Some("file_key".to_string());
    config.apply_env();
    assert_eq!(config.cloud.credential(), Some("env_key"));
    assert_eq!(config.cloud.endpoint, "http://127.0.0.1:8080");
    assert_eq!(config.default_voice, "Josh");

    std::env::set_var(ENDPOINT_ENV, "  ");
    std::env::remove_var(VOICE_ENV);
    let config = NarrationConfig::from_env();
    assert_eq!(config.cloud.endpoint, "https://api.elevenlabs.io");
    assert_eq!(config.default_voice, "Adam");

    std::env::remove_var(API_KEY_ENV);
    std::env::remove_var(ENDPOINT_ENV);
}
