//! Configuration for narration

use crate::error::SpeechError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable holding the cloud TTS credential
pub const API_KEY_ENV: &str = "ELEVENLABS_API_KEY";

/// Environment variable overriding the cloud TTS endpoint
pub const ENDPOINT_ENV: &str = "DASHVOX_ELEVENLABS_ENDPOINT";

/// Environment variable overriding the default voice
pub const VOICE_ENV: &str = "DASHVOX_VOICE";

/// Credential value shipped in sample env files; treated as absent
pub const PLACEHOLDER_API_KEY: &str = "your_elevenlabs_api_key_here";

/// Narration configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NarrationConfig {
    /// Cloud TTS provider settings
    pub cloud: CloudConfig,

    /// On-device speech settings
    pub local: LocalConfig,

    /// Audio output for cloud payloads
    pub player: PlayerConfig,

    /// Pause and reveal windows
    pub timing: TimingConfig,

    /// Voice used when a request does not name one (friendly name or provider id)
    pub default_voice: String,
}

/// Cloud TTS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CloudConfig {
    /// Provider base URL
    pub endpoint: String,

    /// API key (can be set via environment)
    pub api_key: Option<String>,

    /// Provider model identifier
    pub model_id: String,

    pub voice_settings: VoiceSettings,

    /// Optional emotion hint forwarded to the provider
    pub emotion: Option<String>,

    /// Optional sampling seed forwarded to the provider
    pub seed: Option<u32>,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

/// Provider voice settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VoiceSettings {
    pub stability: f32,
    pub similarity_boost: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_speaker_boost: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed: Option<f32>,
}

/// On-device speech configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalConfig {
    /// Rate multiplier (0.1-10.0, default 1.0)
    pub rate: f32,

    /// Pitch multiplier (0.0-2.0, default 1.0)
    pub pitch: f32,

    /// Volume (0.0-1.0, default 1.0)
    pub volume: f32,

    /// Language tag (e.g., "en-IN", "en-US")
    pub language: String,

    /// Engine-specific voice name; platform default when unset
    pub voice: Option<String>,

    /// Explicit synthesizer executable
    pub program: Option<PathBuf>,
}

/// Audio player configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Explicit player executable; auto-detected when unset
    pub program: Option<PathBuf>,
}

/// Delay windows, in milliseconds (inclusive)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub pause_min_ms: u64,
    pub pause_max_ms: u64,
    pub reveal_min_ms: u64,
    pub reveal_max_ms: u64,
}

impl Default for NarrationConfig {
    fn default() -> Self {
        Self {
            cloud: CloudConfig::default(),
            local: LocalConfig::default(),
            player: PlayerConfig::default(),
            timing: TimingConfig::default(),
            default_voice: crate::voices::DEFAULT_VOICE.to_string(),
        }
    }
}

impl Default for CloudConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.elevenlabs.io".to_string(),
            api_key: None,
            model_id: "eleven_multilingual_v2".to_string(),
            voice_settings: VoiceSettings::default(),
            emotion: None,
            seed: None,
            timeout_secs: 30,
        }
    }
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            stability: 0.5,
            similarity_boost: 0.5,
            style: Some(0.0),
            use_speaker_boost: Some(true),
            speed: None,
        }
    }
}

impl Default for LocalConfig {
    fn default() -> Self {
        Self {
            rate: 1.0,
            pitch: 1.0,
            volume: 1.0,
            language: "en-IN".to_string(),
            voice: None,
            program: None,
        }
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            pause_min_ms: 2000,
            pause_max_ms: 4000,
            reveal_min_ms: 1000,
            reveal_max_ms: 2000,
        }
    }
}

impl CloudConfig {
    /// Usable credential, if any. Blank and placeholder keys count as absent.
    pub fn credential(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty() && *key != PLACEHOLDER_API_KEY)
    }

    /// Validate cloud configuration
    pub fn validate(&self) -> Result<(), String> {
        let url = url::Url::parse(&self.endpoint)
            .map_err(|e| format!("Invalid endpoint URL '{}': {}", self.endpoint, e))?;
        match url.scheme() {
            "http" | "https" => {}
            scheme => return Err(format!("Unsupported endpoint scheme: {}", scheme)),
        }

        if self.model_id.trim().is_empty() {
            return Err("Model id cannot be empty".to_string());
        }

        if self.timeout_secs == 0 || self.timeout_secs > 300 {
            return Err("API timeout must be between 1 and 300 seconds".to_string());
        }

        self.voice_settings.validate()
    }
}

impl VoiceSettings {
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.stability) {
            return Err("Stability must be between 0.0 and 1.0".to_string());
        }
        if !(0.0..=1.0).contains(&self.similarity_boost) {
            return Err("Similarity boost must be between 0.0 and 1.0".to_string());
        }
        if let Some(style) = self.style {
            if !(0.0..=1.0).contains(&style) {
                return Err("Style must be between 0.0 and 1.0".to_string());
            }
        }
        if let Some(speed) = self.speed {
            if !(0.7..=1.2).contains(&speed) {
                return Err("Speed must be between 0.7 and 1.2".to_string());
            }
        }
        Ok(())
    }
}

impl LocalConfig {
    pub fn validate(&self) -> Result<(), String> {
        if !(0.1..=10.0).contains(&self.rate) {
            return Err("Local rate must be between 0.1 and 10.0".to_string());
        }
        if !(0.0..=2.0).contains(&self.pitch) {
            return Err("Local pitch must be between 0.0 and 2.0".to_string());
        }
        if !(0.0..=1.0).contains(&self.volume) {
            return Err("Local volume must be between 0.0 and 1.0".to_string());
        }

        if self.language.is_empty() || self.language.len() > 32 {
            return Err("Language tag must be 1-32 characters".to_string());
        }
        if !self.language.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return Err("Language tag contains invalid characters (only alphanumeric and '-' allowed)".to_string());
        }

        if let Some(ref voice) = self.voice {
            if voice.is_empty() || voice.len() > 256 {
                return Err("Local voice name must be 1-256 characters".to_string());
            }
            if voice.chars().any(|c| c.is_control()) {
                return Err("Local voice name contains invalid characters".to_string());
            }
        }

        Ok(())
    }
}

impl TimingConfig {
    /// Outermost pause window; configured windows may only narrow it
    pub const PAUSE_BOUNDS_MS: (u64, u64) = (2000, 4000);

    /// Outermost reveal window; configured windows may only narrow it
    pub const REVEAL_BOUNDS_MS: (u64, u64) = (1000, 2000);

    pub fn validate(&self) -> Result<(), String> {
        check_window("pause", self.pause_min_ms, self.pause_max_ms, Self::PAUSE_BOUNDS_MS)?;
        check_window("reveal", self.reveal_min_ms, self.reveal_max_ms, Self::REVEAL_BOUNDS_MS)
    }
}

fn check_window(name: &str, min: u64, max: u64, (lo, hi): (u64, u64)) -> Result<(), String> {
    if min > max {
        return Err(format!("{}_min_ms cannot be greater than {}_max_ms", name, name));
    }
    if min < lo || max > hi {
        return Err(format!(
            "{} window {}-{} ms must lie within {}-{} ms",
            name, min, max, lo, hi
        ));
    }
    Ok(())
}

impl NarrationConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.default_voice.trim().is_empty() {
            return Err("Default voice cannot be empty".to_string());
        }
        self.cloud.validate()?;
        self.local.validate()?;
        self.timing.validate()
    }

    /// Parse configuration from TOML
    pub fn from_toml_str(content: &str) -> Result<Self, SpeechError> {
        toml::from_str(content).map_err(|e| SpeechError::Config(format!("Invalid TOML: {}", e)))
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SpeechError> {
        let path = path.as_ref();
        debug!("Loading narration config from {}", path.display());
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Defaults overlaid with environment variables
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    /// Overlay environment variables (environment takes precedence)
    pub fn apply_env(&mut self) {
        if let Ok(key) = std::env::var(API_KEY_ENV) {
            self.cloud.api_key = Some(key);
        }

        if let Ok(endpoint) = std::env::var(ENDPOINT_ENV) {
            if !endpoint.trim().is_empty() {
                self.cloud.endpoint = endpoint;
            }
        }

        if let Ok(voice) = std::env::var(VOICE_ENV) {
            if !voice.trim().is_empty() {
                self.default_voice = voice;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = NarrationConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.timing.pause_min_ms, 2000);
        assert_eq!(config.timing.pause_max_ms, 4000);
        assert_eq!(config.timing.reveal_min_ms, 1000);
        assert_eq!(config.timing.reveal_max_ms, 2000);
        assert_eq!(config.local.language, "en-IN");
    }

    #[test]
    fn test_placeholder_credential_is_absent() {
        let mut cloud = CloudConfig::default();
        assert!(cloud.credential().is_none());

        cloud.api_key = Some(PLACEHOLDER_API_KEY.to_string());
        assert!(cloud.credential().is_none());

        cloud.api_key = Some("   ".to_string());
        assert!(cloud.credential().is_none());

        cloud.api_key = Some("sk_live".to_string());
        assert_eq!(cloud.credential(), Some("sk_live"));
    }

    #[test]
    fn test_invalid_windows_rejected() {
        let mut config = NarrationConfig::default();
        config.timing.pause_min_ms = 5000;
        assert!(config.validate().is_err());

        let mut config = NarrationConfig::default();
        config.timing.reveal_max_ms = 500;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_windows_may_only_narrow() {
        let mut timing = TimingConfig::default();
        timing.pause_min_ms = 2500;
        timing.pause_max_ms = 3000;
        timing.reveal_min_ms = 1500;
        timing.reveal_max_ms = 1500;
        assert!(timing.validate().is_ok());

        let zeroed = TimingConfig {
            pause_min_ms: 0,
            pause_max_ms: 0,
            reveal_min_ms: 0,
            reveal_max_ms: 0,
        };
        assert!(zeroed.validate().is_err());

        let mut timing = TimingConfig::default();
        timing.pause_max_ms = 4001;
        assert!(timing.validate().is_err());

        let mut timing = TimingConfig::default();
        timing.reveal_min_ms = 999;
        assert!(timing.validate().is_err());
    }

    #[test]
    fn test_invalid_endpoint_rejected() {
        let mut config = NarrationConfig::default();
        config.cloud.endpoint = "ftp://api.example.com".to_string();
        assert!(config.validate().is_err());

        config.cloud.endpoint = "not a url".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_voice_settings_ranges() {
        let mut settings = VoiceSettings::default();
        settings.speed = Some(2.0);
        assert!(settings.validate().is_err());

        settings.speed = Some(1.1);
        settings.stability = 1.5;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = NarrationConfig::from_toml_str(
            r#"
            default_voice = "Bella"

            [cloud]
            model_id = "eleven_turbo_v2"

            [timing]
            pause_min_ms = 3000
            pause_max_ms = 3000
            "#,
        )
        .unwrap();

        assert_eq!(config.default_voice, "Bella");
        assert_eq!(config.cloud.model_id, "eleven_turbo_v2");
        assert_eq!(config.cloud.endpoint, "https://api.elevenlabs.io");
        assert_eq!(config.timing.pause_max_ms, 3000);
        assert_eq!(config.timing.reveal_max_ms, 2000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_fixed_short_pause_is_rejected() {
        let config = NarrationConfig::from_toml_str(
            r#"
            [timing]
            pause_min_ms = 800
            pause_max_ms = 800
            "#,
        )
        .unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.contains("pause window"), "{}", err);
    }

    #[test]
    fn test_malformed_toml_is_config_error() {
        let result = NarrationConfig::from_toml_str("[cloud\nendpoint = ");
        assert!(matches!(result, Err(SpeechError::Config(_))));
    }
}
