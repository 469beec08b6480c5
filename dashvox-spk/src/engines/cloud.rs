//! Cloud text-to-speech backend (ElevenLabs REST API)

use crate::config::{CloudConfig, VoiceSettings};
use crate::engines::SpeechBackend;
use crate::error::SpeechError;
use crate::playback::{looks_like_mpeg, AudioPlayer};
use crate::utterance::{Utterance, MAX_TEXT_CHARS};
use crate::voices;
use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

/// Request body of `POST /v1/text-to-speech/{voice_id}`
#[derive(Debug, Serialize)]
pub struct TextToSpeechRequest<'a> {
    pub text: &'a str,
    pub model_id: &'a str,
    pub voice_settings: &'a VoiceSettings,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emotion: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u32>,
}

/// A voice as listed by `GET /v1/voices`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProviderVoice {
    pub voice_id: String,
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub labels: HashMap<String, String>,
}

#[derive(Deserialize)]
struct VoicesResponse {
    voices: Vec<ProviderVoice>,
}

/// Speaks by fetching mpeg audio from the provider and playing it locally.
pub struct CloudSpeechBackend {
    client: Client,
    config: CloudConfig,
    player: Arc<dyn AudioPlayer>,
}

impl CloudSpeechBackend {
    pub fn new(config: CloudConfig, player: Arc<dyn AudioPlayer>) -> Result<Self, SpeechError> {
        config.validate().map_err(SpeechError::Config)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SpeechError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config, player })
    }

    /// `{endpoint}/v1/text-to-speech/{voice_id}`, with the voice id escaped as a path segment
    pub fn speech_url(&self, voice: &str) -> Result<Url, SpeechError> {
        self.api_url(&["v1", "text-to-speech", voices::resolve_voice_id(voice)])
    }

    fn api_url(&self, segments: &[&str]) -> Result<Url, SpeechError> {
        let mut url = Url::parse(&self.config.endpoint)
            .map_err(|e| SpeechError::Config(format!("Invalid endpoint URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| SpeechError::Config("Endpoint URL cannot be a base".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Voices available to the configured account.
    pub async fn list_voices(&self) -> Result<Vec<ProviderVoice>, SpeechError> {
        let api_key = self.config.credential().ok_or(SpeechError::CredentialMissing)?;
        let url = self.api_url(&["v1", "voices"])?;
        debug!("Listing voices from {}", url);

        let response = self
            .client
            .get(url)
            .header("xi-api-key", api_key)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| SpeechError::Transport(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
            return Err(SpeechError::Provider {
                status: status.as_u16(),
                message,
            });
        }

        let listing: VoicesResponse = response
            .json()
            .await
            .map_err(|e| SpeechError::Transport(format!("Invalid voice listing: {}", e)))?;
        info!("Provider lists {} voices", listing.voices.len());
        Ok(listing.voices)
    }

    pub fn request_body<'a>(&'a self, text: &'a str) -> TextToSpeechRequest<'a> {
        TextToSpeechRequest {
            text,
            model_id: &self.config.model_id,
            voice_settings: &self.config.voice_settings,
            emotion: self.config.emotion.as_deref(),
            seed: self.config.seed,
        }
    }

    async fn fetch_audio(&self, api_key: &str, utterance: &Utterance) -> Result<bytes::Bytes, SpeechError> {
        let url = self.speech_url(&utterance.voice)?;
        debug!("Requesting speech from {}", url);

        let response = self
            .client
            .post(url)
            .header("xi-api-key", api_key)
            .header(ACCEPT, "audio/mpeg")
            .header(CONTENT_TYPE, "application/json")
            .json(&self.request_body(&utterance.text))
            .send()
            .await
            .map_err(|e| SpeechError::Transport(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
            return Err(SpeechError::Provider {
                status: status.as_u16(),
                message,
            });
        }

        let audio = response
            .bytes()
            .await
            .map_err(|e| SpeechError::Transport(format!("Failed to read audio response: {}", e)))?;

        if !looks_like_mpeg(&audio) {
            return Err(SpeechError::Transport(format!(
                "Response is not mpeg audio ({} bytes)",
                audio.len()
            )));
        }

        Ok(audio)
    }
}

#[async_trait]
impl SpeechBackend for CloudSpeechBackend {
    async fn speak(&self, utterance: &Utterance) -> Result<(), SpeechError> {
        let api_key = self.config.credential().ok_or(SpeechError::CredentialMissing)?;

        let chars = utterance.char_count();
        if utterance.text.trim().is_empty() || chars > MAX_TEXT_CHARS {
            return Err(SpeechError::InvalidInput(format!(
                "Cloud TTS accepts 1-{} characters, got {}",
                MAX_TEXT_CHARS, chars
            )));
        }

        let audio = self.fetch_audio(api_key, utterance).await.map_err(|e| {
            warn!("Cloud TTS failed for '{}': {}", utterance.preview(), e);
            e
        })?;

        info!("Cloud TTS returned {} bytes for '{}'", audio.len(), utterance.preview());
        self.player.play(audio).await
    }

    fn stop(&self) {
        self.player.stop();
    }

    fn is_available(&self) -> bool {
        self.config.credential().is_some()
    }

    fn name(&self) -> &str {
        "ElevenLabs TTS"
    }
}
