//! Units of speech

use crate::error::SpeechError;

/// Longest text, in characters, the cloud provider accepts in one request
pub const MAX_TEXT_CHARS: usize = 5000;

/// Text plus the voice it should be spoken in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Utterance {
    pub text: String,
    /// Friendly voice name or raw provider id
    pub voice: String,
}

impl Utterance {
    pub fn new(text: impl Into<String>, voice: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            voice: voice.into(),
        }
    }

    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    /// Non-empty after trimming and at most [`MAX_TEXT_CHARS`] characters.
    pub fn validate(&self) -> Result<(), SpeechError> {
        if self.text.trim().is_empty() {
            return Err(SpeechError::InvalidInput("Text cannot be empty".to_string()));
        }

        let chars = self.char_count();
        if chars > MAX_TEXT_CHARS {
            return Err(SpeechError::InvalidInput(format!(
                "Text too long ({} characters, max {})",
                chars, MAX_TEXT_CHARS
            )));
        }

        if self.voice.trim().is_empty() {
            return Err(SpeechError::InvalidInput("Voice cannot be empty".to_string()));
        }

        Ok(())
    }

    /// Short prefix for log lines
    pub fn preview(&self) -> String {
        preview(&self.text)
    }
}

pub(crate) fn preview(text: &str) -> String {
    const PREVIEW_CHARS: usize = 50;
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}
