//! Error types for dashvox-spk

use thiserror::Error;

/// Speech and narration errors
#[derive(Error, Debug)]
pub enum SpeechError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Cloud TTS credential not configured")]
    CredentialMissing,

    #[error("Provider error ({status}): {message}")]
    Provider { status: u16, message: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Playback error: {0}")]
    Playback(String),

    #[error("Local speech unavailable: {0}")]
    LocalUnavailable(String),

    #[error("Speech interrupted")]
    Interrupted,

    #[error("Narration failed: {0}")]
    NarrationFailed(#[source] Box<SpeechError>),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SpeechError {
    /// Whether a backend failure should hand the utterance to the next backend.
    pub fn is_fallback_eligible(&self) -> bool {
        matches!(
            self,
            SpeechError::InvalidInput(_)
                | SpeechError::CredentialMissing
                | SpeechError::Provider { .. }
                | SpeechError::Transport(_)
                | SpeechError::Playback(_)
                | SpeechError::Io(_)
        )
    }

    /// Underlying cause of a failed narration, or `self` for any other error.
    pub fn root_cause(&self) -> &SpeechError {
        match self {
            SpeechError::NarrationFailed(cause) => cause.root_cause(),
            other => other,
        }
    }
}

impl From<reqwest::Error> for SpeechError {
    fn from(err: reqwest::Error) -> Self {
        SpeechError::Transport(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_classification() {
        assert!(SpeechError::CredentialMissing.is_fallback_eligible());
        assert!(SpeechError::Provider { status: 500, message: String::new() }.is_fallback_eligible());
        assert!(SpeechError::Transport("reset".into()).is_fallback_eligible());
        assert!(!SpeechError::Interrupted.is_fallback_eligible());
        assert!(!SpeechError::LocalUnavailable("none".into()).is_fallback_eligible());
    }

    #[test]
    fn test_root_cause_unwraps_narration_failure() {
        let err = SpeechError::NarrationFailed(Box::new(SpeechError::LocalUnavailable("no engine".into())));
        assert!(matches!(err.root_cause(), SpeechError::LocalUnavailable(_)));
        assert!(err.to_string().contains("no engine"));
    }
}
