//! Primary-then-fallback backend selection

use crate::engines::SpeechBackend;
use crate::error::SpeechError;
use crate::utterance::Utterance;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::warn;

/// Tries the primary backend once per utterance and hands the same utterance
/// to the fallback when the primary fails with a fallback-eligible error.
pub struct FallbackBackend {
    primary: Arc<dyn SpeechBackend>,
    fallback: Arc<dyn SpeechBackend>,
    name: String,
}

impl FallbackBackend {
    pub fn new(primary: Arc<dyn SpeechBackend>, fallback: Arc<dyn SpeechBackend>) -> Self {
        let name = format!("{} -> {}", primary.name(), fallback.name());
        Self { primary, fallback, name }
    }
}

#[async_trait]
impl SpeechBackend for FallbackBackend {
    async fn speak(&self, utterance: &Utterance) -> Result<(), SpeechError> {
        match self.primary.speak(utterance).await {
            Ok(()) => Ok(()),
            Err(e) if e.is_fallback_eligible() => {
                warn!(
                    "{} failed ({}), falling back to {}",
                    self.primary.name(),
                    e,
                    self.fallback.name()
                );
                self.fallback.speak(utterance).await
            }
            Err(e) => Err(e),
        }
    }

    fn stop(&self) {
        self.primary.stop();
        self.fallback.stop();
    }

    fn is_available(&self) -> bool {
        self.primary.is_available() || self.fallback.is_available()
    }

    fn name(&self) -> &str {
        &self.name
    }
}
