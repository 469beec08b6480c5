//! Speech backends

pub mod cloud;
pub mod fallback;
pub mod local;

use crate::error::SpeechError;
use crate::utterance::Utterance;
use async_trait::async_trait;

pub use cloud::{CloudSpeechBackend, ProviderVoice};
pub use fallback::FallbackBackend;
pub use local::LocalSpeechBackend;

/// Something that can make an utterance audible.
///
/// `speak` resolves once the speech has finished playing; that resolution is
/// the completion signal. Dropping the future abandons the speech.
#[async_trait]
pub trait SpeechBackend: Send + Sync {
    /// Speak the utterance and wait for it to end
    async fn speak(&self, utterance: &Utterance) -> Result<(), SpeechError>;

    /// Halt any speech this backend is producing
    fn stop(&self);

    /// Check if backend can currently be used
    fn is_available(&self) -> bool;

    /// Get backend name
    fn name(&self) -> &str;
}
