//! dashvox-spk: spoken narration for dashboard answers
//!
//! Provides question-then-answer narration with:
//! - Cloud TTS (ElevenLabs) with transparent fallback to on-device speech
//! - Randomized pause and visual-reveal timing
//! - Cancellation so only one narration is ever audible

pub mod config;
pub mod coordinator;
pub mod engines;
pub mod error;
pub mod playback;
pub mod timing;
pub mod utterance;
pub mod voices;

mod process;

pub use config::{CloudConfig, LocalConfig, NarrationConfig, PlayerConfig, TimingConfig, VoiceSettings};
pub use coordinator::{NarrationCoordinator, NarrationOutcome, NarrationRequest, NarrationState};
pub use engines::{CloudSpeechBackend, FallbackBackend, LocalSpeechBackend, ProviderVoice, SpeechBackend};
pub use error::SpeechError;
pub use playback::{AudioPlayer, CommandPlayer};
pub use timing::{DelaySource, FixedDelays, UniformDelays};
pub use utterance::{Utterance, MAX_TEXT_CHARS};
