//! Question -> pause -> answer narration with a timed visual reveal
//!
//! A narration speaks the question, waits a drawn pause, starts the answer
//! and, a drawn delay after the answer starts, fires the visual-reveal hook.
//! Starting a narration cancels the previous one; `stop` cancels the current
//! one. Cancelled narrations fire no further callbacks.

use crate::config::NarrationConfig;
use crate::engines::{CloudSpeechBackend, FallbackBackend, LocalSpeechBackend, SpeechBackend};
use crate::error::SpeechError;
use crate::playback::CommandPlayer;
use crate::timing::{DelaySource, UniformDelays};
use crate::utterance::Utterance;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::time::Instant;
use tracing::{debug, error, info};

/// Zero-argument hook fired at most once per narration
pub type Callback = Box<dyn FnOnce() + Send + 'static>;

/// Where the current narration is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NarrationState {
    Idle,
    SpeakingQuestion,
    Pausing,
    SpeakingAnswer,
    Done,
    Failed,
}

/// How a narration ended, when it did not fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NarrationOutcome {
    Completed,
    /// Superseded by a newer narration or halted by `stop`
    Cancelled,
}

/// One question/answer pair plus its hooks. Consumed by a single narration.
pub struct NarrationRequest {
    pub question: Utterance,
    pub answer: Utterance,
    pub on_visual_reveal: Option<Callback>,
    pub on_complete: Option<Callback>,
}

impl NarrationRequest {
    pub fn new(question: Utterance, answer: Utterance) -> Self {
        Self {
            question,
            answer,
            on_visual_reveal: None,
            on_complete: None,
        }
    }

    pub fn on_visual_reveal(mut self, f: impl FnOnce() + Send + 'static) -> Self {
        self.on_visual_reveal = Some(Box::new(f));
        self
    }

    pub fn on_complete(mut self, f: impl FnOnce() + Send + 'static) -> Self {
        self.on_complete = Some(Box::new(f));
        self
    }
}

/// Handle of the narration currently allowed to make sound
struct Session {
    id: u64,
    cancel: watch::Sender<bool>,
}

impl Session {
    fn new(id: u64) -> Self {
        let (cancel, _) = watch::channel(false);
        Self { id, cancel }
    }

    fn cancel(&self) {
        self.cancel.send_replace(true);
    }

    fn is_cancelled(&self) -> bool {
        *self.cancel.borrow()
    }

    /// Resolves once the session is cancelled
    async fn cancelled(&self) {
        let mut rx = self.cancel.subscribe();
        // The sender lives in `self`, so this only returns on cancellation.
        let _ = rx.wait_for(|cancelled| *cancelled).await;
    }
}

/// Returns the coordinator to idle when a narration future is dropped mid-flight.
struct Release<'a> {
    coordinator: &'a NarrationCoordinator,
    session: Arc<Session>,
}

impl Drop for Release<'_> {
    fn drop(&mut self) {
        // No-op once the narration finished, was stopped or was superseded.
        if self.coordinator.finish(&self.session) {
            debug!(narration = self.session.id, "Narration dropped by caller");
            self.session.cancel();
            self.coordinator.state.send_replace(NarrationState::Idle);
        }
    }
}

/// Sequences narrations over a speech backend.
pub struct NarrationCoordinator {
    backend: Arc<dyn SpeechBackend>,
    delays: Arc<dyn DelaySource>,
    default_voice: String,
    active: Mutex<Option<Arc<Session>>>,
    // Held for the whole narration so two narrations never overlap audibly.
    stream: tokio::sync::Mutex<()>,
    state: watch::Sender<NarrationState>,
    next_id: AtomicU64,
}

impl NarrationCoordinator {
    pub fn new(backend: Arc<dyn SpeechBackend>, delays: Arc<dyn DelaySource>) -> Self {
        let (state, _) = watch::channel(NarrationState::Idle);
        Self {
            backend,
            delays,
            default_voice: crate::voices::DEFAULT_VOICE.to_string(),
            active: Mutex::new(None),
            stream: tokio::sync::Mutex::new(()),
            state,
            next_id: AtomicU64::new(1),
        }
    }

    /// Cloud backend with local fallback and uniform delays, all from `config`.
    pub fn from_config(config: &NarrationConfig) -> Result<Self, SpeechError> {
        config.validate().map_err(SpeechError::Config)?;

        let player = Arc::new(CommandPlayer::new(&config.player));
        let cloud = Arc::new(CloudSpeechBackend::new(config.cloud.clone(), player)?);
        let local = Arc::new(LocalSpeechBackend::new(config.local.clone())?);
        if !cloud.is_available() {
            info!("Cloud TTS credential not configured; narration will use on-device speech");
        }

        let backend = Arc::new(FallbackBackend::new(cloud, local));
        let delays = Arc::new(UniformDelays::from(&config.timing));
        Ok(Self::new(backend, delays).with_default_voice(config.default_voice.clone()))
    }

    pub fn with_default_voice(mut self, voice: impl Into<String>) -> Self {
        self.default_voice = voice.into();
        self
    }

    pub fn default_voice(&self) -> &str {
        &self.default_voice
    }

    pub fn backend(&self) -> &Arc<dyn SpeechBackend> {
        &self.backend
    }

    pub fn state(&self) -> NarrationState {
        *self.state.borrow()
    }

    pub fn subscribe_state(&self) -> watch::Receiver<NarrationState> {
        self.state.subscribe()
    }

    /// Narrate `question` then `answer` in the default voice, without hooks.
    pub async fn speak(&self, question: &str, answer: &str) -> Result<NarrationOutcome, SpeechError> {
        let request = NarrationRequest::new(
            Utterance::new(question, self.default_voice.as_str()),
            Utterance::new(answer, self.default_voice.as_str()),
        );
        self.speak_sequentially(request).await
    }

    /// Run one narration to completion.
    ///
    /// Invalid text fails with [`SpeechError::InvalidInput`] before anything is
    /// spoken. When every backend fails, `on_complete` still fires and the
    /// error is returned as [`SpeechError::NarrationFailed`].
    pub async fn speak_sequentially(&self, request: NarrationRequest) -> Result<NarrationOutcome, SpeechError> {
        request.question.validate()?;
        request.answer.validate()?;

        let session = self.begin();
        let _release = Release {
            coordinator: self,
            session: session.clone(),
        };
        let NarrationRequest {
            question,
            answer,
            on_visual_reveal,
            on_complete,
        } = request;

        let _stream = tokio::select! {
            biased;
            _ = session.cancelled() => return Ok(NarrationOutcome::Cancelled),
            guard = self.stream.lock() => guard,
        };

        info!(narration = session.id, "Narrating '{}'", question.preview());

        self.transition(&session, NarrationState::SpeakingQuestion);
        let asked = tokio::select! {
            biased;
            _ = session.cancelled() => return Ok(self.cancelled(&session)),
            result = self.backend.speak(&question) => result,
        };
        if let Err(e) = asked {
            if session.is_cancelled() {
                return Ok(self.cancelled(&session));
            }
            return Err(self.fail(&session, e, on_complete));
        }

        let pause = self.delays.question_pause();
        debug!(narration = session.id, "Pausing {}ms before the answer", pause.as_millis());
        self.transition(&session, NarrationState::Pausing);
        tokio::select! {
            biased;
            _ = session.cancelled() => return Ok(self.cancelled(&session)),
            _ = tokio::time::sleep(pause) => {}
        }

        self.transition(&session, NarrationState::SpeakingAnswer);
        let answer_started = Instant::now();
        let reveal_delay = self.delays.reveal_delay();
        debug!(narration = session.id, "Visual reveal in {}ms", reveal_delay.as_millis());

        let backend = &self.backend;
        let speech_session = &session;
        let answer_phase = async move {
            let result = backend.speak(&answer).await;
            if !speech_session.is_cancelled() {
                if let Some(done) = on_complete {
                    done();
                }
            }
            result
        };
        let reveal_session = &session;
        let reveal = async move {
            tokio::time::sleep_until(answer_started + reveal_delay).await;
            if !reveal_session.is_cancelled() {
                if let Some(reveal) = on_visual_reveal {
                    debug!(narration = reveal_session.id, "Revealing visual");
                    reveal();
                }
            }
        };

        let answered = tokio::select! {
            biased;
            _ = session.cancelled() => return Ok(self.cancelled(&session)),
            (result, ()) = async { tokio::join!(answer_phase, reveal) } => result,
        };

        match answered {
            Ok(()) => {
                info!(narration = session.id, "Narration complete");
                self.transition(&session, NarrationState::Done);
                self.finish(&session);
                Ok(NarrationOutcome::Completed)
            }
            Err(_) if session.is_cancelled() => Ok(self.cancelled(&session)),
            Err(e) => {
                // on_complete already fired with the answer phase
                Err(self.fail(&session, e, None))
            }
        }
    }

    /// Halt the current narration, if any. Idempotent.
    pub fn stop(&self) {
        let previous = self.active.lock().take();
        if let Some(session) = previous {
            info!(narration = session.id, "Stopping narration");
            session.cancel();
            self.state.send_replace(NarrationState::Idle);
        }
        self.backend.stop();
    }

    /// Cancel whatever is running and install a fresh session.
    fn begin(&self) -> Arc<Session> {
        let session = Arc::new(Session::new(self.next_id.fetch_add(1, Ordering::Relaxed)));
        let previous = self.active.lock().replace(session.clone());
        if let Some(previous) = previous {
            debug!(narration = previous.id, "Superseded by narration {}", session.id);
            previous.cancel();
            self.backend.stop();
        }
        session
    }

    fn is_current(&self, session: &Session) -> bool {
        self.active
            .lock()
            .as_ref()
            .map_or(false, |active| active.id == session.id)
    }

    fn transition(&self, session: &Session, state: NarrationState) {
        if self.is_current(session) {
            self.state.send_replace(state);
        }
    }

    /// Clear `session` if it is still the active one. Returns whether it was.
    fn finish(&self, session: &Session) -> bool {
        let mut active = self.active.lock();
        if active.as_ref().map_or(false, |a| a.id == session.id) {
            *active = None;
            true
        } else {
            false
        }
    }

    fn cancelled(&self, session: &Session) -> NarrationOutcome {
        debug!(narration = session.id, "Narration cancelled");
        NarrationOutcome::Cancelled
    }

    fn fail(&self, session: &Session, cause: SpeechError, on_complete: Option<Callback>) -> SpeechError {
        error!(narration = session.id, "Narration failed: {}", cause);
        if let Some(done) = on_complete {
            done();
        }
        self.transition(session, NarrationState::Failed);
        self.finish(session);
        SpeechError::NarrationFailed(Box::new(cause))
    }
}
