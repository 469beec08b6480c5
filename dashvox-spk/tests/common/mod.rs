//! Shared fakes for narration tests

#![allow(dead_code)]

use async_trait::async_trait;
use dashvox_spk::{SpeechBackend, SpeechError, Utterance};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Start,
    End,
}

/// One recorded backend event
#[derive(Debug, Clone)]
pub struct Call {
    pub at: Instant,
    pub phase: Phase,
    pub text: String,
    pub voice: String,
}

/// Backend that "speaks" by sleeping, recording when each utterance starts and ends.
///
/// A cancelled utterance records a start but no end.
pub struct ScriptedBackend {
    name: &'static str,
    duration: Duration,
    fail_on: Option<String>,
    failure: fn() -> SpeechError,
    log: Mutex<Vec<Call>>,
    stops: AtomicUsize,
}

impl ScriptedBackend {
    pub fn new(name: &'static str, duration: Duration) -> Arc<Self> {
        Arc::new(Self {
            name,
            duration,
            fail_on: None,
            failure: || SpeechError::Interrupted,
            log: Mutex::new(Vec::new()),
            stops: AtomicUsize::new(0),
        })
    }

    /// Fails every utterance with `failure` after speaking for `duration`
    pub fn failing(name: &'static str, duration: Duration, failure: fn() -> SpeechError) -> Arc<Self> {
        Arc::new(Self {
            name,
            duration,
            fail_on: Some(String::new()),
            failure,
            log: Mutex::new(Vec::new()),
            stops: AtomicUsize::new(0),
        })
    }

    /// Fails only the utterance whose text is `text`
    pub fn failing_on(
        name: &'static str,
        duration: Duration,
        text: &str,
        failure: fn() -> SpeechError,
    ) -> Arc<Self> {
        Arc::new(Self {
            name,
            duration,
            fail_on: Some(text.to_string()),
            failure,
            log: Mutex::new(Vec::new()),
            stops: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> Vec<Call> {
        self.log.lock().clone()
    }

    /// Texts in the order they were started
    pub fn started_texts(&self) -> Vec<String> {
        self.log
            .lock()
            .iter()
            .filter(|c| c.phase == Phase::Start)
            .map(|c| c.text.clone())
            .collect()
    }

    pub fn find(&self, phase: Phase, text: &str) -> Option<Instant> {
        self.log
            .lock()
            .iter()
            .find(|c| c.phase == phase && c.text == text)
            .map(|c| c.at)
    }

    pub fn stops(&self) -> usize {
        self.stops.load(Ordering::SeqCst)
    }

    fn record(&self, phase: Phase, utterance: &Utterance) {
        self.log.lock().push(Call {
            at: Instant::now(),
            phase,
            text: utterance.text.clone(),
            voice: utterance.voice.clone(),
        });
    }

    fn should_fail(&self, text: &str) -> bool {
        match self.fail_on {
            Some(ref target) => target.is_empty() || target == text,
            None => false,
        }
    }
}

#[async_trait]
impl SpeechBackend for ScriptedBackend {
    async fn speak(&self, utterance: &Utterance) -> Result<(), SpeechError> {
        self.record(Phase::Start, utterance);
        tokio::time::sleep(self.duration).await;
        self.record(Phase::End, utterance);
        if self.should_fail(&utterance.text) {
            return Err((self.failure)());
        }
        Ok(())
    }

    fn stop(&self) {
        self.stops.fetch_add(1, Ordering::SeqCst);
    }

    fn is_available(&self) -> bool {
        true
    }

    fn name(&self) -> &str {
        self.name
    }
}

/// Counts how often a hook fired and remembers when it last did
#[derive(Clone, Default)]
pub struct HookRecorder {
    fired: Arc<Mutex<Vec<Instant>>>,
}

impl HookRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hook(&self) -> impl FnOnce() + Send + 'static {
        let fired = self.fired.clone();
        move || fired.lock().push(Instant::now())
    }

    pub fn count(&self) -> usize {
        self.fired.lock().len()
    }

    pub fn last(&self) -> Option<Instant> {
        self.fired.lock().last().copied()
    }
}

pub fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}
