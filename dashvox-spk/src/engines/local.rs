//! On-device speech synthesis backend
//!
//! Speaks directly through the platform synthesizer:
//! - Linux and others: espeak-ng (or espeak)
//! - macOS: say
//! - Windows: PowerShell System.Speech

use crate::config::LocalConfig;
use crate::engines::SpeechBackend;
use crate::error::SpeechError;
use crate::process::{pick_program, run_interruptible, ActiveSlot};
use crate::utterance::Utterance;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::{debug, info, warn};

#[cfg(target_os = "macos")]
const SYNTH_CANDIDATES: &[&str] = &["say"];

#[cfg(target_os = "windows")]
const SYNTH_CANDIDATES: &[&str] = &["powershell"];

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
const SYNTH_CANDIDATES: &[&str] = &["espeak-ng", "espeak"];

/// Which command-line synthesizer drives the speech
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SynthKind {
    Espeak,
    Say,
    PowerShell,
}

impl SynthKind {
    fn detect(program: &Path) -> Self {
        let name = program
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();
        match name.as_str() {
            "say" => SynthKind::Say,
            "powershell" | "pwsh" => SynthKind::PowerShell,
            _ => SynthKind::Espeak,
        }
    }
}

/// Platform speech synthesizer used as the backend of last resort
pub struct LocalSpeechBackend {
    config: LocalConfig,
    program: Option<PathBuf>,
    active: ActiveSlot,
}

impl LocalSpeechBackend {
    pub fn new(config: LocalConfig) -> Result<Self, SpeechError> {
        config.validate().map_err(SpeechError::Config)?;

        let program = pick_program(config.program.as_deref(), SYNTH_CANDIDATES);
        match program {
            Some(ref p) => info!("Native speech synthesizer initialized ({})", p.display()),
            None => warn!("No native speech synthesizer found (tried {:?})", SYNTH_CANDIDATES),
        }

        Ok(Self {
            config,
            program,
            active: ActiveSlot::default(),
        })
    }

    fn command(&self, program: &Path, text: &str) -> Command {
        let mut cmd = Command::new(program);
        match SynthKind::detect(program) {
            SynthKind::Espeak => {
                // espeak-ng: -s words per minute (175 normal), -p pitch 0-99 (50 normal), -a amplitude 0-200 (100 normal)
                let wpm = (175.0 * self.config.rate).round().clamp(80.0, 500.0) as u32;
                let pitch = (50.0 * self.config.pitch).round().clamp(0.0, 99.0) as u32;
                let amplitude = (100.0 * self.config.volume).round().clamp(0.0, 200.0) as u32;
                let voice = self
                    .config
                    .voice
                    .clone()
                    .unwrap_or_else(|| primary_subtag(&self.config.language));
                cmd.arg("-v").arg(voice);
                cmd.arg("-s").arg(wpm.to_string());
                cmd.arg("-p").arg(pitch.to_string());
                cmd.arg("-a").arg(amplitude.to_string());
                cmd.arg(text);
            }
            SynthKind::Say => {
                let wpm = (175.0 * self.config.rate).round().clamp(80.0, 500.0) as u32;
                if let Some(ref voice) = self.config.voice {
                    cmd.arg("-v").arg(voice);
                }
                cmd.arg("-r").arg(wpm.to_string());
                cmd.arg(text);
            }
            SynthKind::PowerShell => {
                // SpeechSynthesizer.Rate is -10..10, Volume 0..100
                let rate = ((self.config.rate - 1.0) * 10.0).round().clamp(-10.0, 10.0) as i32;
                let volume = (self.config.volume * 100.0).round().clamp(0.0, 100.0) as u32;
                let select_voice = match self.config.voice {
                    Some(ref voice) => format!("$synth.SelectVoice('{}'); ", voice.replace('\'', "''")),
                    None => String::new(),
                };
                let script = format!(
                    "Add-Type -AssemblyName System.Speech; \
                     $synth = New-Object System.Speech.Synthesis.SpeechSynthesizer; \
                     {}$synth.Rate = {}; $synth.Volume = {}; $synth.Speak('{}'); $synth.Dispose()",
                    select_voice,
                    rate,
                    volume,
                    text.replace('\'', "''")
                );
                cmd.args(["-NoProfile", "-NonInteractive", "-Command"]).arg(script);
            }
        }
        cmd
    }
}

/// "en-IN" -> "en"
fn primary_subtag(language: &str) -> String {
    language
        .split(['-', '_'])
        .next()
        .filter(|s| !s.is_empty())
        .unwrap_or("en")
        .to_ascii_lowercase()
}

/// Collapse control characters to spaces; a leading '-' would read as an option.
fn sanitize(text: &str) -> String {
    let cleaned: String = text
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect();
    let trimmed = cleaned.trim();
    if trimmed.starts_with('-') {
        format!(" {}", trimmed)
    } else {
        trimmed.to_string()
    }
}

#[async_trait]
impl SpeechBackend for LocalSpeechBackend {
    async fn speak(&self, utterance: &Utterance) -> Result<(), SpeechError> {
        let program = self.program.as_deref().ok_or_else(|| {
            SpeechError::LocalUnavailable(format!("no synthesizer found (tried {:?})", SYNTH_CANDIDATES))
        })?;

        let text = sanitize(&utterance.text);
        if text.trim().is_empty() {
            return Err(SpeechError::InvalidInput("Text is empty after sanitization".to_string()));
        }

        debug!("Speaking locally: '{}'", utterance.preview());
        run_interruptible(self.command(program, &text), &self.active)
            .await
            .map_err(|e| match e {
                SpeechError::Io(io) => SpeechError::LocalUnavailable(io.to_string()),
                other => other,
            })
    }

    fn stop(&self) {
        self.active.interrupt();
    }

    fn is_available(&self) -> bool {
        self.program.is_some()
    }

    fn name(&self) -> &str {
        "native"
    }
}
