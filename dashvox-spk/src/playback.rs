//! Playback of synthesized audio

use crate::config::PlayerConfig;
use crate::error::SpeechError;
use crate::process::{pick_program, run_interruptible, ActiveSlot};
use async_trait::async_trait;
use bytes::Bytes;
use std::io::Write;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::{debug, info, warn};

/// Players tried in order when none is configured
const PLAYER_CANDIDATES: &[&str] = &["mpg123", "ffplay", "afplay", "mpv"];

/// Plays an audio payload and resolves when playback has ended.
#[async_trait]
pub trait AudioPlayer: Send + Sync {
    async fn play(&self, audio: Bytes) -> Result<(), SpeechError>;

    /// Halt current playback. Safe to call when nothing is playing.
    fn stop(&self);
}

/// Whether the payload starts like an MPEG audio stream (ID3 tag or frame sync).
pub fn looks_like_mpeg(audio: &[u8]) -> bool {
    match audio {
        [b'I', b'D', b'3', ..] => true,
        [first, second, ..] => *first == 0xFF && (*second & 0xE0) == 0xE0,
        _ => false,
    }
}

/// Plays mpeg payloads through an external command-line player.
pub struct CommandPlayer {
    program: Option<PathBuf>,
    active: ActiveSlot,
}

impl CommandPlayer {
    pub fn new(config: &PlayerConfig) -> Self {
        let program = pick_program(config.program.as_deref(), PLAYER_CANDIDATES);
        match program {
            Some(ref p) => info!("Detected audio player {}", p.display()),
            None => warn!("No audio player found (tried {:?})", PLAYER_CANDIDATES),
        }
        Self {
            program,
            active: ActiveSlot::default(),
        }
    }

    pub fn is_available(&self) -> bool {
        self.program.is_some()
    }

    fn command(program: &Path, file: &Path) -> Command {
        let name = program
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("");
        let mut cmd = Command::new(program);
        match name {
            "mpg123" => {
                cmd.arg("-q");
            }
            "ffplay" => {
                cmd.args(["-nodisp", "-autoexit", "-loglevel", "quiet"]);
            }
            "mpv" => {
                cmd.args(["--no-video", "--really-quiet"]);
            }
            _ => {}
        }
        cmd.arg(file);
        cmd
    }
}

#[async_trait]
impl AudioPlayer for CommandPlayer {
    async fn play(&self, audio: Bytes) -> Result<(), SpeechError> {
        let program = self
            .program
            .as_deref()
            .ok_or_else(|| SpeechError::Playback("No audio player available".to_string()))?;

        // Removed when dropped, on every exit path.
        let mut file = tempfile::Builder::new()
            .prefix("dashvox-")
            .suffix(".mp3")
            .tempfile()?;
        file.write_all(&audio)?;
        file.flush()?;

        debug!("Playing {} bytes via {}", audio.len(), program.display());
        let cmd = Self::command(program, file.path());
        let result = run_interruptible(cmd, &self.active).await.map_err(|e| match e {
            SpeechError::Io(io) => SpeechError::Playback(io.to_string()),
            other => other,
        });

        if let Err(e) = file.close() {
            warn!("Failed to remove temporary audio file: {}", e);
        }
        result
    }

    fn stop(&self) {
        self.active.interrupt();
    }
}
