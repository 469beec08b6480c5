//! Speaking processes that can be interrupted from another task

use crate::error::SpeechError;
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tokio::sync::oneshot;
use tracing::debug;

/// Holds the interrupt signal of the single process currently speaking.
///
/// Claiming the slot interrupts whatever held it before, so at most one
/// process per slot is ever audible.
#[derive(Default)]
pub(crate) struct ActiveSlot {
    current: Mutex<Option<oneshot::Sender<()>>>,
}

impl ActiveSlot {
    fn claim(&self) -> oneshot::Receiver<()> {
        let (tx, rx) = oneshot::channel();
        if let Some(previous) = self.current.lock().replace(tx) {
            let _ = previous.send(());
        }
        rx
    }

    /// Interrupt the current holder. Safe to call when nothing is running.
    pub(crate) fn interrupt(&self) {
        if let Some(tx) = self.current.lock().take() {
            let _ = tx.send(());
        }
    }
}

/// Run `cmd` to completion, killing it if the slot is interrupted or the
/// returned future is dropped.
pub(crate) async fn run_interruptible(mut cmd: Command, slot: &ActiveSlot) -> Result<(), SpeechError> {
    cmd.stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .kill_on_drop(true);

    let mut child = cmd.spawn()?;
    let interrupted = slot.claim();

    tokio::select! {
        status = child.wait() => {
            let status = status?;
            if status.success() {
                Ok(())
            } else {
                Err(SpeechError::Io(std::io::Error::new(
                    std::io::ErrorKind::Other,
                    format!("{:?} exited with {}", cmd.as_std().get_program(), status),
                )))
            }
        }
        _ = interrupted => {
            debug!("Interrupting {:?}", cmd.as_std().get_program());
            let _ = child.kill().await;
            Err(SpeechError::Interrupted)
        }
    }
}

/// Resolve an executable from an explicit path or the PATH search list.
pub(crate) fn find_program(bin: &str) -> Option<PathBuf> {
    if bin.contains(std::path::MAIN_SEPARATOR) {
        let p = PathBuf::from(bin);
        return if p.exists() { Some(p) } else { None };
    }
    let paths = std::env::var_os("PATH")?;
    for dir in std::env::split_paths(&paths) {
        let candidate = dir.join(bin);
        if candidate.is_file() {
            return Some(candidate);
        }
        if cfg!(windows) {
            let exe = dir.join(format!("{}.exe", bin));
            if exe.is_file() {
                return Some(exe);
            }
        }
    }
    None
}

/// First candidate that resolves, preferring an explicit override.
pub(crate) fn pick_program(preferred: Option<&Path>, candidates: &[&str]) -> Option<PathBuf> {
    if let Some(p) = preferred {
        return p.to_str().and_then(find_program).or_else(|| p.exists().then(|| p.to_path_buf()));
    }
    candidates.iter().find_map(|c| find_program(c))
}
