//! Download session: one yt-dlp invocation and its lifecycle.
//!
//! ```text
//! Created → Spawning → Running → Terminated
//!               └──────────────────┘ (spawn failure)
//! ```
//!
//! Progress events are emitted in stdout order. The completion event is
//! emitted exactly once, after stdout has closed and the process has exited.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::process::Child;
use tracing::{debug, info, warn};
use vidfetch_core::{
    DownloadError, DownloadOutcome, ProgressEmitter, ProgressEvent, ProgressParser,
};

use crate::args::YtDlpInvocation;
use crate::stream::{ChunkReader, spawn_stderr_logger};

static NEXT_SESSION_ID: AtomicU64 = AtomicU64::new(1);

/// Lifecycle state of a [`DownloadSession`], traced on every transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SessionState {
    Created,
    Spawning,
    Running,
    Terminated,
}

/// One subprocess invocation. Not reusable: `run` consumes the session.
#[derive(Debug)]
pub struct DownloadSession {
    id: u64,
    invocation: YtDlpInvocation,
    timeout: Option<Duration>,
    state: SessionState,
}

impl DownloadSession {
    pub fn new(invocation: YtDlpInvocation, timeout: Option<Duration>) -> Self {
        Self {
            id: NEXT_SESSION_ID.fetch_add(1, Ordering::Relaxed),
            invocation,
            timeout,
            state: SessionState::Created,
        }
    }

    pub const fn id(&self) -> u64 {
        self.id
    }

    fn transition(&mut self, next: SessionState) {
        debug!(
            target: "vidfetch.download",
            session = self.id,
            from = ?self.state,
            to = ?next,
            "Session state change"
        );
        self.state = next;
    }

    /// Spawn yt-dlp and drive it to completion.
    ///
    /// Spawn failures are broadcast as `done/success:false` and returned as
    /// `SpawnFailure`. Any exit, including non-zero or timeout, is an `Ok` outcome.
    pub async fn run(
        mut self,
        emitter: Arc<dyn ProgressEmitter>,
        parser: Arc<dyn ProgressParser>,
    ) -> Result<DownloadOutcome, DownloadError> {
        self.transition(SessionState::Spawning);
        info!(
            target: "vidfetch.download",
            session = self.id,
            program = %self.invocation.program.display(),
            args = %self.invocation.display_args(),
            "Spawning yt-dlp"
        );

        let mut child = match self.invocation.command().spawn() {
            Ok(child) => child,
            Err(e) => {
                warn!(target: "vidfetch.download", session = self.id, error = %e, "Failed to spawn yt-dlp");
                self.transition(SessionState::Terminated);
                emitter.emit(ProgressEvent::done(false));
                return Err(DownloadError::SpawnFailure(e.to_string()));
            }
        };

        self.transition(SessionState::Running);
        if let Some(stderr) = child.stderr.take() {
            // Detached: stderr is diagnostic only and must not delay completion
            drop(spawn_stderr_logger(stderr, self.id));
        }

        let outcome = match self.timeout {
            Some(limit) => {
                let waited = tokio::time::timeout(
                    limit,
                    self.drive(&mut child, emitter.as_ref(), parser.as_ref()),
                )
                .await;
                match waited {
                    Ok(outcome) => outcome,
                    Err(_) => {
                        warn!(
                            target: "vidfetch.download",
                            session = self.id,
                            timeout_secs = limit.as_secs(),
                            "yt-dlp timed out, killing process"
                        );
                        if let Err(e) = child.kill().await {
                            warn!(target: "vidfetch.download", session = self.id, error = %e, "Failed to kill yt-dlp");
                        }
                        DownloadOutcome::failed()
                    }
                }
            }
            None => self.drive(&mut child, emitter.as_ref(), parser.as_ref()).await,
        };

        self.transition(SessionState::Terminated);
        info!(
            target: "vidfetch.download",
            session = self.id,
            success = outcome.success,
            exit_code = ?outcome.exit_code,
            "yt-dlp finished"
        );
        emitter.emit(ProgressEvent::done(outcome.success));
        Ok(outcome)
    }

    /// Read stdout to EOF, emitting progress, then wait for exit.
    async fn drive(
        &self,
        child: &mut Child,
        emitter: &dyn ProgressEmitter,
        parser: &dyn ProgressParser,
    ) -> DownloadOutcome {
        if let Some(stdout) = child.stdout.take() {
            let mut reader = ChunkReader::new(stdout);
            loop {
                match reader.next_chunk().await {
                    Ok(Some(chunk)) => {
                        debug!(target: "vidfetch.ytdlp", session = self.id, "stdout: {}", chunk);
                        if let Some(percent) = parser.parse(&chunk) {
                            emitter.emit(ProgressEvent::progress(percent));
                        }
                    }
                    Ok(None) => break,
                    Err(e) => {
                        warn!(target: "vidfetch.ytdlp", session = self.id, error = %e, "stdout read failed");
                        break;
                    }
                }
            }
        }

        match child.wait().await {
            Ok(status) => DownloadOutcome::from_exit_code(status.code()),
            Err(e) => {
                warn!(target: "vidfetch.download", session = self.id, error = %e, "Failed to wait for yt-dlp");
                DownloadOutcome::failed()
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::RecordingEmitter;
    use super::*;
    use crate::args::YtDlpCommandBuilder;
    use tempfile::TempDir;
    use vidfetch_core::{DownloadRequest, PercentParser};

    fn session_for(program: &std::path::Path, dir: &std::path::Path) -> DownloadSession {
        let request = DownloadRequest::video("https://example.com/v").unwrap();
        DownloadSession::new(YtDlpCommandBuilder::new(program, dir).build(&request), None)
    }

    #[test]
    fn new_session_is_created() {
        let session = session_for(std::path::Path::new("yt-dlp"), std::path::Path::new("."));
        assert_eq!(session.state, SessionState::Created);
        let other = session_for(std::path::Path::new("yt-dlp"), std::path::Path::new("."));
        assert_ne!(session.id(), other.id());
    }

    #[tokio::test]
    async fn spawn_failure_emits_done_false() {
        let dir = TempDir::new().unwrap();
        let session = session_for(&dir.path().join("missing-binary"), dir.path());
        let emitter = Arc::new(RecordingEmitter::default());

        let result = session.run(emitter.clone(), Arc::new(PercentParser)).await;

        assert!(matches!(result, Err(DownloadError::SpawnFailure(_))));
        assert_eq!(emitter.events(), vec![ProgressEvent::done(false)]);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn progress_then_done_on_success() {
        let dir = TempDir::new().unwrap();
        let script = super::test_support::write_script(
            dir.path(),
            "echo '[youtube] abc: Downloading webpage'\n\
             echo '...12.3%...'\n\
             echo '[download]  45%'\n\
             echo 'warning' >&2\n\
             exit 0",
        );
        let emitter = Arc::new(RecordingEmitter::default());

        let outcome = session_for(&script, dir.path())
            .run(emitter.clone(), Arc::new(PercentParser))
            .await
            .unwrap();

        assert!(outcome.success);
        assert_eq!(outcome.exit_code, Some(0));
        assert_eq!(
            emitter.events(),
            vec![
                ProgressEvent::progress(12),
                ProgressEvent::progress(45),
                ProgressEvent::done(true),
            ]
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn nonzero_exit_reports_failure_without_error() {
        let dir = TempDir::new().unwrap();
        let script = super::test_support::write_script(dir.path(), "echo '[download] 10%'\nexit 3");
        let emitter = Arc::new(RecordingEmitter::default());

        let outcome = session_for(&script, dir.path())
            .run(emitter.clone(), Arc::new(PercentParser))
            .await
            .unwrap();

        assert!(!outcome.success);
        assert_eq!(outcome.exit_code, Some(3));
        assert_eq!(
            emitter.events(),
            vec![ProgressEvent::progress(10), ProgressEvent::done(false)]
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn timeout_kills_and_reports_failure() {
        let dir = TempDir::new().unwrap();
        let script = super::test_support::write_script(dir.path(), "echo '[download] 5%'\nexec sleep 30");
        let request = DownloadRequest::video("u").unwrap();
        let session = DownloadSession::new(
            YtDlpCommandBuilder::new(&script, dir.path()).build(&request),
            Some(Duration::from_millis(300)),
        );
        let emitter = Arc::new(RecordingEmitter::default());

        let outcome = session
            .run(emitter.clone(), Arc::new(PercentParser))
            .await
            .unwrap();

        assert!(!outcome.success);
        let events = emitter.events();
        assert_eq!(events.last(), Some(&ProgressEvent::done(false)));
        assert_eq!(events.iter().filter(|e| e.is_terminal()).count(), 1);
    }
}
