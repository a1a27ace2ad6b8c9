//! yt-dlp backed implementation of [`DownloaderPort`].
//!
//! Only one session runs at a time. Progress frames carry no session id, so
//! overlapping downloads would interleave on the stream; a second request
//! while one is active is rejected with `DownloadError::Busy`.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tracing::{info, warn};
use vidfetch_core::{
    DownloadError, DownloadOutcome, DownloadRequest, DownloaderPort,
    PercentParser, ProgressEmitter, ProgressEvent, ProgressParser, ensure_directory,
};

use crate::args::YtDlpCommandBuilder;
use crate::binary::resolve_ytdlp;
use crate::session::DownloadSession;

/// Configuration for [`YtDlpDownloader`].
#[derive(Debug, Clone)]
pub struct DownloaderConfig {
    /// Explicit yt-dlp path; wins over bundled and `PATH` lookups when valid.
    pub ytdlp_path: Option<PathBuf>,
    /// Directory downloads are written to. Created on demand.
    pub output_dir: PathBuf,
    /// Kill yt-dlp after this long. `None` lets it run to completion.
    pub timeout: Option<Duration>,
}

impl DownloaderConfig {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            ytdlp_path: None,
            output_dir: output_dir.into(),
            timeout: None,
        }
    }

    #[must_use]
    pub fn with_ytdlp_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.ytdlp_path = Some(path.into());
        self
    }

    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Releases the active-session flag when dropped.
struct ActiveGuard(Arc<AtomicBool>);

impl Drop for ActiveGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Runs yt-dlp downloads, one at a time.
pub struct YtDlpDownloader {
    config: DownloaderConfig,
    parser: Arc<dyn ProgressParser>,
    active: Arc<AtomicBool>,
}

impl YtDlpDownloader {
    pub fn new(config: DownloaderConfig) -> Self {
        Self {
            config,
            parser: Arc::new(PercentParser::new()),
            active: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Replace the output parser.
    #[must_use]
    pub fn with_parser(mut self, parser: Arc<dyn ProgressParser>) -> Self {
        self.parser = parser;
        self
    }

    /// Whether a session is currently running.
    pub fn is_busy(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    fn try_acquire(&self) -> Option<ActiveGuard> {
        self.active
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| ActiveGuard(Arc::clone(&self.active)))
    }
}

#[async_trait]
impl DownloaderPort for YtDlpDownloader {
    async fn download(
        &self,
        request: DownloadRequest,
        emitter: Arc<dyn ProgressEmitter>,
    ) -> Result<DownloadOutcome, DownloadError> {
        let guard = self.try_acquire().ok_or_else(|| {
            warn!(target: "vidfetch.download", url = %request.url, "Rejecting download, another session is active");
            DownloadError::Busy
        })?;

        let binary = self.resolve_binary()?;
        ensure_directory(&self.config.output_dir)?;

        info!(
            target: "vidfetch.download",
            url = %request.url,
            audio_only = request.format.is_audio_only(),
            output_dir = %self.config.output_dir.display(),
            "Starting download"
        );

        let invocation = YtDlpCommandBuilder::new(binary, &self.config.output_dir).build(&request);
        let session = DownloadSession::new(invocation, self.config.timeout);
        let parser = Arc::clone(&self.parser);
        let task_emitter = Arc::clone(&emitter);

        // Own task: the download outlives a client that hangs up on the request
        let handle = tokio::spawn(async move {
            let _guard = guard;
            session.run(task_emitter, parser).await
        });

        match handle.await {
            Ok(result) => result,
            Err(e) => {
                warn!(target: "vidfetch.download", error = %e, "Download task aborted");
                emitter.emit(ProgressEvent::done(false));
                Err(DownloadError::Internal(e.to_string()))
            }
        }
    }

    fn resolve_binary(&self) -> Result<PathBuf, DownloadError> {
        resolve_ytdlp(self.config.ytdlp_path.as_deref())
    }
}
