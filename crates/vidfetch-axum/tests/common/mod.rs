//! Shared fixtures for vidfetch-axum integration tests.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use vidfetch_axum::bootstrap::AxumContext;
use vidfetch_axum::sse::ConnectionRegistry;
use vidfetch_core::{
    DownloadError, DownloadOutcome, DownloadRequest, DownloaderPort, ProgressEmitter,
    ProgressEvent,
};

/// Path the fake downloader reports as its resolved binary.
pub const FAKE_BINARY: &str = "/opt/vidfetch/bin/yt-dlp_linux";

/// What the fake downloader does when asked to download.
#[derive(Debug, Clone, Copy)]
pub enum Behavior {
    /// Emit the given progress values, then finish with `success`.
    Complete { progress: &'static [u8], success: bool },
    /// Refuse because another session is active.
    Busy,
    /// Fail resolution as if yt-dlp were missing.
    MissingBinary,
}

/// In-memory `DownloaderPort` that never spawns anything.
pub struct FakeDownloader {
    behavior: Behavior,
    calls: AtomicUsize,
    requests: std::sync::Mutex<Vec<DownloadRequest>>,
}

impl FakeDownloader {
    pub fn new(behavior: Behavior) -> Self {
        Self {
            behavior,
            calls: AtomicUsize::new(0),
            requests: std::sync::Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<DownloadRequest> {
        self.requests.lock().unwrap().last().cloned()
    }

    fn missing() -> DownloadError {
        DownloadError::BinaryNotFound {
            path: PathBuf::from(FAKE_BINARY),
            reason: "file does not exist".to_string(),
        }
    }
}

#[async_trait]
impl DownloaderPort for FakeDownloader {
    async fn download(
        &self,
        request: DownloadRequest,
        emitter: Arc<dyn ProgressEmitter>,
    ) -> Result<DownloadOutcome, DownloadError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request);

        match self.behavior {
            Behavior::Complete { progress, success } => {
                for percent in progress {
                    emitter.emit(ProgressEvent::progress(*percent));
                }
                emitter.emit(ProgressEvent::done(success));
                Ok(DownloadOutcome::from_exit_code(Some(i32::from(!success))))
            }
            Behavior::Busy => Err(DownloadError::Busy),
            Behavior::MissingBinary => Err(Self::missing()),
        }
    }

    fn resolve_binary(&self) -> Result<PathBuf, DownloadError> {
        match self.behavior {
            Behavior::MissingBinary => Err(Self::missing()),
            _ => Ok(PathBuf::from(FAKE_BINARY)),
        }
    }
}

/// Context wired to a fake downloader, plus handles to inspect it.
pub fn fake_context(behavior: Behavior) -> (AxumContext, Arc<ConnectionRegistry>, Arc<FakeDownloader>) {
    let registry = Arc::new(ConnectionRegistry::with_defaults());
    let downloader = Arc::new(FakeDownloader::new(behavior));
    let ctx = AxumContext::new(Arc::clone(&registry), downloader.clone());
    (ctx, registry, downloader)
}
