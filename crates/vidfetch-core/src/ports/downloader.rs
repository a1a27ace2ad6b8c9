//! Downloader port.
//!
//! The HTTP adapter depends on this trait rather than on the yt-dlp runtime,
//! so handlers can be exercised with a fake in tests.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;

use super::ProgressEmitter;
use crate::download::{DownloadError, DownloadOutcome, DownloadRequest};

/// Runs downloads and reports on the underlying tool.
#[async_trait]
pub trait DownloaderPort: Send + Sync {
    /// Run one download to completion.
    ///
    /// Progress and the completion event go to `emitter`; the outcome is also
    /// returned so the caller can reply to the original request.
    async fn download(
        &self,
        request: DownloadRequest,
        emitter: Arc<dyn ProgressEmitter>,
    ) -> Result<DownloadOutcome, DownloadError>;

    /// Resolve the executable that would be used, without spawning it.
    fn resolve_binary(&self) -> Result<PathBuf, DownloadError>;
}
