//! Download error taxonomy.
//!
//! A non-zero yt-dlp exit is not an error: it is reported as
//! `DownloadOutcome { success: false }`.

use std::path::PathBuf;

use thiserror::Error;

use crate::paths::PathError;

/// Errors that stop a download before or while yt-dlp is started.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// The client request is missing required input. Nothing was spawned.
    #[error("{0}")]
    InvalidRequest(String),

    /// No usable yt-dlp executable was found. Nothing was spawned.
    #[error("yt-dlp binary not found at {}: {reason}", path.display())]
    BinaryNotFound {
        /// The path that was expected to hold the binary.
        path: PathBuf,
        /// Why resolution failed.
        reason: String,
    },

    /// The OS refused to create the subprocess.
    #[error("Failed to start yt-dlp: {0}")]
    SpawnFailure(String),

    /// Another download session is still running.
    #[error("A download is already in progress")]
    Busy,

    /// The output directory could not be prepared.
    #[error("Output directory unavailable: {0}")]
    OutputDir(#[from] PathError),

    /// The session task ended without producing an outcome.
    #[error("Download task failed: {0}")]
    Internal(String),
}

impl DownloadError {
    /// Whether the client, not the environment, is at fault.
    pub const fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidRequest(_) | Self::Busy)
    }
}
