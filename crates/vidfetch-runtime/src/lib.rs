//! OS-facing runtime for vidfetch.
//!
//! Resolves the yt-dlp executable, builds its argument list, spawns it and
//! turns its output into progress events.
//!
//! # Structure
//!
//! - `binary` - yt-dlp resolution and executable validation
//! - `args` - `YtDlpCommandBuilder` and the resulting `YtDlpInvocation`
//! - `stream` - lossy, CR/LF-aware chunk reading of subprocess output
//! - `session` - one subprocess invocation and its lifecycle
//! - `downloader` - `DownloaderPort` implementation, one session at a time

#![deny(unsafe_code)]

mod args;
mod binary;
mod downloader;
mod session;
mod stream;

pub use args::{OUTPUT_TEMPLATE, YtDlpCommandBuilder, YtDlpInvocation};
pub use binary::{resolve_ytdlp, validate_executable};
pub use downloader::{DownloaderConfig, YtDlpDownloader};
pub use session::DownloadSession;

