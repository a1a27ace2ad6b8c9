//! Core domain types and ports for vidfetch.
//!
//! This crate knows nothing about HTTP or process spawning. It defines what a
//! download request looks like, which events a session emits, how yt-dlp
//! output is turned into progress values, and where files and binaries live.

#![deny(unused_crate_dependencies)]

pub mod download;
pub mod events;
pub mod paths;
pub mod ports;
pub mod progress;

pub use download::{
    DEFAULT_AUDIO_QUALITY, DEFAULT_VIDEO_FORMAT, DownloadError, DownloadOutcome, DownloadRequest,
    MediaFormat,
};
pub use events::ProgressEvent;
pub use paths::{
    PathError, bundled_ytdlp_path, default_output_dir, ensure_directory, normalize_user_path,
    platform_name, resource_root, ytdlp_binary_name,
};
pub use ports::{DownloaderPort, NoopEmitter, ProgressEmitter, ProgressParser};
pub use progress::PercentParser;

#[cfg(test)]
use tempfile as _;
