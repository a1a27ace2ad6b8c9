//! Download domain types.
//!
//! A download is one yt-dlp invocation. This module holds the request value
//! object, the media format selection, the outcome and the error taxonomy.

mod errors;
mod types;

pub use errors::DownloadError;
pub use types::{
    DEFAULT_AUDIO_QUALITY, DEFAULT_VIDEO_FORMAT, DownloadOutcome, DownloadRequest, MediaFormat,
};
