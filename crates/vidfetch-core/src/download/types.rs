//! Request and outcome types for a single download.

use serde::Serialize;

use super::errors::DownloadError;

/// yt-dlp format selector used when the client does not pick one.
pub const DEFAULT_VIDEO_FORMAT: &str = "bestvideo+bestaudio/best";

/// yt-dlp `--audio-quality` value used when the client does not pick one (best VBR).
pub const DEFAULT_AUDIO_QUALITY: &str = "0";

/// Format strings that switch the download into audio extraction mode.
const AUDIO_ONLY_SELECTORS: &[&str] = &["audio", "mp3", "bestaudio"];

/// What kind of output the download produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaFormat {
    /// Combined video+audio, merged into an mp4 container.
    Video {
        /// yt-dlp `-f` selector.
        selector: String,
    },
    /// Audio track only, extracted to mp3.
    AudioOnly,
}

impl MediaFormat {
    /// Interpret a client-supplied format string.
    ///
    /// Blank or missing values fall back to [`DEFAULT_VIDEO_FORMAT`].
    pub fn from_selector(raw: Option<&str>) -> Self {
        let selector = raw.map(str::trim).filter(|s| !s.is_empty());
        match selector {
            Some(s)
                if AUDIO_ONLY_SELECTORS
                    .iter()
                    .any(|audio| s.eq_ignore_ascii_case(audio)) =>
            {
                Self::AudioOnly
            }
            Some(s) => Self::Video {
                selector: s.to_string(),
            },
            None => Self::Video {
                selector: DEFAULT_VIDEO_FORMAT.to_string(),
            },
        }
    }

    pub const fn is_audio_only(&self) -> bool {
        matches!(self, Self::AudioOnly)
    }
}

impl Default for MediaFormat {
    fn default() -> Self {
        Self::from_selector(None)
    }
}

/// A validated request to download one URL.
///
/// Transient: created per start-download call and dropped once the
/// session completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    /// Target URL, trimmed and guaranteed non-empty.
    pub url: String,
    /// Output kind and selector.
    pub format: MediaFormat,
    /// Value passed to `--audio-quality` for audio-only downloads.
    pub audio_quality: String,
}

impl DownloadRequest {
    /// Build a request from raw, possibly missing client fields.
    pub fn from_parts(
        url: Option<String>,
        format: Option<String>,
        audio_quality: Option<String>,
    ) -> Result<Self, DownloadError> {
        let url = url
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty())
            .ok_or_else(|| DownloadError::InvalidRequest("No URL provided".to_string()))?;

        let audio_quality = audio_quality
            .map(|q| q.trim().to_string())
            .filter(|q| !q.is_empty())
            .unwrap_or_else(|| DEFAULT_AUDIO_QUALITY.to_string());

        Ok(Self {
            url,
            format: MediaFormat::from_selector(format.as_deref()),
            audio_quality,
        })
    }

    /// Shorthand for a default video download of `url`.
    pub fn video(url: impl Into<String>) -> Result<Self, DownloadError> {
        Self::from_parts(Some(url.into()), None, None)
    }
}

/// Final result of a session, returned as the reply to the start request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DownloadOutcome {
    /// `true` only when yt-dlp exited with status 0.
    pub success: bool,
    /// Raw exit code, `None` if the process was killed by a signal or timed out.
    #[serde(skip)]
    pub exit_code: Option<i32>,
}

impl DownloadOutcome {
    pub const fn from_exit_code(exit_code: Option<i32>) -> Self {
        Self {
            success: matches!(exit_code, Some(0)),
            exit_code,
        }
    }

    pub const fn failed() -> Self {
        Self {
            success: false,
            exit_code: None,
        }
    }
}
