//! Percentage scraping from yt-dlp output.
//!
//! yt-dlp prints lines such as `[download]  12.3% of 10.00MiB at 1.2MiB/s`.
//! The first `<number>%` in a chunk is taken, rounded and clamped to 0..=100.

use std::sync::LazyLock;

use regex::Regex;

use crate::ports::ProgressParser;

static PERCENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:\[download\]\s+)?(\d+(?:\.\d+)?)%").expect("percent pattern is valid")
});

/// Default [`ProgressParser`] matching `<number>%`, optionally after a `[download]` tag.
#[derive(Debug, Default, Clone, Copy)]
pub struct PercentParser;

impl PercentParser {
    pub const fn new() -> Self {
        Self
    }
}

impl ProgressParser for PercentParser {
    fn parse(&self, chunk: &str) -> Option<u8> {
        let captures = PERCENT_RE.captures(chunk)?;
        let value: f64 = captures.get(1)?.as_str().parse().ok()?;
        // f64 -> u8 casts saturate, so clamping first keeps the intent explicit
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let percent = value.round().clamp(0.0, 100.0) as u8;
        Some(percent)
    }
}
