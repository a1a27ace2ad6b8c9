//! Output protocol adapter.
//!
//! Turns raw text chunks from the downloader's stdout into typed progress
//! values, so the scraping rule can change without touching sessions.

/// Extracts a completion percentage from one chunk of subprocess output.
pub trait ProgressParser: Send + Sync {
    /// Return the percentage (0..=100) found in `chunk`, if any.
    fn parse(&self, chunk: &str) -> Option<u8>;
}
