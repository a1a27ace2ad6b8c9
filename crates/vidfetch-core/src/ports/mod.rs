//! Port definitions (trait abstractions) for external systems.
//!
//! Ports define the interfaces that the core domain expects from infrastructure.
//! They contain no implementation details and use only domain types.
//!
//! # Design Rules
//!
//! - No axum or tokio process types in any signature
//! - Emitters never fail and never block the caller
//! - Output parsing is isolated from session and broadcast logic

mod downloader;
mod event_emitter;
mod progress_parser;

pub use downloader::DownloaderPort;
pub use event_emitter::{NoopEmitter, ProgressEmitter};
pub use progress_parser::ProgressParser;
