//! Axum web adapter for vidfetch.
//!
//! Exposes the download service over HTTP:
//!
//! - `GET /progress` - Server-Sent Events stream of progress frames
//! - `POST /download` - start a download and wait for its outcome
//! - `GET /health` - report whether yt-dlp can be resolved
//!
//! [`bootstrap`] is the composition root. [`start_server`] binds and serves
//! until Ctrl-C.

#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

#[cfg(test)]
use async_trait as _;
#[cfg(test)]
use http_body_util as _;
#[cfg(test)]
use serde_json as _;
#[cfg(test)]
use tempfile as _;
#[cfg(test)]
use tower as _;

pub mod bootstrap;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod sse;
pub mod state;

// Re-export primary types
pub use bootstrap::{AxumContext, CorsConfig, ServerConfig, bootstrap, start_server};
pub use error::HttpError;
pub use routes::{create_router, create_spa_router};
pub use sse::{ConnectionId, ConnectionRegistry, Subscription};
pub use state::AppState;
