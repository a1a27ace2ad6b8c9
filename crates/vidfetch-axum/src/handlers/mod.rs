//! HTTP request handlers for the Axum web server.
//!
//! Handlers are thin: they translate HTTP into calls on the registry or the
//! downloader port and map errors through `HttpError`.

pub mod download;
pub mod health;
pub mod progress;
