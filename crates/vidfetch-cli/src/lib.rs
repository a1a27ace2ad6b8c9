//! Command-line front end for vidfetch.
//!
//! `vidfetch web` runs the HTTP server; `vidfetch paths` prints the resolved
//! locations used to find yt-dlp and store downloads.

#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

#[cfg(test)]
use tempfile as _;

// Used by main.rs binary
use dotenvy as _;
use tokio as _;
use tracing_subscriber as _;

pub mod commands;
pub mod handlers;
pub mod parser;

pub use commands::{Commands, WebArgs};
pub use parser::Cli;
