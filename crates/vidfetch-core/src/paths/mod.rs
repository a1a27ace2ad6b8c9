//! Path utilities for vidfetch resources and output locations.
//!
//! This module provides the canonical path resolution for all vidfetch components:
//! - Resource root holding bundled binaries
//! - Output directory for downloaded media
//! - Platform-specific yt-dlp binary name
//!
//! # Design
//!
//! - Returns `PathBuf` and `PathError` for clear error handling
//! - No process spawning or executable validation (see `vidfetch-runtime`)
//! - OS-specific logic is kept private in `platform`

mod binary;
mod ensure;
mod error;
mod platform;

pub use binary::{bundled_ytdlp_path, ytdlp_binary_name};
pub use ensure::{ensure_directory, verify_writable};
pub use error::PathError;
pub use platform::{
    OUTPUT_DIR_ENV, RESOURCE_DIR_ENV, default_output_dir, normalize_user_path, platform_name,
    resource_root,
};
