//! Platform detection and root directory resolution.

use std::env;
use std::path::PathBuf;

use super::error::PathError;

/// Overrides the directory that contains `bin/` with bundled binaries.
pub const RESOURCE_DIR_ENV: &str = "VIDFETCH_RESOURCE_DIR";

/// Overrides the default output directory for downloaded media.
pub const OUTPUT_DIR_ENV: &str = "VIDFETCH_OUTPUT_DIR";

/// Name of the host platform as reported by `/health`.
pub const fn platform_name() -> &'static str {
    env::consts::OS
}

/// Get the root directory for application resources (bundled binaries).
///
/// Resolution order:
/// 1. `VIDFETCH_RESOURCE_DIR` environment variable
/// 2. Current working directory
pub fn resource_root() -> Result<PathBuf, PathError> {
    root_from(env::var(RESOURCE_DIR_ENV).ok(), None)
}

/// Get the default directory downloads are written to.
///
/// Resolution order:
/// 1. `VIDFETCH_OUTPUT_DIR` environment variable
/// 2. `downloads/` under the current working directory
pub fn default_output_dir() -> Result<PathBuf, PathError> {
    root_from(env::var(OUTPUT_DIR_ENV).ok(), Some("downloads"))
}

fn root_from(override_value: Option<String>, cwd_child: Option<&str>) -> Result<PathBuf, PathError> {
    if let Some(raw) = override_value.filter(|v| !v.trim().is_empty()) {
        return normalize_user_path(&raw);
    }

    let cwd = env::current_dir().map_err(|e| PathError::CurrentDirError(e.to_string()))?;
    Ok(match cwd_child {
        Some(child) => cwd.join(child),
        None => cwd,
    })
}

/// Normalize a user-provided path, expanding `~` and making it absolute.
pub fn normalize_user_path(raw: &str) -> Result<PathBuf, PathError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(PathError::EmptyPath);
    }

    let expanded = if trimmed.starts_with("~/") || trimmed == "~" {
        let home = dirs::home_dir().ok_or(PathError::NoHomeDir)?;
        if trimmed == "~" {
            home
        } else {
            home.join(trimmed.trim_start_matches("~/"))
        }
    } else {
        PathBuf::from(trimmed)
    };

    if expanded.is_absolute() {
        Ok(expanded)
    } else {
        env::current_dir()
            .map(|cwd| cwd.join(expanded))
            .map_err(|e| PathError::CurrentDirError(e.to_string()))
    }
}
