//! yt-dlp binary resolution and validation.
//!
//! Resolution follows the "configured path wins" rule:
//! 1. A configured path (CLI flag or environment), if it validates
//! 2. The bundled platform binary under `<resource_root>/bin/`
//! 3. `yt-dlp` found on `PATH`

use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use vidfetch_core::{DownloadError, bundled_ytdlp_path, ytdlp_binary_name};

const PATH_BINARY_NAME: &str = "yt-dlp";

/// Check that `path` is an existing file that the OS will execute.
///
/// Returns a human-readable reason on failure.
pub fn validate_executable(path: &Path) -> Result<(), String> {
    if !path.exists() {
        return Err("file does not exist".to_string());
    }

    if !path.is_file() {
        return Err("path is not a file".to_string());
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let metadata = path
            .metadata()
            .map_err(|e| format!("failed to read metadata: {e}"))?;
        if metadata.permissions().mode() & 0o111 == 0 {
            return Err("file is not executable".to_string());
        }
    }

    Ok(())
}

/// Resolve the yt-dlp executable to invoke.
pub fn resolve_ytdlp(configured: Option<&Path>) -> Result<PathBuf, DownloadError> {
    let bundled = bundled_ytdlp_path().map_err(|e| DownloadError::BinaryNotFound {
        path: PathBuf::from(ytdlp_binary_name()),
        reason: e.to_string(),
    })?;
    resolve_from(configured, &bundled, || which::which(PATH_BINARY_NAME).ok())
}

fn resolve_from(
    configured: Option<&Path>,
    bundled: &Path,
    path_lookup: impl FnOnce() -> Option<PathBuf>,
) -> Result<PathBuf, DownloadError> {
    let mut failures = Vec::new();
    let mut reported_path = bundled.to_path_buf();

    if let Some(path) = configured {
        if path.as_os_str().is_empty() {
            warn!(target: "vidfetch.paths", "Configured yt-dlp path is empty, falling back");
        } else {
            match validate_executable(path) {
                Ok(()) => {
                    debug!(target: "vidfetch.paths", path = %path.display(), "Using configured yt-dlp");
                    return Ok(path.to_path_buf());
                }
                Err(reason) => {
                    warn!(
                        target: "vidfetch.paths",
                        path = %path.display(),
                        %reason,
                        "Configured yt-dlp path is unusable, falling back"
                    );
                    failures.push(format!("{}: {reason}", path.display()));
                    reported_path = path.to_path_buf();
                }
            }
        }
    }

    match validate_executable(bundled) {
        Ok(()) => {
            debug!(target: "vidfetch.paths", path = %bundled.display(), "Using bundled yt-dlp");
            return Ok(bundled.to_path_buf());
        }
        Err(reason) => failures.push(format!("{}: {reason}", bundled.display())),
    }

    match path_lookup() {
        Some(found) => match validate_executable(&found) {
            Ok(()) => {
                debug!(target: "vidfetch.paths", path = %found.display(), "Using yt-dlp from PATH");
                return Ok(found);
            }
            Err(reason) => failures.push(format!("{}: {reason}", found.display())),
        },
        None => failures.push(format!("{PATH_BINARY_NAME} not found on PATH")),
    }

    Err(DownloadError::BinaryNotFound {
        path: reported_path,
        reason: failures.join("; "),
    })
}
