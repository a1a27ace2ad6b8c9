//! yt-dlp binary naming and bundled location.

use std::path::PathBuf;

use super::error::PathError;
use super::platform::resource_root;

/// File name of the yt-dlp release asset for the host platform.
pub const fn ytdlp_binary_name() -> &'static str {
    #[cfg(target_os = "windows")]
    let binary_name = "yt-dlp.exe";

    #[cfg(target_os = "macos")]
    let binary_name = "yt-dlp_macos";

    #[cfg(target_os = "linux")]
    let binary_name = "yt-dlp_linux";

    #[cfg(not(any(target_os = "windows", target_os = "macos", target_os = "linux")))]
    let binary_name = "yt-dlp";

    binary_name
}

/// Get the path where a bundled yt-dlp binary is expected.
///
/// This is `<resource_root>/bin/<platform binary name>`. Existence is not checked.
pub fn bundled_ytdlp_path() -> Result<PathBuf, PathError> {
    Ok(resource_root()?.join("bin").join(ytdlp_binary_name()))
}
