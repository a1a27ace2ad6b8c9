//! Paths command handler.
//!
//! Displays all resolved paths for diagnostics. This is the first thing to
//! run when `/health` reports that yt-dlp cannot be found.

use std::fmt;
use std::path::PathBuf;

use anyhow::Result;
use vidfetch_core::{
    bundled_ytdlp_path, default_output_dir, platform_name, resource_root, ytdlp_binary_name,
};
use vidfetch_runtime::resolve_ytdlp;

/// Snapshot of every path vidfetch would use right now.
#[derive(Debug)]
pub struct PathsReport {
    pub platform: &'static str,
    pub resource_root: PathBuf,
    pub output_dir: PathBuf,
    pub binary_name: &'static str,
    pub bundled_ytdlp: PathBuf,
    pub resolved_ytdlp: Result<PathBuf, String>,
}

impl PathsReport {
    pub fn resolve() -> Result<Self> {
        Ok(Self {
            platform: platform_name(),
            resource_root: resource_root()?,
            output_dir: default_output_dir()?,
            binary_name: ytdlp_binary_name(),
            bundled_ytdlp: bundled_ytdlp_path()?,
            resolved_ytdlp: resolve_ytdlp(None).map_err(|e| e.to_string()),
        })
    }
}

impl fmt::Display for PathsReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "platform = {}", self.platform)?;
        writeln!(f, "resource_root = {}", self.resource_root.display())?;
        writeln!(f, "output_dir = {}", self.output_dir.display())?;
        writeln!(f, "ytdlp_binary_name = {}", self.binary_name)?;
        writeln!(f, "bundled_ytdlp = {}", self.bundled_ytdlp.display())?;
        match &self.resolved_ytdlp {
            Ok(path) => write!(f, "ytdlp = {}", path.display()),
            Err(reason) => write!(f, "ytdlp = <not found> ({reason})"),
        }
    }
}

/// Execute the paths command.
pub fn execute() -> Result<()> {
    let report = PathsReport::resolve()?;
    println!("{report}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(resolved: Result<PathBuf, String>) -> PathsReport {
        PathsReport {
            platform: "linux",
            resource_root: PathBuf::from("/opt/vidfetch"),
            output_dir: PathBuf::from("/opt/vidfetch/downloads"),
            binary_name: "yt-dlp_linux",
            bundled_ytdlp: PathBuf::from("/opt/vidfetch/bin/yt-dlp_linux"),
            resolved_ytdlp: resolved,
        }
    }

    #[test]
    fn test_report_lists_every_path() {
        let text = report(Ok(PathBuf::from("/usr/bin/yt-dlp"))).to_string();
        assert!(text.contains("platform = linux"));
        assert!(text.contains("output_dir = /opt/vidfetch/downloads"));
        assert!(text.contains("bundled_ytdlp = /opt/vidfetch/bin/yt-dlp_linux"));
        assert!(text.ends_with("ytdlp = /usr/bin/yt-dlp"));
    }

    #[test]
    fn test_report_shows_resolution_failure() {
        let text = report(Err("yt-dlp not found on PATH".into())).to_string();
        assert!(text.contains("ytdlp = <not found> (yt-dlp not found on PATH)"));
    }

    #[test]
    fn test_resolve_does_not_fail_without_ytdlp() {
        let report = PathsReport::resolve().unwrap();
        assert_eq!(report.platform, std::env::consts::OS);
    }
}
