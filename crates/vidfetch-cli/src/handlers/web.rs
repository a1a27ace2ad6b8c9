//! Web command handler.
//!
//! Turns `WebArgs` into a `ServerConfig` and runs the server until Ctrl-C.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use tracing::info;
use vidfetch_axum::{CorsConfig, ServerConfig, start_server};
use vidfetch_core::normalize_user_path;

use crate::commands::WebArgs;

/// Front-end location used when `--static-dir` is not given.
pub const DEFAULT_STATIC_DIR: &str = "public";

/// Execute the web command.
pub async fn execute(args: WebArgs) -> Result<()> {
    let config = build_config(args, Path::new("."))?;

    match config.static_dir {
        Some(ref dir) => info!("Serving UI from: {}", dir.display()),
        None => info!("API only mode (no static UI)"),
    }

    start_server(config).await
}

/// Build the server configuration, looking for a default UI under `base`.
pub fn build_config(args: WebArgs, base: &Path) -> Result<ServerConfig> {
    let mut config = ServerConfig::with_defaults()?
        .with_host(args.host)
        .with_port(args.port);

    if let Some(raw) = args.ytdlp_path.as_deref() {
        config = config.with_ytdlp_path(normalize_user_path(raw)?);
    }
    if let Some(raw) = args.output_dir.as_deref() {
        config = config.with_output_dir(normalize_user_path(raw)?);
    }
    if let Some(secs) = args.timeout_secs.filter(|s| *s > 0) {
        config = config.with_download_timeout(Duration::from_secs(secs));
    }
    if !args.allow_origins.is_empty() {
        config = config.with_allowed_origins(args.allow_origins);
    }
    if let Some(dir) = resolve_static_dir(args.api_only, args.static_dir, base) {
        config = config.with_static_dir(dir);
    }

    Ok(config)
}

/// Resolve the static directory: api-only flag > explicit flag > `./public`.
fn resolve_static_dir(api_only: bool, explicit: Option<PathBuf>, base: &Path) -> Option<PathBuf> {
    if api_only {
        return None;
    }
    if explicit.is_some() {
        return explicit;
    }
    let candidate = base.join(DEFAULT_STATIC_DIR);
    candidate.join("index.html").is_file().then_some(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Cli, Commands};
    use clap::Parser;
    use tempfile::TempDir;

    fn web_args(extra: &[&str]) -> WebArgs {
        let argv = ["vidfetch", "web"].iter().chain(extra).copied();
        match Cli::parse_from(argv).command {
            Commands::Web(args) => args,
            Commands::Paths => unreachable!(),
        }
    }

    #[test]
    fn test_default_public_dir_is_used_when_built() {
        let base = TempDir::new().unwrap();
        std::fs::create_dir(base.path().join("public")).unwrap();
        std::fs::write(base.path().join("public/index.html"), "<html/>").unwrap();

        let config = build_config(web_args(&[]), base.path()).unwrap();
        assert_eq!(config.static_dir, Some(base.path().join("public")));
    }

    #[test]
    fn test_no_ui_without_index() {
        let base = TempDir::new().unwrap();
        std::fs::create_dir(base.path().join("public")).unwrap();

        let config = build_config(web_args(&[]), base.path()).unwrap();
        assert!(config.static_dir.is_none());
    }

    #[test]
    fn test_api_only_wins_over_everything() {
        let base = TempDir::new().unwrap();
        std::fs::create_dir(base.path().join("public")).unwrap();
        std::fs::write(base.path().join("public/index.html"), "<html/>").unwrap();

        let config =
            build_config(web_args(&["--api-only", "--static-dir", "/srv/ui"]), base.path())
                .unwrap();
        assert!(config.static_dir.is_none());
    }

    #[test]
    fn test_flags_reach_server_config() {
        let base = TempDir::new().unwrap();
        let config = build_config(
            web_args(&[
                "--port",
                "8123",
                "--ytdlp-path",
                "/opt/yt-dlp",
                "--output-dir",
                "/srv/media",
                "--timeout-secs",
                "30",
                "--allow-origin",
                "http://localhost:5173",
                "--static-dir",
                "/srv/ui",
            ]),
            base.path(),
        )
        .unwrap();

        assert_eq!(config.port, 8123);
        assert_eq!(config.ytdlp_path, Some(PathBuf::from("/opt/yt-dlp")));
        assert_eq!(config.output_dir, PathBuf::from("/srv/media"));
        assert_eq!(config.download_timeout, Some(Duration::from_secs(30)));
        assert_eq!(config.static_dir, Some(PathBuf::from("/srv/ui")));
        assert!(matches!(
            config.cors,
            CorsConfig::AllowOrigins(ref origins) if origins == &["http://localhost:5173"]
        ));
    }

    #[test]
    fn test_zero_timeout_means_none() {
        let base = TempDir::new().unwrap();
        let config = build_config(web_args(&["--timeout-secs", "0"]), base.path()).unwrap();
        assert!(config.download_timeout.is_none());
    }
}
