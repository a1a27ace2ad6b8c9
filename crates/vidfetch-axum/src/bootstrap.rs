//! Axum server bootstrap - the composition root.
//!
//! This module is the ONLY place where the registry and the concrete
//! downloader are wired together for the web adapter.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::{info, warn};
use vidfetch_core::{DownloaderPort, bundled_ytdlp_path, default_output_dir, platform_name};
use vidfetch_runtime::{DownloaderConfig, YtDlpDownloader};

use crate::sse::{ConnectionRegistry, DEFAULT_BUFFER};

/// CORS configuration for the web server.
#[derive(Debug, Clone, Default)]
pub enum CorsConfig {
    /// Allow all origins (development mode).
    #[default]
    AllowAll,
    /// Allow specific origins (production mode).
    AllowOrigins(Vec<String>),
}

/// Server configuration for the Axum adapter.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Interface to bind.
    pub host: String,
    /// Port for the HTTP server.
    pub port: u16,
    /// Explicit yt-dlp executable, tried before the bundled copy and `PATH`.
    pub ytdlp_path: Option<PathBuf>,
    /// Where downloaded media is written.
    pub output_dir: PathBuf,
    /// Optional path to static assets for SPA serving.
    pub static_dir: Option<PathBuf>,
    /// CORS configuration.
    pub cors: CorsConfig,
    /// Kill yt-dlp after this long. `None` disables the limit.
    pub download_timeout: Option<Duration>,
    /// Frames buffered per progress connection.
    pub sse_buffer: usize,
}

impl ServerConfig {
    pub const DEFAULT_HOST: &'static str = "127.0.0.1";
    pub const DEFAULT_PORT: u16 = 3000;

    /// Create config with default paths.
    pub fn with_defaults() -> Result<Self> {
        Ok(Self {
            host: Self::DEFAULT_HOST.to_string(),
            port: Self::DEFAULT_PORT,
            ytdlp_path: None,
            output_dir: default_output_dir()?,
            static_dir: None,
            cors: CorsConfig::default(),
            download_timeout: None,
            sse_buffer: DEFAULT_BUFFER,
        })
    }

    #[must_use]
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    #[must_use]
    pub const fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    #[must_use]
    pub fn with_ytdlp_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.ytdlp_path = Some(path.into());
        self
    }

    #[must_use]
    pub fn with_output_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_dir = path.into();
        self
    }

    /// Set the static directory for SPA serving.
    #[must_use]
    pub fn with_static_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.static_dir = Some(path.into());
        self
    }

    /// Set CORS to allow specific origins.
    #[must_use]
    pub fn with_allowed_origins(mut self, origins: Vec<String>) -> Self {
        self.cors = CorsConfig::AllowOrigins(origins);
        self
    }

    #[must_use]
    pub const fn with_download_timeout(mut self, timeout: Duration) -> Self {
        self.download_timeout = Some(timeout);
        self
    }

    #[must_use]
    pub const fn with_sse_buffer(mut self, frames: usize) -> Self {
        self.sse_buffer = frames;
        self
    }

    fn downloader_config(&self) -> DownloaderConfig {
        DownloaderConfig {
            ytdlp_path: self.ytdlp_path.clone(),
            output_dir: self.output_dir.clone(),
            timeout: self.download_timeout,
        }
    }
}

/// Application context for the Axum adapter.
pub struct AxumContext {
    /// Open progress connections; also the downloader's event sink.
    pub registry: Arc<ConnectionRegistry>,
    /// Downloader as trait object.
    pub downloader: Arc<dyn DownloaderPort>,
}

impl AxumContext {
    /// Assemble a context from already-built parts.
    pub fn new(registry: Arc<ConnectionRegistry>, downloader: Arc<dyn DownloaderPort>) -> Self {
        Self {
            registry,
            downloader,
        }
    }
}

/// Build the registry and the yt-dlp downloader from `config`.
///
/// A missing yt-dlp is not fatal here: `/health` reports it and each
/// download request fails with the resolution error.
pub fn bootstrap(config: &ServerConfig) -> Result<AxumContext> {
    let bundled = bundled_ytdlp_path()?;

    info!(
        target: "vidfetch.paths",
        platform = platform_name(),
        output_dir = %config.output_dir.display(),
        bundled_ytdlp = %bundled.display(),
        configured_ytdlp = ?config.ytdlp_path,
        "Axum bootstrap resolved paths"
    );

    let downloader = YtDlpDownloader::new(config.downloader_config());
    match downloader.resolve_binary() {
        Ok(path) => info!(target: "vidfetch.ytdlp", path = %path.display(), "Using yt-dlp"),
        Err(e) => warn!(target: "vidfetch.ytdlp", error = %e, "yt-dlp is not available yet"),
    }

    Ok(AxumContext::new(
        Arc::new(ConnectionRegistry::new(config.sse_buffer)),
        Arc::new(downloader),
    ))
}

/// Start the web server and serve until Ctrl-C.
///
/// If `config.static_dir` is set, serves static assets with SPA fallback.
/// Otherwise, serves only the API endpoints.
pub async fn start_server(config: ServerConfig) -> Result<()> {
    let ctx = bootstrap(&config)?;

    // Choose router based on whether static serving is configured
    let app = if let Some(ref static_dir) = config.static_dir {
        info!("Serving static assets from: {}", static_dir.display());
        crate::routes::create_spa_router(ctx, static_dir, &config.cors)
    } else {
        crate::routes::create_router(ctx, &config.cors)
    };

    let listener = TcpListener::bind((config.host.as_str(), config.port))
        .await
        .with_context(|| format!("Failed to bind {}:{}", config.host, config.port))?;
    let addr: SocketAddr = listener.local_addr()?;

    if config.static_dir.is_some() {
        info!("vidfetch web server (with UI) listening on http://{}", addr);
    } else {
        info!("vidfetch web server (API only) listening on http://{}", addr);
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("vidfetch web server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for Ctrl-C, shutting down");
    }
}
