//! Subcommand definitions.

use std::path::PathBuf;

use clap::{Args, Subcommand};

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start the web server (progress stream, download API and UI)
    Web(WebArgs),

    /// Show resolved paths and yt-dlp lookup results
    Paths,
}

/// Options for `vidfetch web`.
#[derive(Debug, Clone, Args)]
pub struct WebArgs {
    /// Interface to bind
    #[arg(long, env = "VIDFETCH_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port to serve on
    #[arg(short, long, env = "VIDFETCH_PORT", default_value = "3000")]
    pub port: u16,

    /// Explicit yt-dlp executable (checked before the bundled copy and PATH)
    #[arg(long, env = "VIDFETCH_YTDLP_PATH")]
    pub ytdlp_path: Option<String>,

    /// Directory downloads are written to
    #[arg(long, env = "VIDFETCH_OUTPUT_DIR")]
    pub output_dir: Option<String>,

    /// Directory containing the front-end assets
    ///
    /// Defaults to `./public` when it holds an `index.html`.
    #[arg(long, env = "VIDFETCH_STATIC_DIR")]
    pub static_dir: Option<PathBuf>,

    /// Serve API endpoints only (no static UI)
    #[arg(long, env = "VIDFETCH_API_ONLY")]
    pub api_only: bool,

    /// Kill yt-dlp if a download runs longer than this many seconds
    #[arg(long, env = "VIDFETCH_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,

    /// Allowed CORS origin; repeat for several. All origins when omitted
    #[arg(long = "allow-origin", env = "VIDFETCH_ALLOW_ORIGINS", value_delimiter = ',')]
    pub allow_origins: Vec<String>,
}
