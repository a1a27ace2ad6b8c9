//! CLI entry point - the composition root.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use vidfetch_cli::{Cli, Commands, handlers};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables before clap reads VIDFETCH_*
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.default_log_filter()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Commands::Web(args) => handlers::web::execute(args).await,
        Commands::Paths => handlers::paths::execute(),
    }
}
