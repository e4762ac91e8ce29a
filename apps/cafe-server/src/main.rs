//! # Cafe POS Server Entry Point
//!
//! ```bash
//! # Platform config file, or defaults
//! cafe-server
//!
//! # Explicit config file
//! cafe-server --config ./cafe-pos.toml
//!
//! # Override from the environment
//! CAFE_PORT=9000 CAFE_DB_PATH=./data/cafe.db cafe-server
//! ```

use std::path::PathBuf;

use cafe_server::{init_tracing, run, ServerConfig};
use clap::Parser;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "cafe-server", version, about = "Cafe POS HTTP server")]
struct Cli {
    /// Path to cafe-pos.toml
    #[arg(short, long, env = "CAFE_CONFIG")]
    config: Option<PathBuf>,

    /// Print the effective configuration and exit
    #[arg(long)]
    print_config: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing();

    let config = ServerConfig::load(cli.config)?;

    if cli.print_config {
        println!("{}", toml::to_string_pretty(&config)?);
        return Ok(());
    }

    info!(
        bind = %config.server.bind_address(),
        db = %config.database.path.display(),
        utc_offset_minutes = config.locale.utc_offset_minutes,
        "Starting Cafe POS server"
    );

    run(config).await
}
