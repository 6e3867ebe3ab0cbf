//! CLI entry point for mail-store.

use clap::Parser;
use mail_store::{start_server, ServerOptions, DEFAULT_DB_PATH};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "mail-store")]
#[command(about = "Store mail records in a JSON file and serve them over HTTP")]
struct Cli {
    /// HTTP port to listen on
    #[arg(short = 'p', long, default_value = "5000")]
    port: u16,

    /// Address to bind
    #[arg(short = 'b', long, default_value = "127.0.0.1")]
    bind: String,

    /// Path to the JSON snapshot file
    #[arg(short = 'd', long, default_value = DEFAULT_DB_PATH)]
    db: PathBuf,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let opts = ServerOptions {
        bind: Some(cli.bind),
        port: Some(cli.port),
        db_path: Some(cli.db),
    };

    let server = start_server(opts).await?;

    // Wait for Ctrl+C
    tokio::signal::ctrl_c().await?;
    server.stop().await;

    Ok(())
}
