use std::path::PathBuf;

use clap::Parser;
use guestbook_server::ServerConfig;
use guestbook_store::Database;

#[derive(Parser, Debug)]
#[command(name = "guestbook", about = "A tiny guestbook web service")]
struct Cli {
    /// Port to listen on.
    #[arg(long, env = "PORT")]
    port: Option<u16>,

    /// Path to the SQLite database file.
    #[arg(long, env = "SQLITE_DB_PATH")]
    db_path: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = ServerConfig::default();
    if let Some(port) = cli.port {
        config.port = port;
    }
    let db_path = cli
        .db_path
        .unwrap_or_else(|| PathBuf::from("data/guestbook.db"));

    let db = Database::open(&db_path)?;
    tracing::info!(path = %db_path.display(), "database ready");

    let handle = guestbook_server::start(config, db).await?;
    tracing::info!(port = handle.port, "guestbook ready");

    tokio::signal::ctrl_c().await?;
    tracing::info!("shutting down");

    Ok(())
}
