//! Equimetrics API server binary.

use anyhow::{Context, Result};
use clap::Parser;
use equimetrics_db::EquipmentDb;
use equimetrics_server::{default_db_path, logging, router};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "equimetrics_server", about = "Equipment ingestion and reporting API")]
struct Args {
    /// Port to listen on
    #[arg(long, default_value_t = 8000, env = "EQUIMETRICS_PORT")]
    port: u16,

    /// Database file (defaults to ~/.equimetrics/equimetrics.sqlite3)
    #[arg(long)]
    db: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    logging::init_logging(args.verbose);

    let db_path = args.db.unwrap_or_else(default_db_path);
    let db = EquipmentDb::open(&db_path)
        .await
        .with_context(|| format!("Failed to open database at {}", db_path.display()))?;

    let app = router(db);
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", args.port))
        .await
        .with_context(|| format!("Failed to bind port {}", args.port))?;

    info!(port = args.port, db = %db_path.display(), "Equimetrics server listening");

    axum::serve(listener, app).await.context("Server exited")?;

    Ok(())
}
