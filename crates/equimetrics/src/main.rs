//! Equimetrics unified launcher.
//!
//! One binary for the whole pipeline: `serve` runs the API server; the
//! remaining subcommands drive a running server through the client bridge.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use equimetrics_client::{offline, EquipmentApi};
use equimetrics_db::EquipmentDb;
use equimetrics_server::{default_db_path, logging, router};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};

const DEFAULT_URL: &str = "http://127.0.0.1:8000/api";

#[derive(Parser, Debug)]
#[command(name = "equimetrics", about = "Equipment ingestion, aggregation and reporting")]
struct Cli {
    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the API server
    Serve {
        /// Port to listen on
        #[arg(long, default_value_t = 8000)]
        port: u16,
        /// Database file (defaults to ~/.equimetrics/equimetrics.sqlite3)
        #[arg(long)]
        db: Option<PathBuf>,
    },
    /// Upload a CSV file to a running server
    Upload {
        /// CSV file to ingest
        file: PathBuf,
        /// API base URL
        #[arg(long, default_value = DEFAULT_URL)]
        url: String,
    },
    /// Print the current summary
    Summary {
        /// API base URL
        #[arg(long, default_value = DEFAULT_URL)]
        url: String,
        /// Also save the summary JSON to this path
        #[arg(long)]
        json_out: Option<PathBuf>,
    },
    /// Download the PDF report
    Report {
        /// Where to save the PDF
        out: PathBuf,
        /// API base URL
        #[arg(long, default_value = DEFAULT_URL)]
        url: String,
    },
    /// List recent uploads
    History {
        /// API base URL
        #[arg(long, default_value = DEFAULT_URL)]
        url: String,
    },
    /// Summarize a local CSV without a server
    Local {
        /// CSV file to analyze
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    match run(cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "Command failed");
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Command) -> Result<()> {
    match command {
        Command::Serve { port, db } => serve(port, db).await,
        Command::Upload { file, url } => upload(&url, &file).await,
        Command::Summary { url, json_out } => summary(&url, json_out).await,
        Command::Report { out, url } => report(&url, &out).await,
        Command::History { url } => history(&url).await,
        Command::Local { file } => local(&file),
    }
}

async fn serve(port: u16, db: Option<PathBuf>) -> Result<()> {
    let db_path = db.unwrap_or_else(default_db_path);
    let db = EquipmentDb::open(&db_path)
        .await
        .with_context(|| format!("Failed to open database at {}", db_path.display()))?;

    let app = router(db);
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
        .await
        .with_context(|| format!("Failed to bind port {port}"))?;

    info!(port, db = %db_path.display(), "Equimetrics server listening");
    axum::serve(listener, app).await.context("Server exited")
}

async fn upload(url: &str, file: &PathBuf) -> Result<()> {
    let api = EquipmentApi::new(url);
    let outcome = api
        .upload_csv(file)
        .await
        .with_context(|| format!("Upload of {} failed", file.display()))?;

    println!("{} ({} rows)", outcome.message, outcome.rows);
    for record in &outcome.data_preview {
        println!(
            "  {:>6}  {:<28} {:<20} {}",
            record.equipment_id, record.equipment_name, record.equipment_type, record.purchase_year
        );
    }
    Ok(())
}

async fn summary(url: &str, json_out: Option<PathBuf>) -> Result<()> {
    let api = EquipmentApi::new(url);
    let summary = api.get_summary().await.context("Summary fetch failed")?;

    println!("Total equipment:       {}", summary.total_equipment);
    println!("Average purchase year: {:.2}", summary.avg_purchase_year);
    println!("Type distribution:");
    for (equipment_type, count) in &summary.type_distribution {
        println!("  {equipment_type}: {count}");
    }

    if let Some(path) = json_out {
        std::fs::write(&path, serde_json::to_vec_pretty(&summary)?)?;
        println!("Summary JSON written to {}", path.display());
    }
    Ok(())
}

async fn report(url: &str, out: &PathBuf) -> Result<()> {
    let api = EquipmentApi::new(url);
    api.generate_pdf(out)
        .await
        .context("Report download failed")?;
    println!("Report saved to {}", out.display());
    Ok(())
}

async fn history(url: &str) -> Result<()> {
    let api = EquipmentApi::new(url);
    let uploads = api.get_history().await.context("History fetch failed")?;

    if uploads.is_empty() {
        println!("No uploads yet");
        return Ok(());
    }
    for event in uploads {
        println!(
            "{}  {:<32} {} rows",
            event.uploaded_at.format("%Y-%m-%d %H:%M:%S"),
            event.filename,
            event.rows
        );
    }
    Ok(())
}

fn local(file: &PathBuf) -> Result<()> {
    let summary = offline::summarize_local_csv(file)
        .with_context(|| format!("Failed to summarize {}", file.display()))?;

    println!("Rows:            {}", summary.total_count);
    println!("Avg flowrate:    {:.2}", summary.avg_flowrate);
    println!("Avg pressure:    {:.2}", summary.avg_pressure);
    println!("Avg temperature: {:.2}", summary.avg_temperature);
    println!("Type distribution:");
    for (equipment_type, count) in &summary.type_distribution {
        println!("  {equipment_type}: {count}");
    }
    Ok(())
}
