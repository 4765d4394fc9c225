//! Badgeboard Server Binary
//!
//! Loads the record store and serves the command protocol over TCP.

use std::sync::Arc;

use badgeboard::network::{Handler, Server};
use badgeboard::uploads::UploadNamer;
use badgeboard::{Config, RecordStore};
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

/// Badgeboard Server
#[derive(Parser, Debug)]
#[command(name = "badgeboard-server")]
#[command(about = "Team achievement board backed by CSV files")]
#[command(version)]
struct Args {
    /// Directory holding members.csv and achievements.csv
    #[arg(short, long, default_value = "./data")]
    data_dir: String,

    /// Directory for uploaded images
    #[arg(short, long, default_value = "./uploads")]
    uploads_dir: String,

    /// Listen address (host:port)
    #[arg(short, long, default_value = "127.0.0.1:5000")]
    listen: String,

    /// Number of connection worker threads
    #[arg(short, long, default_value = "8")]
    workers: usize,

    /// Largest accepted upload in MB
    #[arg(short = 'm', long, default_value = "10")]
    max_upload_mb: usize,
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,badgeboard=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();

    tracing::info!("Badgeboard Server v{}", badgeboard::VERSION);
    tracing::info!("Data directory: {}", args.data_dir);
    tracing::info!("Uploads directory: {}", args.uploads_dir);

    let config = match Config::builder()
        .data_dir(&args.data_dir)
        .uploads_dir(&args.uploads_dir)
        .listen_addr(&args.listen)
        .workers(args.workers)
        .max_upload_mb(args.max_upload_mb)
    {
        Ok(builder) => builder.build(),
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    let store = match RecordStore::open(&config) {
        Ok(s) => Arc::new(s),
        Err(e) => {
            tracing::error!("Failed to open record store: {}", e);
            std::process::exit(1);
        }
    };

    let uploads = match UploadNamer::open(&config) {
        Ok(u) => u,
        Err(e) => {
            tracing::error!("Failed to prepare upload directories: {}", e);
            std::process::exit(1);
        }
    };

    let handler = Arc::new(Handler::new(store, uploads, &config));

    let server = match Server::bind(config, handler) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("Failed to start server: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = server.run() {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }

    tracing::info!("Server stopped");
}
