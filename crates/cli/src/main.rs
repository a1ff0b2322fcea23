//! Local Directory CLI - Database migrations, seeding and bulk import.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! dir-cli migrate
//!
//! # Replace all listings with the bundled sample businesses
//! dir-cli seed
//!
//! # Replace all listings with businesses from a YAML file
//! dir-cli seed --file listings.yaml
//!
//! # Import a CSV file (or just validate it)
//! dir-cli import listings.csv
//! dir-cli import listings.csv --dry-run
//! ```
//!
//! # Environment Variables
//!
//! - `DIRECTORY_DATABASE_URL` (or `DATABASE_URL`) - `PostgreSQL` connection string

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "dir-cli", version, about = "Maintain the local business directory database")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Clear all listings and load sample businesses
    Seed {
        /// YAML file of businesses (defaults to the bundled samples)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
    /// Import businesses from a CSV file
    Import {
        /// Path to the CSV file
        csv: PathBuf,

        /// Validate the file without writing anything
        #[arg(long)]
        dry_run: bool,
    },
}

impl Commands {
    async fn run(self) -> Result<(), Box<dyn std::error::Error>> {
        match self {
            Self::Migrate => commands::migrate::run().await?,
            Self::Seed { file } => commands::seed::businesses(file.as_deref()).await?,
            Self::Import { csv, dry_run } => commands::import::csv_file(&csv, dry_run).await?,
        }
        Ok(())
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match Cli::parse().command.run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("dir-cli failed: {e}");
            ExitCode::FAILURE
        }
    }
}
