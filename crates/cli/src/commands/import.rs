//! Bulk CSV import from the command line.

use std::path::Path;

use tracing::{error, info};

use local_directory_core::ingest;
use local_directory_site::db::BusinessRepository;
use local_directory_site::services::reconcile;

use super::connect;

/// Ingest `path` and reconcile it against the database.
///
/// With `dry_run`, the file is only validated and summarized.
///
/// # Errors
///
/// Returns an error if the file cannot be read, fails ingestion, or the
/// database is unreachable.
pub async fn csv_file(path: &Path, dry_run: bool) -> Result<(), Box<dyn std::error::Error>> {
    info!(path = %path.display(), "Reading CSV file");
    let text = tokio::fs::read_to_string(path).await?;

    let records = ingest(&text).inspect_err(|e| error!("Rejected {}: {e}", path.display()))?;
    info!(businesses = records.len(), "CSV validated");

    if dry_run {
        for record in &records {
            info!("  {} ({}, {})", record.name, record.category, record.city);
        }
        info!("Dry run, nothing written");
        return Ok(());
    }

    let store = BusinessRepository::new(connect().await?);
    let results = reconcile(&store, &records).await;

    info!("Import complete!");
    info!("  Created: {}", results.created);
    info!("  Updated: {}", results.updated);
    info!("  Errors: {}", results.errors);

    Ok(())
}
