//! Seed the directory with sample businesses.
//!
//! Seeding is destructive: every existing listing is deleted before the
//! samples are loaded through the same reconciler the import tools use.

use std::path::Path;

use tracing::info;

use local_directory_core::CandidateRecord;
use local_directory_site::db::BusinessRepository;
use local_directory_site::services::reconcile;
use local_directory_site::store::BusinessStore;

use super::connect;

/// Sample businesses bundled with the binary.
const BUNDLED: &str = include_str!("../../seed/businesses.yaml");

/// Parse a YAML list of businesses.
fn parse(content: &str) -> Result<Vec<CandidateRecord>, serde_yaml::Error> {
    serde_yaml::from_str(content)
}

/// Replace all listings with the businesses in `file`, or the bundled samples.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or if the
/// database is unreachable.
pub async fn businesses(file: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    // Parse before connecting so a bad file never clears the table
    let records = match file {
        Some(path) => {
            info!(path = %path.display(), "Loading businesses from file");
            parse(&tokio::fs::read_to_string(path).await?)?
        }
        None => parse(BUNDLED)?,
    };
    info!(businesses = records.len(), "Parsed seed data");

    let store = BusinessRepository::new(connect().await?);

    let removed = store.delete_all().await?;
    info!(removed, "Cleared existing businesses");

    let results = reconcile(&store, &records).await;

    info!("Seeding complete!");
    info!("  Created: {}", results.created);
    info!("  Updated: {}", results.updated);
    info!("  Errors: {}", results.errors);

    Ok(())
}
