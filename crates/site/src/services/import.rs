//! Import reconciliation.
//!
//! Applies candidate records to the store one at a time. A record whose
//! `(name, city)` already exists overwrites that listing; anything else is
//! created. Each record succeeds or fails on its own, so the caller only
//! ever sees the aggregate tally.

use serde::Serialize;
use tracing::{instrument, warn};

use local_directory_core::{Business, CandidateRecord, business_slug};

use crate::db::RepositoryError;
use crate::store::BusinessStore;

/// Outcome counts for one import batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportResults {
    pub created: u32,
    pub updated: u32,
    pub errors: u32,
}

impl ImportResults {
    /// Total number of records considered.
    #[must_use]
    pub const fn total(&self) -> u32 {
        self.created + self.updated + self.errors
    }
}

enum Applied {
    Created,
    Updated,
}

/// Reconcile `records` against the store in list order.
///
/// Never fails as a whole: incomplete records and store errors are counted
/// in `errors` and the loop moves on.
#[instrument(skip(store, records), fields(records = records.len()))]
pub async fn reconcile(store: &dyn BusinessStore, records: &[CandidateRecord]) -> ImportResults {
    let mut results = ImportResults::default();

    for record in records {
        if !record.is_complete() {
            warn!(
                name = %record.name,
                city = %record.city,
                missing = ?record.missing_fields(),
                "Skipping incomplete import record"
            );
            results.errors += 1;
            continue;
        }

        match apply(store, record).await {
            Ok(Applied::Created) => results.created += 1,
            Ok(Applied::Updated) => results.updated += 1,
            Err(e) => {
                warn!(
                    name = %record.name,
                    city = %record.city,
                    error = %e,
                    "Failed to import record"
                );
                results.errors += 1;
            }
        }
    }

    tracing::info!(
        created = results.created,
        updated = results.updated,
        errors = results.errors,
        "Import completed"
    );

    results
}

async fn apply(store: &dyn BusinessStore, record: &CandidateRecord) -> Result<Applied, RepositoryError> {
    let slug = business_slug(&record.name, &record.city);

    let existing: Option<Business> = store
        .find_by_natural_key(&record.name, &record.city)
        .await?;

    match existing {
        Some(business) => {
            store.update(business.id, record, &slug).await?;
            Ok(Applied::Updated)
        }
        None => {
            store.create(record, &slug).await?;
            Ok(Applied::Created)
        }
    }
}
