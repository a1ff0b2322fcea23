//! `PostgreSQL` persistence for business listings.
//!
//! All listings live in `directory.business`: one row per business, unique on
//! `slug`, with indexes on `(city, category)` and `city` for the listing
//! pages. The schema comes from `crates/site/migrations/`, applied by
//! `dir-cli migrate` and never at site startup.

pub mod businesses;

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use businesses::BusinessRepository;

/// Failure from a [`BusinessRepository`] call.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A stored row violates a rule the type system relies on.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// No business with the requested id.
    #[error("not found")]
    NotFound,

    /// A write collided with a unique key (the slug).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

impl RepositoryError {
    /// Classify a failed insert or update. Unique violations on `column`
    /// become [`Self::Conflict`]; anything else stays a database error.
    pub(crate) fn from_write(err: sqlx::Error, column: &str) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                Self::Conflict(format!("{column} already exists"))
            }
            _ => Self::Database(err),
        }
    }
}

const MAX_CONNECTIONS: u32 = 10;
const MIN_CONNECTIONS: u32 = 2;
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(10);

/// Open the connection pool shared by the site and the CLI.
///
/// # Errors
///
/// Returns `sqlx::Error` when the URL is malformed or no connection can be
/// made within the acquire timeout.
pub async fn create_pool(database_url: &SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .min_connections(MIN_CONNECTIONS)
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .connect(database_url.expose_secret())
        .await
}
