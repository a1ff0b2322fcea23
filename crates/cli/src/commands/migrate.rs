//! Database migration command.
//!
//! Migrations live in `crates/site/migrations/` and are embedded at compile
//! time.

use super::{CommandError, connect};

/// Migration failures.
#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    #[error(transparent)]
    Command(#[from] CommandError),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Run all pending site migrations.
///
/// # Errors
///
/// Returns an error if the database is unreachable or a migration fails.
pub async fn run() -> Result<(), MigrationError> {
    let pool = connect().await?;

    tracing::info!("Running migrations...");
    sqlx::migrate!("../site/migrations").run(&pool).await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
