//! Integration tests for Local Directory.
//!
//! # Running Tests
//!
//! ```bash
//! # In-process tests (memory store, no services needed)
//! cargo test -p local-directory-integration-tests
//!
//! # Tests against Postgres and a running site
//! cargo run -p local-directory-cli -- migrate
//! cargo run -p local-directory-site &
//! cargo test -p local-directory-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `directory_flow` - Import then browse, through the full router
//! - `postgres_store` - `BusinessRepository` against a real database
//! - `site_http` - HTTP checks against a running server

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::sync::Arc;

use axum::Router;
use secrecy::SecretString;

use local_directory_site::config::SiteConfig;
use local_directory_site::state::AppState;
use local_directory_site::store::MemoryStore;

/// Base URL of a running site (configurable via environment).
#[must_use]
pub fn site_base_url() -> String {
    std::env::var("SITE_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// Database URL for store tests.
#[must_use]
pub fn database_url() -> SecretString {
    std::env::var("DIRECTORY_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .unwrap_or_else(|_| "postgres://localhost/local_directory_test".to_string())
        .into()
}

/// Configuration for in-process tests.
#[must_use]
pub fn test_config() -> SiteConfig {
    SiteConfig {
        database_url: database_url(),
        host: "127.0.0.1".parse().unwrap(),
        port: 3000,
        base_url: "https://directory.test".to_string(),
        site_name: "AuroraILServices".to_string(),
        default_city: "aurora-il".to_string(),
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 0.0,
    }
}

/// Full application router over a fresh memory store.
#[must_use]
pub fn memory_app() -> (Router, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let state = AppState::with_store(test_config(), store.clone());
    (local_directory_site::app(state), store)
}
