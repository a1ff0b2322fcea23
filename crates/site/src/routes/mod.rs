//! HTTP route handlers for the directory site.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home page (default city's categories, all cities)
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Store readiness check
//! GET  /sitemap.xml            - Sitemap
//!
//! # Listings
//! GET  /{city}/all             - City listing with ?q= search and ?page=
//! GET  /{city}/{category}      - Category listing
//!
//! # Businesses
//! GET  /business/{slug}        - Detail page (counts a view)
//! GET  /businesses/{id}        - Legacy URL, permanent redirect
//!
//! # Admin (unauthenticated; front with a proxy)
//! GET  /admin/upload           - CSV upload form
//! POST /admin/upload           - Parse an uploaded CSV and preview it
//! POST /admin/import           - Import previewed CSV text
//!
//! # API
//! POST /api/admin/import       - Import JSON `{ businesses: [...] }`
//! ```

pub mod admin;
pub mod api;
pub mod business;
pub mod health;
pub mod home;
pub mod listings;
pub mod sitemap;
pub mod views;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the admin routes router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/upload", get(admin::upload_page).post(admin::upload))
        .route("/import", post(admin::import))
}

/// Create the JSON API routes router.
pub fn api_routes() -> Router<AppState> {
    Router::new().route("/admin/import", post(api::import))
}

/// Create the health check routes router.
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(health::health))
        .route("/ready", get(health::readiness))
}

/// Create all routes for the site.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/sitemap.xml", get(sitemap::sitemap))
        .nest("/health", health_routes())
        // Businesses
        .route("/business/{slug}", get(business::show))
        .route("/businesses/{id}", get(business::legacy_redirect))
        // Admin import tool
        .nest("/admin", admin_routes())
        .nest("/api", api_routes())
        // Listings (static segments above take priority)
        .route("/{city}/all", get(listings::city))
        .route("/{city}/{category}", get(listings::category))
}
