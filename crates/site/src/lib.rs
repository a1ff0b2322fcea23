//! Local Directory site library.
//!
//! This crate provides the directory website as a library so the router can
//! be driven in tests against an in-memory store and reused by the CLI.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;

use axum::{Router, middleware::from_fn};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use state::AppState;

/// Static assets, relative to the workspace root the binary runs from.
pub const STATIC_DIR: &str = "crates/site/static";

/// Build the application router with its middleware stack.
///
/// The Sentry layers are added by the binary; everything else a request
/// touches is assembled here.
pub fn app(state: AppState) -> Router {
    routes::routes()
        .nest_service("/static", ServeDir::new(STATIC_DIR))
        .with_state(state)
        .layer(from_fn(middleware::security_headers_middleware))
        .layer(from_fn(middleware::request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = tracing::field::Empty,
                )
            }),
        )
}
