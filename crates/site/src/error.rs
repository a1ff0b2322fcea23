//! Page-level error type with Sentry reporting.
//!
//! Page handlers return [`Result<T>`]. Server-side failures are captured to
//! Sentry and logged before a generic body goes back to the client. The JSON
//! import API answers with its own `{ "error": ... }` body, see `routes::api`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::db::RepositoryError;

/// Errors a page handler can end with.
#[derive(Debug, Error)]
pub enum AppError {
    /// The business store failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// No page at this URL.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The request could not be understood.
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status this error maps to.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Body text for the client. Server-side details stay in the logs.
    #[must_use]
    pub fn public_message(&self) -> String {
        if self.status().is_server_error() {
            "Internal server error".to_string()
        } else {
            self.to_string()
        }
    }

    /// Send 5xx errors to Sentry and the log; client errors are not reported.
    pub(crate) fn report(&self) {
        if !self.status().is_server_error() {
            return;
        }
        let event_id = sentry::capture_error(self);
        tracing::error!(error = %self, sentry_event_id = %event_id, "Request failed");
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.report();
        (self.status(), self.public_message()).into_response()
    }
}

/// Result alias for page handlers.
pub type Result<T> = std::result::Result<T, AppError>;

/// Record an admin action as a Sentry breadcrumb.
///
/// If a later request on the same hub fails, the event carries the trail of
/// imports that preceded it.
///
/// ```rust,ignore
/// add_breadcrumb("import", "CSV previewed", &[("rows", "12")]);
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: &[(&str, &str)]) {
    sentry::add_breadcrumb(sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        data: data
            .iter()
            .map(|&(key, value)| (key.to_string(), serde_json::Value::from(value)))
            .collect(),
        ..Default::default()
    });
}
