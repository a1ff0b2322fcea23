//! JSON import API.
//!
//! Accepts already-parsed candidate records, so callers that build listings
//! programmatically can skip the CSV step.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::{error, instrument, warn};

use local_directory_core::CandidateRecord;

use crate::error::add_breadcrumb;
use crate::services::{ImportResults, reconcile};
use crate::state::AppState;

/// Error response for API endpoints.
#[derive(Debug, Serialize)]
pub struct ApiError {
    #[serde(skip)]
    status: StatusCode,
    pub error: String,
}

impl ApiError {
    fn bad_request(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error: msg.into(),
        }
    }

    fn internal(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            error: msg.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

/// Request body for `POST /api/admin/import`.
///
/// Entries stay untyped until reconciliation so one malformed record (a
/// `null` phone, a number where a string belongs) is counted as an error
/// instead of rejecting the whole body.
#[derive(Debug, Deserialize)]
pub struct ImportRequest {
    pub businesses: Option<Vec<serde_json::Value>>,
}

/// Response body for a completed import.
#[derive(Debug, Serialize)]
pub struct ImportResponse {
    pub message: &'static str,
    pub results: ImportResults,
}

/// Import a batch of candidate records.
///
/// Individual record failures are counted in `results.errors`; only an
/// unusable request or an unreachable store fails the whole call.
#[instrument(skip_all)]
pub async fn import(
    State(state): State<AppState>,
    body: Result<Json<ImportRequest>, JsonRejection>,
) -> Result<Json<ImportResponse>, ApiError> {
    let Json(request) = body.map_err(|e| ApiError::bad_request(e.body_text()))?;

    let records = match request.businesses {
        Some(records) if !records.is_empty() => records,
        _ => return Err(ApiError::bad_request("No businesses provided")),
    };
    let submitted = records.len();

    if let Err(e) = state.store().ping().await {
        error!("Store unavailable for import: {e}");
        sentry::capture_error(&e);
        return Err(ApiError::internal("Failed to import businesses"));
    }

    let candidates: Vec<CandidateRecord> = records
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| {
            serde_json::from_value(value)
                .inspect_err(|e| warn!(index, error = %e, "Malformed import record"))
                .ok()
        })
        .collect();
    let malformed = u32::try_from(submitted - candidates.len()).unwrap_or(u32::MAX);

    let mut results = reconcile(state.store(), &candidates).await;
    results.errors = results.errors.saturating_add(malformed);
    state.facets().invalidate_all();

    let total = results.total().to_string();
    add_breadcrumb("import", "JSON import", &[("records", total.as_str())]);

    Ok(Json(ImportResponse {
        message: "Import completed",
        results,
    }))
}
