//! Admin CSV import handlers.
//!
//! The upload is a two-step flow: `POST /admin/upload` parses the file and
//! shows a preview (or the first structural error), then `POST /admin/import`
//! re-parses the previewed text and reconciles it against the store.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Multipart, State},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tracing::{info, instrument};

use local_directory_core::{CandidateRecord, IngestError, ingest};

use super::views::PageMeta;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::services::{ImportResults, reconcile};
use crate::state::AppState;

/// Multipart field carrying the CSV file.
const CSV_FIELD: &str = "csv";

/// Upload form, preview and error page.
#[derive(Template, WebTemplate)]
#[template(path = "admin/upload.html")]
pub struct UploadTemplate {
    pub meta: PageMeta,
    pub error: Option<String>,
    pub file_name: Option<String>,
    /// Raw CSV text carried into the import form.
    pub csv: String,
    pub records: Vec<CandidateRecord>,
}

/// Import tally page.
#[derive(Template, WebTemplate)]
#[template(path = "admin/import_result.html")]
pub struct ImportResultTemplate {
    pub meta: PageMeta,
    pub results: ImportResults,
}

/// Form body for `POST /admin/import`.
#[derive(Debug, Deserialize)]
pub struct ImportForm {
    pub csv: String,
}

impl UploadTemplate {
    fn new(state: &AppState) -> Self {
        Self {
            meta: PageMeta::new(
                state.config(),
                "Import Businesses",
                "Upload a CSV file of business listings.",
            ),
            error: None,
            file_name: None,
            csv: String::new(),
            records: Vec::new(),
        }
    }

    fn with_error(mut self, error: impl ToString) -> Self {
        self.error = Some(error.to_string());
        self
    }
}

/// Display the CSV upload form.
pub async fn upload_page(State(state): State<AppState>) -> impl IntoResponse {
    UploadTemplate::new(&state)
}

/// Parse an uploaded CSV file and show what would be imported.
#[instrument(skip_all)]
pub async fn upload(State(state): State<AppState>, mut multipart: Multipart) -> Result<Response> {
    let page = UploadTemplate::new(&state);

    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.body_text()))?
    {
        if field.name() != Some(CSV_FIELD) {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let text = field
            .text()
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;
        upload = Some((file_name, text));
        break;
    }

    let Some((file_name, text)) = upload else {
        return Ok(page.with_error("Please select a CSV file").into_response());
    };

    if !file_name.ends_with(".csv") {
        return Ok(page.with_error("Please upload a CSV file").into_response());
    }

    match ingest(&text) {
        Ok(records) => {
            let rows = records.len().to_string();
            add_breadcrumb(
                "import",
                "CSV previewed",
                &[("file", file_name.as_str()), ("rows", rows.as_str())],
            );

            Ok(UploadTemplate {
                file_name: Some(file_name),
                csv: text,
                records,
                ..page
            }
            .into_response())
        }
        Err(e) => {
            info!(file = %file_name, error = %e, "Rejected CSV upload");
            Ok(UploadTemplate {
                file_name: Some(file_name),
                ..page.with_error(e)
            }
            .into_response())
        }
    }
}

/// Import previously previewed CSV text.
#[instrument(skip_all)]
pub async fn import(State(state): State<AppState>, Form(form): Form<ImportForm>) -> Result<Response> {
    let records = match ingest(&form.csv) {
        Ok(records) => records,
        Err(e) => return Ok(rejected(&state, &e)),
    };

    if records.is_empty() {
        return Ok(UploadTemplate::new(&state)
            .with_error("No businesses provided")
            .into_response());
    }

    state.store().ping().await?;

    let results = reconcile(state.store(), &records).await;
    state.facets().invalidate_all();

    let created = results.created.to_string();
    let updated = results.updated.to_string();
    let errors = results.errors.to_string();
    add_breadcrumb(
        "import",
        "CSV imported",
        &[
            ("created", created.as_str()),
            ("updated", updated.as_str()),
            ("errors", errors.as_str()),
        ],
    );

    Ok(ImportResultTemplate {
        meta: PageMeta::new(state.config(), "Import Complete", "CSV import results."),
        results,
    }
    .into_response())
}

fn rejected(state: &AppState, error: &IngestError) -> Response {
    info!(error = %error, "Rejected CSV import");
    UploadTemplate::new(state).with_error(error).into_response()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};

    use super::super::tests::{body_text, send, state_with};
    use crate::store::{BusinessFilter, BusinessStore};

    const BOUNDARY: &str = "XyZBoundary";

    fn multipart_request(file_name: &str, content: &str) -> Request<Body> {
        let body = format!(
            "--{BOUNDARY}\r\n\
             Content-Disposition: form-data; name=\"csv\"; filename=\"{file_name}\"\r\n\
             Content-Type: text/csv\r\n\r\n\
             {content}\r\n\
             --{BOUNDARY}--\r\n"
        );
        Request::post("/admin/upload")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    fn form_request(csv: &str) -> Request<Body> {
        let body = format!("csv={}", urlencoding::encode(csv));
        Request::post("/admin/import")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap()
    }

    const CSV: &str = "Business Name,Category,City,Phone\n\
                       Acme Plumbing,Plumbers,Aurora IL,6305551234\n\
                       Cool Air,HVAC,Aurora IL,6305552345";

    #[tokio::test]
    async fn test_upload_previews_records() {
        let (state, store) = state_with(&[]).await;
        let response = send(state, multipart_request("listings.csv", CSV)).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_text(response).await;
        assert!(body.contains("Acme Plumbing"));
        assert!(body.contains("aurora-il"));
        assert!(store.all().await.is_empty());
    }

    #[tokio::test]
    async fn test_upload_rejects_non_csv_name() {
        let (state, _) = state_with(&[]).await;
        let response = send(state, multipart_request("listings.txt", CSV)).await;
        assert!(body_text(response).await.contains("Please upload a CSV file"));
    }

    #[tokio::test]
    async fn test_upload_reports_missing_headers() {
        let (state, _) = state_with(&[]).await;
        let response = send(
            state,
            multipart_request("listings.csv", "Business Name,Category\nAcme,plumbers"),
        )
        .await;
        assert!(
            body_text(response)
                .await
                .contains("Missing required headers: City, Phone")
        );
    }

    #[tokio::test]
    async fn test_import_reconciles_and_shows_tally() {
        let (state, store) = state_with(&[]).await;
        let response = send(state.clone(), form_request(CSV)).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_text(response).await;
        assert!(body.contains("Created: 2"));

        let listed = store
            .find_many(&BusinessFilter::city("aurora-il"), None)
            .await
            .unwrap();
        assert_eq!(listed.len(), 2);

        let body = body_text(send(state, form_request(CSV)).await).await;
        assert!(body.contains("Updated: 2"));
    }

    #[tokio::test]
    async fn test_import_structural_error_persists_nothing() {
        let (state, store) = state_with(&[]).await;
        let csv = "Business Name,Category,City,Phone\nAcme,plumbers,aurora-il";
        let body = body_text(send(state, form_request(csv)).await).await;
        assert!(body.contains("Row 1 has incorrect number of columns"));
        assert!(store.all().await.is_empty());
    }
}
