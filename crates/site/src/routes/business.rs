//! Business detail handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use tracing::instrument;

use local_directory_core::display::{category_display, city_display, website_href, website_label};
use local_directory_core::{Business, BusinessId};

use super::views::PageMeta;
use crate::error::{AppError, Result};
use crate::filters;
use crate::state::AppState;

/// Business detail display data.
#[derive(Clone)]
pub struct BusinessDetailView {
    pub name: String,
    pub description: Option<String>,
    pub phone: String,
    pub email: Option<String>,
    pub website_href: Option<String>,
    pub website_label: Option<String>,
    pub address: Option<String>,
    pub zip: Option<String>,
    pub is_featured: bool,
    pub city: String,
    pub city_label: String,
    pub category: String,
    pub category_label: String,
}

impl From<Business> for BusinessDetailView {
    fn from(business: Business) -> Self {
        Self {
            website_href: business.website.as_deref().map(website_href),
            website_label: business
                .website
                .as_deref()
                .map(|w| website_label(w).to_string()),
            city_label: city_display(&business.city),
            category_label: category_display(&business.category),
            name: business.name,
            description: business.description,
            phone: business.phone,
            email: business.email,
            address: business.address,
            zip: business.zip,
            is_featured: business.is_featured,
            city: business.city,
            category: business.category,
        }
    }
}

/// Business detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "business.html")]
pub struct BusinessTemplate {
    pub meta: PageMeta,
    pub business: BusinessDetailView,
}

/// Display a business and count the view.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>, Path(slug): Path<String>) -> Result<Response> {
    let business = state
        .directory()
        .view_business(&slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("business {slug}")))?;

    let description = business.description.clone().unwrap_or_else(|| {
        format!(
            "Contact information and details for {} in {}.",
            business.name,
            city_display(&business.city)
        )
    });
    let meta = PageMeta::new(state.config(), business.name.clone(), description);

    Ok(BusinessTemplate {
        meta,
        business: business.into(),
    }
    .into_response())
}

/// Redirect a legacy `/businesses/{id}` URL.
///
/// Known IDs go to the business's slug URL; anything else goes home.
#[instrument(skip(state))]
pub async fn legacy_redirect(State(state): State<AppState>, Path(id): Path<String>) -> Result<Redirect> {
    let Ok(id) = id.parse::<BusinessId>() else {
        return Ok(Redirect::permanent("/"));
    };

    let target = state
        .store()
        .find_by_id(id)
        .await?
        .map_or_else(|| "/".to_string(), |b| format!("/business/{}", b.slug));

    Ok(Redirect::permanent(&target))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::{StatusCode, header};

    use super::super::tests::{body_text, get, record, state_with};
    use crate::store::BusinessStore;
    use local_directory_core::CandidateRecord;

    #[tokio::test]
    async fn test_detail_page_shows_contact_and_counts_view() {
        let (state, store) = state_with(&[CandidateRecord {
            website: Some("acme.example".to_string()),
            email: Some("hi@acme.example".to_string()),
            ..record("Acme Plumbing", "plumbers")
        }])
        .await;

        let response = get(state, "/business/acme-plumbing-aurora-il").await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_text(response).await;
        assert!(body.contains("(630) 555-1234"));
        assert!(body.contains("tel:6305551234"));
        assert!(body.contains("https://acme.example"));
        assert!(body.contains("mailto:hi@acme.example"));

        let stored = store
            .find_by_slug("acme-plumbing-aurora-il")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.view_count, 1);
    }

    #[tokio::test]
    async fn test_unknown_slug_is_404() {
        let (state, _) = state_with(&[]).await;
        let response = get(state, "/business/nope").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_legacy_id_redirects_to_slug() {
        let (state, _) = state_with(&[record("Acme Plumbing", "plumbers")]).await;
        let response = get(state, "/businesses/1").await;
        assert_eq!(response.status(), StatusCode::PERMANENT_REDIRECT);
        assert_eq!(
            response.headers()[header::LOCATION],
            "/business/acme-plumbing-aurora-il"
        );
    }

    #[tokio::test]
    async fn test_legacy_unknown_or_bad_id_redirects_home() {
        let (state, _) = state_with(&[]).await;
        for uri in ["/businesses/99", "/businesses/abc"] {
            let response = get(state.clone(), uri).await;
            assert_eq!(response.status(), StatusCode::PERMANENT_REDIRECT);
            assert_eq!(response.headers()[header::LOCATION], "/");
        }
    }
}
