//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tracing::instrument;

use local_directory_core::display::city_display;

use super::views::{FacetView, PageMeta};
use crate::filters;
use crate::state::AppState;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub meta: PageMeta,
    /// City key the search form targets.
    pub city: String,
    pub city_label: String,
    /// Categories with listings in the default city.
    pub categories: Vec<FacetView>,
    /// Every city with listings.
    pub cities: Vec<FacetView>,
}

/// Display the home page.
///
/// Facet lookups that fail are logged and rendered as empty sections so the
/// page itself always loads.
#[instrument(skip(state))]
pub async fn home(State(state): State<AppState>) -> impl IntoResponse {
    let city = state.config().default_city.clone();
    let city_label = city_display(&city);
    let directory = state.directory();

    let categories = directory.category_counts(&city).await.map_or_else(
        |e| {
            tracing::error!("Failed to load category counts: {e}");
            Vec::new()
        },
        |counts| FacetView::categories(&city, &counts, None),
    );

    let cities = directory.city_counts().await.map_or_else(
        |e| {
            tracing::error!("Failed to load city counts: {e}");
            Vec::new()
        },
        |counts| FacetView::cities(&counts, None),
    );

    HomeTemplate {
        meta: PageMeta::new(
            state.config(),
            format!("Local Services in {city_label}"),
            format!("Find trusted plumbers, contractors, notaries and more in {city_label}."),
        ),
        city,
        city_label,
        categories,
        cities,
    }
}
