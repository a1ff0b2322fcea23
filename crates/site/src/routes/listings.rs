//! City and category listing handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tracing::instrument;

use local_directory_core::display::{category_display, city_display};
use local_directory_core::pagination::parse_page;

use super::views::{BusinessCardView, FacetView, PageMeta, PaginationView};
use crate::error::{AppError, Result};
use crate::filters;
use crate::state::AppState;

/// Query parameters for the city listing.
#[derive(Debug, Default, Deserialize)]
pub struct ListingQuery {
    pub q: Option<String>,
    pub page: Option<String>,
}

impl ListingQuery {
    /// Search term, trimmed; blank means no search.
    fn search(&self) -> Option<&str> {
        self.q.as_deref().map(str::trim).filter(|q| !q.is_empty())
    }

    fn page(&self) -> u32 {
        self.page.as_deref().map_or(1, parse_page)
    }
}

/// City listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "listings/city.html")]
pub struct CityTemplate {
    pub meta: PageMeta,
    pub city: String,
    pub city_label: String,
    pub search: String,
    pub total: u64,
    pub businesses: Vec<BusinessCardView>,
    pub categories: Vec<FacetView>,
    pub cities: Vec<FacetView>,
    pub pagination: Option<PaginationView>,
}

/// Category listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "listings/category.html")]
pub struct CategoryTemplate {
    pub meta: PageMeta,
    pub city: String,
    pub city_label: String,
    pub category_label: String,
    pub businesses: Vec<BusinessCardView>,
    pub categories: Vec<FacetView>,
}

/// Display every business in a city, with optional search and pagination.
///
/// A search with no hits renders an empty state; a city with no listings
/// at all is a 404.
#[instrument(skip(state))]
pub async fn city(
    State(state): State<AppState>,
    Path(city): Path<String>,
    Query(query): Query<ListingQuery>,
) -> Result<Response> {
    let city = city.to_lowercase();
    let search = query.search();
    let directory = state.directory();

    let (result, categories, cities) = tokio::try_join!(
        directory.search_city(&city, search, query.page()),
        directory.category_counts(&city),
        directory.city_counts(),
    )?;

    if result.is_empty() && search.is_none() {
        return Err(AppError::NotFound(format!("no listings in {city}")));
    }

    let city_label = city_display(&city);
    let (title, description) = match search {
        Some(q) => (
            format!("Search results for \"{q}\" in {city_label}"),
            format!("Search results for \"{q}\" in {city_label}."),
        ),
        None => (
            format!("All Services in {city_label}"),
            format!("Browse all service providers in {city_label}."),
        ),
    };

    let base = search.map_or_else(
        || format!("/{city}/all?"),
        |q| format!("/{city}/all?q={}&", urlencoding::encode(q)),
    );

    Ok(CityTemplate {
        meta: PageMeta::new(state.config(), title, description),
        categories: FacetView::categories(&city, &categories, None),
        cities: FacetView::cities(&cities, Some(&city)),
        pagination: PaginationView::build(&base, u64::from(result.page), result.total_pages),
        businesses: result.businesses.iter().map(BusinessCardView::from).collect(),
        total: result.total,
        search: search.unwrap_or_default().to_string(),
        city_label,
        city,
    }
    .into_response())
}

/// Display every business in one city and category.
#[instrument(skip(state))]
pub async fn category(
    State(state): State<AppState>,
    Path((city, category)): Path<(String, String)>,
) -> Result<Response> {
    let city = city.to_lowercase();
    let category = category.to_lowercase();
    let directory = state.directory();

    let (businesses, categories) = tokio::try_join!(
        directory.list_by_city_and_category(&city, &category),
        directory.category_counts(&city),
    )?;

    if businesses.is_empty() {
        return Err(AppError::NotFound(format!("no {category} in {city}")));
    }

    let city_label = city_display(&city);
    let category_label = category_display(&category);

    Ok(CategoryTemplate {
        meta: PageMeta::new(
            state.config(),
            format!("{category_label} in {city_label}"),
            format!("Find trusted {category} in {city_label}."),
        ),
        businesses: businesses.iter().map(BusinessCardView::from).collect(),
        categories: FacetView::categories(&city, &categories, Some(&category)),
        city_label,
        category_label,
        city,
    }
    .into_response())
}
