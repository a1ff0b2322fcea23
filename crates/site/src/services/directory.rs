//! Directory query service.
//!
//! Composes filtered, ordered and paginated reads over the store for the
//! listing, search and detail pages.

use std::sync::Arc;

use tracing::{instrument, warn};

use local_directory_core::pagination::{self, PAGE_SIZE};
use local_directory_core::{Business, GroupCount};

use crate::db::RepositoryError;
use crate::services::facets::FacetCache;
use crate::store::{BusinessFilter, BusinessStore, Window};

/// One page of a city listing.
#[derive(Debug, Clone)]
pub struct CityPage {
    pub businesses: Vec<Business>,
    /// 1-based page that was requested.
    pub page: u32,
    /// Rows matching the filter across all pages.
    pub total: u64,
    pub total_pages: u64,
}

impl CityPage {
    /// `true` when no row matched at all, on any page.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.total == 0
    }
}

/// Read-side operations over the business collection.
#[derive(Clone)]
pub struct DirectoryService {
    store: Arc<dyn BusinessStore>,
    facets: FacetCache,
}

impl DirectoryService {
    /// Create a service over `store`, sharing `facets` with other handles.
    #[must_use]
    pub fn new(store: Arc<dyn BusinessStore>, facets: FacetCache) -> Self {
        Self { store, facets }
    }

    /// Every business in one city and category, featured first then by name.
    ///
    /// An empty list means nothing is listed there.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store query fails.
    #[instrument(skip(self))]
    pub async fn list_by_city_and_category(
        &self,
        city: &str,
        category: &str,
    ) -> Result<Vec<Business>, RepositoryError> {
        let filter = BusinessFilter::city(city).with_category(category);
        self.store.find_many(&filter, None).await
    }

    /// One page of a city's listings, optionally narrowed by a search term.
    ///
    /// Pages past the end come back empty with the real totals.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if either the listing or the count fails.
    #[instrument(skip(self))]
    pub async fn search_city(
        &self,
        city: &str,
        search: Option<&str>,
        page: u32,
    ) -> Result<CityPage, RepositoryError> {
        let page = page.max(1);
        let filter = BusinessFilter::city(city).with_search(search);
        let window = Window {
            limit: u64::from(PAGE_SIZE),
            offset: pagination::offset(page),
        };

        let (businesses, total) = tokio::try_join!(
            self.store.find_many(&filter, Some(window)),
            self.store.count(&filter),
        )?;

        Ok(CityPage {
            businesses,
            page,
            total,
            total_pages: pagination::total_pages(total),
        })
    }

    /// Listings per category in `city`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store query fails.
    pub async fn category_counts(&self, city: &str) -> Result<Arc<Vec<GroupCount>>, RepositoryError> {
        self.facets.categories(self.store.as_ref(), &city.to_lowercase()).await
    }

    /// Listings per city.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store query fails.
    pub async fn city_counts(&self) -> Result<Arc<Vec<GroupCount>>, RepositoryError> {
        self.facets.cities(self.store.as_ref()).await
    }

    /// Fetch a business for its detail page and count the view.
    ///
    /// The view increment is best-effort: a failure is logged and the
    /// business is still returned. `Ok(None)` means no such slug.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the lookup itself fails.
    #[instrument(skip(self))]
    pub async fn view_business(&self, slug: &str) -> Result<Option<Business>, RepositoryError> {
        let Some(business) = self.store.find_by_slug(slug).await? else {
            return Ok(None);
        };

        if let Err(e) = self.store.increment_view_count(business.id).await {
            warn!(business_id = %business.id, error = %e, "Failed to record business view");
        }

        Ok(Some(business))
    }
}
