//! The persistence boundary for businesses.
//!
//! Services receive a [`BusinessStore`] instead of reaching for a global
//! connection, so the same code runs against `PostgreSQL`
//! ([`crate::db::BusinessRepository`]) and the in-memory [`MemoryStore`].
//!
//! Every listing query orders featured businesses first, then by name.

#[cfg(test)]
pub(crate) mod flaky;
pub mod memory;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use local_directory_core::{Business, BusinessId, CandidateRecord, GroupCount};

use crate::db::RepositoryError;

pub use memory::MemoryStore;

/// Which businesses a listing or count query covers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct BusinessFilter {
    /// Exact, lowercase city key.
    pub city: String,
    /// Exact, lowercase category; `None` means every category.
    pub category: Option<String>,
    /// Case-insensitive substring of name or description.
    pub search: Option<String>,
}

impl BusinessFilter {
    /// Every business in `city`.
    #[must_use]
    pub fn city(city: &str) -> Self {
        Self {
            city: city.to_lowercase(),
            ..Self::default()
        }
    }

    /// Restrict to one category.
    #[must_use]
    pub fn with_category(mut self, category: &str) -> Self {
        self.category = Some(category.to_lowercase());
        self
    }

    /// Restrict to names or descriptions containing `term`.
    ///
    /// Surrounding whitespace is ignored; a blank term leaves the filter
    /// unchanged.
    #[must_use]
    pub fn with_search(mut self, term: Option<&str>) -> Self {
        self.search = term
            .map(str::trim)
            .filter(|term| !term.is_empty())
            .map(str::to_string);
        self
    }

    /// Whether `business` passes this filter.
    #[must_use]
    pub fn matches(&self, business: &Business) -> bool {
        if business.city != self.city {
            return false;
        }

        if let Some(category) = &self.category
            && &business.category != category
        {
            return false;
        }

        self.search.as_deref().is_none_or(|term| {
            let term = term.to_lowercase();
            business.name.to_lowercase().contains(&term)
                || business
                    .description
                    .as_deref()
                    .is_some_and(|description| description.to_lowercase().contains(&term))
        })
    }
}

/// A `LIMIT`/`OFFSET` slice of an ordered listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub limit: u64,
    pub offset: u64,
}

/// A business URL and its last modification, for the sitemap.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct SitemapEntry {
    pub slug: String,
    pub updated_at: DateTime<Utc>,
}

/// Keyed access to the business collection.
#[async_trait]
pub trait BusinessStore: Send + Sync {
    /// Check the store is reachable.
    async fn ping(&self) -> Result<(), RepositoryError>;

    /// Fetch a business by its store-assigned ID.
    async fn find_by_id(&self, id: BusinessId) -> Result<Option<Business>, RepositoryError>;

    /// Fetch a business by its public slug.
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Business>, RepositoryError>;

    /// Fetch the business with exactly this `(name, city)`.
    async fn find_by_natural_key(
        &self,
        name: &str,
        city: &str,
    ) -> Result<Option<Business>, RepositoryError>;

    /// List matching businesses, featured first then by name.
    async fn find_many(
        &self,
        filter: &BusinessFilter,
        window: Option<Window>,
    ) -> Result<Vec<Business>, RepositoryError>;

    /// Count matching businesses, ignoring any window.
    async fn count(&self, filter: &BusinessFilter) -> Result<u64, RepositoryError>;

    /// Insert a new business with the given slug.
    ///
    /// Returns `RepositoryError::Conflict` if the slug is taken.
    async fn create(
        &self,
        record: &CandidateRecord,
        slug: &str,
    ) -> Result<Business, RepositoryError>;

    /// Overwrite every field of an existing business and refresh `updated_at`.
    ///
    /// Returns `RepositoryError::NotFound` if `id` does not exist and
    /// `RepositoryError::Conflict` if the slug belongs to another business.
    async fn update(
        &self,
        id: BusinessId,
        record: &CandidateRecord,
        slug: &str,
    ) -> Result<Business, RepositoryError>;

    /// Add one to a business's view counter.
    async fn increment_view_count(&self, id: BusinessId) -> Result<(), RepositoryError>;

    /// Listings per category within one city, ordered by category.
    async fn count_by_category(&self, city: &str) -> Result<Vec<GroupCount>, RepositoryError>;

    /// Listings per city, ordered by city.
    async fn count_by_city(&self) -> Result<Vec<GroupCount>, RepositoryError>;

    /// Slug and last update of every business.
    async fn sitemap_entries(&self) -> Result<Vec<SitemapEntry>, RepositoryError>;

    /// Remove every business, returning how many were removed.
    async fn delete_all(&self) -> Result<u64, RepositoryError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn business(name: &str, description: Option<&str>) -> Business {
        Business {
            id: BusinessId::new(1),
            name: name.to_string(),
            category: "plumbers".to_string(),
            city: "aurora-il".to_string(),
            phone: "6305551234".to_string(),
            email: None,
            website: None,
            address: None,
            zip: None,
            description: description.map(str::to_string),
            is_featured: false,
            slug: "slug".to_string(),
            view_count: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_filter_lowercases_keys() {
        let filter = BusinessFilter::city("Aurora-IL").with_category("Plumbers");
        assert_eq!(filter.city, "aurora-il");
        assert_eq!(filter.category.as_deref(), Some("plumbers"));
    }

    #[test]
    fn test_blank_search_is_absent() {
        assert_eq!(BusinessFilter::city("x").with_search(Some("   ")).search, None);
        assert_eq!(BusinessFilter::city("x").with_search(None).search, None);
        assert_eq!(
            BusinessFilter::city("x").with_search(Some(" plumb ")).search.as_deref(),
            Some("plumb")
        );
    }

    #[test]
    fn test_search_matches_description_case_insensitively() {
        let filter = BusinessFilter::city("aurora-il").with_search(Some("plumb"));
        assert!(filter.matches(&business("Acme Services", Some("Expert Plumbing repairs"))));
        assert!(!filter.matches(&business("Acme Services", None)));
    }

    #[test]
    fn test_search_matches_name() {
        let filter = BusinessFilter::city("aurora-il").with_search(Some("ACME"));
        assert!(filter.matches(&business("Acme Services", None)));
    }

    #[test]
    fn test_city_and_category_exact() {
        let b = business("Acme", None);
        assert!(!BusinessFilter::city("aurora").matches(&b));
        assert!(!BusinessFilter::city("aurora-il").with_category("hvac").matches(&b));
        assert!(BusinessFilter::city("aurora-il").with_category("plumbers").matches(&b));
    }
}
