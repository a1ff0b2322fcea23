//! Cached facet counts for navigation.
//!
//! Category and city counts are read on every listing page but only change
//! on import, so they are kept in a `moka` cache (5-minute TTL) that the
//! import path clears.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use tracing::debug;

use local_directory_core::GroupCount;

use crate::db::RepositoryError;
use crate::store::BusinessStore;

/// Cache key for facet queries.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
enum FacetKey {
    Categories(String),
    Cities,
}

/// Group-by counts with a short-lived cache in front of the store.
#[derive(Clone)]
pub struct FacetCache {
    cache: Cache<FacetKey, Arc<Vec<GroupCount>>>,
}

impl Default for FacetCache {
    fn default() -> Self {
        Self::new()
    }
}

impl FacetCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        Self { cache }
    }

    /// Listings per category in `city`, ordered by category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store query fails; failures are not cached.
    pub async fn categories(
        &self,
        store: &dyn BusinessStore,
        city: &str,
    ) -> Result<Arc<Vec<GroupCount>>, RepositoryError> {
        let key = FacetKey::Categories(city.to_string());
        if let Some(counts) = self.cache.get(&key).await {
            debug!(city, "Cache hit for category counts");
            return Ok(counts);
        }

        let counts = Arc::new(store.count_by_category(city).await?);
        self.cache.insert(key, Arc::clone(&counts)).await;
        Ok(counts)
    }

    /// Listings per city, ordered by city.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store query fails; failures are not cached.
    pub async fn cities(
        &self,
        store: &dyn BusinessStore,
    ) -> Result<Arc<Vec<GroupCount>>, RepositoryError> {
        if let Some(counts) = self.cache.get(&FacetKey::Cities).await {
            debug!("Cache hit for city counts");
            return Ok(counts);
        }

        let counts = Arc::new(store.count_by_city().await?);
        self.cache.insert(FacetKey::Cities, Arc::clone(&counts)).await;
        Ok(counts)
    }

    /// Drop every cached count.
    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use local_directory_core::CandidateRecord;

    fn record(name: &str, category: &str) -> CandidateRecord {
        CandidateRecord {
            name: name.to_string(),
            category: category.to_string(),
            city: "aurora-il".to_string(),
            phone: "6305551234".to_string(),
            ..CandidateRecord::default()
        }
    }

    #[tokio::test]
    async fn test_counts_are_cached_until_invalidated() {
        let store = MemoryStore::new();
        let facets = FacetCache::new();
        store.create(&record("A", "hvac"), "a").await.unwrap();

        assert_eq!(facets.categories(&store, "aurora-il").await.unwrap().len(), 1);

        store.create(&record("B", "plumbers"), "b").await.unwrap();
        assert_eq!(facets.categories(&store, "aurora-il").await.unwrap().len(), 1);

        facets.invalidate_all();
        assert_eq!(facets.categories(&store, "aurora-il").await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_city_counts() {
        let store = MemoryStore::new();
        let facets = FacetCache::new();
        store.create(&record("A", "hvac"), "a").await.unwrap();
        store.create(&record("B", "hvac"), "b").await.unwrap();

        let cities = facets.cities(&store).await.unwrap();
        assert_eq!(
            *cities,
            vec![GroupCount {
                key: "aurora-il".to_string(),
                count: 2
            }]
        );
    }
}
