//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::SiteConfig;
use crate::db::BusinessRepository;
use crate::services::{DirectoryService, FacetCache};
use crate::store::BusinessStore;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the business store and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: SiteConfig,
    store: Arc<dyn BusinessStore>,
    facets: FacetCache,
    directory: DirectoryService,
}

impl AppState {
    /// Create application state backed by `PostgreSQL`.
    ///
    /// # Arguments
    ///
    /// * `config` - Site configuration
    /// * `pool` - `PostgreSQL` connection pool
    #[must_use]
    pub fn new(config: SiteConfig, pool: PgPool) -> Self {
        Self::with_store(config, Arc::new(BusinessRepository::new(pool)))
    }

    /// Create application state over any business store.
    #[must_use]
    pub fn with_store(config: SiteConfig, store: Arc<dyn BusinessStore>) -> Self {
        let facets = FacetCache::new();
        let directory = DirectoryService::new(Arc::clone(&store), facets.clone());

        Self {
            inner: Arc::new(AppStateInner {
                config,
                store,
                facets,
                directory,
            }),
        }
    }

    /// Get a reference to the site configuration.
    #[must_use]
    pub fn config(&self) -> &SiteConfig {
        &self.inner.config
    }

    /// Get a reference to the business store.
    #[must_use]
    pub fn store(&self) -> &dyn BusinessStore {
        self.inner.store.as_ref()
    }

    /// Get a reference to the directory query service.
    #[must_use]
    pub fn directory(&self) -> &DirectoryService {
        &self.inner.directory
    }

    /// Get a reference to the facet count cache.
    #[must_use]
    pub fn facets(&self) -> &FacetCache {
        &self.inner.facets
    }
}
