//! A [`MemoryStore`] wrapper whose calls can be made to fail, for tests of
//! the error paths.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;

use local_directory_core::{Business, BusinessId, CandidateRecord, GroupCount};

use super::{BusinessFilter, BusinessStore, MemoryStore, SitemapEntry, Window};
use crate::db::RepositoryError;

/// Delegates to an inner [`MemoryStore`] unless a failure is switched on.
#[derive(Debug, Default)]
pub struct FlakyStore {
    pub inner: MemoryStore,
    ping_fails: AtomicBool,
    views_fail: AtomicBool,
}

impl FlakyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `ping` report the store as unreachable.
    pub fn fail_ping(&self) {
        self.ping_fails.store(true, Ordering::SeqCst);
    }

    /// Make `increment_view_count` fail.
    pub fn fail_views(&self) {
        self.views_fail.store(true, Ordering::SeqCst);
    }

    fn unavailable() -> RepositoryError {
        RepositoryError::Database(sqlx::Error::PoolTimedOut)
    }
}

#[async_trait]
impl BusinessStore for FlakyStore {
    async fn ping(&self) -> Result<(), RepositoryError> {
        if self.ping_fails.load(Ordering::SeqCst) {
            return Err(Self::unavailable());
        }
        self.inner.ping().await
    }

    async fn find_by_id(&self, id: BusinessId) -> Result<Option<Business>, RepositoryError> {
        self.inner.find_by_id(id).await
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Business>, RepositoryError> {
        self.inner.find_by_slug(slug).await
    }

    async fn find_by_natural_key(
        &self,
        name: &str,
        city: &str,
    ) -> Result<Option<Business>, RepositoryError> {
        self.inner.find_by_natural_key(name, city).await
    }

    async fn find_many(
        &self,
        filter: &BusinessFilter,
        window: Option<Window>,
    ) -> Result<Vec<Business>, RepositoryError> {
        self.inner.find_many(filter, window).await
    }

    async fn count(&self, filter: &BusinessFilter) -> Result<u64, RepositoryError> {
        self.inner.count(filter).await
    }

    async fn create(
        &self,
        record: &CandidateRecord,
        slug: &str,
    ) -> Result<Business, RepositoryError> {
        self.inner.create(record, slug).await
    }

    async fn update(
        &self,
        id: BusinessId,
        record: &CandidateRecord,
        slug: &str,
    ) -> Result<Business, RepositoryError> {
        self.inner.update(id, record, slug).await
    }

    async fn increment_view_count(&self, id: BusinessId) -> Result<(), RepositoryError> {
        if self.views_fail.load(Ordering::SeqCst) {
            return Err(Self::unavailable());
        }
        self.inner.increment_view_count(id).await
    }

    async fn count_by_category(&self, city: &str) -> Result<Vec<GroupCount>, RepositoryError> {
        self.inner.count_by_category(city).await
    }

    async fn count_by_city(&self) -> Result<Vec<GroupCount>, RepositoryError> {
        self.inner.count_by_city().await
    }

    async fn sitemap_entries(&self) -> Result<Vec<SitemapEntry>, RepositoryError> {
        self.inner.sitemap_entries().await
    }

    async fn delete_all(&self) -> Result<u64, RepositoryError> {
        self.inner.delete_all().await
    }
}
