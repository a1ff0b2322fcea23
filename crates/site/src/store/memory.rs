//! In-memory business store.
//!
//! Mirrors the `PostgreSQL` repository closely enough for tests and local
//! experiments: IDs are sequential, slugs are unique, and listings use the
//! same featured-then-name ordering.

use std::cmp::Ordering;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use local_directory_core::{Business, BusinessId, CandidateRecord, GroupCount};

use super::{BusinessFilter, BusinessStore, SitemapEntry, Window};
use crate::db::RepositoryError;

/// A [`BusinessStore`] backed by a `Vec` behind an async lock.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<MemoryState>,
}

#[derive(Debug, Default)]
struct MemoryState {
    next_id: i32,
    rows: Vec<Business>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every stored business in insertion order.
    pub async fn all(&self) -> Vec<Business> {
        self.state.read().await.rows.clone()
    }
}

impl MemoryState {
    fn slug_taken(&self, slug: &str, except: Option<BusinessId>) -> bool {
        self.rows
            .iter()
            .any(|b| b.slug == slug && Some(b.id) != except)
    }

    fn group_counts<'a>(keys: impl Iterator<Item = &'a str>) -> Vec<GroupCount> {
        let mut counts: Vec<GroupCount> = Vec::new();
        for key in keys {
            match counts.iter_mut().find(|g| g.key == key) {
                Some(group) => group.count += 1,
                None => counts.push(GroupCount {
                    key: key.to_string(),
                    count: 1,
                }),
            }
        }
        counts.sort_by(|a, b| a.key.cmp(&b.key));
        counts
    }
}

fn listing_order(a: &Business, b: &Business) -> Ordering {
    b.is_featured
        .cmp(&a.is_featured)
        .then_with(|| a.name.cmp(&b.name))
        .then_with(|| a.id.cmp(&b.id))
}

fn apply(record: &CandidateRecord, slug: &str, business: &mut Business) {
    business.name.clone_from(&record.name);
    business.category.clone_from(&record.category);
    business.city.clone_from(&record.city);
    business.phone.clone_from(&record.phone);
    business.email.clone_from(&record.email);
    business.website.clone_from(&record.website);
    business.address.clone_from(&record.address);
    business.zip.clone_from(&record.zip);
    business.description.clone_from(&record.description);
    business.is_featured = record.is_featured;
    business.slug = slug.to_string();
}

#[async_trait]
impl BusinessStore for MemoryStore {
    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }

    async fn find_by_id(&self, id: BusinessId) -> Result<Option<Business>, RepositoryError> {
        let state = self.state.read().await;
        Ok(state.rows.iter().find(|b| b.id == id).cloned())
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Business>, RepositoryError> {
        let state = self.state.read().await;
        Ok(state.rows.iter().find(|b| b.slug == slug).cloned())
    }

    async fn find_by_natural_key(
        &self,
        name: &str,
        city: &str,
    ) -> Result<Option<Business>, RepositoryError> {
        let state = self.state.read().await;
        Ok(state
            .rows
            .iter()
            .find(|b| b.name == name && b.city == city)
            .cloned())
    }

    async fn find_many(
        &self,
        filter: &BusinessFilter,
        window: Option<Window>,
    ) -> Result<Vec<Business>, RepositoryError> {
        let state = self.state.read().await;
        let mut matches: Vec<Business> = state
            .rows
            .iter()
            .filter(|b| filter.matches(b))
            .cloned()
            .collect();
        matches.sort_by(listing_order);

        Ok(match window {
            Some(Window { limit, offset }) => matches
                .into_iter()
                .skip(usize::try_from(offset).unwrap_or(usize::MAX))
                .take(usize::try_from(limit).unwrap_or(usize::MAX))
                .collect(),
            None => matches,
        })
    }

    async fn count(&self, filter: &BusinessFilter) -> Result<u64, RepositoryError> {
        let state = self.state.read().await;
        let count = state.rows.iter().filter(|b| filter.matches(b)).count();
        Ok(u64::try_from(count).unwrap_or(u64::MAX))
    }

    async fn create(
        &self,
        record: &CandidateRecord,
        slug: &str,
    ) -> Result<Business, RepositoryError> {
        let mut state = self.state.write().await;
        if state.slug_taken(slug, None) {
            return Err(RepositoryError::Conflict("slug already exists".to_string()));
        }

        state.next_id += 1;
        let now = Utc::now();
        let mut business = Business {
            id: BusinessId::new(state.next_id),
            name: String::new(),
            category: String::new(),
            city: String::new(),
            phone: String::new(),
            email: None,
            website: None,
            address: None,
            zip: None,
            description: None,
            is_featured: false,
            slug: String::new(),
            view_count: 0,
            created_at: now,
            updated_at: now,
        };
        apply(record, slug, &mut business);
        state.rows.push(business.clone());

        Ok(business)
    }

    async fn update(
        &self,
        id: BusinessId,
        record: &CandidateRecord,
        slug: &str,
    ) -> Result<Business, RepositoryError> {
        let mut state = self.state.write().await;
        if state.slug_taken(slug, Some(id)) {
            return Err(RepositoryError::Conflict("slug already exists".to_string()));
        }

        let business = state
            .rows
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or(RepositoryError::NotFound)?;
        apply(record, slug, business);
        business.updated_at = Utc::now();

        Ok(business.clone())
    }

    async fn increment_view_count(&self, id: BusinessId) -> Result<(), RepositoryError> {
        let mut state = self.state.write().await;
        let business = state
            .rows
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or(RepositoryError::NotFound)?;
        business.view_count += 1;
        Ok(())
    }

    async fn count_by_category(&self, city: &str) -> Result<Vec<GroupCount>, RepositoryError> {
        let state = self.state.read().await;
        Ok(MemoryState::group_counts(
            state
                .rows
                .iter()
                .filter(|b| b.city == city)
                .map(|b| b.category.as_str()),
        ))
    }

    async fn count_by_city(&self) -> Result<Vec<GroupCount>, RepositoryError> {
        let state = self.state.read().await;
        Ok(MemoryState::group_counts(
            state.rows.iter().map(|b| b.city.as_str()),
        ))
    }

    async fn sitemap_entries(&self) -> Result<Vec<SitemapEntry>, RepositoryError> {
        let state = self.state.read().await;
        Ok(state
            .rows
            .iter()
            .map(|b| SitemapEntry {
                slug: b.slug.clone(),
                updated_at: b.updated_at,
            })
            .collect())
    }

    async fn delete_all(&self) -> Result<u64, RepositoryError> {
        let mut state = self.state.write().await;
        let removed = u64::try_from(state.rows.len()).unwrap_or(u64::MAX);
        state.rows.clear();
        Ok(removed)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn record(name: &str, category: &str, featured: bool) -> CandidateRecord {
        CandidateRecord {
            name: name.to_string(),
            category: category.to_string(),
            city: "aurora-il".to_string(),
            phone: "6305551234".to_string(),
            is_featured: featured,
            ..CandidateRecord::default()
        }
    }

    #[tokio::test]
    async fn test_create_assigns_sequential_ids() {
        let store = MemoryStore::new();
        let a = store.create(&record("A", "hvac", false), "a").await.unwrap();
        let b = store.create(&record("B", "hvac", false), "b").await.unwrap();
        assert_eq!(a.id, BusinessId::new(1));
        assert_eq!(b.id, BusinessId::new(2));
    }

    #[tokio::test]
    async fn test_duplicate_slug_conflicts() {
        let store = MemoryStore::new();
        store.create(&record("A", "hvac", false), "same").await.unwrap();
        let err = store
            .create(&record("B", "hvac", false), "same")
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_update_refreshes_fields_and_keeps_views() {
        let store = MemoryStore::new();
        let created = store.create(&record("A", "hvac", false), "a").await.unwrap();
        store.increment_view_count(created.id).await.unwrap();

        let mut changed = record("A", "plumbers", true);
        changed.email = Some("a@example.com".to_string());
        let updated = store.update(created.id, &changed, "a").await.unwrap();

        assert_eq!(updated.category, "plumbers");
        assert!(updated.is_featured);
        assert_eq!(updated.email.as_deref(), Some("a@example.com"));
        assert_eq!(updated.view_count, 1);
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at >= created.updated_at);
    }

    #[tokio::test]
    async fn test_update_missing_id_not_found() {
        let store = MemoryStore::new();
        let err = store
            .update(BusinessId::new(9), &record("A", "hvac", false), "a")
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound));
    }

    #[tokio::test]
    async fn test_find_many_orders_and_windows() {
        let store = MemoryStore::new();
        for (name, featured) in [("Delta", false), ("Alpha", false), ("Zulu", true), ("Bravo", true)] {
            store
                .create(&record(name, "hvac", featured), &name.to_lowercase())
                .await
                .unwrap();
        }

        let filter = BusinessFilter::city("aurora-il");
        let all = store.find_many(&filter, None).await.unwrap();
        let names: Vec<_> = all.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, ["Bravo", "Zulu", "Alpha", "Delta"]);

        let page = store
            .find_many(&filter, Some(Window { limit: 2, offset: 2 }))
            .await
            .unwrap();
        assert_eq!(page[0].name, "Alpha");
        assert_eq!(page.len(), 2);
    }

    #[tokio::test]
    async fn test_group_counts_sorted_without_zeroes() {
        let store = MemoryStore::new();
        store.create(&record("A", "plumbers", false), "a").await.unwrap();
        store.create(&record("B", "hvac", false), "b").await.unwrap();
        store.create(&record("C", "plumbers", false), "c").await.unwrap();

        let counts = store.count_by_category("aurora-il").await.unwrap();
        assert_eq!(
            counts,
            vec![
                GroupCount { key: "hvac".to_string(), count: 1 },
                GroupCount { key: "plumbers".to_string(), count: 2 },
            ]
        );
        assert!(store.count_by_category("naperville-il").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_all() {
        let store = MemoryStore::new();
        store.create(&record("A", "plumbers", false), "a").await.unwrap();
        assert_eq!(store.delete_all().await.unwrap(), 1);
        assert!(store.all().await.is_empty());
    }
}
