//! Database operations for directory listings.
//!
//! Listing queries are assembled with [`QueryBuilder`] because the category
//! and search clauses are optional.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};

use local_directory_core::{Business, BusinessId, CandidateRecord, GroupCount};

use super::RepositoryError;
use crate::store::{BusinessFilter, BusinessStore, SitemapEntry, Window};

macro_rules! business_columns {
    () => {
        "id, name, category, city, phone, email, website, address, zip, description, \
         is_featured, slug, view_count, created_at, updated_at"
    };
}

// =============================================================================
// Internal Row Types
// =============================================================================

/// Internal row type for `PostgreSQL` business queries.
#[derive(Debug, sqlx::FromRow)]
struct BusinessRow {
    id: i32,
    name: String,
    category: String,
    city: String,
    phone: String,
    email: Option<String>,
    website: Option<String>,
    address: Option<String>,
    zip: Option<String>,
    description: Option<String>,
    is_featured: bool,
    slug: String,
    view_count: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<BusinessRow> for Business {
    type Error = RepositoryError;

    fn try_from(row: BusinessRow) -> Result<Self, Self::Error> {
        if row.view_count < 0 {
            return Err(RepositoryError::DataCorruption(format!(
                "business {} has negative view count {}",
                row.id, row.view_count
            )));
        }

        Ok(Self {
            id: BusinessId::new(row.id),
            name: row.name,
            category: row.category,
            city: row.city,
            phone: row.phone,
            email: row.email,
            website: row.website,
            address: row.address,
            zip: row.zip,
            description: row.description,
            is_featured: row.is_featured,
            slug: row.slug,
            view_count: row.view_count,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn into_businesses(rows: Vec<BusinessRow>) -> Result<Vec<Business>, RepositoryError> {
    rows.into_iter().map(Business::try_from).collect()
}

/// Escape `LIKE` wildcards so a search term matches literally.
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Append the `WHERE` clause for `filter`.
fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &BusinessFilter) {
    builder.push(" WHERE city = ");
    builder.push_bind(filter.city.clone());

    if let Some(category) = &filter.category {
        builder.push(" AND category = ");
        builder.push_bind(category.clone());
    }

    if let Some(term) = &filter.search {
        let pattern = format!("%{}%", escape_like(term));
        builder.push(" AND (name ILIKE ");
        builder.push_bind(pattern.clone());
        builder.push(" OR description ILIKE ");
        builder.push_bind(pattern);
        builder.push(")");
    }
}

fn to_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for business database operations.
#[derive(Debug, Clone)]
pub struct BusinessRepository {
    pool: PgPool,
}

impl BusinessRepository {
    /// Create a new business repository.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BusinessStore for BusinessRepository {
    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn find_by_id(&self, id: BusinessId) -> Result<Option<Business>, RepositoryError> {
        let row = sqlx::query_as::<_, BusinessRow>(concat!(
            "SELECT ",
            business_columns!(),
            " FROM directory.business WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Business::try_from).transpose()
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Business>, RepositoryError> {
        let row = sqlx::query_as::<_, BusinessRow>(concat!(
            "SELECT ",
            business_columns!(),
            " FROM directory.business WHERE slug = $1"
        ))
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Business::try_from).transpose()
    }

    async fn find_by_natural_key(
        &self,
        name: &str,
        city: &str,
    ) -> Result<Option<Business>, RepositoryError> {
        // No uniqueness constraint backs (name, city); take the oldest match.
        let row = sqlx::query_as::<_, BusinessRow>(concat!(
            "SELECT ",
            business_columns!(),
            " FROM directory.business WHERE name = $1 AND city = $2 ORDER BY id LIMIT 1"
        ))
        .bind(name)
        .bind(city)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Business::try_from).transpose()
    }

    async fn find_many(
        &self,
        filter: &BusinessFilter,
        window: Option<Window>,
    ) -> Result<Vec<Business>, RepositoryError> {
        let mut builder =
            QueryBuilder::<Postgres>::new(concat!("SELECT ", business_columns!(), " FROM directory.business"));
        push_filter(&mut builder, filter);
        builder.push(" ORDER BY is_featured DESC, name ASC, id ASC");

        if let Some(Window { limit, offset }) = window {
            builder.push(" LIMIT ");
            builder.push_bind(to_i64(limit));
            builder.push(" OFFSET ");
            builder.push_bind(to_i64(offset));
        }

        let rows = builder
            .build_query_as::<BusinessRow>()
            .fetch_all(&self.pool)
            .await?;

        into_businesses(rows)
    }

    async fn count(&self, filter: &BusinessFilter) -> Result<u64, RepositoryError> {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM directory.business");
        push_filter(&mut builder, filter);

        let count: i64 = builder
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        u64::try_from(count)
            .map_err(|_| RepositoryError::DataCorruption(format!("negative row count {count}")))
    }

    async fn create(
        &self,
        record: &CandidateRecord,
        slug: &str,
    ) -> Result<Business, RepositoryError> {
        let row = sqlx::query_as::<_, BusinessRow>(concat!(
            "INSERT INTO directory.business \
             (name, category, city, phone, email, website, address, zip, description, is_featured, slug) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
             RETURNING ",
            business_columns!()
        ))
        .bind(&record.name)
        .bind(&record.category)
        .bind(&record.city)
        .bind(&record.phone)
        .bind(&record.email)
        .bind(&record.website)
        .bind(&record.address)
        .bind(&record.zip)
        .bind(&record.description)
        .bind(record.is_featured)
        .bind(slug)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| RepositoryError::from_write(e, "slug"))?;

        row.try_into()
    }

    async fn update(
        &self,
        id: BusinessId,
        record: &CandidateRecord,
        slug: &str,
    ) -> Result<Business, RepositoryError> {
        let row = sqlx::query_as::<_, BusinessRow>(concat!(
            "UPDATE directory.business SET \
             name = $2, category = $3, city = $4, phone = $5, email = $6, website = $7, \
             address = $8, zip = $9, description = $10, is_featured = $11, slug = $12, \
             updated_at = NOW() \
             WHERE id = $1 \
             RETURNING ",
            business_columns!()
        ))
        .bind(id)
        .bind(&record.name)
        .bind(&record.category)
        .bind(&record.city)
        .bind(&record.phone)
        .bind(&record.email)
        .bind(&record.website)
        .bind(&record.address)
        .bind(&record.zip)
        .bind(&record.description)
        .bind(record.is_featured)
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::from_write(e, "slug"))?;

        row.ok_or(RepositoryError::NotFound)?.try_into()
    }

    async fn increment_view_count(&self, id: BusinessId) -> Result<(), RepositoryError> {
        let result =
            sqlx::query("UPDATE directory.business SET view_count = view_count + 1 WHERE id = $1")
                .bind(id)
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn count_by_category(&self, city: &str) -> Result<Vec<GroupCount>, RepositoryError> {
        let counts = sqlx::query_as::<_, GroupCount>(
            r"
            SELECT category AS key, COUNT(*) AS count
            FROM directory.business
            WHERE city = $1
            GROUP BY category
            ORDER BY category
            ",
        )
        .bind(city)
        .fetch_all(&self.pool)
        .await?;

        Ok(counts)
    }

    async fn count_by_city(&self) -> Result<Vec<GroupCount>, RepositoryError> {
        let counts = sqlx::query_as::<_, GroupCount>(
            r"
            SELECT city AS key, COUNT(*) AS count
            FROM directory.business
            GROUP BY city
            ORDER BY city
            ",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(counts)
    }

    async fn sitemap_entries(&self) -> Result<Vec<SitemapEntry>, RepositoryError> {
        let entries = sqlx::query_as::<_, SitemapEntry>(
            "SELECT slug, updated_at FROM directory.business ORDER BY slug",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    async fn delete_all(&self) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM directory.business")
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
