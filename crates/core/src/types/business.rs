//! The `Business` entity and import candidate records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::BusinessId;

/// A persisted directory listing.
///
/// `category` and `city` are stored lowercase; `city` is a hyphenated
/// locality key such as `aurora-il`. `phone` is kept exactly as entered and
/// only formatted at display time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Business {
    pub id: BusinessId,
    pub name: String,
    pub category: String,
    pub city: String,
    pub phone: String,
    pub email: Option<String>,
    pub website: Option<String>,
    pub address: Option<String>,
    pub zip: Option<String>,
    pub description: Option<String>,
    pub is_featured: bool,
    /// Unique across the whole collection, derived from name and city.
    pub slug: String,
    pub view_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One of the four fields every listing must carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequiredField {
    Name,
    Category,
    City,
    Phone,
}

impl RequiredField {
    /// Column header used for this field in CSV uploads.
    #[must_use]
    pub const fn header(self) -> &'static str {
        match self {
            Self::Name => "Business Name",
            Self::Category => "Category",
            Self::City => "City",
            Self::Phone => "Phone",
        }
    }
}

/// A parsed import row that has not been persisted yet.
///
/// Also the wire format of the JSON import API. Required strings default to
/// empty when absent so that a record with missing fields is counted as an
/// error during reconciliation instead of failing the whole request body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateRecord {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub is_featured: bool,
}

impl CandidateRecord {
    /// Required fields that are empty on this record, in header order.
    #[must_use]
    pub fn missing_fields(&self) -> Vec<RequiredField> {
        [
            (RequiredField::Name, &self.name),
            (RequiredField::Category, &self.category),
            (RequiredField::City, &self.city),
            (RequiredField::Phone, &self.phone),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(field, _)| field)
        .collect()
    }

    /// Whether all four required fields are present.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }
}

/// A `{key, count}` pair from a group-by query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct GroupCount {
    pub key: String,
    pub count: i64,
}
