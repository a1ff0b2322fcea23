//! Local Directory Core - Shared types and pure functions.
//!
//! This crate provides the pieces used by every Local Directory component:
//! - `site` - Public directory website and admin import tool
//! - `cli` - Command-line tools for migrations, seeding and bulk import
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no database
//! access, no HTTP. Anything that touches persisted state lives in the site
//! crate behind the `BusinessStore` trait.
//!
//! # Modules
//!
//! - [`types`] - The `Business` entity, its ID, and import candidate records
//! - [`slug`] - URL-safe identifiers derived from names
//! - [`phone`] - Display formatting for phone numbers
//! - [`ingest`] - CSV upload parsing and validation
//! - [`pagination`] - Page arithmetic for listing queries
//! - [`display`] - Human-readable labels for cities, categories and websites

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod display;
pub mod ingest;
pub mod pagination;
pub mod phone;
pub mod slug;
pub mod types;

pub use ingest::{IngestError, ingest};
pub use phone::format_phone;
pub use slug::{business_slug, slugify};
pub use types::*;
