//! Business logic services for the directory.
//!
//! # Services
//!
//! - `import` - Import Reconciler: create-or-update by `(name, city)`
//! - `directory` - Listing, search, pagination and detail reads
//! - `facets` - Cached per-category and per-city counts

pub mod directory;
pub mod facets;
pub mod import;

pub use directory::{CityPage, DirectoryService};
pub use facets::FacetCache;
pub use import::{ImportResults, reconcile};
