//! Core types for the directory.

pub mod business;
pub mod id;

pub use business::{Business, CandidateRecord, GroupCount, RequiredField};
pub use id::BusinessId;
