//! Askama filters used by the page templates.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

use chrono::Datelike;

/// Year for the footer copyright line: `{{ ""|current_year }}`.
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    Ok(chrono::Utc::now().year())
}

/// Stylesheet fingerprint from `build.rs`, appended as `main.css?v=...`.
#[askama::filter_fn]
pub fn css_hash(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<&'static str> {
    Ok(env!("CSS_HASH"))
}

/// Render a stored phone number as `(XXX) XXX-XXXX` where possible.
///
/// ```text
/// {{ business.phone|phone }}
/// ```
#[askama::filter_fn]
pub fn phone(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(local_directory_core::format_phone(&value.to_string()))
}
