//! Askama filters shared by the page templates.
//!
//! Askama resolves filter names against a `filters` module in scope, so
//! every file that declares a template does `use crate::filters;`.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

/// Current year, for the footer copyright line.
///
/// Filters always receive an input value; this one ignores it, so
/// templates call it as `{{ ""|current_year }}`.
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Content hash of the stylesheet, baked in by the build script.
///
/// Templates link `/static/css/derived/main.{{ ""|css_hash }}.css`, which
/// the static file server can hand out with an immutable cache lifetime.
#[askama::filter_fn]
pub fn css_hash(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<&'static str> {
    Ok(env!("CSS_HASH"))
}
