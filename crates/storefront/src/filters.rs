//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Renders a stock count as a Spanish unit phrase.
///
/// Usage in templates: `{{ product.stock|units }}`
#[askama::filter_fn]
pub fn units(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    let count = value.to_string();
    let noun = if count == "1" { "unidad" } else { "unidades" };
    Ok(format!("{count} {noun}"))
}
