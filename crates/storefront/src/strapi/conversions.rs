//! Normalization of raw content API records into [`Product`]s.
//!
//! Missing or malformed fields fall back to the defaults in
//! [`lulu_core::product`]; nothing in here fails.

use chrono::{DateTime, Utc};
use lulu_core::product::{DEFAULT_DESCRIPTION, DEFAULT_NAME, PLACEHOLDER_IMAGE, UNKNOWN_SIZE};
use lulu_core::{Price, Product, ProductId};
use serde_json::Value;
use url::Url;

use super::types::RawProduct;

/// Convert a list of raw records, skipping those without a usable id.
pub fn convert_products(raw: Vec<RawProduct>, media_url: &Url) -> Vec<Product> {
    raw.into_iter()
        .filter_map(|record| {
            let Some(id) = record_id(&record) else {
                tracing::warn!(
                    document_id = ?record.document_id,
                    "Skipping catalog record without an id"
                );
                return None;
            };
            Some(convert_product(record, id, media_url))
        })
        .collect()
}

/// Convert one raw record under the given id.
pub fn convert_product(raw: RawProduct, id: ProductId, media_url: &Url) -> Product {
    Product {
        id,
        document_id: raw.document_id.as_ref().and_then(non_empty_text),
        name: raw
            .nombre
            .as_ref()
            .and_then(non_empty_text)
            .unwrap_or_else(|| DEFAULT_NAME.to_string()),
        description: raw
            .descripcion
            .as_ref()
            .and_then(non_empty_text)
            .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string()),
        price: raw.precio.as_ref().map_or(Price::ZERO, parse_price),
        stock: raw.stock.as_ref().map_or(0, parse_stock),
        active: !matches!(raw.activo, Some(Value::Bool(false))),
        images: convert_images(raw.imagen.as_ref(), media_url),
        sizes: convert_sizes(raw.tallas.as_ref()),
        created_at: raw.created_at.as_ref().and_then(parse_timestamp),
        updated_at: raw.updated_at.as_ref().and_then(parse_timestamp),
    }
}

/// The record's numeric id, from a number or a numeric string.
pub fn record_id(raw: &RawProduct) -> Option<ProductId> {
    match raw.id.as_ref()? {
        Value::Number(n) => n.as_i64().map(ProductId::new),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

/// Make an image path absolute.
///
/// URLs starting with `http` are kept as they are; anything else is appended
/// to the media base.
pub fn resolve_image_url(path: &str, media_url: &Url) -> String {
    if path.starts_with("http") {
        return path.to_string();
    }

    let base = media_url.as_str().trim_end_matches('/');
    if path.starts_with('/') {
        format!("{base}{path}")
    } else {
        format!("{base}/{path}")
    }
}

fn non_empty_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        Value::Bool(true) => Some("true".to_string()),
        _ => None,
    }
}

/// Float-prefix parsing: numbers as is, strings by their numeric prefix,
/// anything else zero.
fn parse_price(value: &Value) -> Price {
    match value {
        Value::Number(n) => Price::parse_lenient(&n.to_string()),
        Value::String(s) => Price::parse_lenient(s),
        _ => Price::ZERO,
    }
}

/// Integer-prefix parsing: numbers truncated, strings by their leading
/// integer, anything else zero.
fn parse_stock(value: &Value) -> i64 {
    match value {
        Value::Number(n) => n.as_i64().unwrap_or_else(|| {
            // Saturating float-to-int cast; fractional stock is truncated.
            #[allow(clippy::cast_possible_truncation)]
            let truncated = n.as_f64().unwrap_or(0.0).trunc() as i64;
            truncated
        }),
        Value::String(s) => integer_prefix(s),
        _ => 0,
    }
}

fn integer_prefix(s: &str) -> i64 {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, s.get(1..).unwrap_or_default()),
        Some(b'+') => (false, s.get(1..).unwrap_or_default()),
        _ => (false, s),
    };

    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    let magnitude = digits
        .get(..end)
        .and_then(|d| d.parse::<i64>().ok())
        .unwrap_or(0);

    if negative { -magnitude } else { magnitude }
}

fn convert_images(value: Option<&Value>, media_url: &Url) -> Vec<String> {
    let entries: Vec<&Value> = match value {
        Some(Value::Array(items)) => items.iter().collect(),
        Some(single @ Value::Object(_)) => vec![single],
        _ => Vec::new(),
    };

    let images: Vec<String> = entries
        .into_iter()
        .filter_map(|entry| match entry {
            Value::Object(media) => media.get("url").and_then(Value::as_str),
            Value::String(url) => Some(url.as_str()),
            _ => None,
        })
        .filter(|url| !url.is_empty())
        .map(|url| resolve_image_url(url, media_url))
        .collect();

    if images.is_empty() {
        vec![PLACEHOLDER_IMAGE.to_string()]
    } else {
        images
    }
}

fn convert_sizes(value: Option<&Value>) -> Vec<String> {
    let Some(Value::Array(items)) = value else {
        return Vec::new();
    };

    items
        .iter()
        .map(|item| {
            let label = match item {
                Value::Object(size) => size.get("label").and_then(non_empty_text),
                other => non_empty_text(other),
            };
            label.unwrap_or_else(|| UNKNOWN_SIZE.to_string())
        })
        .collect()
}

fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    let text = value.as_str()?;
    DateTime::parse_from_rfc3339(text)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
