//! Wire types for content API responses.
//!
//! The API is loosely typed: prices arrive as numbers or strings, images as
//! arrays of media objects or a single object, and any field may be absent or
//! `null`. Fields are kept as raw JSON here and normalized in
//! [`super::conversions`].

use serde::Deserialize;
use serde_json::Value;

/// Top-level `{ "data": ... }` wrapper. A missing or `null` `data` decodes as `None`.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub data: Option<T>,
}

/// A product record as returned by the `zapatoes` collection.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawProduct {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub document_id: Option<Value>,
    #[serde(default)]
    pub nombre: Option<Value>,
    #[serde(default)]
    pub descripcion: Option<Value>,
    #[serde(default)]
    pub precio: Option<Value>,
    #[serde(default)]
    pub stock: Option<Value>,
    #[serde(default)]
    pub activo: Option<Value>,
    #[serde(default)]
    pub imagen: Option<Value>,
    #[serde(default)]
    pub tallas: Option<Value>,
    #[serde(default)]
    pub created_at: Option<Value>,
    #[serde(default)]
    pub updated_at: Option<Value>,
}

/// List response for the `zapatoes` collection.
pub type ProductList = Envelope<Vec<RawProduct>>;

/// Single-item response for `zapatoes/{id}`.
pub type ProductItem = Envelope<RawProduct>;

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_and_null_data() {
        let list: ProductList = serde_json::from_str("{}").unwrap();
        assert!(list.data.is_none());

        let item: ProductItem = serde_json::from_str(r#"{"data": null}"#).unwrap();
        assert!(item.data.is_none());
    }

    #[test]
    fn test_decodes_camel_case_fields() {
        let list: ProductList = serde_json::from_str(
            r#"{"data": [{"id": 7, "documentId": "abc", "createdAt": "2024-01-01T00:00:00.000Z",
                "precio": "10", "extra": true}], "meta": {}}"#,
        )
        .unwrap();
        let raw = &list.data.unwrap()[0];

        assert_eq!(raw.id, Some(Value::from(7)));
        assert_eq!(raw.document_id, Some(Value::from("abc")));
        assert!(raw.created_at.is_some());
        assert!(raw.nombre.is_none());
    }
}
