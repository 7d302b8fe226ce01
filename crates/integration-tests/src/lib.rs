//! Integration test support for the Shoes Lulu storefront.
//!
//! Tests run against a `wiremock` stand-in for the content API, so no real
//! network traffic is made.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p lulu-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `catalog_client` - content API client (decoding, errors, timeout, filters, cache)
//! - `storefront_routes` - in-process router (pages, cart session round trip, checkout)

use std::path::PathBuf;
use std::time::Duration;

use lulu_storefront::config::{CatalogConfig, ContactConfig, StorefrontConfig};
use serde_json::{Value, json};
use url::Url;
use wiremock::MockServer;

/// Path of the product collection on the mock server.
pub const PRODUCTS_PATH: &str = "/api/zapatoes";

/// WhatsApp number used by test configurations.
pub const TEST_PHONE: &str = "573001234567";

/// Catalog configuration pointing at a mock server.
///
/// # Panics
///
/// Panics if the mock server URI is not a valid URL.
#[must_use]
pub fn catalog_config(server: &MockServer) -> CatalogConfig {
    let media_url = Url::parse(&server.uri()).expect("mock server uri");
    let api_url = media_url.join("/api").expect("api url");

    CatalogConfig {
        api_url,
        media_url,
        api_token: None,
        timeout: Duration::from_secs(5),
        cache_ttl: Duration::from_secs(300),
    }
}

/// Full storefront configuration pointing at a mock server.
#[must_use]
pub fn storefront_config(server: &MockServer) -> StorefrontConfig {
    StorefrontConfig {
        host: std::net::IpAddr::from([127, 0, 0, 1]),
        port: 0,
        base_url: "http://localhost:3000".to_string(),
        catalog: catalog_config(server),
        contact: ContactConfig {
            whatsapp_phone: TEST_PHONE.to_string(),
            ..ContactConfig::default()
        },
        sentry_dsn: None,
        sentry_environment: None,
        static_dir: PathBuf::from(lulu_storefront::STATIC_DIR),
    }
}

/// One raw product record in the content API's shape.
#[must_use]
pub fn product_json(id: i64, nombre: &str, precio: &str, stock: i64) -> Value {
    json!({
        "id": id,
        "documentId": format!("doc-{id}"),
        "nombre": nombre,
        "descripcion": format!("Descripción de {nombre}"),
        "precio": precio,
        "stock": stock,
        "activo": true,
        "imagen": [{"url": format!("/uploads/{id}.jpg")}],
        "tallas": [{"label": "37"}, {"label": "38"}],
        "createdAt": "2024-05-01T10:00:00.000Z",
        "updatedAt": "2024-05-02T10:00:00.000Z"
    })
}

/// A list response wrapping `records`.
#[must_use]
pub fn list_body(records: Vec<Value>) -> Value {
    json!({
        "data": records,
        "meta": {"pagination": {"page": 1, "pageSize": 25, "pageCount": 1}}
    })
}

/// The standard three-product catalog used across tests.
#[must_use]
pub fn sample_catalog() -> Value {
    list_body(vec![
        product_json(1, "Zapato Rojo", "50000", 3),
        product_json(2, "Bolso Azul", "10000", 0),
        product_json(3, "Sandalia", "30000", 5),
    ])
}
