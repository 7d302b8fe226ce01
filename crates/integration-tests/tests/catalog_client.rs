//! Content API client tests against a mock server.
//!
//! Covers decoding and normalization, error classification (HTTP status,
//! timeout, malformed JSON, not found), server-side filter parameters and
//! response caching.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::time::Duration;

use lulu_core::{Price, ProductId};
use lulu_integration_tests::{
    PRODUCTS_PATH, catalog_config, list_body, product_json, sample_catalog,
};
use lulu_storefront::strapi::{CatalogError, ProductFilters, StrapiClient};
use secrecy::SecretString;
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> StrapiClient {
    StrapiClient::new(&catalog_config(server)).unwrap()
}

// ---- Test 1 – list decodes and normalizes records ----

#[tokio::test]
async fn test_get_products_normalizes_records() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(PRODUCTS_PATH))
        .and(query_param("populate", "*"))
        .and(header("accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_catalog()))
        .mount(&server)
        .await;

    let products = client_for(&server).get_products().await.unwrap();

    assert_eq!(products.len(), 3, "all records should be kept");
    let zapato = &products[0];
    assert_eq!(zapato.id, ProductId::new(1));
    assert_eq!(zapato.name, "Zapato Rojo");
    assert_eq!(zapato.price, Price::parse_lenient("50000"));
    assert_eq!(zapato.stock, 3);
    assert!(zapato.is_available());
    assert_eq!(zapato.sizes, vec!["37", "38"]);
    assert_eq!(
        zapato.primary_image(),
        format!("{}/uploads/1.jpg", server.uri()),
        "relative image paths resolve against the media origin"
    );
    assert!(!products[1].is_available(), "zero stock is sold out");
}

// ---- Test 2 – loosely typed records get defaults ----

#[tokio::test]
async fn test_get_products_fills_defaults_for_sparse_records() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(PRODUCTS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(list_body(vec![
            json!({"id": "7", "nombre": "", "precio": null, "imagen": null, "tallas": [{}]}),
            json!({"nombre": "Sin id"}),
        ])))
        .mount(&server)
        .await;

    let products = client_for(&server).get_products().await.unwrap();

    assert_eq!(products.len(), 1, "records without an id are skipped");
    let product = &products[0];
    assert_eq!(product.id, ProductId::new(7));
    assert_eq!(product.name, lulu_core::product::DEFAULT_NAME);
    assert_eq!(product.price, Price::ZERO);
    assert_eq!(product.stock, 0);
    assert!(product.active, "missing activo means active");
    assert_eq!(product.primary_image(), lulu_core::product::PLACEHOLDER_IMAGE);
    assert_eq!(product.sizes, vec![lulu_core::product::UNKNOWN_SIZE]);
}

// ---- Test 3 – missing data array is an empty catalog ----

#[tokio::test]
async fn test_get_products_without_data_is_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(PRODUCTS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"meta": {}})))
        .mount(&server)
        .await;

    let products = client_for(&server).get_products().await.unwrap();
    assert!(products.is_empty());
}

// ---- Test 4 – non-success status maps to Http ----

#[tokio::test]
async fn test_server_error_maps_to_http() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(PRODUCTS_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let err = client_for(&server).get_products().await.unwrap_err();

    assert!(
        matches!(err, CatalogError::Http { status: 500 }),
        "expected Http 500, got {err:?}"
    );
    assert!(!err.is_timeout());
}

// ---- Test 5 – slow API maps to RequestTimeout ----

#[tokio::test]
async fn test_slow_response_maps_to_request_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(PRODUCTS_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(sample_catalog())
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let mut config = catalog_config(&server);
    config.timeout = Duration::from_secs(1);
    let client = StrapiClient::new(&config).unwrap();

    let err = client.get_products().await.unwrap_err();

    assert!(err.is_timeout(), "expected a timeout, got {err:?}");
    assert!(matches!(err, CatalogError::RequestTimeout(d) if d == Duration::from_secs(1)));
    assert_eq!(err.user_message(), "La solicitud ha excedido el tiempo de espera");
}

// ---- Test 6 – malformed JSON maps to Parse ----

#[tokio::test]
async fn test_malformed_json_maps_to_parse() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(PRODUCTS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"data\": [oops"))
        .mount(&server)
        .await;

    let err = client_for(&server).get_products().await.unwrap_err();
    assert!(matches!(err, CatalogError::Parse(_)), "got {err:?}");
}

// ---- Test 7 – single product lookups ----

#[tokio::test]
async fn test_get_product_by_id() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("{PRODUCTS_PATH}/3")))
        .and(query_param("populate", "*"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"data": product_json(3, "Sandalia", "30000", 5)})),
        )
        .mount(&server)
        .await;

    let product = client_for(&server)
        .get_product_by_id(ProductId::new(3))
        .await
        .unwrap();

    assert_eq!(product.name, "Sandalia");
    assert_eq!(product.document_id.as_deref(), Some("doc-3"));
}

#[tokio::test]
async fn test_get_product_by_id_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("{PRODUCTS_PATH}/404")))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("{PRODUCTS_PATH}/5")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": null})))
        .mount(&server)
        .await;

    let client = client_for(&server);

    let err = client.get_product_by_id(ProductId::new(404)).await.unwrap_err();
    assert!(err.is_not_found(), "404 should be NotFound, got {err:?}");

    let err = client.get_product_by_id(ProductId::new(5)).await.unwrap_err();
    assert!(err.is_not_found(), "null data should be NotFound, got {err:?}");
}

// ---- Test 8 – server-side filters ----

#[tokio::test]
async fn test_filter_products_sends_filter_parameters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(PRODUCTS_PATH))
        .and(query_param("filters[$or][0][nombre][$containsi]", "zapato"))
        .and(query_param("filters[$or][1][descripcion][$containsi]", "zapato"))
        .and(query_param("filters[activo][$eq]", "true"))
        .and(query_param("filters[stock][$gt]", "0"))
        .and(query_param("populate", "*"))
        .respond_with(ResponseTemplate::new(200).set_body_json(list_body(vec![product_json(
            1,
            "Zapato Rojo",
            "50000",
            3,
        )])))
        .expect(1)
        .mount(&server)
        .await;

    let filters = ProductFilters {
        search: Some("zapato".to_string()),
        available: true,
    };
    let products = client_for(&server).filter_products(&filters).await.unwrap();

    assert_eq!(products.len(), 1);
    assert_eq!(products[0].name, "Zapato Rojo");
}

// ---- Test 9 – bearer token ----

#[tokio::test]
async fn test_api_token_is_sent_as_bearer() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(PRODUCTS_PATH))
        .and(header("authorization", "Bearer k7Qx9pLm2Vt8Rw4Zs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_catalog()))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = catalog_config(&server);
    config.api_token = Some(SecretString::from("k7Qx9pLm2Vt8Rw4Zs"));
    let client = StrapiClient::new(&config).unwrap();

    assert_eq!(client.get_products().await.unwrap().len(), 3);
}

// ---- Test 10 – caching ----

#[tokio::test]
async fn test_catalog_is_cached_and_serves_lookups() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(PRODUCTS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_catalog()))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert!(client.cached_products().await.is_none());

    let first = client.get_products().await.unwrap();
    let second = client.get_products().await.unwrap();
    assert_eq!(first, second);
    assert_eq!(client.cached_products().await.map(|p| p.len()), Some(3));

    // No item mock is mounted: the lookup must come from the cached list.
    let bolso = client.get_product_by_id(ProductId::new(2)).await.unwrap();
    assert_eq!(bolso.name, "Bolso Azul");
}

#[tokio::test]
async fn test_failures_are_not_cached() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(PRODUCTS_PATH))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(PRODUCTS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_catalog()))
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert!(client.get_products().await.is_err());
    assert_eq!(client.get_products().await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_invalidate_cache_refetches() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(PRODUCTS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_catalog()))
        .expect(2)
        .mount(&server)
        .await;

    let client = client_for(&server);
    client.get_products().await.unwrap();
    client.invalidate_cache();
    client.get_products().await.unwrap();
}
