//! `StrapiClient`: HTTP access to the `zapatoes` collection.

use std::sync::Arc;
use std::time::Duration;

use lulu_core::{Product, ProductId};
use moka::future::Cache;
use reqwest::header::ACCEPT;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use crate::config::CatalogConfig;

use super::CatalogError;
use super::cache::{CacheKey, CacheValue};
use super::conversions::{convert_product, convert_products, record_id};
use super::types::{ProductItem, ProductList};

/// Collection path of the product content type.
const PRODUCTS_PATH: &str = "zapatoes";

/// Criteria for server-side filtering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilters {
    /// Case-insensitive match on name or description.
    pub search: Option<String>,
    /// Only active products with stock.
    pub available: bool,
}

impl ProductFilters {
    fn search_term(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty())
    }

    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(term) = self.search_term() {
            pairs.push(("filters[$or][0][nombre][$containsi]", term.to_string()));
            pairs.push(("filters[$or][1][descripcion][$containsi]", term.to_string()));
        }
        if self.available {
            pairs.push(("filters[activo][$eq]", "true".to_string()));
            pairs.push(("filters[stock][$gt]", "0".to_string()));
        }
        pairs
    }

    fn cache_key(&self) -> CacheKey {
        CacheKey::Filtered {
            search: self.search_term().unwrap_or_default().to_lowercase(),
            available: self.available,
        }
    }
}

/// Client for the catalog content API.
///
/// Cheap to clone. Successful responses are cached for the configured TTL;
/// failures are never cached.
#[derive(Clone)]
pub struct StrapiClient {
    inner: Arc<StrapiClientInner>,
}

struct StrapiClientInner {
    client: reqwest::Client,
    api_url: Url,
    media_url: Url,
    api_token: Option<SecretString>,
    timeout: Duration,
    cache: Cache<CacheKey, CacheValue>,
}

impl StrapiClient {
    /// Create a new content API client.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Fetch` if the HTTP client cannot be built.
    pub fn new(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()
            .map_err(CatalogError::Fetch)?;

        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(config.cache_ttl)
            .build();

        Ok(Self {
            inner: Arc::new(StrapiClientInner {
                client,
                api_url: config.api_url.clone(),
                media_url: config.media_url.clone(),
                api_token: config.api_token.clone(),
                timeout: config.timeout,
                cache,
            }),
        })
    }

    /// Wait applied to every request.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.inner.timeout
    }

    /// Build `{api}/zapatoes[/{id}]?{params}&populate=*`.
    fn endpoint(
        &self,
        id: Option<ProductId>,
        params: &[(&str, String)],
    ) -> Result<Url, CatalogError> {
        let mut url = self.inner.api_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|()| CatalogError::InvalidUrl(self.inner.api_url.to_string()))?;
            segments.pop_if_empty().push(PRODUCTS_PATH);
            if let Some(id) = id {
                segments.push(&id.to_string());
            }
        }
        {
            let mut query = url.query_pairs_mut();
            for (key, value) in params {
                query.append_pair(key, value);
            }
            query.append_pair("populate", "*");
        }
        Ok(url)
    }

    /// GET a URL and decode its JSON body.
    async fn fetch<T: DeserializeOwned>(&self, url: Url) -> Result<T, CatalogError> {
        let timeout = self.inner.timeout;

        let mut request = self
            .inner
            .client
            .get(url.clone())
            .header(ACCEPT, "application/json");
        if let Some(token) = &self.inner.api_token {
            request = request.bearer_auth(token.expose_secret());
        }

        let response = request.send().await.map_err(|e| {
            let err = CatalogError::from_reqwest(e, timeout);
            tracing::error!(url = %url, error = %err, "Catalog request failed");
            err
        })?;

        let status = response.status();
        if !status.is_success() {
            if status.is_server_error() {
                tracing::error!(url = %url, status = %status, "Catalog API returned non-success status");
            } else {
                tracing::warn!(url = %url, status = %status, "Catalog API returned non-success status");
            }
            return Err(CatalogError::Http {
                status: status.as_u16(),
            });
        }

        // Body is read under the same deadline as the headers.
        let body = response.text().await.map_err(|e| {
            let err = CatalogError::from_reqwest(e, timeout);
            tracing::error!(url = %url, error = %err, "Failed to read catalog response");
            err
        })?;

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                url = %url,
                error = %e,
                body = %body.chars().take(500).collect::<String>(),
                "Failed to parse catalog response"
            );
            CatalogError::Parse(e)
        })
    }

    // =========================================================================
    // Product Methods
    // =========================================================================

    /// Fetch the full catalog.
    ///
    /// A response without a `data` array yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns `RequestTimeout` when the API does not answer in time, `Http`
    /// on a non-success status, and `Fetch`/`Parse` otherwise.
    #[instrument(skip(self))]
    pub async fn get_products(&self) -> Result<Vec<Product>, CatalogError> {
        if let Some(CacheValue::Products(products)) =
            self.inner.cache.get(&CacheKey::Products).await
        {
            debug!("Cache hit for products");
            return Ok(products.as_ref().clone());
        }

        let url = self.endpoint(None, &[])?;
        let list: ProductList = self.fetch(url).await?;
        let products = convert_products(list.data.unwrap_or_default(), &self.inner.media_url);
        debug!(count = products.len(), "Fetched products");

        self.inner
            .cache
            .insert(
                CacheKey::Products,
                CacheValue::Products(Arc::new(products.clone())),
            )
            .await;

        Ok(products)
    }

    /// Fetch a single product.
    ///
    /// Served from the cached catalog when it is warm.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when the API answers 404 or with a `null` `data`,
    /// and the same errors as [`Self::get_products`] otherwise.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn get_product_by_id(&self, id: ProductId) -> Result<Product, CatalogError> {
        if let Some(CacheValue::Product(product)) =
            self.inner.cache.get(&CacheKey::Product(id)).await
        {
            debug!("Cache hit for product");
            return Ok(*product);
        }
        if let Some(CacheValue::Products(products)) =
            self.inner.cache.get(&CacheKey::Products).await
            && let Some(product) = products.iter().find(|p| p.id == id)
        {
            debug!("Product found in cached catalog");
            return Ok(product.clone());
        }

        let url = self.endpoint(Some(id), &[])?;
        let item: ProductItem = match self.fetch(url).await {
            Ok(item) => item,
            Err(CatalogError::Http { status: 404 }) => return Err(CatalogError::NotFound(id)),
            Err(e) => return Err(e),
        };

        let raw = item.data.ok_or(CatalogError::NotFound(id))?;
        let record = record_id(&raw).unwrap_or(id);
        let product = convert_product(raw, record, &self.inner.media_url);

        self.inner
            .cache
            .insert(
                CacheKey::Product(id),
                CacheValue::Product(Box::new(product.clone())),
            )
            .await;

        Ok(product)
    }

    /// Let the API filter the catalog.
    ///
    /// # Errors
    ///
    /// Same as [`Self::get_products`].
    #[instrument(skip(self))]
    pub async fn filter_products(
        &self,
        filters: &ProductFilters,
    ) -> Result<Vec<Product>, CatalogError> {
        let cache_key = filters.cache_key();
        if let Some(CacheValue::Products(products)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for filtered products");
            return Ok(products.as_ref().clone());
        }

        let url = self.endpoint(None, &filters.query_pairs())?;
        let list: ProductList = self.fetch(url).await?;
        let products = convert_products(list.data.unwrap_or_default(), &self.inner.media_url);
        debug!(count = products.len(), "Fetched filtered products");

        self.inner
            .cache
            .insert(cache_key, CacheValue::Products(Arc::new(products.clone())))
            .await;

        Ok(products)
    }

    /// The full catalog if it is cached, without touching the network.
    pub async fn cached_products(&self) -> Option<Vec<Product>> {
        match self.inner.cache.get(&CacheKey::Products).await {
            Some(CacheValue::Products(products)) => Some(products.as_ref().clone()),
            _ => None,
        }
    }

    /// Drop every cached response.
    pub fn invalidate_cache(&self) {
        self.inner.cache.invalidate_all();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client(api: &str) -> StrapiClient {
        StrapiClient::new(&CatalogConfig::new(Url::parse(api).unwrap())).unwrap()
    }

    #[test]
    fn test_list_endpoint() {
        let url = client("https://cms.example.org/api").endpoint(None, &[]).unwrap();
        assert_eq!(url.as_str(), "https://cms.example.org/api/zapatoes?populate=*");
    }

    #[test]
    fn test_item_endpoint_with_trailing_slash_base() {
        let url = client("https://cms.example.org/api/")
            .endpoint(Some(ProductId::new(12)), &[])
            .unwrap();
        assert_eq!(url.as_str(), "https://cms.example.org/api/zapatoes/12?populate=*");
    }

    #[test]
    fn test_filter_query_pairs() {
        let filters = ProductFilters {
            search: Some("  zapato ".to_string()),
            available: true,
        };
        let url = client("https://cms.example.org/api")
            .endpoint(None, &filters.query_pairs())
            .unwrap();
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();

        assert_eq!(
            pairs,
            vec![
                ("filters[$or][0][nombre][$containsi]".to_string(), "zapato".to_string()),
                ("filters[$or][1][descripcion][$containsi]".to_string(), "zapato".to_string()),
                ("filters[activo][$eq]".to_string(), "true".to_string()),
                ("filters[stock][$gt]".to_string(), "0".to_string()),
                ("populate".to_string(), "*".to_string()),
            ]
        );
    }

    #[test]
    fn test_blank_search_adds_no_filter() {
        let filters = ProductFilters {
            search: Some("   ".to_string()),
            available: false,
        };
        assert!(filters.query_pairs().is_empty());
        assert_eq!(
            filters.cache_key(),
            CacheKey::Filtered {
                search: String::new(),
                available: false
            }
        );
    }
}
