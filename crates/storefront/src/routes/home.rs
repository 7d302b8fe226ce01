//! Catalog page and product grid fragment.
//!
//! The catalog page renders in one of four modes: loading, products, empty or
//! error. A cold catalog renders the loading shell right away and the grid is
//! fetched by a follow-up request to `/products/grid`, because the content API
//! can take close to a minute to wake up. Visitors without JavaScript follow a
//! link that waits for the catalog (`wait=1`).

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Query, State};
use lulu_core::{Availability, Catalog, CatalogQuery, Product, SortOrder, product_count_label};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::filters;
use crate::routes::LayoutView;
use crate::services::cart::load_cart;
use crate::state::AppState;
use crate::strapi::CatalogError;

/// Query string of the catalog page and grid fragment.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogParams {
    pub q: Option<String>,
    pub stock: Option<String>,
    pub sort: Option<String>,
    /// Wait for the catalog instead of rendering the loading shell.
    pub wait: Option<String>,
}

impl CatalogParams {
    #[must_use]
    pub fn to_query(&self) -> CatalogQuery {
        CatalogQuery {
            search: self.q.clone().unwrap_or_default(),
            availability: Availability::parse(self.stock.as_deref().unwrap_or_default()),
            sort: SortOrder::parse(self.sort.as_deref().unwrap_or_default()),
        }
    }

    fn wants_wait(&self) -> bool {
        self.wait.as_deref().is_some_and(|w| !w.is_empty() && w != "0")
    }
}

/// Serialize a query back to a URL query string (without `?`).
fn query_string(query: &CatalogQuery) -> String {
    let mut pairs = Vec::new();
    let term = query.search.trim();
    if !term.is_empty() {
        pairs.push(format!("q={}", urlencoding::encode(term)));
    }
    if query.availability != Availability::All {
        pairs.push(format!("stock={}", query.availability.as_str()));
    }
    if query.sort != SortOrder::Featured {
        pairs.push(format!("sort={}", query.sort.as_str()));
    }
    pairs.join("&")
}

/// `path` with the query string appended when there is one.
fn with_query(path: &str, qs: &str) -> String {
    if qs.is_empty() {
        path.to_string()
    } else {
        format!("{path}?{qs}")
    }
}

/// Product card display data for templates.
#[derive(Clone)]
pub struct ProductCardView {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub price: String,
    pub stock: i64,
    pub image: String,
    pub badge_label: &'static str,
    pub badge_class: &'static str,
    pub available: bool,
}

impl From<&Product> for ProductCardView {
    fn from(product: &Product) -> Self {
        let status = product.stock_status();
        Self {
            id: product.id.as_i64(),
            name: product.name.clone(),
            description: product.description.clone(),
            price: format!("${}", product.price.format_es()),
            stock: product.stock,
            image: product.primary_image().to_string(),
            badge_label: status.label(),
            badge_class: status.badge_class(),
            available: status.is_available(),
        }
    }
}

/// Error display data for templates.
#[derive(Clone)]
pub struct GridErrorView {
    pub message: String,
    pub timed_out: bool,
    pub retry_url: String,
}

/// What the product grid shows.
#[derive(Clone)]
pub enum GridView {
    /// Catalog not loaded yet; the fragment URL to fetch.
    Loading(String),
    Products(Vec<ProductCardView>),
    Empty,
    Error(GridErrorView),
}

impl GridView {
    fn from_result(
        result: Result<Vec<Product>, CatalogError>,
        query: &CatalogQuery,
        page_url: &str,
    ) -> Self {
        match result {
            Ok(products) => {
                let catalog = Catalog::new(products);
                let cards: Vec<ProductCardView> = catalog
                    .query(query)
                    .into_iter()
                    .map(ProductCardView::from)
                    .collect();
                if cards.is_empty() {
                    Self::Empty
                } else {
                    Self::Products(cards)
                }
            }
            Err(e) => Self::Error(GridErrorView {
                message: e.user_message(),
                timed_out: e.is_timeout(),
                retry_url: page_url.to_string(),
            }),
        }
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading(_))
    }

    /// Number of products shown, for the result summary.
    #[must_use]
    pub fn product_count(&self) -> usize {
        match self {
            Self::Products(cards) => cards.len(),
            _ => 0,
        }
    }

    /// Result summary, e.g. `"1 producto"`.
    #[must_use]
    pub fn count_label(&self) -> String {
        product_count_label(self.product_count())
    }
}

/// Select option display data for templates.
#[derive(Clone)]
pub struct OptionView {
    pub value: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

fn sort_options(current: SortOrder) -> Vec<OptionView> {
    SortOrder::options()
        .into_iter()
        .map(|(order, label)| OptionView {
            value: order.as_str(),
            label,
            selected: order == current,
        })
        .collect()
}

fn stock_options(current: Availability) -> Vec<OptionView> {
    [
        (Availability::All, "Todos"),
        (Availability::AvailableOnly, "Disponibles"),
    ]
    .into_iter()
    .map(|(availability, label)| OptionView {
        value: availability.as_str(),
        label,
        selected: availability == current,
    })
    .collect()
}

/// Catalog page template.
#[derive(Template, WebTemplate)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub layout: LayoutView,
    pub search: String,
    pub sort_options: Vec<OptionView>,
    pub stock_options: Vec<OptionView>,
    pub grid: GridView,
    pub wait_url: String,
}

/// Product grid fragment template.
#[derive(Template, WebTemplate)]
#[template(path = "partials/product_grid.html")]
pub struct GridTemplate {
    pub grid: GridView,
}

/// Display the catalog page.
#[instrument(skip(state, session))]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<CatalogParams>,
) -> IndexTemplate {
    let cart = load_cart(&session).await;
    let query = params.to_query();
    let qs = query_string(&query);
    let page_url = with_query("/", &qs);
    let wait_url = if qs.is_empty() {
        "/?wait=1".to_string()
    } else {
        format!("/?{qs}&wait=1")
    };

    let grid = match state.catalog().cached_products().await {
        Some(products) => GridView::from_result(Ok(products), &query, &page_url),
        None if params.wants_wait() => {
            GridView::from_result(state.catalog().get_products().await, &query, &page_url)
        }
        None => GridView::Loading(with_query("/products/grid", &qs)),
    };

    IndexTemplate {
        layout: LayoutView::new(&state, &cart),
        search: query.search.clone(),
        sort_options: sort_options(query.sort),
        stock_options: stock_options(query.availability),
        grid,
        wait_url,
    }
}

/// Render only the product grid (fetched by the catalog page's script).
#[instrument(skip(state))]
pub async fn grid(
    State(state): State<AppState>,
    Query(params): Query<CatalogParams>,
) -> GridTemplate {
    let query = params.to_query();
    let page_url = with_query("/", &query_string(&query));

    GridTemplate {
        grid: GridView::from_result(state.catalog().get_products().await, &query, &page_url),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::time::Duration;

    use lulu_core::{Price, ProductId};

    use super::*;

    fn product(id: i64, name: &str, price: &str, stock: i64) -> Product {
        Product {
            name: name.to_string(),
            price: Price::parse_lenient(price),
            stock,
            ..Product::placeholder(ProductId::new(id))
        }
    }

    #[test]
    fn test_params_to_query_defaults_unknown_values() {
        let params = CatalogParams {
            q: Some("bota".to_string()),
            stock: Some("weird".to_string()),
            sort: Some("price-desc".to_string()),
            wait: None,
        };
        let query = params.to_query();

        assert_eq!(query.search, "bota");
        assert_eq!(query.availability, Availability::All);
        assert_eq!(query.sort, SortOrder::PriceDesc);
        assert!(!params.wants_wait());
    }

    #[test]
    fn test_query_string_round_trip() {
        let query = CatalogQuery {
            search: " zapato rojo ".to_string(),
            availability: Availability::AvailableOnly,
            sort: SortOrder::Name,
        };
        assert_eq!(query_string(&query), "q=zapato%20rojo&stock=available&sort=name");
        assert_eq!(query_string(&CatalogQuery::default()), "");
    }

    #[test]
    fn test_grid_modes() {
        let products = vec![product(1, "Zapato Rojo", "50", 2), product(2, "Bolso Azul", "10", 0)];
        let query = CatalogQuery {
            search: "zapato".to_string(),
            ..CatalogQuery::default()
        };

        let grid = GridView::from_result(Ok(products.clone()), &query, "/");
        assert_eq!(grid.product_count(), 1);
        assert_eq!(grid.count_label(), "1 producto");
        match grid {
            GridView::Products(cards) => {
                assert_eq!(cards[0].name, "Zapato Rojo");
                assert_eq!(cards[0].price, "$50,00");
                assert_eq!(cards[0].badge_label, "En Stock");
            }
            _ => panic!("expected products"),
        }

        let query = CatalogQuery {
            search: "sandalia".to_string(),
            ..CatalogQuery::default()
        };
        assert!(matches!(
            GridView::from_result(Ok(products), &query, "/"),
            GridView::Empty
        ));
    }

    #[test]
    fn test_grid_error_mode_flags_timeout() {
        let grid = GridView::from_result(
            Err(CatalogError::RequestTimeout(Duration::from_secs(60))),
            &CatalogQuery::default(),
            "/?q=x",
        );
        match grid {
            GridView::Error(error) => {
                assert!(error.timed_out);
                assert_eq!(error.retry_url, "/?q=x");
            }
            _ => panic!("expected error"),
        }
    }

    #[test]
    fn test_sold_out_card() {
        let card = ProductCardView::from(&product(3, "Bota", "80", 0));
        assert_eq!(card.badge_label, "Agotado");
        assert_eq!(card.badge_class, "out-stock");
        assert!(!card.available);
    }
}
