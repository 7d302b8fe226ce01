//! Search, availability filter and sort over the loaded catalog.
//!
//! The three criteria are independent. Every query reruns the whole pipeline
//! over the full product set, so there is no incremental state to keep in
//! sync between requests.

use serde::{Deserialize, Serialize};

use crate::collate::NameCollator;
use crate::product::Product;
use crate::types::ProductId;

/// Availability filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Availability {
    #[default]
    All,
    AvailableOnly,
}

impl Availability {
    /// Parse a query parameter value. Unknown values mean [`Availability::All`].
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "available" => Self::AvailableOnly,
            _ => Self::All,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::AvailableOnly => "available",
        }
    }
}

/// Sort order for the product grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Keep the order returned by the content API.
    #[default]
    Featured,
    PriceAsc,
    PriceDesc,
    Name,
}

impl SortOrder {
    /// Parse a query parameter value. Unknown values mean [`SortOrder::Featured`].
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "price-asc" => Self::PriceAsc,
            "price-desc" => Self::PriceDesc,
            "name" => Self::Name,
            _ => Self::Featured,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Featured => "default",
            Self::PriceAsc => "price-asc",
            Self::PriceDesc => "price-desc",
            Self::Name => "name",
        }
    }

    /// All orders with their visitor-facing labels, in menu order.
    #[must_use]
    pub const fn options() -> [(Self, &'static str); 4] {
        [
            (Self::Featured, "Destacados"),
            (Self::PriceAsc, "Precio: menor a mayor"),
            (Self::PriceDesc, "Precio: mayor a menor"),
            (Self::Name, "Nombre"),
        ]
    }
}

/// A combined search / filter / sort request.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CatalogQuery {
    pub search: String,
    pub availability: Availability,
    pub sort: SortOrder,
}

impl CatalogQuery {
    /// Normalized search term: trimmed and lowercased.
    #[must_use]
    pub fn search_term(&self) -> String {
        self.search.trim().to_lowercase()
    }

    fn passes_availability(&self, product: &Product) -> bool {
        match self.availability {
            Availability::All => true,
            Availability::AvailableOnly => product.is_available(),
        }
    }

    /// Run the pipeline over `products`.
    #[must_use]
    pub fn apply<'a>(&self, products: &'a [Product]) -> Vec<&'a Product> {
        let term = self.search_term();
        let mut selected: Vec<&Product> = products
            .iter()
            .filter(|p| matches_term(p, &term) && self.passes_availability(p))
            .collect();

        // Vec::sort_by is stable, so ties keep catalog order.
        match self.sort {
            SortOrder::Featured => {}
            SortOrder::PriceAsc => selected.sort_by(|a, b| a.price.cmp(&b.price)),
            SortOrder::PriceDesc => selected.sort_by(|a, b| b.price.cmp(&a.price)),
            SortOrder::Name => {
                let collator = NameCollator::spanish();
                selected.sort_by(|a, b| collator.compare(&a.name, &b.name));
            }
        }

        selected
    }
}

fn matches_term(product: &Product, term: &str) -> bool {
    term.is_empty()
        || product.name.to_lowercase().contains(term)
        || product.description.to_lowercase().contains(term)
}

/// Result summary such as `"1 producto"` or `"3 productos"`.
#[must_use]
pub fn product_count_label(count: usize) -> String {
    let noun = if count == 1 { "producto" } else { "productos" };
    format!("{count} {noun}")
}

/// The loaded product set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    #[must_use]
    pub const fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Products matching `query`, in the requested order.
    #[must_use]
    pub fn query(&self, query: &CatalogQuery) -> Vec<&Product> {
        query.apply(&self.products)
    }
}

impl From<Vec<Product>> for Catalog {
    fn from(products: Vec<Product>) -> Self {
        Self::new(products)
    }
}
