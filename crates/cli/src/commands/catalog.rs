//! Catalog inspection commands.

use std::io::Write;

use lulu_core::{
    Availability, Catalog, CatalogQuery, Product, ProductId, SortOrder, product_count_label,
};
use lulu_storefront::config::StorefrontConfig;
use lulu_storefront::services::whatsapp::inquiry_url;
use lulu_storefront::strapi::{ProductFilters, StrapiClient};
use tracing::info;

/// Options for `catalog list`.
#[derive(Debug)]
pub struct ListOptions {
    pub search: Option<String>,
    pub available: bool,
    pub sort: String,
    pub remote: bool,
    pub json: bool,
}

impl ListOptions {
    fn query(&self) -> CatalogQuery {
        CatalogQuery {
            search: self.search.clone().unwrap_or_default(),
            availability: if self.available {
                Availability::AvailableOnly
            } else {
                Availability::All
            },
            sort: SortOrder::parse(&self.sort),
        }
    }
}

fn client() -> Result<(StorefrontConfig, StrapiClient), Box<dyn std::error::Error>> {
    let config = StorefrontConfig::from_env()?;
    let client = StrapiClient::new(&config.catalog)?;
    Ok((config, client))
}

fn parse_id(raw: &str) -> Result<ProductId, Box<dyn std::error::Error>> {
    raw.parse()
        .map_err(|e| format!("invalid product id '{raw}': {e}").into())
}

/// List products, filtered and sorted.
///
/// # Errors
///
/// Returns an error if configuration is invalid or the catalog cannot be fetched.
pub async fn list(options: &ListOptions) -> Result<(), Box<dyn std::error::Error>> {
    let (_, client) = client()?;
    let query = options.query();

    let products: Vec<Product> = if options.remote {
        // The API already applied search and availability; only sorting remains.
        let filters = ProductFilters {
            search: options.search.clone(),
            available: options.available,
        };
        let fetched = client.filter_products(&filters).await?;
        let sort_only = CatalogQuery {
            sort: query.sort,
            ..CatalogQuery::default()
        };
        Catalog::new(fetched).query(&sort_only).into_iter().cloned().collect()
    } else {
        let fetched = client.get_products().await?;
        Catalog::new(fetched).query(&query).into_iter().cloned().collect()
    };

    info!(count = products.len(), remote = options.remote, "Listed products");

    let mut out = std::io::stdout().lock();
    if options.json {
        serde_json::to_writer_pretty(&mut out, &products)?;
        writeln!(out)?;
    } else {
        write_table(&mut out, &products)?;
    }
    Ok(())
}

/// Show one product.
///
/// # Errors
///
/// Returns an error if the id is invalid or the product cannot be fetched.
pub async fn show(id: &str, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let (_, client) = client()?;
    let product = client.get_product_by_id(parse_id(id)?).await?;

    let mut out = std::io::stdout().lock();
    if json {
        serde_json::to_writer_pretty(&mut out, &product)?;
        writeln!(out)?;
    } else {
        write_detail(&mut out, &product)?;
    }
    Ok(())
}

/// Print the WhatsApp inquiry link for a product.
///
/// # Errors
///
/// Returns an error if the id is invalid or the product cannot be fetched.
pub async fn inquiry(id: &str) -> Result<(), Box<dyn std::error::Error>> {
    let (config, client) = client()?;
    let product = client.get_product_by_id(parse_id(id)?).await?;

    let mut out = std::io::stdout().lock();
    writeln!(out, "{}", inquiry_url(&config.contact.whatsapp_phone, &product))?;
    Ok(())
}

fn write_table(out: &mut impl Write, products: &[Product]) -> std::io::Result<()> {
    writeln!(out, "{:>6}  {:<32}  {:>14}  {:>6}  {}", "ID", "NOMBRE", "PRECIO", "STOCK", "ESTADO")?;
    for product in products {
        let price = format!("${}", product.price.format_es());
        writeln!(
            out,
            "{:>6}  {:<32}  {:>14}  {:>6}  {}",
            product.id.as_i64(),
            truncate(&product.name, 32),
            price,
            product.stock,
            product.stock_status()
        )?;
    }
    writeln!(out, "{}", product_count_label(products.len()))
}

fn write_detail(out: &mut impl Write, product: &Product) -> std::io::Result<()> {
    writeln!(out, "{} (#{})", product.name, product.id)?;
    writeln!(out, "Precio:      ${}", product.price.format_es())?;
    writeln!(out, "Stock:       {} ({})", product.stock, product.stock_status())?;
    writeln!(out, "Descripción: {}", product.description)?;
    if product.sizes.is_empty() {
        writeln!(out, "Tallas:      No hay tallas especificadas")?;
    } else {
        writeln!(out, "Tallas:      {}", product.sizes.join(", "))?;
    }
    for image in &product.images {
        writeln!(out, "Imagen:      {image}")?;
    }
    Ok(())
}

/// Shorten to `max` characters, marking the cut with an ellipsis.
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use lulu_core::Price;

    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Bota", 10), "Bota");
        assert_eq!(truncate("Sandalia de verano", 8), "Sandali…");
    }

    #[test]
    fn test_list_options_query() {
        let options = ListOptions {
            search: Some("bota".to_string()),
            available: true,
            sort: "name".to_string(),
            remote: false,
            json: false,
        };
        let query = options.query();

        assert_eq!(query.search, "bota");
        assert_eq!(query.availability, Availability::AvailableOnly);
        assert_eq!(query.sort, SortOrder::Name);
    }

    #[test]
    fn test_write_table() {
        let products = vec![Product {
            name: "Zapato Rojo".to_string(),
            price: Price::parse_lenient("120000"),
            stock: 3,
            ..Product::placeholder(ProductId::new(7))
        }];
        let mut buf = Vec::new();
        write_table(&mut buf, &products).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert!(text.contains("Zapato Rojo"));
        assert!(text.contains("$120.000,00"));
        assert!(text.contains("En Stock"));
        assert!(text.ends_with("1 producto\n"));
    }
}
