//! Product detail and inquiry handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    response::Redirect,
};
use lulu_core::{Product, ProductId};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::filters;
use crate::routes::LayoutView;
use crate::services::cart::load_cart;
use crate::services::whatsapp::inquiry_url;
use crate::state::AppState;

/// Thumbnail display data for templates.
#[derive(Clone)]
pub struct ThumbnailView {
    pub url: String,
    pub position: usize,
    pub active: bool,
}

/// Product detail display data for templates.
#[derive(Clone)]
pub struct ProductDetailView {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub price: String,
    pub stock: i64,
    pub status_label: &'static str,
    pub status_class: &'static str,
    pub available: bool,
    pub main_image: String,
    pub thumbnails: Vec<ThumbnailView>,
    pub sizes: Vec<String>,
    pub inquiry_url: String,
}

impl ProductDetailView {
    fn new(product: &Product, whatsapp_phone: &str) -> Self {
        let status = product.stock_status();
        let thumbnails = if product.has_multiple_images() {
            product
                .images
                .iter()
                .enumerate()
                .map(|(index, url)| ThumbnailView {
                    url: url.clone(),
                    position: index + 1,
                    active: index == 0,
                })
                .collect()
        } else {
            Vec::new()
        };

        Self {
            id: product.id.as_i64(),
            name: product.name.clone(),
            description: product.description.clone(),
            price: format!("${}", product.price.format_es()),
            stock: product.stock,
            status_label: status.label(),
            status_class: status.badge_class(),
            available: status.is_available(),
            main_image: product.primary_image().to_string(),
            thumbnails,
            sizes: product.sizes.clone(),
            inquiry_url: inquiry_url(whatsapp_phone, product),
        }
    }
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub layout: LayoutView,
    pub product: ProductDetailView,
}

/// Parse a product id path segment. Anything unparsable is a missing page.
fn parse_product_id(raw: &str) -> Result<ProductId> {
    raw.parse()
        .map_err(|_| AppError::NotFound(format!("product {raw}")))
}

/// Display product detail page.
#[instrument(skip(state, session), fields(product_id = %id))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> Result<ProductShowTemplate> {
    let id = parse_product_id(&id)?;
    let product = state.catalog().get_product_by_id(id).await?;
    let cart = load_cart(&session).await;

    Ok(ProductShowTemplate {
        layout: LayoutView::new(&state, &cart),
        product: ProductDetailView::new(&product, &state.config().contact.whatsapp_phone),
    })
}

/// Redirect to a WhatsApp chat asking about one product.
#[instrument(skip(state), fields(product_id = %id))]
pub async fn inquiry(State(state): State<AppState>, Path(id): Path<String>) -> Result<Redirect> {
    let id = parse_product_id(&id)?;
    let product = state.catalog().get_product_by_id(id).await?;

    Ok(Redirect::to(&inquiry_url(
        &state.config().contact.whatsapp_phone,
        &product,
    )))
}
