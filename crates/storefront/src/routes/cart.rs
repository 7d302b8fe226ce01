//! Cart route handlers.
//!
//! Mutations are plain form posts answered with a redirect (post/redirect/get).
//! The cart is loaded from the session, mutated, and written back in full.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::header,
    response::{IntoResponse, Redirect, Response},
};
use lulu_core::{Cart, CartLineItem, ProductId};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;
use url::Url;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::routes::LayoutView;
use crate::services::cart::{load_cart, update_cart};
use crate::services::whatsapp::checkout_url;
use crate::state::AppState;

/// Cart item display data for templates.
#[derive(Clone)]
pub struct CartItemView {
    pub id: i64,
    pub name: String,
    pub image: String,
    pub quantity: u32,
    pub price: String,
    pub subtotal: String,
}

impl From<&CartLineItem> for CartItemView {
    fn from(item: &CartLineItem) -> Self {
        Self {
            id: item.id.as_i64(),
            name: item.name.clone(),
            image: item.image.clone(),
            quantity: item.quantity,
            price: format!("${}", item.price.format_es()),
            subtotal: format!("${}", item.subtotal().format_es()),
        }
    }
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub total: String,
    pub item_count: u32,
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            items: cart.items().iter().map(CartItemView::from).collect(),
            total: format!("${}", cart.total().format_es()),
            item_count: cart.total_items(),
        }
    }
}

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: String,
    /// Local path to return to after adding.
    pub return_to: Option<String>,
}

/// Update quantity form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub product_id: String,
    pub delta: i64,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub product_id: String,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub layout: LayoutView,
    pub cart: CartView,
    pub checkout_url: Option<String>,
}

/// Product id posted by a cart form. Unparsable ids are a client error.
fn form_product_id(raw: &str) -> Result<ProductId> {
    raw.trim()
        .parse()
        .map_err(|_| AppError::BadRequest("Producto inválido".to_string()))
}

/// Fallback when `return_to` is missing or unsafe.
const CART_PATH: &str = "/cart";

/// Only same-site absolute paths are followed; anything else goes to the cart.
///
/// Browsers strip tabs and newlines and treat `\` as `/` before resolving a
/// `Location`, so those are rejected outright. The path must then resolve to
/// the same origin it started from.
fn safe_return_path(return_to: Option<&str>) -> &str {
    let Some(path) = return_to else {
        return CART_PATH;
    };
    if !path.starts_with('/')
        || path.starts_with("//")
        || path
            .chars()
            .any(|c| c == '\\' || c.is_whitespace() || c.is_control())
    {
        return CART_PATH;
    }

    let Ok(base) = Url::parse("http://storefront.invalid/") else {
        return CART_PATH;
    };
    match base.join(path) {
        Ok(resolved) if resolved.origin() == base.origin() => path,
        _ => CART_PATH,
    }
}

/// Display cart page.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> CartShowTemplate {
    let cart = load_cart(&session).await;

    CartShowTemplate {
        layout: LayoutView::new(&state, &cart),
        cart: CartView::from(&cart),
        checkout_url: checkout_url(&state.config().contact.whatsapp_phone, &cart),
    }
}

/// Add one unit of a product.
///
/// The product is looked up in the catalog so the line item carries current
/// name, price and image.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<AddToCartForm>,
) -> Result<Redirect> {
    let id = form_product_id(&form.product_id)?;
    let product = state.catalog().get_product_by_id(id).await?;

    let cart = update_cart(&session, |cart| cart.add(&product)).await?;
    add_breadcrumb(
        "cart",
        "Added product",
        Some(&[("product_id", form.product_id.as_str())]),
    );
    tracing::info!(product_id = %id, items = cart.total_items(), "Added product to cart");

    Ok(Redirect::to(safe_return_path(form.return_to.as_deref())))
}

/// Change a line's quantity by a delta; lines at zero or below are removed.
#[instrument(skip(session))]
pub async fn update(session: Session, Form(form): Form<UpdateCartForm>) -> Result<Redirect> {
    let id = form_product_id(&form.product_id)?;

    update_cart(&session, |cart| {
        if !cart.update_quantity(id, form.delta) {
            tracing::debug!(product_id = %id, "Quantity change for product not in cart");
        }
    })
    .await?;
    add_breadcrumb(
        "cart",
        "Changed quantity",
        Some(&[("product_id", form.product_id.as_str())]),
    );

    Ok(Redirect::to("/cart"))
}

/// Remove a product's line.
#[instrument(skip(session))]
pub async fn remove(session: Session, Form(form): Form<RemoveFromCartForm>) -> Result<Redirect> {
    let id = form_product_id(&form.product_id)?;

    update_cart(&session, |cart| {
        cart.remove(id);
    })
    .await?;
    add_breadcrumb(
        "cart",
        "Removed product",
        Some(&[("product_id", form.product_id.as_str())]),
    );

    Ok(Redirect::to("/cart"))
}

/// Empty the cart.
#[instrument(skip(session))]
pub async fn clear(session: Session) -> Result<Redirect> {
    update_cart(&session, Cart::clear).await?;
    add_breadcrumb("cart", "Cleared cart", None);

    Ok(Redirect::to("/cart"))
}

/// Item count for the header badge.
#[instrument(skip(session))]
pub async fn count(session: Session) -> Response {
    let cart = load_cart(&session).await;

    (
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        cart.total_items().to_string(),
    )
        .into_response()
}

/// Hand the order over to WhatsApp.
///
/// An empty cart goes back to the cart page instead.
#[instrument(skip(state, session))]
pub async fn checkout(State(state): State<AppState>, session: Session) -> Redirect {
    let cart = load_cart(&session).await;

    match checkout_url(&state.config().contact.whatsapp_phone, &cart) {
        Some(url) => {
            add_breadcrumb("checkout", "WhatsApp checkout", None);
            tracing::info!(
                lines = cart.len(),
                items = cart.total_items(),
                total = %cart.total(),
                "Checkout handed off to WhatsApp"
            );
            Redirect::to(&url)
        }
        None => Redirect::to("/cart"),
    }
}
