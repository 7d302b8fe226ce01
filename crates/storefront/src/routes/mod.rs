//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Catalog page (q, stock, sort)
//!
//! # Products
//! GET  /products/grid          - Product grid fragment (same query)
//! GET  /products/{id}          - Product detail
//! GET  /products/{id}/inquiry  - Redirect to a WhatsApp inquiry
//!
//! # Cart (form posts, redirect after)
//! GET  /cart                   - Cart page
//! POST /cart/add               - Add one unit
//! POST /cart/update            - Change quantity by a delta
//! POST /cart/remove            - Remove a line
//! POST /cart/clear             - Empty the cart
//! GET  /cart/count             - Item count (plain text)
//!
//! # Checkout
//! GET  /checkout               - Redirect to WhatsApp with the order summary
//! ```

pub mod cart;
pub mod home;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};
use lulu_core::Cart;

use crate::services::whatsapp::whatsapp_url;
use crate::state::AppState;

/// Header and footer data shared by every full page.
#[derive(Clone)]
pub struct LayoutView {
    pub cart_count: u32,
    pub contact_email: String,
    pub contact_address: String,
    pub whatsapp_url: String,
}

impl LayoutView {
    #[must_use]
    pub fn new(state: &AppState, cart: &Cart) -> Self {
        let contact = &state.config().contact;
        Self {
            cart_count: cart.total_items(),
            contact_email: contact.email.clone(),
            contact_address: contact.address.clone(),
            whatsapp_url: whatsapp_url(&contact.whatsapp_phone, "¡Hola! Quisiera más información."),
        }
    }
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/grid", get(home::grid))
        .route("/{id}", get(products::show))
        .route("/{id}/inquiry", get(products::inquiry))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
        .route("/count", get(cart::count))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::index))
        .nest("/products", product_routes())
        .nest("/cart", cart_routes())
        .route("/checkout", get(cart::checkout))
}
