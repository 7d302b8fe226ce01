//! WhatsApp handoff links.
//!
//! Checkout is a conversation, not a payment flow: the visitor is sent to
//! `https://wa.me/{phone}?text={message}` with a pre-filled message.

use lulu_core::{Cart, Product};

const WA_ME: &str = "https://wa.me";

/// Deep link opening a chat with `phone` and `message` pre-filled.
#[must_use]
pub fn whatsapp_url(phone: &str, message: &str) -> String {
    format!("{WA_ME}/{phone}?text={}", urlencoding::encode(message))
}

/// Single-product inquiry link.
#[must_use]
pub fn inquiry_url(phone: &str, product: &Product) -> String {
    whatsapp_url(phone, &product.inquiry_message())
}

/// Checkout link for the whole cart, or `None` when the cart is empty.
#[must_use]
pub fn checkout_url(phone: &str, cart: &Cart) -> Option<String> {
    if cart.is_empty() {
        return None;
    }
    Some(whatsapp_url(phone, &cart.checkout_message()))
}
