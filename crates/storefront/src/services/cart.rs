//! Session-backed cart persistence.
//!
//! The cart lives in the visitor's session under [`CART_KEY`] as one JSON
//! string holding the full line-item list. It is read once per request and
//! written back in full after every mutation.

use lulu_core::{Cart, CartError};
use thiserror::Error;
use tower_sessions::Session;

/// Session key holding the serialized cart.
pub const CART_KEY: &str = "shoesLuluCart";

/// Errors persisting the cart.
#[derive(Debug, Error)]
pub enum CartStorageError {
    #[error("session error: {0}")]
    Session(#[from] tower_sessions::session::Error),
    #[error(transparent)]
    Cart(#[from] CartError),
}

/// Load the visitor's cart.
///
/// A missing or unreadable blob yields an empty cart.
pub async fn load_cart(session: &Session) -> Cart {
    match session.get::<String>(CART_KEY).await {
        Ok(Some(blob)) => Cart::from_json(&blob).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Discarding unreadable cart");
            Cart::new()
        }),
        Ok(None) => Cart::new(),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read cart from session");
            Cart::new()
        }
    }
}

/// Persist the full cart.
///
/// # Errors
///
/// Returns an error if the cart cannot be encoded or the session store fails.
pub async fn save_cart(session: &Session, cart: &Cart) -> Result<(), CartStorageError> {
    let blob = cart.to_json()?;
    session.insert(CART_KEY, blob).await?;
    Ok(())
}

/// Load, mutate and persist in one step.
///
/// Returns the updated cart.
///
/// # Errors
///
/// Returns an error if the mutated cart cannot be written back; the visitor's
/// stored cart is then unchanged.
pub async fn update_cart<F>(session: &Session, mutate: F) -> Result<Cart, CartStorageError>
where
    F: FnOnce(&mut Cart),
{
    let mut cart = load_cart(session).await;
    mutate(&mut cart);
    save_cart(session, &cart).await.inspect_err(|e| {
        tracing::error!(error = %e, "Failed to persist cart");
    })?;
    Ok(cart)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use lulu_core::{Price, Product, ProductId};

    use super::*;
    use crate::middleware::session::create_session_store;

    fn session() -> Session {
        Session::new(None, Arc::new(create_session_store()), None)
    }

    fn product(id: i64) -> Product {
        Product {
            price: Price::parse_lenient("10"),
            stock: 3,
            ..Product::placeholder(ProductId::new(id))
        }
    }

    #[tokio::test]
    async fn test_missing_cart_is_empty() {
        assert!(load_cart(&session()).await.is_empty());
    }

    #[tokio::test]
    async fn test_unreadable_cart_is_empty() {
        let session = session();
        session.insert(CART_KEY, "{broken").await.unwrap();
        assert!(load_cart(&session).await.is_empty());

        session.insert(CART_KEY, 42).await.unwrap();
        assert!(load_cart(&session).await.is_empty());
    }

    #[tokio::test]
    async fn test_update_cart_persists_full_list() {
        let session = session();
        update_cart(&session, |cart| cart.add(&product(1))).await.unwrap();
        let cart = update_cart(&session, |cart| {
            cart.add(&product(1));
            cart.add(&product(2));
        })
        .await
        .unwrap();

        assert_eq!(cart.total_items(), 3);
        assert_eq!(load_cart(&session).await, cart);

        let blob: String = session.get(CART_KEY).await.unwrap().unwrap();
        assert!(blob.starts_with('['));
        assert!(blob.contains("\"cantidad\":2"));
    }
}
