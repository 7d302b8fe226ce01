//! Session middleware configuration.
//!
//! Sessions only carry the visitor's cart, so they live in an in-process
//! moka cache and are lost on restart. Each record is evicted once its
//! expiry date passes, and the cache is bounded.

use tower_sessions::{Expiry, SessionManagerLayer};
use tower_sessions_moka_store::MokaStore;

use crate::config::StorefrontConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "lulu_session";

/// Session expiry time in seconds (30 days of inactivity).
const SESSION_EXPIRY_SECONDS: i64 = 30 * 24 * 60 * 60;

/// Upper bound on live sessions kept in memory.
const MAX_SESSIONS: u64 = 100_000;

/// Create the session store.
#[must_use]
pub fn create_session_store() -> MokaStore {
    MokaStore::new(Some(MAX_SESSIONS))
}

/// Create the session layer over an in-memory store.
#[must_use]
pub fn create_session_layer(config: &StorefrontConfig) -> SessionManagerLayer<MokaStore> {
    SessionManagerLayer::new(create_session_store())
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(config.is_secure())
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use tower_sessions::SessionStore;
    use tower_sessions::cookie::time::{Duration, OffsetDateTime};
    use tower_sessions::session::{Id, Record};

    use super::*;

    fn record(expires_in: Duration) -> Record {
        Record {
            id: Id::default(),
            data: HashMap::default(),
            expiry_date: OffsetDateTime::now_utc() + expires_in,
        }
    }

    #[tokio::test]
    async fn test_live_session_is_kept() {
        let store = create_session_store();
        let mut live = record(Duration::days(1));
        store.create(&mut live).await.unwrap();

        let loaded = store.load(&live.id).await.unwrap();
        assert_eq!(loaded.map(|r| r.id), Some(live.id));
    }

    #[tokio::test]
    async fn test_expired_session_is_evicted() {
        let store = create_session_store();
        let mut stale = record(Duration::minutes(-1));
        store.create(&mut stale).await.unwrap();

        assert!(store.load(&stale.id).await.unwrap().is_none());
    }
}
