//! Per-session serialization of cart writes.
//!
//! The session layer loads the record when a request starts and saves it
//! when the response is built, so two concurrent POSTs from one visitor would
//! each read the same cart and the later save would drop the earlier change.
//! This middleware sits outside the session layer and makes POSTs carrying
//! the same session cookie run one at a time.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Request, State},
    http::{HeaderMap, Method, header::COOKIE},
    middleware::Next,
    response::Response,
};
use moka::future::Cache;
use tokio::sync::Mutex;

use crate::middleware::session::SESSION_COOKIE_NAME;
use crate::state::AppState;

/// Locks idle for this long are dropped.
const LOCK_IDLE: Duration = Duration::from_secs(10 * 60);

/// Async mutexes keyed by session id.
#[derive(Clone)]
pub struct SessionLocks {
    locks: Cache<String, Arc<Mutex<()>>>,
}

impl Default for SessionLocks {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionLocks {
    #[must_use]
    pub fn new() -> Self {
        Self {
            locks: Cache::builder().time_to_idle(LOCK_IDLE).build(),
        }
    }

    /// The lock for one session, created on first use.
    pub async fn lock_for(&self, session_id: &str) -> Arc<Mutex<()>> {
        self.locks
            .get_with(session_id.to_string(), async { Arc::new(Mutex::new(())) })
            .await
    }
}

/// Session id from the request's `Cookie` header(s).
fn session_id(headers: &HeaderMap) -> Option<&str> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE_NAME)
        .map(|(_, value)| value)
        .filter(|value| !value.is_empty())
}

/// Run POSTs of one session one at a time.
///
/// Requests without a session cookie cannot race on a stored cart and pass
/// straight through.
pub async fn session_lock_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    if request.method() != Method::POST {
        return next.run(request).await;
    }
    let Some(id) = session_id(request.headers()) else {
        return next.run(request).await;
    };

    let lock = state.session_locks().lock_for(id).await;
    let _guard = lock.lock().await;
    next.run(request).await
}
