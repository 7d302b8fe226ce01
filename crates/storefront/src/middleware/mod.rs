//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layer (capture errors)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//! 4. Session lock (one POST at a time per session cookie)
//! 5. Session layer (tower-sessions with an expiring moka store, holds the cart)
//! 6. Security headers (CSP, frame and referrer policies)

pub mod request_id;
pub mod security_headers;
pub mod session;
pub mod session_lock;

pub use request_id::request_id_middleware;
pub use security_headers::security_headers_middleware;
pub use session::create_session_layer;
pub use session_lock::session_lock_middleware;
