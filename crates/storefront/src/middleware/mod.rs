//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (`http_request` span)
//! 3. Request ID (recorded on the span, echoed in the response)
//! 4. CORS (only when `STOREFRONT_CORS_ORIGINS` is set)
//! 5. Session layer (tower-sessions with `PostgreSQL` store)
//! 6. Rate limiting on order placement and checkout (governor)

pub mod rate_limit;
pub mod request_id;
pub mod session;

pub use rate_limit::order_rate_limiter;
pub use request_id::{RequestId, request_id_middleware};
pub use session::create_session_layer;
