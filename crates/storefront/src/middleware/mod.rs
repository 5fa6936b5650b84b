//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (hub per request, HTTP transaction)
//! 2. Session layer (tower-sessions with in-memory store)
//! 3. `TraceLayer` (request span)
//! 4. Request ID (records the id in the span, echoes it in the response)

pub mod request_id;
pub mod session;

pub use request_id::{REQUEST_ID_HEADER, make_request_span, request_id_middleware};
pub use session::{SESSION_COOKIE_NAME, create_session_layer};
