//! Request ID middleware for request tracing and correlation.
//!
//! Every request carries an `x-request-id`. An id supplied by an upstream
//! proxy is kept when it looks sane (short, visible ASCII); otherwise a UUID
//! v4 is generated. The id is recorded in the request span, tagged on the
//! Sentry scope and echoed in the response headers.

use axum::{
    extract::Request,
    http::{HeaderValue, Method, Uri},
    middleware::Next,
    response::Response,
};
use tracing::Span;
use uuid::Uuid;

/// The HTTP header name for request IDs.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Longest upstream id accepted as-is.
const MAX_UPSTREAM_ID_LEN: usize = 128;

fn usable_upstream_id(value: &HeaderValue) -> Option<String> {
    let id = value.to_str().ok()?.trim();
    let sane = !id.is_empty()
        && id.len() <= MAX_UPSTREAM_ID_LEN
        && id.bytes().all(|b| b.is_ascii_graphic());
    sane.then(|| id.to_string())
}

/// The request's id: the upstream one when usable, otherwise a new UUID v4.
#[must_use]
pub fn request_id_for(request: &Request) -> String {
    request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(usable_upstream_id)
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}

/// Span for `TraceLayer` with an empty `request_id` field for the middleware
/// to fill in.
pub fn make_request_span(method: &Method, uri: &Uri) -> Span {
    tracing::info_span!(
        "request",
        %method,
        path = %uri.path(),
        request_id = tracing::field::Empty,
    )
}

/// Middleware that ensures every request has a request ID.
pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    let request_id = request_id_for(&request);

    Span::current().record("request_id", request_id.as_str());

    sentry::configure_scope(|scope| {
        scope.set_tag("request_id", &request_id);
    });

    let header = HeaderValue::from_str(&request_id).ok();
    if let Some(value) = &header {
        request.headers_mut().insert(REQUEST_ID_HEADER, value.clone());
    }

    let mut response = next.run(request).await;

    if let Some(value) = header {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}
