//! Request ID middleware for log and error correlation.
//!
//! Every request carries an `x-request-id`. An id supplied by an upstream
//! proxy is kept when it looks sane; otherwise a UUID v4 is minted. The id
//! is recorded on the current span, tagged on the Sentry scope and echoed
//! back in the response.

use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use tracing::Span;
use uuid::Uuid;

/// The HTTP header carrying the request ID.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Longest upstream ID we are willing to propagate.
const MAX_UPSTREAM_LEN: usize = 64;

/// Middleware that ensures every request has a request ID.
pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .filter(|id| is_acceptable(id))
        .map_or_else(|| Uuid::new_v4().to_string(), String::from);

    Span::current().record("request_id", request_id.as_str());

    sentry::configure_scope(|scope| {
        scope.set_tag("request_id", &request_id);
    });

    let header = HeaderValue::from_str(&request_id).ok();
    if let Some(value) = &header {
        request
            .headers_mut()
            .insert(HeaderName::from_static(REQUEST_ID_HEADER), value.clone());
    }

    let mut response = next.run(request).await;

    if let Some(value) = header {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}

/// Non-empty, bounded, and limited to visible ASCII.
fn is_acceptable(id: &str) -> bool {
    !id.is_empty() && id.len() <= MAX_UPSTREAM_LEN && id.bytes().all(|b| b.is_ascii_graphic())
}
