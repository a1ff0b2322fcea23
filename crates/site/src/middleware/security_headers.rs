//! Security headers middleware.
//!
//! The directory serves only its own scripts, styles and images, and links
//! out (websites, `tel:`, `mailto:`) without embedding anything, so the
//! policy can stay tight. Admin and API responses are additionally marked
//! uncacheable.

use axum::{
    extract::Request,
    http::{
        HeaderName, HeaderValue,
        header::{
            CACHE_CONTROL, CONTENT_SECURITY_POLICY, REFERRER_POLICY, X_CONTENT_TYPE_OPTIONS,
            X_FRAME_OPTIONS,
        },
    },
    middleware::Next,
    response::Response,
};

const CONTENT_SECURITY: &str = "default-src 'none'; \
     script-src 'self'; \
     style-src 'self'; \
     img-src 'self' data:; \
     font-src 'self'; \
     connect-src 'self'; \
     object-src 'none'; \
     base-uri 'self'; \
     form-action 'self'; \
     frame-ancestors 'none'";

const PERMISSIONS: &str = "camera=(), geolocation=(), microphone=(), payment=(), usb=()";

/// Add security headers to all responses.
///
/// - `X-Frame-Options: DENY`
/// - `X-Content-Type-Options: nosniff`
/// - `Referrer-Policy: strict-origin-when-cross-origin` (outbound business
///   links still tell the target which site sent the visitor)
/// - `Content-Security-Policy` and `Permissions-Policy`
/// - `Cache-Control: no-store` under `/admin` and `/api`
pub async fn security_headers_middleware(request: Request, next: Next) -> Response {
    let private = is_private_path(request.uri().path());

    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    headers.insert(X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
    headers.insert(X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
    headers.insert(
        REFERRER_POLICY,
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    );
    headers.insert(
        CONTENT_SECURITY_POLICY,
        HeaderValue::from_static(CONTENT_SECURITY),
    );
    headers.insert(
        HeaderName::from_static("permissions-policy"),
        HeaderValue::from_static(PERMISSIONS),
    );

    if private {
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-store, max-age=0"));
    }

    response
}

fn is_private_path(path: &str) -> bool {
    ["/admin", "/api"]
        .iter()
        .any(|prefix| path == *prefix || path.starts_with(&format!("{prefix}/")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_private_paths() {
        assert!(is_private_path("/admin/upload"));
        assert!(is_private_path("/api/admin/import"));
        assert!(is_private_path("/admin"));
        assert!(!is_private_path("/administrators/all"));
        assert!(!is_private_path("/aurora-il/plumbers"));
    }
}
