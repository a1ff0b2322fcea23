//! HTTP middleware stack for the site.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request spans)
//! 3. Request ID (correlate logs, Sentry events and responses)
//! 4. Security headers (CSP, framing, caching of admin pages)

pub mod request_id;
pub mod security_headers;

pub use request_id::request_id_middleware;
pub use security_headers::security_headers_middleware;
