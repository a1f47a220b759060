//! Baseline security response headers
//!
//! Applied to every response, plus a per-request X-Request-ID for log
//! correlation.

use axum::body::Body;
use axum::http::{HeaderMap, HeaderValue, Request};
use axum::middleware::Next;
use axum::response::Response;
use uuid::Uuid;

/// Headers set on every response
pub const SECURITY_HEADERS: &[(&str, &str)] = &[
    ("x-content-type-options", "nosniff"),
    ("x-frame-options", "DENY"),
    ("x-xss-protection", "1; mode=block"),
    ("referrer-policy", "strict-origin-when-cross-origin"),
];

/// Request ID header name
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Insert the baseline security headers into a header map
pub fn apply_security_headers(headers: &mut HeaderMap) {
    for (name, value) in SECURITY_HEADERS {
        headers.insert(*name, HeaderValue::from_static(value));
    }
}

/// Axum middleware applying security headers and a request ID
pub async fn security_headers(req: Request<Body>, next: Next) -> Response {
    // Reuse an upstream request ID when a proxy already assigned one
    let request_id = req
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let mut response = next.run(req).await;

    apply_security_headers(response.headers_mut());
    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_security_headers() {
        let mut headers = HeaderMap::new();
        apply_security_headers(&mut headers);

        assert_eq!(
            headers.get("x-content-type-options").unwrap(),
            &HeaderValue::from_static("nosniff")
        );
        assert_eq!(
            headers.get("x-frame-options").unwrap(),
            &HeaderValue::from_static("DENY")
        );
        assert!(headers.contains_key("referrer-policy"));
    }
}
