//! Cache suppression and conditional request handling.
//!
//! Every response leaving this server carries headers that forbid clients and
//! intermediaries from storing or reusing it. `ETag` revalidation stays
//! available: a client honoring `must-revalidate` gets a 304 when its copy is
//! still current.

use hyper::header::{HeaderValue, CACHE_CONTROL, EXPIRES, PRAGMA};
use hyper::Response;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// `Cache-Control` value attached to every response.
pub const CACHE_CONTROL_VALUE: &str = "no-cache, no-store, must-revalidate";

/// `Pragma` value attached to every response (HTTP/1.0 caches).
pub const PRAGMA_VALUE: &str = "no-cache";

/// `Expires` value attached to every response.
pub const EXPIRES_VALUE: &str = "0";

/// Stamp the cache-disabling headers onto a response.
///
/// Called once, immediately before a response is handed back to hyper.
/// `insert` replaces any prior value, so no builder elsewhere may set these
/// headers.
pub fn apply_no_store<B>(response: &mut Response<B>) {
    let headers = response.headers_mut();
    headers.insert(CACHE_CONTROL, HeaderValue::from_static(CACHE_CONTROL_VALUE));
    headers.insert(PRAGMA, HeaderValue::from_static(PRAGMA_VALUE));
    headers.insert(EXPIRES, HeaderValue::from_static(EXPIRES_VALUE));
}

/// Generate an `ETag` using fast hashing
///
/// # Arguments
/// * `content` - File content
///
/// # Returns
/// Quoted `ETag` string, e.g., `"abc123def"`
pub fn generate_etag(content: &[u8]) -> String {
    let mut hasher = DefaultHasher::new();
    content.hash(&mut hasher);
    let v = hasher.finish();
    format!("\"{v:x}\"")
}

/// Check if the client's `If-None-Match` header matches the server's `ETag`
///
/// Supports:
/// - Single `ETag`: `"abc123"`
/// - Multiple `ETags`: `"abc123", "def456"`
/// - Wildcard: `*`
///
/// Returns true if matched (should return 304), false otherwise
pub fn check_etag_match(if_none_match: Option<&str>, etag: &str) -> bool {
    if_none_match.is_some_and(|client_etag| {
        client_etag
            .split(',')
            .any(|e| e.trim() == etag || e.trim() == "*")
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::Full;
    use hyper::body::Bytes;

    #[test]
    fn test_apply_no_store_sets_all_three() {
        let mut resp = Response::new(Full::new(Bytes::from("body")));
        apply_no_store(&mut resp);

        assert_eq!(
            resp.headers().get("cache-control").unwrap(),
            "no-cache, no-store, must-revalidate"
        );
        assert_eq!(resp.headers().get("pragma").unwrap(), "no-cache");
        assert_eq!(resp.headers().get("expires").unwrap(), "0");
    }

    #[test]
    fn test_apply_no_store_replaces_existing() {
        let mut resp = Response::builder()
            .header("Cache-Control", "public, max-age=3600")
            .body(Full::new(Bytes::new()))
            .unwrap();
        apply_no_store(&mut resp);

        let values: Vec<_> = resp.headers().get_all("cache-control").iter().collect();
        assert_eq!(values.len(), 1);
        assert_eq!(values[0], "no-cache, no-store, must-revalidate");
    }

    #[test]
    fn test_apply_no_store_keeps_other_headers() {
        let mut resp = Response::builder()
            .header("Content-Type", "text/plain")
            .body(Full::new(Bytes::new()))
            .unwrap();
        apply_no_store(&mut resp);
        assert_eq!(resp.headers().get("content-type").unwrap(), "text/plain");
    }

    #[test]
    fn test_generate_etag() {
        let etag = generate_etag(b"hello world");
        assert!(etag.starts_with('"'));
        assert!(etag.ends_with('"'));
        assert!(etag.len() > 2);
    }

    #[test]
    fn test_etag_consistency() {
        let etag1 = generate_etag(b"same content");
        let etag2 = generate_etag(b"same content");
        assert_eq!(etag1, etag2);
    }

    #[test]
    fn test_etag_difference() {
        let etag1 = generate_etag(b"content a");
        let etag2 = generate_etag(b"content b");
        assert_ne!(etag1, etag2);
    }

    #[test]
    fn test_check_etag_match() {
        let etag = "\"abc123\"";
        assert!(check_etag_match(Some("\"abc123\""), etag));
        assert!(check_etag_match(Some("\"xyz\", \"abc123\""), etag));
        assert!(check_etag_match(Some("*"), etag));
        assert!(!check_etag_match(Some("\"different\""), etag));
        assert!(!check_etag_match(None, etag));
    }
}
