//! Request dispatch.
//!
//! Entry point for every HTTP request: validates the method, extracts the
//! headers the file server cares about, hands the request to static file
//! serving, and stamps the cache-disabling headers on the finished response
//! right before it goes back to hyper. That stamping is the single point
//! through which every response passes, whatever its status.

use crate::config::ServerState;
use crate::handler::static_files;
use crate::http::{self, cache};
use crate::logger::{self, AccessLogEntry};
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

/// Per-request information extracted from the request head.
pub struct RequestContext<'a> {
    /// Still percent-encoded URI path.
    pub path: &'a str,
    pub is_head: bool,
    pub if_none_match: Option<String>,
    pub range_header: Option<String>,
}

/// Handle one HTTP request end to end.
///
/// Generic over the request body: the server never reads one.
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<ServerState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let method = req.method();
    let path = req.uri().path();

    let mut response = match check_http_method(method) {
        Some(resp) => resp,
        None => {
            let ctx = RequestContext {
                path,
                is_head: *method == Method::HEAD,
                if_none_match: header_string(&req, "if-none-match"),
                range_header: header_string(&req, "range"),
            };
            static_files::serve(&ctx, &state).await
        }
    };

    // Every response, whatever its status, leaves with caching forbidden.
    cache::apply_no_store(&mut response);

    log_completed_request(&peer_addr, method, path, &response);

    Ok(response)
}

/// Gate the HTTP method: GET/HEAD pass through, OPTIONS is answered directly,
/// anything else is refused.
fn check_http_method(method: &Method) -> Option<Response<Full<Bytes>>> {
    match method {
        &Method::GET | &Method::HEAD => None,
        &Method::OPTIONS => Some(http::build_options_response()),
        _ => {
            logger::log_warning(&format!("Method not allowed: {method}"));
            Some(http::build_405_response())
        }
    }
}

/// Extract a header as an owned string, dropping non-ASCII values.
fn header_string<B>(req: &Request<B>, name: &str) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

/// Write the access log line for a finished request.
fn log_completed_request(
    peer_addr: &SocketAddr,
    method: &Method,
    path: &str,
    response: &Response<Full<Bytes>>,
) {
    let mut entry = AccessLogEntry::new(
        peer_addr.ip().to_string(),
        method.to_string(),
        path.to_string(),
    );
    entry.status = response.status().as_u16();
    entry.body_bytes = response
        .body()
        .size_hint()
        .exact()
        .and_then(|n| usize::try_from(n).ok())
        .unwrap_or(0);
    logger::log_access(&entry);
}
