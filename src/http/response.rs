//! HTTP response builders.
//!
//! Status-specific constructors used by the request handler. None of these set
//! `Cache-Control`, `Pragma`, or `Expires`: the no-store stamping in
//! [`crate::http::cache`] owns those headers and is applied to every response
//! on its way out.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;

/// Build a 200 response for a whole file
pub fn build_file_response(
    data: Bytes,
    content_type: &str,
    etag: &str,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let content_length = data.len();
    let body = if is_head { Bytes::new() } else { data };

    Response::builder()
        .status(200)
        .header("Content-Type", content_type)
        .header("Content-Length", content_length)
        .header("Accept-Ranges", "bytes")
        .header("ETag", etag)
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            log_build_error("200", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build a 206 Partial Content response
pub fn build_partial_response(
    data: Bytes,
    content_type: &str,
    etag: &str,
    start: usize,
    end: usize,
    total_size: usize,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let content_length = end - start + 1;
    let body = if is_head { Bytes::new() } else { data };

    Response::builder()
        .status(206)
        .header("Content-Type", content_type)
        .header("Content-Length", content_length)
        .header("Content-Range", format!("bytes {start}-{end}/{total_size}"))
        .header("Accept-Ranges", "bytes")
        .header("ETag", etag)
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            log_build_error("206", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build a generic HTML response (directory listings)
pub fn build_html_response(content: String, is_head: bool) -> Response<Full<Bytes>> {
    let content_length = content.len();
    let body = if is_head {
        Bytes::new()
    } else {
        Bytes::from(content)
    };

    Response::builder()
        .status(200)
        .header("Content-Type", "text/html; charset=utf-8")
        .header("Content-Length", content_length)
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            log_build_error("HTML", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build a 301 redirect (directory path missing its trailing slash)
pub fn build_redirect_response(target: &str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(301)
        .header("Location", target)
        .header("Content-Type", "text/plain")
        .body(Full::new(Bytes::from("Moved Permanently")))
        .unwrap_or_else(|e| {
            log_build_error("301", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build a 304 Not Modified response
pub fn build_304_response(etag: &str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(304)
        .header("ETag", etag)
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error("304", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build a 400 Bad Request response
pub fn build_400_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(400)
        .header("Content-Type", "text/plain")
        .body(Full::new(Bytes::from("400 Bad Request")))
        .unwrap_or_else(|e| {
            log_build_error("400", &e);
            Response::new(Full::new(Bytes::from("400 Bad Request")))
        })
}

/// Build a 403 Forbidden response
pub fn build_403_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(403)
        .header("Content-Type", "text/plain")
        .body(Full::new(Bytes::from("403 Forbidden")))
        .unwrap_or_else(|e| {
            log_build_error("403", &e);
            Response::new(Full::new(Bytes::from("403 Forbidden")))
        })
}

/// Build a 404 Not Found response
pub fn build_404_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(404)
        .header("Content-Type", "text/plain")
        .body(Full::new(Bytes::from("404 Not Found")))
        .unwrap_or_else(|e| {
            log_build_error("404", &e);
            Response::new(Full::new(Bytes::from("404 Not Found")))
        })
}

/// Build a 405 Method Not Allowed response
pub fn build_405_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(405)
        .header("Content-Type", "text/plain")
        .header("Allow", "GET, HEAD, OPTIONS")
        .body(Full::new(Bytes::from("405 Method Not Allowed")))
        .unwrap_or_else(|e| {
            log_build_error("405", &e);
            Response::new(Full::new(Bytes::from("405 Method Not Allowed")))
        })
}

/// Build a 204 response to an OPTIONS request
pub fn build_options_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(204)
        .header("Allow", "GET, HEAD, OPTIONS")
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error("OPTIONS", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build a 416 Range Not Satisfiable response
pub fn build_416_response(file_size: usize) -> Response<Full<Bytes>> {
    Response::builder()
        .status(416)
        .header("Content-Type", "text/plain")
        .header("Content-Range", format!("bytes */{file_size}"))
        .body(Full::new(Bytes::from("Range Not Satisfiable")))
        .unwrap_or_else(|e| {
            log_build_error("416", &e);
            Response::new(Full::new(Bytes::from("Range Not Satisfiable")))
        })
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}
