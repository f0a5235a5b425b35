//! Static file serving.
//!
//! Maps a request path to the filesystem under the configured root and builds
//! the matching response: file contents, index file, directory listing,
//! redirect, or an error status. Nothing here escapes the root: `..` segments
//! are collapsed before the path touches the filesystem, and the resolved
//! target must canonicalize to a location inside the canonical root.

use crate::config::{ServerState, INDEX_FILES};
use crate::handler::listing;
use crate::handler::router::RequestContext;
use crate::http::{self, cache, mime, range::RangeOutcome, response};
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Outcome of resolving a request path against the root directory.
#[derive(Debug, PartialEq, Eq)]
pub enum Resolved {
    /// A regular file to serve.
    File(PathBuf),
    /// A directory to render as a listing page.
    Listing(PathBuf),
    /// Redirect target for a directory path missing its trailing slash.
    Redirect(String),
    NotFound,
    BadRequest,
}

/// Serve a request for `ctx.path` from the root directory.
pub async fn serve(ctx: &RequestContext<'_>, state: &ServerState) -> Response<Full<Bytes>> {
    let Some(decoded) = decode_percent(ctx.path) else {
        return http::build_400_response();
    };

    match resolve(&state.root, &decoded, ctx.path).await {
        Resolved::File(path) => serve_resolved_file(ctx, &path).await,
        Resolved::Listing(dir) => match listing::render_directory(&dir, &decoded).await {
            Ok(page) => response::build_html_response(page, ctx.is_head),
            Err(e) => {
                logger::log_error(&format!(
                    "Failed to list directory '{}': {e}",
                    dir.display()
                ));
                http::build_404_response()
            }
        },
        Resolved::Redirect(target) => http::build_redirect_response(&target),
        Resolved::NotFound => http::build_404_response(),
        Resolved::BadRequest => http::build_400_response(),
    }
}

/// Resolve a decoded request path to a filesystem target.
///
/// `raw_path` is the still-encoded path from the request line, used verbatim
/// when building a redirect target.
pub async fn resolve(root: &Path, decoded_path: &str, raw_path: &str) -> Resolved {
    if !decoded_path.starts_with('/') {
        return Resolved::BadRequest;
    }

    let relative = sanitize(decoded_path);
    let target = root.join(relative);

    if target.is_dir() {
        // Directory paths are only served with a trailing slash, as the
        // links in a parent listing produce them.
        if !raw_path.ends_with('/') {
            return Resolved::Redirect(format!("{raw_path}/"));
        }

        for index_file in INDEX_FILES {
            let index_path = target.join(index_file);
            if index_path.is_file() {
                return contained(root, index_path, Resolved::File);
            }
        }

        return contained(root, target, Resolved::Listing);
    }

    if target.is_file() {
        return contained(root, target, Resolved::File);
    }

    Resolved::NotFound
}

/// Check that a target canonicalizes inside the root, then wrap it.
///
/// Catches symlinks pointing outside the tree; `..` segments were already
/// collapsed by `sanitize`.
fn contained(root: &Path, target: PathBuf, wrap: fn(PathBuf) -> Resolved) -> Resolved {
    let Ok(canonical) = target.canonicalize() else {
        return Resolved::NotFound;
    };
    if canonical.starts_with(root) {
        wrap(target)
    } else {
        logger::log_warning(&format!(
            "Blocked request resolving outside the root: {} -> {}",
            target.display(),
            canonical.display()
        ));
        Resolved::NotFound
    }
}

/// Collapse a decoded URL path into a relative filesystem path.
///
/// Empty and `.` segments disappear; `..` pops the previous segment and can
/// never climb above the root.
fn sanitize(decoded_path: &str) -> PathBuf {
    let mut segments: Vec<&str> = Vec::new();
    for segment in decoded_path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }
    segments.into_iter().collect()
}

/// Percent-decode a request path.
///
/// Returns `None` for truncated or non-hex escapes, for bytes that do not
/// form valid UTF-8, and for embedded NUL.
fn decode_percent(path: &str) -> Option<String> {
    let bytes = path.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hi = hex_value(*bytes.get(i + 1)?)?;
            let lo = hex_value(*bytes.get(i + 2)?)?;
            out.push(hi * 16 + lo);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }

    let decoded = String::from_utf8(out).ok()?;
    if decoded.contains('\0') {
        return None;
    }
    Some(decoded)
}

const fn hex_value(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}

/// Read a resolved file and build its response.
async fn serve_resolved_file(ctx: &RequestContext<'_>, path: &Path) -> Response<Full<Bytes>> {
    let content = match fs::read(path).await {
        Ok(c) => c,
        Err(e) if e.kind() == ErrorKind::PermissionDenied => {
            logger::log_warning(&format!("Read forbidden for '{}': {e}", path.display()));
            return http::build_403_response();
        }
        Err(e) => {
            logger::log_error(&format!("Failed to read file '{}': {e}", path.display()));
            return http::build_404_response();
        }
    };

    let content_type = mime::content_type_for(path.extension().and_then(|e| e.to_str()));
    build_static_file_response(&content, content_type, ctx)
}

/// Build the file response: conditional (304), partial (206), or full (200).
fn build_static_file_response(
    data: &[u8],
    content_type: &str,
    ctx: &RequestContext<'_>,
) -> Response<Full<Bytes>> {
    let etag = cache::generate_etag(data);
    let total_size = data.len();

    if cache::check_etag_match(ctx.if_none_match.as_deref(), &etag) {
        return http::build_304_response(&etag);
    }

    match http::parse_range_header(ctx.range_header.as_deref(), total_size) {
        RangeOutcome::Valid(range) => {
            let start = range.start;
            let end = range.end_position(total_size);
            let body = if ctx.is_head {
                Bytes::new()
            } else {
                Bytes::from(data[start..=end].to_vec())
            };
            response::build_partial_response(
                body,
                content_type,
                &etag,
                start,
                end,
                total_size,
                ctx.is_head,
            )
        }
        RangeOutcome::NotSatisfiable => http::build_416_response(total_size),
        RangeOutcome::None => {
            let body = Bytes::from(data.to_owned());
            response::build_file_response(body, content_type, &etag, ctx.is_head)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_percent_plain() {
        assert_eq!(decode_percent("/a/b.txt").unwrap(), "/a/b.txt");
    }

    #[test]
    fn test_decode_percent_escapes() {
        assert_eq!(decode_percent("/a%20b.txt").unwrap(), "/a b.txt");
        assert_eq!(decode_percent("/100%25.txt").unwrap(), "/100%.txt");
    }

    #[test]
    fn test_decode_percent_rejects_bad_input() {
        assert!(decode_percent("/bad%2").is_none());
        assert!(decode_percent("/bad%zz").is_none());
        assert!(decode_percent("/nul%00byte").is_none());
        assert!(decode_percent("/bad%ff%fe").is_none());
    }

    #[test]
    fn test_sanitize_collapses_dots() {
        assert_eq!(sanitize("/a/./b"), PathBuf::from("a/b"));
        assert_eq!(sanitize("/a//b/"), PathBuf::from("a/b"));
        assert_eq!(sanitize("/a/../b"), PathBuf::from("b"));
    }

    #[test]
    fn test_sanitize_cannot_climb_above_root() {
        assert_eq!(sanitize("/../../etc/passwd"), PathBuf::from("etc/passwd"));
        assert_eq!(sanitize("/.."), PathBuf::new());
    }

    #[tokio::test]
    async fn test_resolve_regular_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let root = dir.path().canonicalize().unwrap();
        std::fs::write(root.join("page.html"), "<p>hi</p>").unwrap();

        let resolved = resolve(&root, "/page.html", "/page.html").await;
        assert_eq!(resolved, Resolved::File(root.join("page.html")));
    }

    #[tokio::test]
    async fn test_resolve_missing_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let root = dir.path().canonicalize().unwrap();
        assert_eq!(resolve(&root, "/nope.txt", "/nope.txt").await, Resolved::NotFound);
    }

    #[tokio::test]
    async fn test_resolve_directory_without_slash_redirects() {
        let dir = tempfile::TempDir::new().unwrap();
        let root = dir.path().canonicalize().unwrap();
        std::fs::create_dir(root.join("photos")).unwrap();

        let resolved = resolve(&root, "/photos", "/photos").await;
        assert_eq!(resolved, Resolved::Redirect("/photos/".to_string()));
    }

    #[tokio::test]
    async fn test_resolve_directory_prefers_index() {
        let dir = tempfile::TempDir::new().unwrap();
        let root = dir.path().canonicalize().unwrap();
        std::fs::write(root.join("index.html"), "home").unwrap();

        let resolved = resolve(&root, "/", "/").await;
        assert_eq!(resolved, Resolved::File(root.join("index.html")));
    }

    #[tokio::test]
    async fn test_resolve_directory_without_index_lists() {
        let dir = tempfile::TempDir::new().unwrap();
        let root = dir.path().canonicalize().unwrap();
        std::fs::write(root.join("data.bin"), [0u8; 4]).unwrap();

        let resolved = resolve(&root, "/", "/").await;
        assert_eq!(resolved, Resolved::Listing(root.clone()));
    }

    #[tokio::test]
    async fn test_resolve_traversal_stays_inside_root() {
        let dir = tempfile::TempDir::new().unwrap();
        let root = dir.path().canonicalize().unwrap();
        std::fs::write(root.join("safe.txt"), "ok").unwrap();

        // Climbing out clamps at the root, so this resolves to /safe.txt.
        let resolved = resolve(&root, "/../../safe.txt", "/../../safe.txt").await;
        assert_eq!(resolved, Resolved::File(root.join("safe.txt")));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_resolve_blocks_symlink_escape() {
        let outside = tempfile::TempDir::new().unwrap();
        std::fs::write(outside.path().join("secret.txt"), "secret").unwrap();

        let dir = tempfile::TempDir::new().unwrap();
        let root = dir.path().canonicalize().unwrap();
        std::os::unix::fs::symlink(
            outside.path().join("secret.txt"),
            root.join("leak.txt"),
        )
        .unwrap();

        let resolved = resolve(&root, "/leak.txt", "/leak.txt").await;
        assert_eq!(resolved, Resolved::NotFound);
    }

    #[tokio::test]
    async fn test_resolve_rejects_relative_path() {
        let dir = tempfile::TempDir::new().unwrap();
        let root = dir.path().canonicalize().unwrap();
        assert_eq!(resolve(&root, "page.html", "page.html").await, Resolved::BadRequest);
    }
}
