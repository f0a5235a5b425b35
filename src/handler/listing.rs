//! Directory listing generation.
//!
//! When a requested directory has no index file, the server answers with a
//! generated HTML page linking every direct child entry. Directories get a
//! trailing `/` on both the link target and the displayed name.

use std::io;
use std::path::Path;
use tokio::fs;

/// A single directory entry to be listed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    pub name: String,
    pub is_dir: bool,
}

/// Read a directory and render its listing page.
///
/// `request_path` is the already-decoded URL path the client asked for, used
/// for the page title and heading.
pub async fn render_directory(dir: &Path, request_path: &str) -> io::Result<String> {
    let entries = collect_entries(dir).await?;
    Ok(render_listing(request_path, &entries))
}

/// Collect the direct children of a directory, sorted case-insensitively.
async fn collect_entries(dir: &Path) -> io::Result<Vec<ListingEntry>> {
    let mut entries = Vec::new();
    let mut reader = fs::read_dir(dir).await?;

    while let Some(entry) = reader.next_entry().await? {
        let name = entry.file_name().to_string_lossy().into_owned();
        let is_dir = entry.file_type().await.is_ok_and(|t| t.is_dir());
        entries.push(ListingEntry { name, is_dir });
    }

    entries.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
    Ok(entries)
}

/// Render the listing HTML for a set of entries.
pub fn render_listing(request_path: &str, entries: &[ListingEntry]) -> String {
    let title = format!("Directory listing for {}", html_escape(request_path));

    let mut page = String::with_capacity(512 + entries.len() * 64);
    page.push_str("<!DOCTYPE HTML>\n<html lang=\"en\">\n<head>\n");
    page.push_str("<meta charset=\"utf-8\">\n");
    page.push_str(&format!("<title>{title}</title>\n"));
    page.push_str("</head>\n<body>\n");
    page.push_str(&format!("<h1>{title}</h1>\n<hr>\n<ul>\n"));

    for entry in entries {
        let (href, display) = if entry.is_dir {
            (
                format!("{}/", percent_encode(&entry.name)),
                format!("{}/", html_escape(&entry.name)),
            )
        } else {
            (percent_encode(&entry.name), html_escape(&entry.name))
        };
        page.push_str(&format!("<li><a href=\"{href}\">{display}</a></li>\n"));
    }

    page.push_str("</ul>\n<hr>\n</body>\n</html>\n");
    page
}

/// Escape text for embedding in HTML.
fn html_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// Percent-encode a single path segment for use in an href.
///
/// Unreserved characters (RFC 3986) pass through, everything else is encoded
/// byte-wise.
fn percent_encode(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    for byte in segment.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                out.push(byte as char);
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}
