//! MIME type inference.
//!
//! Maps a file extension to the `Content-Type` served with it. Unknown
//! extensions fall back to `application/octet-stream`.

/// Get the MIME Content-Type for a file extension
///
/// # Examples
/// ```
/// use staticd::http::mime::content_type_for;
/// assert_eq!(content_type_for(Some("html")), "text/html; charset=utf-8");
/// assert_eq!(content_type_for(Some("png")), "image/png");
/// assert_eq!(content_type_for(None), "application/octet-stream");
/// ```
pub fn content_type_for(extension: Option<&str>) -> &'static str {
    match extension {
        // Text
        Some("html" | "htm") => "text/html; charset=utf-8",
        Some("css") => "text/css",
        Some("txt" | "md") => "text/plain; charset=utf-8",
        Some("xml") => "application/xml",

        // JavaScript/WASM
        Some("js" | "mjs") => "application/javascript",
        Some("json") => "application/json",
        Some("wasm") => "application/wasm",

        // Images
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("ico") => "image/x-icon",
        Some("webp") => "image/webp",

        // Video
        Some("mp4") => "video/mp4",
        Some("webm") => "video/webm",
        Some("ogg" | "ogv") => "video/ogg",

        // Audio
        Some("mp3") => "audio/mpeg",
        Some("wav") => "audio/wav",
        Some("flac") => "audio/flac",

        // Fonts
        Some("woff") => "font/woff",
        Some("woff2") => "font/woff2",
        Some("ttf") => "font/ttf",
        Some("otf") => "font/otf",

        // Documents and archives
        Some("pdf") => "application/pdf",
        Some("zip") => "application/zip",
        Some("gz" | "gzip") => "application/gzip",
        Some("tar") => "application/x-tar",

        // Default
        _ => "application/octet-stream",
    }
}
