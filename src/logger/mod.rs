//! Logger module
//!
//! Lifecycle, access, and error logging for the server. Access and lifecycle
//! lines go to stdout, warnings and errors to stderr.

mod format;

pub use format::AccessLogEntry;

use std::net::SocketAddr;
use std::path::Path;

/// Print the startup banner: listening URL, served directory, example paths.
pub fn log_server_start(addr: &SocketAddr, root: &Path) {
    println!("======================================");
    println!("Server running at http://{addr}/");
    println!("Serving directory: {}", root.display());
    println!();
    println!("Access the demo at:");
    println!("  - Main page: http://{addr}/");
    println!("  - Test gallery: http://{addr}/test-gallery.html");
    println!();
    println!("Press Ctrl+C to stop the server");
    println!("======================================\n");
}

/// Log a shutdown notice once the accept loop has stopped.
pub fn log_server_stop() {
    println!("\nShutting down, listening socket closed");
}

/// Log a formatted access log entry for a completed request.
pub fn log_access(entry: &AccessLogEntry) {
    println!("{}", entry.format_common());
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    eprintln!("[ERROR] Failed to serve connection: {err:?}");
}

pub fn log_error(message: &str) {
    eprintln!("[ERROR] {message}");
}

pub fn log_warning(message: &str) {
    eprintln!("[WARN] {message}");
}
