//! staticd
//!
//! A static file server that forbids caching: it serves one root directory
//! read-only over HTTP and stamps `Cache-Control: no-cache, no-store,
//! must-revalidate`, `Pragma: no-cache`, and `Expires: 0` on every response,
//! whatever its status. Directory listings, index files, MIME inference, and
//! range requests behave as a generic static file server.

pub mod config;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;
