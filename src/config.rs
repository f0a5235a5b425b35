// Configuration module
// The whole configuration surface is two startup constants: listening port
// and root directory. There is no config file and no environment lookup.

use std::io;
use std::net::{Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Port the server listens on (all interfaces).
pub const DEFAULT_PORT: u16 = 5000;

/// Directory served, relative to the process working directory.
pub const DEFAULT_ROOT: &str = ".";

/// Index files probed, in order, when a directory is requested.
pub const INDEX_FILES: [&str; 2] = ["index.html", "index.htm"];

/// Server configuration fixed at startup.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub root_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            root_dir: PathBuf::from(DEFAULT_ROOT),
        }
    }
}

impl ServerConfig {
    /// Socket address the listener binds: wildcard IPv4, configured port.
    #[must_use]
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::UNSPECIFIED, self.port))
    }
}

/// Immutable state shared across connections.
///
/// Holds the configuration and the canonicalized root directory used as the
/// containment boundary for every path resolution.
pub struct ServerState {
    pub config: ServerConfig,
    pub root: PathBuf,
}

impl ServerState {
    /// Validate the root directory and build the shared state.
    ///
    /// The root must exist and be a directory; anything else is a fatal
    /// startup error surfaced as a diagnostic.
    pub fn new(config: ServerConfig) -> io::Result<Arc<Self>> {
        let root = canonicalize_root(&config.root_dir)?;
        Ok(Arc::new(Self { config, root }))
    }
}

fn canonicalize_root(root_dir: &Path) -> io::Result<PathBuf> {
    let root = root_dir.canonicalize().map_err(|e| {
        io::Error::new(
            e.kind(),
            format!("root directory '{}' not accessible: {e}", root_dir.display()),
        )
    })?;

    if !root.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::NotADirectory,
            format!("root path '{}' is not a directory", root.display()),
        ));
    }

    Ok(root)
}
