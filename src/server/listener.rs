// Listener construction
// Builds the TCP listening socket the accept loop runs on.

use socket2::{Domain, Protocol, Socket, Type};
use tokio::net::TcpListener;

/// Create the `TcpListener` bound to the given address.
///
/// `SO_REUSEADDR` is enabled so a quick restart does not trip over a port
/// still in `TIME_WAIT`. Bind failure (port already taken) is returned to the
/// caller and is fatal at startup.
pub fn bind_listener(addr: std::net::SocketAddr) -> std::io::Result<TcpListener> {
    let domain = if addr.is_ipv4() {
        Domain::IPV4
    } else {
        Domain::IPV6
    };

    let socket = Socket::new(domain, Type::STREAM, Some(Protocol::TCP))?;

    // Allow binding to a port in TIME_WAIT state
    socket.set_reuse_address(true)?;

    // Set non-blocking mode for async compatibility
    socket.set_nonblocking(true)?;

    socket.bind(&addr.into())?;
    socket.listen(128)?;

    // Convert socket2::Socket to std::net::TcpListener, then to tokio::net::TcpListener
    let std_listener: std::net::TcpListener = socket.into();
    TcpListener::from_std(std_listener)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{Ipv4Addr, SocketAddr};

    #[tokio::test]
    async fn test_bind_ephemeral_port() {
        let addr = SocketAddr::from((Ipv4Addr::LOCALHOST, 0));
        let listener = bind_listener(addr).unwrap();
        assert_eq!(listener.local_addr().unwrap().ip(), addr.ip());
    }

    #[tokio::test]
    async fn test_bind_taken_port_fails() {
        let addr = SocketAddr::from((Ipv4Addr::LOCALHOST, 0));
        let first = bind_listener(addr).unwrap();
        let taken = first.local_addr().unwrap();
        // SO_REUSEADDR does not permit two live listeners on one port.
        assert!(bind_listener(taken).is_err());
    }
}
