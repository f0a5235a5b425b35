// Accept loop
// Accepts connections until the shutdown signal fires, then drops the
// listening socket.

use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Notify;

use super::connection::accept_connection;
use crate::config::ServerState;
use crate::logger;

/// Run the accept loop until shutdown.
///
/// Each accepted connection is handed off to its own task; an accept error is
/// logged and the loop keeps going. When the shutdown Notify fires the loop
/// breaks, the listener drops, and in-flight connections finish on their own.
pub async fn run_accept_loop(
    listener: TcpListener,
    state: Arc<ServerState>,
    shutdown: Arc<Notify>,
) {
    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        accept_connection(stream, peer_addr, &state);
                    }
                    Err(e) => {
                        logger::log_error(&format!("Failed to accept connection: {e}"));
                    }
                }
            }

            () = shutdown.notified() => {
                break;
            }
        }
    }

    drop(listener);
    logger::log_server_stop();
}
