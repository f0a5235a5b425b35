// Connection handling
// One spawned task per accepted TCP connection.

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use std::net::SocketAddr;
use std::sync::Arc;

use crate::config::ServerState;
use crate::handler;
use crate::logger;

/// Serve an accepted connection in its own task.
///
/// The stream is wrapped in `TokioIo` and driven by a hyper HTTP/1.1
/// connection with keep-alive. A failure while serving is logged and ends
/// that connection only; the accept loop never sees it.
pub fn accept_connection(
    stream: tokio::net::TcpStream,
    peer_addr: SocketAddr,
    state: &Arc<ServerState>,
) {
    let state = Arc::clone(state);

    tokio::spawn(async move {
        let io = TokioIo::new(stream);

        let conn = http1::Builder::new().keep_alive(true).serve_connection(
            io,
            service_fn(move |req| {
                let state = Arc::clone(&state);
                async move { handler::handle_request(req, state, peer_addr).await }
            }),
        );

        if let Err(err) = conn.await {
            logger::log_connection_error(&err);
        }
    });
}
