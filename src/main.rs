use staticd::config::{ServerConfig, ServerState};
use staticd::{logger, server};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(run())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = ServerConfig::default();
    let addr = config.socket_addr();

    // Root validation and listener bind are the two fatal startup points.
    let state = ServerState::new(config)?;
    let listener = server::bind_listener(addr)
        .map_err(|e| format!("failed to bind {addr}: {e}"))?;

    logger::log_server_start(&addr, &state.root);

    let shutdown = server::install_shutdown_handler();
    server::run_accept_loop(listener, state, shutdown).await;

    Ok(())
}
