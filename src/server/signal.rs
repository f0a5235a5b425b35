// Signal handling
//
// SIGINT (Ctrl+C) and SIGTERM both stop the server: the accept loop waits on
// the returned Notify and tears the listening socket down when it fires.

use std::sync::Arc;
use tokio::sync::Notify;

/// Install the shutdown signal handler and return the Notify it triggers.
#[cfg(unix)]
pub fn install_shutdown_handler() -> Arc<Notify> {
    use tokio::signal::unix::{signal, SignalKind};

    let shutdown = Arc::new(Notify::new());
    let notifier = Arc::clone(&shutdown);

    tokio::spawn(async move {
        let mut sigterm =
            signal(SignalKind::terminate()).expect("Failed to register SIGTERM handler");
        let mut sigint =
            signal(SignalKind::interrupt()).expect("Failed to register SIGINT handler");

        tokio::select! {
            _ = sigterm.recv() => {
                println!("\nSIGTERM received, shutting down...");
            }
            _ = sigint.recv() => {
                println!("\nSIGINT received, shutting down...");
            }
        }

        notifier.notify_waiters();
    });

    shutdown
}

/// Windows fallback - only handles Ctrl+C
#[cfg(not(unix))]
pub fn install_shutdown_handler() -> Arc<Notify> {
    let shutdown = Arc::new(Notify::new());
    let notifier = Arc::clone(&shutdown);

    tokio::spawn(async move {
        if let Ok(()) = tokio::signal::ctrl_c().await {
            println!("\nCtrl+C received, shutting down...");
            notifier.notify_waiters();
        }
    });

    shutdown
}
