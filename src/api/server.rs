//! Server lifecycle: bind, serve in a background task, stop on demand.
//!
//! Pattern: bind -> spawn -> return a handle with a shutdown channel.
//! The binary keeps the handle until Ctrl-C; tests use it to talk to a
//! real listener on an ephemeral port.

use std::io;
use std::net::SocketAddr;

use tokio::sync::oneshot;

use crate::api::router::app_router;

/// Handle to a running server.
pub struct ServerHandle {
    /// Bound address; resolves port 0 to the port actually chosen.
    pub addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl ServerHandle {
    /// Signal graceful shutdown. Safe to call more than once.
    pub fn shutdown(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
            tracing::info!("server shutdown signal sent");
        }
    }
}

/// Bind `addr` and serve the app router until the handle shuts it down.
pub async fn start_server(addr: SocketAddr) -> io::Result<ServerHandle> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    let addr = listener.local_addr()?;

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let app = app_router();

    tokio::spawn(async move {
        let shutdown_signal = async move {
            let _ = shutdown_rx.await;
            tracing::info!("server received shutdown signal");
        };

        tracing::info!(%addr, "server started");

        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal)
            .await
        {
            tracing::error!("server error: {e}");
        }

        tracing::info!("server stopped");
    });

    Ok(ServerHandle {
        addr,
        shutdown_tx: Some(shutdown_tx),
    })
}

// ═══════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════
