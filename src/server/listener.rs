use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{debug, error, info};

use crate::config::Config;
use crate::http::connection::Connection;
use crate::http::files::DocumentRoot;

pub async fn run(cfg: &Config) -> anyhow::Result<()> {
    let listener = TcpListener::bind(cfg.listen_addr())
        .await
        .with_context(|| format!("Failed to bind {}", cfg.listen_addr()))?;
    info!(
        "Listening on {} serving {}",
        listener.local_addr()?,
        cfg.root
    );

    serve(listener, DocumentRoot::new(cfg.root.clone())).await
}

/// Accepts connections one at a time, forever.
///
/// Each connection is handled to completion before the next `accept`, so a
/// client that never sends a line holds up everyone behind it. Only a failure
/// of the listening socket itself ends the loop.
pub async fn serve(listener: TcpListener, root: DocumentRoot) -> anyhow::Result<()> {
    loop {
        let (socket, peer) = listener
            .accept()
            .await
            .context("Listening socket failed")?;
        debug!("Accepted connection from {}", peer);

        match Connection::new(socket, peer, root.clone()).run().await {
            Ok(outcome) => debug!(peer = %peer, ?outcome, "Connection closed"),
            Err(e) => error!("Connection error from {}: {:#}", peer, e),
        }
    }
}
