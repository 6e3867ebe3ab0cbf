//! Minimal mail-record store exposed over HTTP and persisted to a JSON file.

mod error;
mod http;
mod json_store;
mod record;
mod store;

pub use error::{Error, Result};
pub use http::router;
pub use json_store::JsonFileStorage;
pub use record::{MailRecord, ID_FIELD, RECIPIENT_FIELD, SENDER_FIELD};
pub use store::{MailStorage, MailStore, MemoryStorage};

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::broadcast;

/// Default snapshot location, relative to the working directory.
pub const DEFAULT_DB_PATH: &str = "mail_db.json";

/// Configuration options for the mail server.
#[derive(Debug, Clone, Default)]
pub struct ServerOptions {
    pub bind: Option<String>,
    pub port: Option<u16>,
    pub db_path: Option<PathBuf>,
}

/// Running server handle.
pub struct RunningServer {
    pub http_addr: SocketAddr,
    http_handle: tokio::task::JoinHandle<()>,
    shutdown_tx: broadcast::Sender<()>,
}

impl RunningServer {
    /// Stop the server gracefully.
    pub async fn stop(self) {
        let _ = self.shutdown_tx.send(());
        let _ = self.http_handle.await;
        tracing::info!("HTTP server stopped");
    }
}

/// Start the mail server with the given options.
pub async fn start_server(opts: ServerOptions) -> std::io::Result<RunningServer> {
    let bind = opts.bind.unwrap_or_else(|| "127.0.0.1".to_string());
    let port = opts.port.unwrap_or(5000);
    let db_path = opts
        .db_path
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_PATH));

    let store = Arc::new(MailStore::open(&db_path));

    // Surface a corrupt snapshot at startup rather than on the first request
    let existing = store.count()?;

    let listener = TcpListener::bind((bind.as_str(), port)).await?;
    let http_addr = listener.local_addr()?;

    tracing::info!(
        "HTTP server listening on {http_addr}, {existing} mail in {}",
        db_path.display()
    );

    let (shutdown_tx, _) = broadcast::channel::<()>(1);
    let http_shutdown = shutdown_tx.subscribe();
    let http_handle = tokio::spawn(async move {
        http::run_http_server(listener, store, http_shutdown).await;
    });

    Ok(RunningServer {
        http_addr,
        http_handle,
        shutdown_tx,
    })
}
