//! Server command - runs the daemon in the foreground.
//!
//! Assembles the daemon: PID file, signal handler, token store, the sync
//! callback (a fresh [`GoogleSource`] per sync under the current token),
//! and the socket server. Blocks until SIGTERM/SIGINT.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use chronosnap_providers::{GoogleSource, TokenStore};
use chronosnap_server::{
    PidFile, ServerConfig, SignalHandler, SocketServer, Syncer, default_pid_path,
    make_connection_handler, new_shared_state, run_sync,
};

use crate::cli::Cli;
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

/// Timeout for each upstream HTTP request during a sync.
const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Starts the daemon in the foreground.
pub async fn run(cli: &Cli, config: &ClientConfig) -> ClientResult<()> {
    let _pid_file = PidFile::create(default_pid_path())
        .map_err(|e| ClientError::Config(format!("failed to create PID file: {}", e)))?;

    let signal_handler = SignalHandler::new();
    signal_handler.spawn_listener();

    let state = new_shared_state();

    let token_store = Arc::new(TokenStore::new(config.token_path()));
    match token_store.load() {
        Ok(true) => info!("token loaded"),
        Ok(false) => info!("no token stored yet; syncs will fail until one is set"),
        Err(e) => warn!(error = %e, "failed to load token store"),
    }

    let syncer: Syncer = Arc::new(|token: String| {
        Box::pin(async move {
            let source = GoogleSource::new(token, HTTP_TIMEOUT);
            run_sync(&source).await
        })
    });

    let socket_path = cli.resolve_socket_path(config);
    let server = SocketServer::new(ServerConfig::new(&socket_path))
        .await
        .map_err(|e| ClientError::Config(format!("failed to start socket server: {}", e)))?;

    info!(path = %socket_path.display(), "daemon listening");

    let handler = make_connection_handler(state, token_store, syncer);
    let shutdown = signal_handler.shutdown();

    server
        .run_until_shutdown(handler, shutdown.wait())
        .await
        .map_err(|e| ClientError::Config(format!("daemon error: {}", e)))?;

    info!("daemon stopped");
    Ok(())
}
