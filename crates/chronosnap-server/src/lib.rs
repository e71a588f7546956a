//! Daemon: socket server, request handler, sync orchestrator.
//!
//! The daemon owns no background schedule: a sync runs only when a client
//! asks for one, and its result lives in memory until the next sync
//! replaces it.

mod config;
mod error;
mod handler;
mod pidfile;
mod signals;
mod socket;
mod sync;

pub use config::{ServerConfig, default_socket_path};
pub use error::{ServerError, ServerResult};
pub use handler::{
    RequestHandler, ServerState, SharedState, SyncFuture, Syncer, make_connection_handler,
    new_shared_state,
};
pub use pidfile::{PidFile, default_pid_path};
pub use signals::{ShutdownSignal, SignalHandler};
pub use socket::{Connection, SocketServer};
pub use sync::{SyncError, SyncSession, run_sync};
