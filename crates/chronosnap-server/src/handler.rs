//! Request/response dispatch.
//!
//! The handler owns the daemon's only mutable state: the current sync
//! session. A new sync clears the previous session before fetching, so a
//! failed sync leaves no stale data behind.

use std::sync::Arc;
use std::{future::Future, pin::Pin};

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use chronosnap_protocol::{ErrorCode, Request, Response, StatusInfo};
use chronosnap_providers::TokenStore;

use crate::error::{ServerError, ServerResult};
use crate::socket::Connection;
use crate::sync::{SyncError, SyncSession};

/// Daemon state shared across all connections.
#[derive(Debug)]
pub struct ServerState {
    /// Daemon start time.
    start_time: DateTime<Utc>,
    /// Result of the last successful sync, if any.
    session: Option<SyncSession>,
    /// Whether shutdown has been requested.
    shutdown_requested: bool,
}

impl Default for ServerState {
    fn default() -> Self {
        Self::new()
    }
}

impl ServerState {
    /// Creates a new daemon state.
    pub fn new() -> Self {
        Self {
            start_time: Utc::now(),
            session: None,
            shutdown_requested: false,
        }
    }

    /// Returns the daemon uptime in seconds.
    pub fn uptime_seconds(&self) -> u64 {
        let duration = Utc::now() - self.start_time;
        duration.num_seconds().max(0) as u64
    }

    /// Returns the status info for the Status response.
    pub fn status_info(&self) -> StatusInfo {
        let mut info = StatusInfo::new(self.uptime_seconds());
        if let Some(ref session) = self.session {
            info.last_sync = Some(session.synced_at);
            info.item_count = session.summary.total;
            info.categories = session.categories.clone();
        }
        info
    }

    /// Installs a fresh sync session.
    pub fn set_session(&mut self, session: SyncSession) {
        self.session = Some(session);
    }

    /// Discards the current session, if any.
    pub fn clear_session(&mut self) {
        self.session = None;
    }

    /// Returns the current session, if any.
    pub fn session(&self) -> Option<&SyncSession> {
        self.session.as_ref()
    }

    /// Requests a shutdown.
    pub fn request_shutdown(&mut self) {
        self.shutdown_requested = true;
    }

    /// Returns true if shutdown has been requested.
    pub fn shutdown_requested(&self) -> bool {
        self.shutdown_requested
    }
}

/// Shared daemon state wrapped in an Arc<RwLock>.
pub type SharedState = Arc<RwLock<ServerState>>;

/// Creates a new shared state.
pub fn new_shared_state() -> SharedState {
    Arc::new(RwLock::new(ServerState::new()))
}

/// Future returned by the sync callback.
pub type SyncFuture = Pin<Box<dyn Future<Output = Result<SyncSession, SyncError>> + Send>>;

/// Callback that runs one full sync with the given bearer token.
///
/// The daemon assembly decides what a sync actually talks to; the handler
/// only needs something it can call.
pub type Syncer = Arc<dyn Fn(String) -> SyncFuture + Send + Sync>;

/// Processes incoming requests and produces responses.
pub struct RequestHandler {
    state: SharedState,
    token_store: Arc<TokenStore>,
    syncer: Syncer,
}

impl RequestHandler {
    /// Creates a handler over the given state, token store, and syncer.
    pub fn new(state: SharedState, token_store: Arc<TokenStore>, syncer: Syncer) -> Self {
        Self {
            state,
            token_store,
            syncer,
        }
    }

    /// Handles a single request and returns the response.
    pub async fn handle(&self, request: &Request) -> Response {
        match request {
            Request::Ping => {
                debug!("handling Ping request");
                Response::Pong
            }
            Request::Status => {
                debug!("handling Status request");
                let state = self.state.read().await;
                Response::status(state.status_info())
            }
            Request::ClearTokens => {
                info!("handling ClearTokens request");
                match self.token_store.clear() {
                    Ok(()) => Response::Ok,
                    Err(e) => Response::error(ErrorCode::InternalError, e.to_string()),
                }
            }
            Request::Sync => self.handle_sync().await,
            Request::Shutdown => {
                info!("handling Shutdown request");
                let mut state = self.state.write().await;
                state.request_shutdown();
                Response::Ok
            }
        }
    }

    async fn handle_sync(&self) -> Response {
        debug!("handling Sync request");

        // A re-sync discards the previous session before fetching anything,
        // so no stale items survive a failed attempt.
        self.state.write().await.clear_session();

        // Pick up tokens installed or rotated since the daemon started.
        if let Err(e) = self.token_store.load() {
            warn!(error = %e, "failed to reload token store");
        }

        let Some(token) = self.token_store.valid_token() else {
            warn!("sync rejected: no valid access token");
            return Response::error(
                ErrorCode::AuthenticationFailed,
                "no valid access token; run `chronosnap auth set-token` first",
            );
        };

        match (self.syncer)(token.access_token).await {
            Ok(session) => {
                let response = Response::matches(session.matches.clone(), session.summary);
                self.state.write().await.set_session(session);
                response
            }
            Err(SyncError::Files(e)) => {
                warn!(error = %e, "sync failed on file listing");
                Response::error(ErrorCode::FileListingFailed, e.to_string())
            }
        }
    }

    /// Handles a connection, processing requests until it closes.
    pub async fn handle_connection(&self, mut conn: Connection) -> ServerResult<()> {
        loop {
            match conn.read_request().await {
                Ok(Some(envelope)) => {
                    let response = self.handle(&envelope.payload).await;
                    conn.respond(&envelope.request_id, response).await?;

                    if self.state.read().await.shutdown_requested() {
                        return Err(ServerError::Shutdown);
                    }
                }
                Ok(None) => {
                    debug!("client disconnected");
                    return Ok(());
                }
                Err(e) => {
                    warn!(error = %e, "error reading request");
                    return Err(e);
                }
            }
        }
    }
}

/// Creates a connection handler function for use with `SocketServer::run`.
pub fn make_connection_handler(
    state: SharedState,
    token_store: Arc<TokenStore>,
    syncer: Syncer,
) -> impl Fn(Connection) -> Pin<Box<dyn Future<Output = ()> + Send>> + Send + Sync + 'static {
    move |conn| {
        let handler = RequestHandler::new(state.clone(), token_store.clone(), syncer.clone());
        Box::pin(async move {
            if let Err(e) = handler.handle_connection(conn).await
                && !matches!(e, ServerError::Shutdown)
            {
                warn!(error = %e, "connection handler error");
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chronosnap_core::{ItemKind, ItemTime, Match, ScheduleItem};
    use chronosnap_protocol::SyncSummary;
    use chronosnap_providers::{ProviderError, TokenInfo};
    use tempfile::tempdir;

    fn sample_session() -> SyncSession {
        let matches = vec![Match {
            item: ScheduleItem {
                id: "e1".to_string(),
                summary: "Team Sync".to_string(),
                start: ItemTime::parse("2024-01-10T10:00:00Z"),
                end: ItemTime::parse("2024-01-10T11:00:00Z"),
                description: String::new(),
                kind: ItemKind::Event {
                    location: String::new(),
                },
            },
            files: Vec::new(),
        }];
        let summary = SyncSummary::from_matches(&matches, 0);
        SyncSession {
            matches,
            summary,
            categories: Vec::new(),
            synced_at: Utc::now(),
        }
    }

    fn ok_syncer() -> Syncer {
        Arc::new(|_token| Box::pin(async { Ok(sample_session()) }))
    }

    fn failing_syncer() -> Syncer {
        Arc::new(|_token| {
            Box::pin(async { Err(SyncError::Files(ProviderError::server("HTTP 500"))) })
        })
    }

    fn store_with_token(dir: &std::path::Path) -> Arc<TokenStore> {
        let store = TokenStore::new(dir.join("tokens.json"));
        store.set(TokenInfo::new("test-token", Some(3600))).unwrap();
        Arc::new(store)
    }

    fn empty_store(dir: &std::path::Path) -> Arc<TokenStore> {
        Arc::new(TokenStore::new(dir.join("tokens.json")))
    }

    #[tokio::test]
    async fn ping_pongs() {
        let dir = tempdir().unwrap();
        let handler =
            RequestHandler::new(new_shared_state(), empty_store(dir.path()), ok_syncer());

        let response = handler.handle(&Request::Ping).await;
        assert_eq!(response, Response::Pong);
    }

    #[tokio::test]
    async fn status_reports_uptime_and_no_sync() {
        let dir = tempdir().unwrap();
        let handler =
            RequestHandler::new(new_shared_state(), empty_store(dir.path()), ok_syncer());

        match handler.handle(&Request::Status).await {
            Response::Status { info } => {
                assert!(info.uptime_seconds < 2);
                assert!(info.last_sync.is_none());
                assert_eq!(info.item_count, 0);
            }
            other => panic!("expected Status response, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn sync_without_token_is_an_auth_failure() {
        let dir = tempdir().unwrap();
        let handler =
            RequestHandler::new(new_shared_state(), empty_store(dir.path()), ok_syncer());

        match handler.handle(&Request::Sync).await {
            Response::Error { error } => {
                assert_eq!(error.code, ErrorCode::AuthenticationFailed);
            }
            other => panic!("expected error response, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn sync_returns_matches_and_installs_session() {
        let dir = tempdir().unwrap();
        let state = new_shared_state();
        let handler =
            RequestHandler::new(state.clone(), store_with_token(dir.path()), ok_syncer());

        match handler.handle(&Request::Sync).await {
            Response::Matches { matches, summary } => {
                assert_eq!(matches.len(), 1);
                assert_eq!(summary.total, 1);
            }
            other => panic!("expected Matches response, got {:?}", other),
        }

        let state = state.read().await;
        assert!(state.session().is_some());
        assert!(state.status_info().last_sync.is_some());
    }

    #[tokio::test]
    async fn failed_sync_clears_the_previous_session() {
        let dir = tempdir().unwrap();
        let state = new_shared_state();
        let store = store_with_token(dir.path());

        let handler = RequestHandler::new(state.clone(), store.clone(), ok_syncer());
        handler.handle(&Request::Sync).await;
        assert!(state.read().await.session().is_some());

        let handler = RequestHandler::new(state.clone(), store, failing_syncer());
        match handler.handle(&Request::Sync).await {
            Response::Error { error } => {
                assert_eq!(error.code, ErrorCode::FileListingFailed);
            }
            other => panic!("expected error response, got {:?}", other),
        }

        // No stale carryover from the earlier successful sync.
        assert!(state.read().await.session().is_none());
    }

    #[tokio::test]
    async fn clear_tokens_empties_the_store() {
        let dir = tempdir().unwrap();
        let store = store_with_token(dir.path());
        let handler = RequestHandler::new(new_shared_state(), store.clone(), ok_syncer());

        assert!(store.get().is_some());
        let response = handler.handle(&Request::ClearTokens).await;
        assert_eq!(response, Response::Ok);
        assert!(store.get().is_none());
    }

    #[tokio::test]
    async fn shutdown_sets_the_flag() {
        let dir = tempdir().unwrap();
        let state = new_shared_state();
        let handler =
            RequestHandler::new(state.clone(), empty_store(dir.path()), ok_syncer());

        let response = handler.handle(&Request::Shutdown).await;
        assert_eq!(response, Response::Ok);
        assert!(state.read().await.shutdown_requested());
    }

    #[tokio::test]
    async fn expired_token_is_rejected() {
        let dir = tempdir().unwrap();
        let store = TokenStore::new(dir.path().join("tokens.json"));
        let mut token = TokenInfo::new("stale", Some(3600));
        token.expires_at = Some(Utc::now() - chrono::Duration::hours(1));
        store.set(token).unwrap();

        let handler = RequestHandler::new(new_shared_state(), Arc::new(store), ok_syncer());
        match handler.handle(&Request::Sync).await {
            Response::Error { error } => {
                assert_eq!(error.code, ErrorCode::AuthenticationFailed);
            }
            other => panic!("expected error response, got {:?}", other),
        }
    }
}
