//! Request and response types for the chronosnap protocol.

use chrono::{DateTime, Utc};
use chronosnap_core::Match;
use serde::{Deserialize, Serialize};

use crate::PROTOCOL_VERSION;

/// Message envelope wrapping all protocol messages.
///
/// Every message exchanged between client and server is wrapped in this
/// envelope, which provides versioning and request correlation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    /// Protocol version (always "1" for v1).
    pub protocol_version: String,
    /// Unique request ID for correlation.
    pub request_id: String,
    /// The actual payload.
    pub payload: T,
}

impl<T> Envelope<T> {
    /// Creates a new envelope with the current protocol version.
    pub fn new(request_id: impl Into<String>, payload: T) -> Self {
        Self {
            protocol_version: PROTOCOL_VERSION.to_string(),
            request_id: request_id.into(),
            payload,
        }
    }

    /// Creates a request envelope.
    pub fn request(request_id: impl Into<String>, request: T) -> Self {
        Self::new(request_id, request)
    }

    /// Creates a response envelope.
    pub fn response(request_id: impl Into<String>, response: T) -> Self {
        Self::new(request_id, response)
    }

    /// Checks if this envelope uses a compatible protocol version.
    pub fn is_compatible(&self) -> bool {
        self.protocol_version == PROTOCOL_VERSION
    }
}

/// Request types that can be sent from client to server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Request {
    /// Authenticate and return the full matched dataset.
    Sync,

    /// Invalidate cached credentials.
    ClearTokens,

    /// Get daemon status and last-sync diagnostics.
    Status,

    /// Ping to check daemon liveness.
    Ping,

    /// Request daemon shutdown.
    Shutdown,
}

/// Response types that can be sent from server to client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Response {
    /// The matched dataset from a completed sync.
    Matches {
        /// One entry per schedule item, in start-time order.
        matches: Vec<Match>,
        /// Aggregate counts over the match set.
        summary: SyncSummary,
    },

    /// Daemon status information.
    Status {
        #[serde(flatten)]
        info: StatusInfo,
    },

    /// Generic success response.
    Ok,

    /// Error response.
    Error {
        #[serde(flatten)]
        error: ErrorResponse,
    },

    /// Pong response to Ping.
    Pong,
}

impl Response {
    /// Creates a Matches response.
    pub fn matches(matches: Vec<Match>, summary: SyncSummary) -> Self {
        Self::Matches { matches, summary }
    }

    /// Creates a Status response.
    pub fn status(info: StatusInfo) -> Self {
        Self::Status { info }
    }

    /// Creates an Error response.
    pub fn error(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Error {
            error: ErrorResponse::new(code, message),
        }
    }

    /// Returns true unless this is an error response.
    pub fn is_success(&self) -> bool {
        !matches!(self, Self::Error { .. })
    }

    /// Returns the error if this is an error response.
    pub fn as_error(&self) -> Option<&ErrorResponse> {
        match self {
            Self::Error { error } => Some(error),
            _ => None,
        }
    }
}

/// Aggregate counts over one sync's match set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncSummary {
    /// Total number of schedule items (one per match entry).
    pub total: usize,
    /// Items classified as plain events.
    pub events: usize,
    /// Items classified as tasks.
    pub tasks: usize,
    /// Items classified as appointments.
    pub appointments: usize,
    /// Items with at least one attached file.
    pub items_with_files: usize,
    /// Number of files returned by the listing.
    pub file_count: usize,
}

impl SyncSummary {
    /// Computes the summary for a match set and file listing size.
    pub fn from_matches(matches: &[Match], file_count: usize) -> Self {
        Self {
            total: matches.len(),
            events: matches.iter().filter(|m| m.item.is_event()).count(),
            tasks: matches.iter().filter(|m| m.item.is_task()).count(),
            appointments: matches.iter().filter(|m| m.item.is_appointment()).count(),
            items_with_files: matches.iter().filter(|m| !m.files.is_empty()).count(),
            file_count,
        }
    }
}

/// Daemon status information.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusInfo {
    /// Daemon uptime in seconds.
    pub uptime_seconds: u64,

    /// Time of the last successful sync.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_sync: Option<DateTime<Utc>>,

    /// Item count held by the current session, if any.
    pub item_count: usize,

    /// Outcome of each fetch category from the last sync attempt.
    pub categories: Vec<CategoryStatus>,
}

impl StatusInfo {
    /// Creates a new StatusInfo with no sync history.
    pub fn new(uptime_seconds: u64) -> Self {
        Self {
            uptime_seconds,
            last_sync: None,
            item_count: 0,
            categories: Vec::new(),
        }
    }
}

/// Outcome of one fetch category (events, tasks, or appointments).
///
/// Category failures do not fail a sync; they are recorded here for
/// diagnostics while the category contributes zero items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryStatus {
    /// Category name: "events", "tasks", or "appointments".
    pub category: String,

    /// Whether the fetch succeeded.
    pub ok: bool,

    /// Error message if the fetch failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Number of items the category contributed.
    pub item_count: usize,
}

impl CategoryStatus {
    /// Creates a successful category outcome.
    pub fn fetched(category: impl Into<String>, item_count: usize) -> Self {
        Self {
            category: category.into(),
            ok: true,
            error: None,
            item_count,
        }
    }

    /// Creates a failed category outcome.
    pub fn failed(category: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            ok: false,
            error: Some(error.into()),
            item_count: 0,
        }
    }
}

/// Error codes for protocol errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// Unknown or internal error.
    InternalError,

    /// Invalid request format.
    InvalidRequest,

    /// Request timed out.
    Timeout,

    /// No valid credentials available; the sync was aborted.
    AuthenticationFailed,

    /// The file listing failed, which fails the whole sync.
    FileListingFailed,

    /// Daemon is shutting down.
    ShuttingDown,
}

impl ErrorCode {
    /// Returns a human-readable description of the error code.
    pub fn description(&self) -> &'static str {
        match self {
            Self::InternalError => "An internal error occurred",
            Self::InvalidRequest => "The request was invalid",
            Self::Timeout => "The request timed out",
            Self::AuthenticationFailed => "Authentication failed",
            Self::FileListingFailed => "The file listing failed",
            Self::ShuttingDown => "Daemon is shutting down",
        }
    }
}

/// Error response details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code.
    pub code: ErrorCode,
    /// Human-readable error message.
    pub message: String,
}

impl ErrorResponse {
    /// Creates a new error response.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code.description(), self.message)
    }
}

impl std::error::Error for ErrorResponse {}
