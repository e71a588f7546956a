//! Wire protocol between the chronosnap CLI and the daemon.
//!
//! Messages are JSON envelopes framed with a 4-byte big-endian length
//! prefix. The envelope carries a protocol version and a request id for
//! correlation; payloads are the [`Request`] and [`Response`] enums.

pub mod error;
pub mod framing;
pub mod types;

pub use error::{ProtocolError, ProtocolResult};
pub use framing::{FrameReader, FrameWriter, decode_message, encode_message};
pub use types::{
    CategoryStatus, Envelope, ErrorCode, ErrorResponse, Request, Response, StatusInfo,
    SyncSummary,
};

/// Current protocol version.
pub const PROTOCOL_VERSION: &str = "1";

/// Maximum size of a single framed message.
///
/// A sync response embeds the full match set (every schedule item with its
/// attached file records), so the cap is generous.
pub const MAX_MESSAGE_SIZE: u32 = 16 * 1024 * 1024;
