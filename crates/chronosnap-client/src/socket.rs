//! Unix socket client for talking to the chronosnap daemon.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::UnixStream;
use tracing::{debug, warn};
use uuid::Uuid;

use chronosnap_protocol::{Envelope, MAX_MESSAGE_SIZE, Request, Response};

use crate::error::{ClientError, ClientResult};

/// Client for one-shot request/response exchanges with the daemon.
pub struct SocketClient {
    socket_path: PathBuf,
    timeout: Duration,
}

impl SocketClient {
    /// Creates a new socket client.
    pub fn new(socket_path: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            socket_path: socket_path.into(),
            timeout,
        }
    }

    /// Returns the socket path.
    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }

    /// Sends a request and waits for the response.
    pub async fn send(&self, request: Request) -> ClientResult<Response> {
        let request_id = Uuid::new_v4().to_string();
        let envelope = Envelope::request(&request_id, request);

        debug!(
            socket = %self.socket_path.display(),
            request_id = %request_id,
            "connecting to daemon"
        );

        let stream = tokio::time::timeout(self.timeout, UnixStream::connect(&self.socket_path))
            .await
            .map_err(|_| {
                ClientError::Connection(format!(
                    "connection timed out after {}s",
                    self.timeout.as_secs()
                ))
            })?
            .map_err(|e| {
                ClientError::Connection(format!(
                    "failed to connect to {} (is the daemon running? try `chronosnap server`): {}",
                    self.socket_path.display(),
                    e
                ))
            })?;

        let response = self.exchange(stream, &envelope).await?;

        if response.request_id != request_id {
            warn!(
                expected = %request_id,
                received = %response.request_id,
                "response request_id mismatch"
            );
        }

        Ok(response.payload)
    }

    /// Performs the framed request-response exchange on a connected stream.
    async fn exchange(
        &self,
        mut stream: UnixStream,
        envelope: &Envelope<Request>,
    ) -> ClientResult<Envelope<Response>> {
        let json = serde_json::to_vec(envelope)
            .map_err(|e| ClientError::Protocol(format!("failed to serialize request: {}", e)))?;

        let len = json.len() as u32;
        if len > MAX_MESSAGE_SIZE {
            return Err(ClientError::Protocol(format!(
                "request too large: {} bytes (max: {})",
                len, MAX_MESSAGE_SIZE
            )));
        }

        tokio::time::timeout(self.timeout, async {
            stream.write_all(&len.to_be_bytes()).await?;
            stream.write_all(&json).await?;
            stream.flush().await?;
            Ok::<(), std::io::Error>(())
        })
        .await
        .map_err(|_| ClientError::Timeout("sending request".into()))?
        .map_err(ClientError::Io)?;

        debug!("request sent, waiting for response");

        let payload = tokio::time::timeout(self.timeout, async {
            let mut len_buf = [0u8; 4];
            stream.read_exact(&mut len_buf).await?;
            let resp_len = u32::from_be_bytes(len_buf) as usize;

            if resp_len as u32 > MAX_MESSAGE_SIZE {
                return Err(std::io::Error::new(
                    std::io::ErrorKind::InvalidData,
                    format!(
                        "response too large: {} bytes (max: {})",
                        resp_len, MAX_MESSAGE_SIZE
                    ),
                ));
            }

            let mut payload = vec![0u8; resp_len];
            stream.read_exact(&mut payload).await?;
            Ok(payload)
        })
        .await
        .map_err(|_| ClientError::Timeout("reading response".into()))?
        .map_err(ClientError::Io)?;

        let envelope: Envelope<Response> = serde_json::from_slice(&payload)
            .map_err(|e| ClientError::Protocol(format!("failed to deserialize response: {}", e)))?;

        debug!(request_id = %envelope.request_id, "response received");

        Ok(envelope)
    }

    /// Pings the daemon to check if it is alive.
    pub async fn ping(&self) -> bool {
        matches!(self.send(Request::Ping).await, Ok(Response::Pong))
    }
}
