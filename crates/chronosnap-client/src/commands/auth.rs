//! Auth commands: install, inspect, and invalidate the stored token.
//!
//! Acquiring a token is the identity provider's business; these commands
//! only manage the file the daemon reads it from.

use chronosnap_protocol::{Request, Response};
use chronosnap_providers::{TokenInfo, TokenStore};

use crate::cli::Cli;
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::socket::SocketClient;

/// Stores a bearer token for the daemon to use.
pub fn set_token(config: &ClientConfig, token: &str, expires_in: Option<i64>) -> ClientResult<()> {
    if token.trim().is_empty() {
        return Err(ClientError::Auth("token must not be empty".into()));
    }

    let store = TokenStore::new(config.token_path());
    store.set(TokenInfo::new(token.trim(), expires_in))?;

    println!("Token stored at {}", store.path().display());
    if expires_in.is_none() {
        println!("No expiry recorded; the daemon will use it until cleared.");
    }
    Ok(())
}

/// Invalidates the stored token.
///
/// Asks a running daemon to clear its credentials; falls back to removing
/// the token file directly when no daemon is reachable.
pub async fn clear(cli: &Cli, config: &ClientConfig) -> ClientResult<()> {
    let client = SocketClient::new(cli.resolve_socket_path(config), cli.resolve_timeout(config));

    match client.send(Request::ClearTokens).await {
        Ok(Response::Ok) => {
            println!("Daemon cleared the stored token.");
            Ok(())
        }
        Ok(Response::Error { error }) => Err(ClientError::Daemon(error.to_string())),
        Ok(other) => Err(ClientError::Protocol(format!(
            "unexpected response to ClearTokens: {:?}",
            other
        ))),
        Err(ClientError::Connection(_)) => {
            let store = TokenStore::new(config.token_path());
            store.clear()?;
            println!("No daemon running; removed the token file directly.");
            Ok(())
        }
        Err(e) => Err(e),
    }
}

/// Shows whether a token is stored and when it expires.
pub fn status(config: &ClientConfig) -> ClientResult<()> {
    let store = TokenStore::new(config.token_path());
    store.load()?;

    match store.get() {
        Some(token) => {
            println!("Token stored at {}", store.path().display());
            match token.expires_at {
                Some(expires_at) if token.is_expired() => {
                    println!("Status: expired at {}", expires_at);
                }
                Some(expires_at) => println!("Status: valid until {}", expires_at),
                None => println!("Status: no expiry recorded"),
            }
        }
        None => {
            println!("No token stored. Run `chronosnap auth set-token --token <TOKEN>`.");
        }
    }
    Ok(())
}
