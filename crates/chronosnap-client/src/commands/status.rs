//! Status and ping commands.

use chronosnap_protocol::{Request, Response};

use crate::cli::Cli;
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::socket::SocketClient;

/// Prints daemon status and last-sync diagnostics.
pub async fn run(cli: &Cli, config: &ClientConfig) -> ClientResult<()> {
    let client = SocketClient::new(cli.resolve_socket_path(config), cli.resolve_timeout(config));

    match client.send(Request::Status).await? {
        Response::Status { info } => {
            println!("Daemon uptime: {}s", info.uptime_seconds);
            match info.last_sync {
                Some(last_sync) => {
                    println!("Last sync: {} ({} items)", last_sync, info.item_count);
                    for category in &info.categories {
                        match &category.error {
                            Some(error) => {
                                println!("  {}: FAILED ({})", category.category, error)
                            }
                            None => println!(
                                "  {}: {} item(s)",
                                category.category, category.item_count
                            ),
                        }
                    }
                }
                None => println!("Last sync: never"),
            }
            Ok(())
        }
        Response::Error { error } => Err(ClientError::Daemon(error.to_string())),
        other => Err(ClientError::Protocol(format!(
            "unexpected response to Status: {:?}",
            other
        ))),
    }
}

/// Checks whether the daemon is reachable.
pub async fn ping(cli: &Cli, config: &ClientConfig) -> ClientResult<()> {
    let client = SocketClient::new(cli.resolve_socket_path(config), cli.resolve_timeout(config));

    if client.ping().await {
        println!("Daemon is running at {}", client.socket_path().display());
        Ok(())
    } else {
        Err(ClientError::Connection(format!(
            "no daemon at {}",
            client.socket_path().display()
        )))
    }
}
