//! Sync command: request the matched dataset, filter it, render it.

use chrono::NaiveDate;

use chronosnap_protocol::{Request, Response};

use crate::cli::Cli;
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::render::{filter_by_date_range, filter_by_search, render_matches};
use crate::socket::SocketClient;

/// Runs one sync and prints the (optionally filtered) results.
pub async fn run(
    cli: &Cli,
    config: &ClientConfig,
    search: Option<&str>,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    json: bool,
) -> ClientResult<()> {
    let client = SocketClient::new(cli.resolve_socket_path(config), cli.resolve_timeout(config));

    let response = client.send(Request::Sync).await?;
    let (matches, summary) = match response {
        Response::Matches { matches, summary } => (matches, summary),
        Response::Error { error } => return Err(ClientError::Daemon(error.to_string())),
        other => {
            return Err(ClientError::Protocol(format!(
                "unexpected response to Sync: {:?}",
                other
            )));
        }
    };

    // Filters run over the in-memory result of this sync only.
    let mut shown = matches;
    let mut title = format!(
        "Sync complete: {} items loaded ({} events, {} tasks, {} appointments)",
        summary.total, summary.events, summary.tasks, summary.appointments
    );

    if let Some(term) = search {
        shown = filter_by_search(&shown, term);
        title = format!("Search results for \"{}\"", term);
    }

    if let (Some(from), Some(to)) = (from, to) {
        shown = filter_by_date_range(&shown, from, to);
        title = format!("{} (from {} to {})", title, from, to);
    }

    if json {
        let rendered = serde_json::to_string_pretty(&shown)
            .map_err(|e| ClientError::Protocol(format!("failed to encode matches: {}", e)))?;
        println!("{}", rendered);
    } else {
        print!("{}", render_matches(&shown, &title));
    }

    Ok(())
}
