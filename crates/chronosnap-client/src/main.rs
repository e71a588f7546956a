//! chronosnap CLI entry point.

use std::process::ExitCode;

use clap::Parser;

use chronosnap_client::cli::{AuthAction, Cli, Command};
use chronosnap_client::config::ClientConfig;
use chronosnap_client::error::{ClientError, ClientResult};
use chronosnap_core::{TracingConfig, init_tracing};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let tracing_config = if matches!(cli.command, Some(Command::Server)) {
        TracingConfig::daemon()
    } else if cli.debug {
        TracingConfig::cli_debug()
    } else {
        TracingConfig::default()
    };
    if let Err(e) = init_tracing(tracing_config) {
        eprintln!("warning: failed to initialize tracing: {}", e);
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> ClientResult<()> {
    let config = if let Some(ref path) = cli.config {
        ClientConfig::load_from(path).map_err(ClientError::Config)?
    } else {
        ClientConfig::load().unwrap_or_default()
    };

    match &cli.command {
        Some(Command::Sync {
            search,
            from,
            to,
            json,
        }) => {
            chronosnap_client::commands::sync::run(
                &cli,
                &config,
                search.as_deref(),
                *from,
                *to,
                *json,
            )
            .await
        }
        Some(Command::Auth { action }) => match action {
            AuthAction::SetToken { token, expires_in } => {
                chronosnap_client::commands::auth::set_token(&config, token, *expires_in)
            }
            AuthAction::Clear => chronosnap_client::commands::auth::clear(&cli, &config).await,
            AuthAction::Status => chronosnap_client::commands::auth::status(&config),
        },
        Some(Command::Status) => chronosnap_client::commands::status::run(&cli, &config).await,
        Some(Command::Ping) => chronosnap_client::commands::status::ping(&cli, &config).await,
        Some(Command::Server) => chronosnap_client::commands::server::run(&cli, &config).await,
        None => {
            println!("chronosnap - pair your schedule with the files you touched around it");
            println!();
            println!("Quick start:");
            println!("  1. Start the daemon:    chronosnap server");
            println!("  2. Store a token:       chronosnap auth set-token --token <TOKEN>");
            println!("  3. Sync and browse:     chronosnap sync");
            println!();
            println!("Run 'chronosnap --help' for all options.");
            Ok(())
        }
    }
}
