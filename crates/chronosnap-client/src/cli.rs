//! Command-line interface definition.

use std::path::PathBuf;
use std::time::Duration;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use crate::config::ClientConfig;

/// chronosnap - pair your schedule with the files you touched around it
#[derive(Debug, Parser)]
#[command(name = "chronosnap")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, short, env = "CHRONOSNAP_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable debug output
    #[arg(long, short = 'v')]
    pub debug: bool,

    /// Path to the daemon socket
    #[arg(long, env = "CHRONOSNAP_SOCKET")]
    pub socket_path: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// Resolves the socket path: flag, then config, then default.
    pub fn resolve_socket_path(&self, config: &ClientConfig) -> PathBuf {
        self.socket_path
            .clone()
            .or_else(|| config.server.socket_path.clone())
            .unwrap_or_else(chronosnap_server::default_socket_path)
    }

    /// Resolves the request timeout: flag, then config.
    pub fn resolve_timeout(&self, config: &ClientConfig) -> Duration {
        Duration::from_secs(self.timeout.unwrap_or(config.server.timeout))
    }
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sync schedule items and files, then show the paired results
    Sync {
        /// Only show items whose text matches this term
        #[arg(long, short)]
        search: Option<String>,

        /// Start of a date-range filter (YYYY-MM-DD)
        #[arg(long, requires = "to")]
        from: Option<NaiveDate>,

        /// End of a date-range filter (YYYY-MM-DD)
        #[arg(long, requires = "from")]
        to: Option<NaiveDate>,

        /// Print the matches as JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Manage the stored access token
    Auth {
        #[command(subcommand)]
        action: AuthAction,
    },

    /// Show daemon status and last-sync diagnostics
    Status,

    /// Check whether the daemon is reachable
    Ping,

    /// Run the daemon in the foreground
    Server,
}

/// Credential actions.
#[derive(Debug, Subcommand)]
pub enum AuthAction {
    /// Store a bearer token for the daemon to use
    SetToken {
        /// The access token
        #[arg(long, env = "CHRONOSNAP_TOKEN", hide_env_values = true)]
        token: String,

        /// Token lifetime in seconds, if known
        #[arg(long)]
        expires_in: Option<i64>,
    },

    /// Invalidate the stored token
    Clear,

    /// Show whether a token is stored and when it expires
    Status,
}
