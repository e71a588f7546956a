//! Client configuration.
//!
//! All settings live in a single `config.toml` at
//! `~/.config/chronosnap/config.toml` by default.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Configuration for the chronosnap client and daemon.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Daemon/connection settings.
    pub server: ServerSettings,

    /// Credential settings.
    pub auth: AuthSettings,
}

/// Daemon/connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Path to the daemon socket.
    pub socket_path: Option<PathBuf>,

    /// Request timeout in seconds. A sync fetches the account's whole
    /// history, so the default is generous.
    pub timeout: u64,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            socket_path: None,
            timeout: 120,
        }
    }
}

/// Credential settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthSettings {
    /// Path to token storage.
    pub token_path: Option<PathBuf>,
}

impl ClientConfig {
    /// Loads configuration from the default path, or defaults if absent.
    pub fn load() -> Result<Self, String> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Loads configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self, String> {
        let content =
            std::fs::read_to_string(path).map_err(|e| format!("failed to read config: {}", e))?;
        toml::from_str(&content).map_err(|e| format!("failed to parse config: {}", e))
    }

    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        Self::default_config_dir().join("config.toml")
    }

    /// Returns the default configuration directory.
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("chronosnap")
    }

    /// Resolves the token storage path.
    pub fn token_path(&self) -> PathBuf {
        self.auth
            .token_path
            .clone()
            .unwrap_or_else(chronosnap_providers::default_token_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ClientConfig::default();
        assert!(config.server.socket_path.is_none());
        assert_eq!(config.server.timeout, 120);
        assert!(config.auth.token_path.is_none());
    }

    #[test]
    fn parses_toml() {
        let toml_content = r#"
[server]
socket_path = "/run/user/1000/chronosnap.sock"
timeout = 30

[auth]
token_path = "/home/user/.config/chronosnap/tokens.json"
"#;
        let config: ClientConfig = toml::from_str(toml_content).unwrap();
        assert_eq!(
            config.server.socket_path,
            Some(PathBuf::from("/run/user/1000/chronosnap.sock"))
        );
        assert_eq!(config.server.timeout, 30);
        assert_eq!(
            config.token_path(),
            PathBuf::from("/home/user/.config/chronosnap/tokens.json")
        );
    }

    #[test]
    fn empty_toml_gives_defaults() {
        let config: ClientConfig = toml::from_str("").unwrap();
        assert_eq!(config.server.timeout, 120);
        assert!(config.token_path().to_string_lossy().contains("chronosnap"));
    }
}
