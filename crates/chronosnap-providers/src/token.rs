//! Bearer-token storage.
//!
//! The token itself comes from outside (the identity provider is an
//! external collaborator); this module only stores it, hands it out, and
//! invalidates it on request. Tokens are kept as JSON in the user's config
//! directory with owner-only permissions.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{ProviderError, ProviderResult};

/// A stored bearer token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenInfo {
    /// The access token sent as `Authorization: Bearer`.
    pub access_token: String,

    /// When the token expires, if known.
    pub expires_at: Option<DateTime<Utc>>,

    /// When the token was stored.
    pub saved_at: DateTime<Utc>,
}

impl TokenInfo {
    /// Creates a token record, applying a safety buffer to the expiry.
    pub fn new(access_token: impl Into<String>, expires_in_secs: Option<i64>) -> Self {
        let expires_at = expires_in_secs
            .map(|secs| Utc::now() + Duration::seconds(secs) - Duration::seconds(60));

        Self {
            access_token: access_token.into(),
            expires_at,
            saved_at: Utc::now(),
        }
    }

    /// Returns true if the token is expired or about to expire.
    ///
    /// Tokens with no recorded expiry are assumed valid.
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires_at) => Utc::now() >= expires_at,
            None => false,
        }
    }
}

/// File-backed token store.
#[derive(Debug)]
pub struct TokenStore {
    path: PathBuf,
    token: RwLock<Option<TokenInfo>>,
}

impl TokenStore {
    /// Creates a store backed by the given path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            token: RwLock::new(None),
        }
    }

    /// Loads the token from disk into memory, replacing whatever was held.
    ///
    /// Returns Ok(true) if a token was loaded, Ok(false) if none exists
    /// (in which case any in-memory token is dropped too).
    pub fn load(&self) -> ProviderResult<bool> {
        if !self.path.exists() {
            debug!("no token file at {:?}", self.path);
            *self.token.write().unwrap() = None;
            return Ok(false);
        }

        let content = fs::read_to_string(&self.path).map_err(|e| {
            ProviderError::configuration(format!("failed to read token file: {}", e))
        })?;

        let token: TokenInfo = serde_json::from_str(&content).map_err(|e| {
            ProviderError::configuration(format!("failed to parse token file: {}", e))
        })?;

        info!("loaded token from {:?}", self.path);
        *self.token.write().unwrap() = Some(token);
        Ok(true)
    }

    /// Stores a new token in memory and on disk.
    pub fn set(&self, token: TokenInfo) -> ProviderResult<()> {
        *self.token.write().unwrap() = Some(token);
        self.save()
    }

    /// Returns a clone of the current token, if any.
    pub fn get(&self) -> Option<TokenInfo> {
        self.token.read().unwrap().clone()
    }

    /// Returns the current token only if it has not expired.
    pub fn valid_token(&self) -> Option<TokenInfo> {
        self.get().filter(|t| !t.is_expired())
    }

    /// Invalidates the stored token, in memory and on disk.
    pub fn clear(&self) -> ProviderResult<()> {
        *self.token.write().unwrap() = None;
        if self.path.exists() {
            fs::remove_file(&self.path).map_err(|e| {
                ProviderError::configuration(format!("failed to remove token file: {}", e))
            })?;
            info!("cleared token at {:?}", self.path);
        }
        Ok(())
    }

    /// Returns the backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self) -> ProviderResult<()> {
        let token = self.token.read().unwrap();
        let token = token
            .as_ref()
            .ok_or_else(|| ProviderError::internal("no token to save"))?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                ProviderError::configuration(format!("failed to create token directory: {}", e))
            })?;
        }

        // Write to a temp file and rename so readers never see a partial file.
        let temp_path = self.path.with_extension("json.tmp");
        let content = serde_json::to_string_pretty(token)
            .map_err(|e| ProviderError::internal(format!("failed to serialize token: {}", e)))?;

        fs::write(&temp_path, &content).map_err(|e| {
            ProviderError::configuration(format!("failed to write token file: {}", e))
        })?;

        fs::rename(&temp_path, &self.path).map_err(|e| {
            ProviderError::configuration(format!("failed to rename token file: {}", e))
        })?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = fs::Permissions::from_mode(0o600);
            let _ = fs::set_permissions(&self.path, perms);
        }

        debug!("saved token to {:?}", self.path);
        Ok(())
    }
}

/// Returns the default token file path
/// (`~/.config/chronosnap/tokens.json`).
pub fn default_token_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("chronosnap")
        .join("tokens.json")
}
