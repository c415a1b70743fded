//! Configuration loading.
//!
//! Configuration is loaded from TOML files with the following resolution order:
//! 1. `--config <path>` (CLI flag)
//! 2. `~/.sanskriti/config.toml` (user)
//! 3. `/etc/sanskriti/config.toml` (system)
//!
//! The store token is a secret and is loaded separately:
//! 1. `SNOWFLAKE_TOKEN` environment variable
//! 2. `~/.sanskriti/secrets.toml` (user, must be 0600)
//! 3. `/etc/sanskriti/secrets.toml` (system, must be 0600)

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::catalog::DEFAULT_DATABASE;
use crate::store::snowflake::DEFAULT_TOKEN_TYPE;
use crate::store::SnowflakeClient;
use crate::types::ImageMode;
use crate::{Result, SanskritiError};

/// Environment variable holding the store token.
pub const TOKEN_ENV_VAR: &str = "SNOWFLAKE_TOKEN";

/// Dashboard configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub assets: AssetsConfig,
    /// Per-dataset overrides of the physical table, `name = "SCHEMA.TABLE"`.
    #[serde(default)]
    pub tables: BTreeMap<String, String>,
}

/// External store connection.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Account URL, e.g. `https://xy12345.snowflakecomputing.com`.
    #[serde(default)]
    pub account_url: Option<String>,
    #[serde(default)]
    pub warehouse: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    /// Database holding every dataset (default: CULTURE_TOURISM_DB).
    #[serde(default = "default_database")]
    pub database: String,
    /// Bearer token type (default: PROGRAMMATIC_ACCESS_TOKEN).
    #[serde(default = "default_token_type")]
    pub token_type: String,
    /// Request timeout in seconds (default: 30).
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,
    /// Delay between polls of a running statement (default: 500).
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,
    /// Polls before giving up on a running statement (default: 60).
    #[serde(default = "default_max_poll_attempts")]
    pub max_poll_attempts: u32,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            account_url: None,
            warehouse: None,
            role: None,
            database: default_database(),
            token_type: default_token_type(),
            request_timeout_secs: default_timeout(),
            poll_interval_ms: default_poll_interval(),
            max_poll_attempts: default_max_poll_attempts(),
        }
    }
}

fn default_database() -> String {
    DEFAULT_DATABASE.to_string()
}

fn default_token_type() -> String {
    DEFAULT_TOKEN_TYPE.to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_poll_interval() -> u64 {
    500
}

fn default_max_poll_attempts() -> u32 {
    60
}

/// Image stages.
#[derive(Debug, Clone, Deserialize)]
pub struct AssetsConfig {
    /// Schema holding the image stages (default: ASSETS).
    #[serde(default = "default_assets_schema")]
    pub schema: String,
    /// `url` (default) or `bytes`.
    #[serde(default)]
    pub image_mode: ImageMode,
    /// Lifetime of generated presigned URLs; store default when unset.
    #[serde(default)]
    pub presigned_url_expiry_secs: Option<u64>,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            schema: default_assets_schema(),
            image_mode: ImageMode::default(),
            presigned_url_expiry_secs: None,
        }
    }
}

fn default_assets_schema() -> String {
    "ASSETS".to_string()
}

/// Secrets file contents.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Secrets {
    #[serde(default)]
    pub snowflake: Option<TokenSecret>,
}

/// A single bearer token.
#[derive(Clone, Deserialize)]
pub struct TokenSecret {
    pub token: String,
}

impl std::fmt::Debug for TokenSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("TokenSecret { token: <redacted> }")
    }
}

impl Config {
    /// Load configuration from the standard locations.
    ///
    /// Resolution order:
    /// 1. Explicit path (if provided)
    /// 2. `~/.sanskriti/config.toml`
    /// 3. `/etc/sanskriti/config.toml`
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let path = Self::resolve_config_path(explicit_path)?;
        Self::load_from(&path)
    }

    /// Load configuration from one file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            SanskritiError::Configuration(format!("Failed to read config file {path:?}: {e}"))
        })?;
        toml::from_str(&content).map_err(|e| {
            SanskritiError::Configuration(format!("Failed to parse config file {path:?}: {e}"))
        })
    }

    fn resolve_config_path(explicit: Option<&Path>) -> Result<PathBuf> {
        if let Some(path) = explicit {
            if path.exists() {
                return Ok(path.to_path_buf());
            }
            return Err(SanskritiError::Configuration(format!(
                "Config file not found: {path:?}"
            )));
        }

        // User config
        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".sanskriti").join("config.toml");
            if user_config.exists() {
                return Ok(user_config);
            }
        }

        // System config
        let system_config = PathBuf::from("/etc/sanskriti/config.toml");
        if system_config.exists() {
            return Ok(system_config);
        }

        Err(SanskritiError::Configuration(
            "No config file found. Create ~/.sanskriti/config.toml or /etc/sanskriti/config.toml"
                .to_string(),
        ))
    }

    /// Build the store client described by `[store]`.
    pub fn snowflake_client(&self, token: impl Into<String>) -> Result<SnowflakeClient> {
        let store = &self.store;
        let account_url = store.account_url.as_deref().ok_or_else(|| {
            SanskritiError::Configuration("[store] account_url is not set".to_string())
        })?;

        let mut client = SnowflakeClient::with_timeout(
            account_url,
            token,
            Duration::from_secs(store.request_timeout_secs),
        )?
        .token_type(&store.token_type)
        .database(&store.database)
        .polling(
            Duration::from_millis(store.poll_interval_ms),
            store.max_poll_attempts,
        );
        if let Some(warehouse) = &store.warehouse {
            client = client.warehouse(warehouse);
        }
        if let Some(role) = &store.role {
            client = client.role(role);
        }
        Ok(client)
    }
}

impl Secrets {
    /// Load secrets from the standard locations with permission checks.
    ///
    /// Returns empty secrets if no file exists (the token may come from the
    /// environment).
    pub fn load() -> Result<Self> {
        if let Some(home) = dirs::home_dir() {
            let user_secrets = home.join(".sanskriti").join("secrets.toml");
            if user_secrets.exists() {
                return Self::load_from(&user_secrets);
            }
        }

        let system_secrets = PathBuf::from("/etc/sanskriti/secrets.toml");
        if system_secrets.exists() {
            return Self::load_from(&system_secrets);
        }

        Ok(Secrets::default())
    }

    /// Load one secrets file, rejecting it if group or others can read it.
    pub fn load_from(path: &Path) -> Result<Self> {
        Self::check_permissions(path)?;
        let content = fs::read_to_string(path).map_err(|e| {
            SanskritiError::Configuration(format!("Failed to read secrets file {path:?}: {e}"))
        })?;
        toml::from_str(&content).map_err(|e| {
            SanskritiError::Configuration(format!("Failed to parse secrets file {path:?}: {e}"))
        })
    }

    #[cfg(unix)]
    fn check_permissions(path: &Path) -> Result<()> {
        use std::os::unix::fs::PermissionsExt;

        let metadata = fs::metadata(path).map_err(|e| {
            SanskritiError::Configuration(format!("Failed to stat secrets file {path:?}: {e}"))
        })?;

        let mode = metadata.permissions().mode();
        if mode & 0o077 != 0 {
            return Err(SanskritiError::Configuration(format!(
                "Secrets file {path:?} has insecure permissions {:o}. Must be 0600 or 0400.",
                mode & 0o777
            )));
        }

        Ok(())
    }

    #[cfg(not(unix))]
    fn check_permissions(_path: &Path) -> Result<()> {
        Ok(())
    }

    /// The store token: `SNOWFLAKE_TOKEN` first, then the secrets file.
    pub fn token(&self) -> Option<String> {
        std::env::var(TOKEN_ENV_VAR)
            .ok()
            .filter(|t| !t.is_empty())
            .or_else(|| self.snowflake.as_ref().map(|s| s.token.clone()))
    }
}
