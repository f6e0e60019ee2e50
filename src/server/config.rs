//! Configuration loading for mimird.
//!
//! Configuration is loaded from TOML files with the following resolution order:
//! 1. `--config <path>` (CLI flag)
//! 2. `~/.mimir/config.toml` (user)
//! 3. `/etc/mimir/config.toml` (system)
//!
//! Without an explicit path and with no file in either location, built-in
//! defaults are used.
//!
//! Secrets are loaded separately with mandatory permission checks:
//! 1. `~/.mimir/secrets.toml` (user, must be 0600)
//! 2. `/etc/mimir/secrets.toml` (system, must be 0600)
//!
//! Each secret falls back to an environment variable.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::cache::keys::DEFAULT_SEARCH_TTL;
use crate::{MimirError, Result};

/// Environment variable holding the Google Books API key.
pub const GOOGLE_BOOKS_KEY_ENV: &str = "GOOGLE_BOOKS_API_KEY";

/// Environment variable holding the Redis URL.
pub const REDIS_URL_ENV: &str = "REDIS_URL";

/// Server configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub cache: CacheSection,
}

/// Server network configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Address to bind to (default: 127.0.0.1:3000).
    #[serde(default = "default_address")]
    pub address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
        }
    }
}

fn default_address() -> String {
    "127.0.0.1:3000".to_string()
}

/// Upstream catalog configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogConfig {
    /// Override for the Google Books base URL.
    #[serde(default)]
    pub base_url: Option<String>,
}

/// Which cache backend to run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// In-process moka cache.
    #[default]
    Memory,
    /// Shared Redis; URL comes from secrets or `REDIS_URL`.
    Redis,
}

/// Cache configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheSection {
    #[serde(default)]
    pub backend: BackendKind,
    /// Capacity of the in-process cache (default: 10000).
    #[serde(default = "default_max_entries")]
    pub max_entries: u64,
    /// Search-result TTL in seconds (default: 900). Books live 4× as long.
    #[serde(default = "default_search_ttl_secs")]
    pub search_ttl_secs: u64,
    /// Key prefix (default: `books:v1`).
    #[serde(default)]
    pub key_prefix: Option<String>,
}

impl Default for CacheSection {
    fn default() -> Self {
        Self {
            backend: BackendKind::default(),
            max_entries: default_max_entries(),
            search_ttl_secs: default_search_ttl_secs(),
            key_prefix: None,
        }
    }
}

impl CacheSection {
    pub fn search_ttl(&self) -> Duration {
        Duration::from_secs(self.search_ttl_secs)
    }
}

fn default_max_entries() -> u64 {
    10_000
}

fn default_search_ttl_secs() -> u64 {
    DEFAULT_SEARCH_TTL.as_secs()
}

/// Secrets configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Secrets {
    #[serde(default)]
    pub google_books: Option<ApiKeySecret>,
    #[serde(default)]
    pub redis: Option<RedisSecret>,
}

/// A single API key secret.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiKeySecret {
    pub api_key: String,
}

/// Redis connection URL (may embed a password).
#[derive(Debug, Clone, Deserialize)]
pub struct RedisSecret {
    pub url: String,
}

impl Config {
    /// Load configuration from the standard locations.
    ///
    /// Resolution order:
    /// 1. Explicit path (if provided, must exist)
    /// 2. `~/.mimir/config.toml`
    /// 3. `/etc/mimir/config.toml`
    /// 4. Built-in defaults
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        match Self::resolve_config_path(explicit_path)? {
            Some(path) => Self::load_from_file(&path),
            None => Ok(Config::default()),
        }
    }

    fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            MimirError::Configuration(format!("Failed to read config file {path:?}: {e}"))
        })?;
        toml::from_str(&content).map_err(|e| {
            MimirError::Configuration(format!("Failed to parse config file {path:?}: {e}"))
        })
    }

    /// Resolve the config file path.
    fn resolve_config_path(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
        if let Some(path) = explicit {
            if path.exists() {
                return Ok(Some(path.to_path_buf()));
            }
            return Err(MimirError::Configuration(format!(
                "Config file not found: {path:?}"
            )));
        }

        // User config
        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".mimir").join("config.toml");
            if user_config.exists() {
                return Ok(Some(user_config));
            }
        }

        // System config
        let system_config = PathBuf::from("/etc/mimir/config.toml");
        if system_config.exists() {
            return Ok(Some(system_config));
        }

        Ok(None)
    }
}

impl Secrets {
    /// Load secrets from the standard locations with permission checks.
    ///
    /// Resolution order:
    /// 1. `~/.mimir/secrets.toml` (if exists, must be 0600)
    /// 2. `/etc/mimir/secrets.toml` (if exists, must be 0600)
    ///
    /// Returns empty secrets if no file exists (env vars may still apply).
    pub fn load() -> Result<Self> {
        if let Some(home) = dirs::home_dir() {
            let user_secrets = home.join(".mimir").join("secrets.toml");
            if user_secrets.exists() {
                return Self::load_checked(&user_secrets);
            }
        }

        let system_secrets = PathBuf::from("/etc/mimir/secrets.toml");
        if system_secrets.exists() {
            return Self::load_checked(&system_secrets);
        }

        Ok(Secrets::default())
    }

    /// Load a specific secrets file after checking its permissions.
    pub fn load_checked(path: &Path) -> Result<Self> {
        Self::check_permissions(path)?;
        let content = fs::read_to_string(path).map_err(|e| {
            MimirError::Configuration(format!("Failed to read secrets file {path:?}: {e}"))
        })?;
        toml::from_str(&content).map_err(|e| {
            MimirError::Configuration(format!("Failed to parse secrets file {path:?}: {e}"))
        })
    }

    /// Check that the secrets file has secure permissions (0600 or 0400).
    #[cfg(unix)]
    fn check_permissions(path: &Path) -> Result<()> {
        use std::os::unix::fs::PermissionsExt;

        let metadata = fs::metadata(path).map_err(|e| {
            MimirError::Configuration(format!("Failed to stat secrets file {path:?}: {e}"))
        })?;

        let mode = metadata.permissions().mode();
        // Reject if group or other bits are set
        if mode & 0o077 != 0 {
            return Err(MimirError::Configuration(format!(
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

    /// Google Books API key, falling back to `GOOGLE_BOOKS_API_KEY`.
    pub fn google_books_key(&self) -> Option<String> {
        self.google_books
            .as_ref()
            .map(|s| s.api_key.clone())
            .or_else(|| env_var(GOOGLE_BOOKS_KEY_ENV))
    }

    /// Redis URL, falling back to `REDIS_URL`.
    pub fn redis_url(&self) -> Option<String> {
        self.redis
            .as_ref()
            .map(|s| s.url.clone())
            .or_else(|| env_var(REDIS_URL_ENV))
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
