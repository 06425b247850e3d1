use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, warn};

pub mod defaults;

use defaults::*;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub web: WebConfig,
    #[serde(default)]
    pub metadata: MetadataConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Path prefix every route is mounted under; `/` mounts at the root
    #[serde(default = "default_base_path")]
    pub base_path: String,
    /// How long in-flight requests may drain after a shutdown signal
    #[serde(default = "default_shutdown_timeout")]
    pub shutdown_timeout: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetadataConfig {
    /// BCHD gRPC address; `host:port` without a scheme is dialed over TLS
    #[serde(default = "default_bchd_url")]
    pub bchd_url: String,
    #[serde(default = "default_request_timeout")]
    pub request_timeout: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Source card images; file names define the set of known group tokens
    #[serde(default = "default_cards_path")]
    pub cards_path: PathBuf,
    /// Rendered cards laid out as `{cache_path}/{size}/{token_id}.png`
    #[serde(default = "default_cache_path")]
    pub cache_path: PathBuf,
}

// Web defaults
fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_base_path() -> String {
    DEFAULT_BASE_PATH.to_string()
}

fn default_shutdown_timeout() -> String {
    DEFAULT_SHUTDOWN_TIMEOUT.to_string()
}

// Metadata defaults
fn default_bchd_url() -> String {
    DEFAULT_BCHD_URL.to_string()
}

fn default_request_timeout() -> String {
    DEFAULT_REQUEST_TIMEOUT.to_string()
}

// Storage defaults
fn default_cards_path() -> PathBuf {
    PathBuf::from(DEFAULT_CARDS_PATH)
}

fn default_cache_path() -> PathBuf {
    PathBuf::from(DEFAULT_CACHE_PATH)
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            base_path: default_base_path(),
            shutdown_timeout: default_shutdown_timeout(),
        }
    }
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            bchd_url: default_bchd_url(),
            request_timeout: default_request_timeout(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            cards_path: default_cards_path(),
            cache_path: default_cache_path(),
        }
    }
}

impl WebConfig {
    /// Base path with a leading slash and no trailing slash.
    ///
    /// The root mount is returned as an empty string so that it can be
    /// prepended to absolute route paths directly.
    pub fn normalized_base_path(&self) -> String {
        let trimmed = self.base_path.trim().trim_matches('/');
        if trimmed.is_empty() {
            String::new()
        } else {
            format!("/{}", trimmed)
        }
    }

    pub fn shutdown_timeout(&self) -> Result<Duration> {
        humantime::parse_duration(&self.shutdown_timeout)
            .with_context(|| format!("invalid web.shutdown_timeout '{}'", self.shutdown_timeout))
    }
}

impl MetadataConfig {
    pub fn request_timeout(&self) -> Result<Duration> {
        humantime::parse_duration(&self.request_timeout).with_context(|| {
            format!("invalid metadata.request_timeout '{}'", self.request_timeout)
        })
    }
}

/// Maps the environment variable names the service has always honoured onto
/// their config keys.
fn legacy_env_key(key: &str) -> Option<&'static str> {
    const LEGACY: [(&str, &str); 4] = [
        ("HOST", "web.host"),
        ("PORT", "web.port"),
        ("BASE_PATH", "web.base_path"),
        ("BCHD_URL", "metadata.bchd_url"),
    ];

    LEGACY
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(key))
        .map(|(_, path)| *path)
}

/// Export `.env` from the working directory (or a parent) into the process
/// environment. Variables that are already set keep their value.
fn load_dotenv() {
    match dotenvy::dotenv() {
        Ok(path) => debug!("Loaded environment from {}", path.display()),
        Err(e) if e.not_found() => {}
        Err(e) => warn!("Ignoring unreadable .env file: {}", e),
    }
}

impl Config {
    /// Layered configuration: defaults, then the TOML file, then environment.
    pub fn figment(config_file: &str) -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(config_file))
            .merge(Env::raw().filter_map(|key| legacy_env_key(key.as_str()).map(Into::into)))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    pub fn load_from_file(config_file: &str) -> Result<Self> {
        load_dotenv();
        let config: Config = Self::figment(config_file)
            .extract()
            .with_context(|| format!("failed to load configuration from {}", config_file))?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values that would otherwise only fail once the server is running
    pub fn validate(&self) -> Result<()> {
        self.web.shutdown_timeout()?;
        self.metadata.request_timeout()?;
        if self.metadata.bchd_url.trim().is_empty() {
            anyhow::bail!("metadata.bchd_url must not be empty");
        }
        Ok(())
    }
}
