//! Configuration management for the dual-class arbitrage service.
//!
//! Loads settings from environment variables and config files.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// HTTP listener settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Cross-origin policy for the browser frontend
    #[serde(default)]
    pub cors: CorsConfig,
    /// Price lookup settings
    #[serde(default)]
    pub market_data: MarketDataConfig,
    /// Live algorithm results upstream
    #[serde(default)]
    pub live_results: LiveResultsConfig,
    /// Where API credentials are read from
    #[serde(default)]
    pub secrets: SecretsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind
    #[serde(default = "default_host")]
    pub host: String,
    /// TCP port to bind
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Exact origins allowed to call the API with credentials
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketDataConfig {
    /// Yahoo Finance query API base URL
    #[serde(default = "default_market_data_url")]
    pub base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_market_data_timeout")]
    pub timeout_secs: u64,
    /// History window searched when no live price is quoted (Yahoo range syntax)
    #[serde(default = "default_fallback_period")]
    pub fallback_period: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiveResultsConfig {
    /// QuantConnect REST API base URL
    #[serde(default = "default_live_results_url")]
    pub base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_live_results_timeout")]
    pub timeout_secs: u64,
}

/// Backend for secret lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SecretSource {
    /// Process environment, seeded from `.env` for local development
    #[default]
    Env,
    /// Managed secret store mounted as one file per secret
    Directory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecretsConfig {
    #[serde(default)]
    pub source: SecretSource,
    /// Mount point used when `source = "directory"`
    #[serde(default = "default_secrets_dir")]
    pub directory: PathBuf,
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_allowed_origins() -> Vec<String> {
    vec![
        "http://localhost:8000".to_string(),
        "https://dual-class-arbitrage.vercel.app".to_string(),
    ]
}

fn default_market_data_url() -> String {
    crate::market_data::yahoo::YAHOO_API_URL.to_string()
}

fn default_market_data_timeout() -> u64 {
    10
}

fn default_fallback_period() -> String {
    "2d".to_string() // Covers the previous session when the market is closed
}

fn default_live_results_url() -> String {
    crate::live::QUANTCONNECT_API_URL.to_string()
}

fn default_live_results_timeout() -> u64 {
    30
}

fn default_secrets_dir() -> PathBuf {
    PathBuf::from("/run/secrets")
}

impl Config {
    /// Load configuration from environment variables and config files.
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(config::File::with_name("config").required(false))
            .add_source(
                config::Environment::with_prefix("DCA")
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("cors.allowed_origins")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(self.server.port != 0, "server.port must be non-zero");

        anyhow::ensure!(
            !self.cors.allowed_origins.is_empty(),
            "cors.allowed_origins must list at least one origin"
        );

        anyhow::ensure!(
            !self.market_data.base_url.is_empty() && self.market_data.timeout_secs > 0,
            "market_data.base_url must be set and timeout_secs must be positive"
        );

        anyhow::ensure!(
            !self.live_results.base_url.is_empty() && self.live_results.timeout_secs > 0,
            "live_results.base_url must be set and timeout_secs must be positive"
        );

        anyhow::ensure!(
            self.secrets.source != SecretSource::Directory
                || !self.secrets.directory.as_os_str().is_empty(),
            "secrets.directory must be set when secrets.source = directory"
        );

        Ok(())
    }

    /// Socket address string for the HTTP listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: default_allowed_origins(),
        }
    }
}

impl Default for MarketDataConfig {
    fn default() -> Self {
        Self {
            base_url: default_market_data_url(),
            timeout_secs: default_market_data_timeout(),
            fallback_period: default_fallback_period(),
        }
    }
}

impl Default for LiveResultsConfig {
    fn default() -> Self {
        Self {
            base_url: default_live_results_url(),
            timeout_secs: default_live_results_timeout(),
        }
    }
}

impl Default for SecretsConfig {
    fn default() -> Self {
        Self {
            source: SecretSource::default(),
            directory: default_secrets_dir(),
        }
    }
}
