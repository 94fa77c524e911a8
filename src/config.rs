//! Configuration module for the carrier gateway.
//!
//! Loads configuration from YAML files and environment variables.

use config::{Config as ConfigLoader, ConfigError, Environment, File};
use serde::Deserialize;

use crate::auth::ConfiguredApiKey;

/// Root configuration structure.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub carrier: CarrierConfig,
    #[serde(default)]
    pub auth: AuthConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Carrier API configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CarrierConfig {
    /// Base URL of the carrier API, without trailing slash.
    pub base_url: String,
    /// OAuth client id.
    pub client_id: String,
    /// OAuth client secret.
    pub client_secret: String,
    /// Shipper account number. Enables negotiated rates and is required for shipping.
    #[serde(default)]
    pub account_number: Option<String>,
    #[serde(default = "default_rating_version")]
    pub rating_version: String,
    #[serde(default = "default_shipping_version")]
    pub shipping_version: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Service codes queried as ground-saver rates.
    #[serde(default = "default_ground_saver_codes")]
    pub ground_saver_codes: Vec<String>,
}

fn default_rating_version() -> String {
    "v2409".to_string()
}

fn default_shipping_version() -> String {
    "v2409".to_string()
}

fn default_timeout_secs() -> u64 {
    15
}

fn default_ground_saver_codes() -> Vec<String> {
    vec!["93".to_string(), "92".to_string()]
}

/// Inbound API key authentication.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub api_keys: Vec<ConfiguredApiKey>,
}

impl Config {
    /// Load configuration from files and environment.
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (GATEWAY__*)
    /// 2. config/local.yaml (if exists)
    /// 3. config/default.yaml
    pub fn load() -> Result<Self, ConfigError> {
        let config = ConfigLoader::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(
                Environment::with_prefix("GATEWAY")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

impl CarrierConfig {
    /// Create a config pointing at `base_url` with default versions and codes.
    pub fn new(
        base_url: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            account_number: None,
            rating_version: default_rating_version(),
            shipping_version: default_shipping_version(),
            timeout_secs: default_timeout_secs(),
            ground_saver_codes: default_ground_saver_codes(),
        }
    }

    /// Set the shipper account number.
    #[must_use]
    pub fn with_account_number(mut self, account_number: impl Into<String>) -> Self {
        self.account_number = Some(account_number.into());
        self
    }
}
