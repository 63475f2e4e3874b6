//! Configuration management for the Warehouse Operations Console
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with WHC_ prefix

use config::{ConfigError, Environment, File};
use serde::Deserialize;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// External inventory API
    pub api: ApiConfig,

    /// Identity provider used for bearer tokens
    pub auth: AuthConfig,

    /// Reporting defaults
    pub reports: ReportsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    /// Base URL of the external inventory API
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout_seconds: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    /// Token endpoint of the identity provider
    pub token_url: String,

    /// Client credentials
    pub client_id: String,
    pub client_secret: String,

    /// Audience the token is requested for
    pub audience: String,

    /// Claim namespace prefixing the roles/permissions arrays
    pub claims_namespace: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReportsConfig {
    /// Default trailing window, in days
    pub window_days: i64,

    /// Default result size for ranked reports
    pub top_n: usize,

    /// When set, finished report rows are also written there as CSV
    #[serde(default)]
    pub export_dir: Option<String>,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment = std::env::var("WHC_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("api.base_url", "http://localhost:8000")?
            .set_default("api.timeout_seconds", 30)?
            .set_default("auth.claims_namespace", "https://warehouse-console/")?
            .set_default("reports.window_days", 30)?
            .set_default("reports.top_n", 10)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (WHC_ prefix)
            .add_source(
                Environment::with_prefix("WHC")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

impl Default for ReportsConfig {
    fn default() -> Self {
        Self {
            window_days: 30,
            top_n: 10,
            export_dir: None,
        }
    }
}
