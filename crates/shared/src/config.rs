//! Configuration management for the list fetcher.
//!
//! This module handles loading and parsing configuration from TOML files,
//! with sensible defaults for all settings.

use crate::error::FetchError;
use crate::models::Service;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,

    /// HTTP client settings
    #[serde(default)]
    pub http: HttpConfig,

    /// Per-service settings
    #[serde(default)]
    pub services: ServicesConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log directory path
    pub log_dir: String,

    /// Default log level (trace, debug, info, warn, error)
    pub default_level: String,

    /// Enable console output
    pub console: bool,

    /// Enable file output
    pub file: bool,

    /// Enable JSON formatting for file logs
    pub json_format: bool,
}

/// HTTP client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// User agent sent with every request
    pub user_agent: String,
}

/// Service endpoints and pagination settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServicesConfig {
    /// Service used when a bare username is given without a service
    pub default_service: String,

    /// AniList GraphQL endpoint
    pub anilist_url: String,

    /// Kitsu API base URL (`/users` and `/library-entries` are appended)
    pub kitsu_base_url: String,

    /// MyAnimeList list URL, `{username}` is substituted
    pub myanimelist_url: String,

    pub kitsu: KitsuConfig,

    pub myanimelist: MyAnimeListConfig,
}

/// Kitsu pagination settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KitsuConfig {
    /// Library entries requested per page
    pub page_limit: u32,
}

/// MyAnimeList pagination and pacing settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MyAnimeListConfig {
    /// Entries returned per page by the list endpoint
    pub page_size: u32,

    /// Delay between consecutive list requests in milliseconds
    pub request_delay_ms: u64,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_dir: "logs".to_string(),
            default_level: "info".to_string(),
            console: true,
            file: false,
            json_format: false,
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            user_agent: concat!("list-fetcher/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl Default for ServicesConfig {
    fn default() -> Self {
        Self {
            default_service: Service::AniList.as_str().to_string(),
            anilist_url: "https://graphql.anilist.co".to_string(),
            kitsu_base_url: "https://kitsu.io/api/edge".to_string(),
            myanimelist_url: "https://myanimelist.net/animelist/{username}/load.json".to_string(),
            kitsu: KitsuConfig::default(),
            myanimelist: MyAnimeListConfig::default(),
        }
    }
}

impl Default for KitsuConfig {
    fn default() -> Self {
        Self { page_limit: 500 }
    }
}

impl Default for MyAnimeListConfig {
    fn default() -> Self {
        Self {
            page_size: 300,
            request_delay_ms: 2000,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// If the file doesn't exist, returns the default configuration.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            tracing::warn!(
                path = %path.display(),
                "Config file not found, using defaults"
            );
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        tracing::info!(
            path = %path.display(),
            "Configuration loaded successfully"
        );

        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        let content = toml::to_string_pretty(self)
            .context("Failed to serialize configuration")?;

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        tracing::info!(
            path = %path.display(),
            "Configuration saved successfully"
        );

        Ok(())
    }

    /// Parsed default service
    pub fn default_service(&self) -> std::result::Result<Service, FetchError> {
        self.services.default_service.parse().map_err(|_| {
            FetchError::Config(format!(
                "Unknown default service '{}'",
                self.services.default_service
            ))
        })
    }
}
