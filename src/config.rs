//! Configuration management for the `tripwindow` service
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::TripError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure for the `tripwindow` service
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// Web server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Weather API configuration
    #[serde(default)]
    pub weather: WeatherConfig,
    /// Persistent store configuration
    #[serde(default)]
    pub store: StoreConfig,
    /// Window search configuration
    #[serde(default)]
    pub search: SearchConfig,
}

/// Web server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Port the API listens on
    #[serde(default = "default_server_port")]
    pub port: u16,
}

/// Weather API configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// Base URL for the forecast API
    #[serde(default = "default_weather_base_url")]
    pub base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_weather_timeout")]
    pub timeout_seconds: u32,
}

/// Persistent store settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Store directory location
    #[serde(default = "default_store_path")]
    pub path: String,
    /// Whether to seed demo data into an empty store at startup
    #[serde(default = "default_store_seed_demo")]
    pub seed_demo: bool,
}

/// Window search settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Lookahead horizon for candidate start dates, in days
    #[serde(default = "default_search_horizon")]
    pub horizon_days: u32,
}

// Default value functions
fn default_server_port() -> u16 {
    8000
}

fn default_weather_base_url() -> String {
    "https://api.open-meteo.com/v1".to_string()
}

fn default_weather_timeout() -> u32 {
    30
}

fn default_store_path() -> String {
    "data/tripwindow".to_string()
}

fn default_store_seed_demo() -> bool {
    true
}

fn default_search_horizon() -> u32 {
    30
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_server_port(),
        }
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            base_url: default_weather_base_url(),
            timeout_seconds: default_weather_timeout(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
            seed_demo: default_store_seed_demo(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            horizon_days: default_search_horizon(),
        }
    }
}

impl AppConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| PathBuf::from("config.toml"));
        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // Environment variable overrides, e.g. TRIPWINDOW_SERVER__PORT
        builder = builder.add_source(
            Environment::with_prefix("TRIPWINDOW")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let config: AppConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.validate()?;

        Ok(config)
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.weather.timeout_seconds == 0 || self.weather.timeout_seconds > 300 {
            return Err(TripError::config(
                "Weather API timeout must be between 1 and 300 seconds",
            )
            .into());
        }

        if self.search.horizon_days == 0 || self.search.horizon_days > 90 {
            return Err(TripError::config(
                "Search horizon must be between 1 and 90 days",
            )
            .into());
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        if !self.weather.base_url.starts_with("http://")
            && !self.weather.base_url.starts_with("https://")
        {
            return Err(TripError::config(
                "Weather API base URL must be a valid HTTP or HTTPS URL",
            )
            .into());
        }

        if self.store.path.is_empty() {
            return Err(TripError::config("Store path cannot be empty").into());
        }

        Ok(())
    }
}
