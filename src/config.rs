//! Configuration management for the JanmaBhoomi explorer
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::ExplorerError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure for the explorer
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplorerConfig {
    /// Wikipedia endpoints
    pub encyclopedia: EncyclopediaConfig,
    /// Reverse geocoding service
    pub geocoding: GeocodingConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
    /// HTTP API settings
    pub server: ServerConfig,
    /// Default application settings
    pub defaults: DefaultsConfig,
}

/// Wikipedia REST and action API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EncyclopediaConfig {
    /// Base URL of the REST API (page summaries)
    pub rest_base_url: String,
    /// Action API endpoint (page images)
    pub api_base_url: String,
    /// Article base URL used for hyperlinks
    pub wiki_base_url: String,
    /// Thumbnail width requested from the page image API
    pub thumbnail_size: u32,
    /// Request timeout in seconds
    pub timeout_seconds: u32,
    /// User agent sent with every request
    pub user_agent: String,
}

/// Reverse geocoding settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeocodingConfig {
    /// Nominatim base URL
    pub base_url: String,
    /// Nominatim requires an identifying user agent
    pub user_agent: String,
    /// Request timeout in seconds
    pub timeout_seconds: u32,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    pub level: String,
    /// Log format (pretty or json)
    pub format: String,
}

/// HTTP API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Default application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    /// Language used when none is given (english, telugu, hindi)
    pub language: String,
    /// Directory receiving downloaded knowledge cards
    pub output_dir: String,
}

// Default value functions
fn default_rest_base_url() -> String {
    "https://en.wikipedia.org/api/rest_v1".to_string()
}

fn default_api_base_url() -> String {
    "https://en.wikipedia.org/w/api.php".to_string()
}

fn default_wiki_base_url() -> String {
    "https://en.wikipedia.org/wiki/".to_string()
}

fn default_thumbnail_size() -> u32 {
    600
}

fn default_timeout() -> u32 {
    30
}

fn default_user_agent() -> String {
    format!("JanmaBhoomi/{}", crate::VERSION)
}

fn default_geocoding_base_url() -> String {
    "https://nominatim.openstreetmap.org".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_language() -> String {
    "english".to_string()
}

fn default_output_dir() -> String {
    ".".to_string()
}

impl Default for EncyclopediaConfig {
    fn default() -> Self {
        Self {
            rest_base_url: default_rest_base_url(),
            api_base_url: default_api_base_url(),
            wiki_base_url: default_wiki_base_url(),
            thumbnail_size: default_thumbnail_size(),
            timeout_seconds: default_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            base_url: default_geocoding_base_url(),
            user_agent: default_user_agent(),
            timeout_seconds: default_timeout(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
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

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            language: default_language(),
            output_dir: default_output_dir(),
        }
    }
}

impl ExplorerConfig {
    /// Load configuration from the given file, or the default locations,
    /// then from environment variables
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path()
                .filter(|path| path.exists())
                .unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // JANMABHOOMI_ENCYCLOPEDIA__TIMEOUT_SECONDS=10 and friends
        builder = builder.add_source(
            Environment::with_prefix("JANMABHOOMI")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: ExplorerConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("janmabhoomi").join("config.toml"))
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        if self.encyclopedia.rest_base_url.is_empty() {
            self.encyclopedia.rest_base_url = default_rest_base_url();
        }
        if self.encyclopedia.api_base_url.is_empty() {
            self.encyclopedia.api_base_url = default_api_base_url();
        }
        if self.encyclopedia.wiki_base_url.is_empty() {
            self.encyclopedia.wiki_base_url = default_wiki_base_url();
        }
        if self.encyclopedia.thumbnail_size == 0 {
            self.encyclopedia.thumbnail_size = default_thumbnail_size();
        }
        if self.encyclopedia.timeout_seconds == 0 {
            self.encyclopedia.timeout_seconds = default_timeout();
        }
        if self.encyclopedia.user_agent.is_empty() {
            self.encyclopedia.user_agent = default_user_agent();
        }
        if self.geocoding.base_url.is_empty() {
            self.geocoding.base_url = default_geocoding_base_url();
        }
        if self.geocoding.user_agent.is_empty() {
            self.geocoding.user_agent = default_user_agent();
        }
        if self.geocoding.timeout_seconds == 0 {
            self.geocoding.timeout_seconds = default_timeout();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
        if self.server.host.is_empty() {
            self.server.host = default_host();
        }
        if self.defaults.language.is_empty() {
            self.defaults.language = default_language();
        }
        if self.defaults.output_dir.is_empty() {
            self.defaults.output_dir = default_output_dir();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.encyclopedia.timeout_seconds > 300 || self.geocoding.timeout_seconds > 300 {
            return Err(
                ExplorerError::config("Request timeout cannot exceed 300 seconds").into(),
            );
        }

        if !(1..=2000).contains(&self.encyclopedia.thumbnail_size) {
            return Err(ExplorerError::config(
                "Thumbnail size must be between 1 and 2000 pixels",
            )
            .into());
        }

        if self.server.port == 0 {
            return Err(ExplorerError::config("Server port cannot be 0").into());
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(ExplorerError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(ExplorerError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        let urls = [
            ("Encyclopedia REST", &self.encyclopedia.rest_base_url),
            ("Encyclopedia API", &self.encyclopedia.api_base_url),
            ("Encyclopedia wiki", &self.encyclopedia.wiki_base_url),
            ("Geocoding", &self.geocoding.base_url),
        ];
        for (name, url) in urls {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ExplorerError::config(format!(
                    "{name} base URL must be a valid HTTP or HTTPS URL"
                ))
                .into());
            }
        }

        self.defaults
            .language
            .parse::<crate::models::Language>()
            .map_err(|e| ExplorerError::config(e.to_string()))?;

        Ok(())
    }
}
