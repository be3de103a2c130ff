//! Configuration management for cardweb
//!
//! This module handles loading, validation, and management of
//! cardweb configuration from YAML files.

pub mod error;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub use error::ConfigError;

// ==================== Configuration Types ====================

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,
    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    4343
}

/// Data file configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Path to the series YAML file being edited
    #[serde(default = "default_tv_file")]
    pub tv_file: PathBuf,
    /// Root directory offered by the font browser
    #[serde(default = "default_font_directory")]
    pub font_directory: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            tv_file: default_tv_file(),
            font_directory: default_font_directory(),
        }
    }
}

fn default_tv_file() -> PathBuf {
    PathBuf::from("/config/tv.yml")
}

fn default_font_directory() -> PathBuf {
    PathBuf::from("/config/fonts")
}

/// Plex connection settings for series search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlexConfig {
    /// Whether Plex search is available
    #[serde(default)]
    pub enabled: bool,
    /// Plex server base URL
    #[serde(default = "default_plex_url")]
    pub url: String,
    /// X-Plex-Token used for API requests
    #[serde(default)]
    pub token: String,
    /// Maximum number of search results returned
    #[serde(default = "default_search_limit")]
    pub search_limit: usize,
}

impl Default for PlexConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            url: default_plex_url(),
            token: String::new(),
            search_limit: default_search_limit(),
        }
    }
}

fn default_plex_url() -> String {
    "http://localhost:32400".to_string()
}

fn default_search_limit() -> usize {
    15
}

/// Preview renderer settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewConfig {
    /// Renderer command line; `{yaml}` and `{output}` are substituted.
    /// Empty means preview is disabled.
    #[serde(default)]
    pub command: String,
    /// File extension of the image the renderer produces
    #[serde(default = "default_output_format")]
    pub output_format: String,
    /// Renderer timeout in seconds
    #[serde(default = "default_preview_timeout")]
    pub timeout_secs: u64,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            command: String::new(),
            output_format: default_output_format(),
            timeout_secs: default_preview_timeout(),
        }
    }
}

fn default_output_format() -> String {
    "jpg".to_string()
}

fn default_preview_timeout() -> u64 {
    120
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Server settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Data file settings
    #[serde(default)]
    pub data: DataConfig,
    /// Plex search settings
    #[serde(default)]
    pub plex: PlexConfig,
    /// Preview renderer settings
    #[serde(default)]
    pub preview: PreviewConfig,
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn load(path: PathBuf) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(&path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        let config: Config =
            serde_yaml::from_str(&content).map_err(|_| ConfigError::InvalidYaml)?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.port".to_string(),
                reason: "Port must be greater than 0".to_string(),
            });
        }

        if self.plex.search_limit == 0 || self.plex.search_limit > 100 {
            return Err(ConfigError::InvalidValue {
                field: "plex.search_limit".to_string(),
                reason: "Search limit must be between 1 and 100".to_string(),
            });
        }

        if self.plex.enabled && self.plex.token.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "plex.token".to_string(),
                reason: "A token is required when Plex search is enabled".to_string(),
            });
        }

        if self.preview.timeout_secs == 0 || self.preview.timeout_secs > 600 {
            return Err(ConfigError::InvalidValue {
                field: "preview.timeout_secs".to_string(),
                reason: "Preview timeout must be between 1 and 600 seconds".to_string(),
            });
        }

        Ok(())
    }

    /// Whether the preview renderer is configured
    pub fn preview_enabled(&self) -> bool {
        !self.preview.command.trim().is_empty()
    }
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.server.port, 4343);
        assert_eq!(config.data.font_directory, PathBuf::from("/config/fonts"));
        assert!(!config.preview_enabled());
    }

    #[test]
    fn test_parse_partial_yaml() {
        let yaml = "server:\n  port: 9090\ndata:\n  tv_file: ./tv.yml\n";
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.data.tv_file, PathBuf::from("./tv.yml"));
    }

    #[test]
    fn test_validate_rejects_zero_port() {
        let mut config = Config::default();
        config.server.port = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { field, .. }) if field == "server.port"
        ));
    }

    #[test]
    fn test_validate_rejects_enabled_plex_without_token() {
        let mut config = Config::default();
        config.plex.enabled = true;
        config.plex.token = String::new();
        assert!(config.validate().is_err());

        config.plex.token = "abc123".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_out_of_range_limits() {
        let mut config = Config::default();
        config.plex.search_limit = 0;
        assert!(config.validate().is_err());

        config.plex.search_limit = 500;
        assert!(config.validate().is_err());

        config.plex.search_limit = 15;
        config.preview.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_preview_enabled() {
        let mut config = Config::default();
        assert!(!config.preview_enabled());
        config.preview.command = "render {yaml} {output}".to_string();
        assert!(config.preview_enabled());
    }
}
