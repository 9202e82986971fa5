//! # Configuration
//!
//! Application configuration loading and management.
//!
//! This module provides configuration structures and loading mechanisms
//! for the trade negotiation service, supporting both environment
//! variables and configuration files.
//!
//! # Configuration Sources
//!
//! Configuration is loaded in the following order (later sources override earlier):
//! 1. Default values
//! 2. Configuration file (if exists)
//! 3. Environment variables (prefixed with `LEAGUE_TRADES_`)
//!
//! # Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `LEAGUE_TRADES_REST_HOST` | REST server host | `0.0.0.0` |
//! | `LEAGUE_TRADES_REST_PORT` | REST server port | `8080` |
//! | `LEAGUE_TRADES_LOG_LEVEL` | Log level | `info` |
//! | `LEAGUE_TRADES_LOG_FORMAT` | Log format (json/pretty) | `json` |
//! | `LEAGUE_TRADES_DATABASE_URL` | Postgres URL | `postgres://localhost/league_trades` |
//! | `LEAGUE_TRADES_JWT_SECRET` | JWT signing secret | `change-me` |
//! | `LEAGUE_TRADES_ANNOUNCE_CHANNEL` | League chat channel | `trade-announcements` |
//! | `LEAGUE_TRADES_CHAT_WEBHOOK_URL` | Chat webhook endpoint | unset |
//!
//! # Examples
//!
//! ```ignore
//! use league_trades::config::AppConfig;
//!
//! let config = AppConfig::load()?;
//! println!("REST server: {}:{}", config.rest.host, config.rest.port);
//! ```

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;
use thiserror::Error;

// ============================================================================
// Configuration Errors
// ============================================================================

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse configuration.
    #[error("failed to parse config: {0}")]
    Parse(String),

    /// Invalid configuration value.
    #[error("invalid config value for {field}: {message}")]
    InvalidValue {
        /// Field name.
        field: String,
        /// Error message.
        message: String,
    },
}

// ============================================================================
// Server Configuration
// ============================================================================

/// REST/HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestConfig {
    /// Server host address.
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port.
    #[serde(default = "default_rest_port")]
    pub port: u16,

    /// Enable CORS.
    #[serde(default = "default_true")]
    pub enable_cors: bool,
}

impl Default for RestConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_rest_port(),
            enable_cors: true,
        }
    }
}

impl RestConfig {
    /// Returns the socket address for the REST server.
    ///
    /// # Errors
    ///
    /// Returns an error if the address cannot be parsed.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| ConfigError::InvalidValue {
                field: "rest.host:port".to_string(),
                message: format!("{e}"),
            })
    }
}

// ============================================================================
// Logging Configuration
// ============================================================================

/// Log format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// JSON format (structured logging).
    #[default]
    Json,
    /// Pretty format (human-readable).
    Pretty,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format.
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::Json,
        }
    }
}

// ============================================================================
// Database Configuration
// ============================================================================

/// Database configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database URL.
    #[serde(default = "default_database_url")]
    pub url: String,

    /// Maximum connection pool size.
    #[serde(default = "default_pool_size")]
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            max_connections: default_pool_size(),
        }
    }
}

// ============================================================================
// Queue Configuration
// ============================================================================

/// Delivery queue and worker configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueConfig {
    /// Maximum unacked messages per queue (backpressure window).
    #[serde(default = "default_prefetch")]
    pub prefetch: usize,

    /// Worker poll interval in milliseconds.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Messages pulled per worker pass.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// League chat channel for trade announcements.
    #[serde(default = "default_announce_channel")]
    pub announce_channel: String,

    /// Chat webhook endpoint; when unset the chat worker logs instead.
    #[serde(default)]
    pub chat_webhook_url: Option<String>,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            prefetch: default_prefetch(),
            poll_interval_ms: default_poll_interval_ms(),
            batch_size: default_batch_size(),
            announce_channel: default_announce_channel(),
            chat_webhook_url: None,
        }
    }
}

// ============================================================================
// Scheduler Configuration
// ============================================================================

/// Scheduled job configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Job repeat interval in seconds.
    #[serde(default = "default_run_interval")]
    pub run_interval_secs: u64,

    /// Per-run stall budget in seconds.
    #[serde(default = "default_stall_timeout")]
    pub stall_timeout_secs: u64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            run_interval_secs: default_run_interval(),
            stall_timeout_secs: default_stall_timeout(),
        }
    }
}

// ============================================================================
// Auth Configuration
// ============================================================================

/// JWT authentication configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// HMAC secret for token validation.
    #[serde(default = "default_jwt_secret")]
    pub secret: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: default_jwt_secret(),
        }
    }
}

// ============================================================================
// Application Configuration
// ============================================================================

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// REST server configuration.
    #[serde(default)]
    pub rest: RestConfig,

    /// Logging configuration.
    #[serde(default)]
    pub log: LogConfig,

    /// Database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Delivery queue configuration.
    #[serde(default)]
    pub queue: QueueConfig,

    /// Scheduled job configuration.
    #[serde(default)]
    pub scheduler: SchedulerConfig,

    /// JWT authentication configuration.
    #[serde(default)]
    pub auth: JwtConfig,

    /// Service name for tracing.
    #[serde(default = "default_service_name")]
    pub service_name: String,

    /// Environment (development, staging, production).
    #[serde(default = "default_environment")]
    pub environment: String,
}

impl AppConfig {
    /// Loads configuration from environment variables and optional config file.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading fails.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        // Try to load from config file if it exists
        let config_path = std::env::var("LEAGUE_TRADES_CONFIG_FILE")
            .unwrap_or_else(|_| "config.toml".to_string());

        if Path::new(&config_path).exists() {
            config = Self::from_file(&config_path)?;
        }

        // Override with environment variables
        config.apply_env_overrides();

        Ok(config)
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Applies environment variable overrides to the configuration.
    fn apply_env_overrides(&mut self) {
        // REST configuration
        if let Ok(host) = std::env::var("LEAGUE_TRADES_REST_HOST") {
            self.rest.host = host;
        }
        if let Ok(port) = std::env::var("LEAGUE_TRADES_REST_PORT")
            && let Ok(p) = port.parse()
        {
            self.rest.port = p;
        }

        // Logging configuration
        if let Ok(level) = std::env::var("LEAGUE_TRADES_LOG_LEVEL") {
            self.log.level = level;
        }
        if let Ok(format) = std::env::var("LEAGUE_TRADES_LOG_FORMAT") {
            self.log.format = match format.to_lowercase().as_str() {
                "pretty" => LogFormat::Pretty,
                _ => LogFormat::Json,
            };
        }

        // Database configuration
        if let Ok(url) = std::env::var("LEAGUE_TRADES_DATABASE_URL") {
            self.database.url = url;
        }

        // Queue configuration
        if let Ok(channel) = std::env::var("LEAGUE_TRADES_ANNOUNCE_CHANNEL") {
            self.queue.announce_channel = channel;
        }
        if let Ok(url) = std::env::var("LEAGUE_TRADES_CHAT_WEBHOOK_URL") {
            self.queue.chat_webhook_url = Some(url);
        }

        // Auth configuration
        if let Ok(secret) = std::env::var("LEAGUE_TRADES_JWT_SECRET") {
            self.auth.secret = secret;
        }

        // Service configuration
        if let Ok(name) = std::env::var("LEAGUE_TRADES_SERVICE_NAME") {
            self.service_name = name;
        }
        if let Ok(env) = std::env::var("LEAGUE_TRADES_ENVIRONMENT") {
            self.environment = env;
        }
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        // Validate REST address
        self.rest.socket_addr()?;

        // Validate log level
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log.level.to_lowercase().as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "log.level".to_string(),
                message: format!(
                    "invalid log level '{}', must be one of: {:?}",
                    self.log.level, valid_levels
                ),
            });
        }

        if self.queue.prefetch == 0 {
            return Err(ConfigError::InvalidValue {
                field: "queue.prefetch".to_string(),
                message: "prefetch must be at least 1".to_string(),
            });
        }
        if self.queue.batch_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "queue.batch_size".to_string(),
                message: "batch_size must be at least 1".to_string(),
            });
        }

        Ok(())
    }
}

// ============================================================================
// Default Value Functions
// ============================================================================

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_rest_port() -> u16 {
    8080
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_database_url() -> String {
    "postgres://localhost/league_trades".to_string()
}

fn default_pool_size() -> u32 {
    10
}

fn default_prefetch() -> usize {
    32
}

fn default_poll_interval_ms() -> u64 {
    250
}

fn default_batch_size() -> usize {
    16
}

fn default_announce_channel() -> String {
    "trade-announcements".to_string()
}

fn default_run_interval() -> u64 {
    300
}

fn default_stall_timeout() -> u64 {
    60
}

fn default_jwt_secret() -> String {
    "change-me".to_string()
}

fn default_service_name() -> String {
    "league-trades".to_string()
}

fn default_environment() -> String {
    "development".to_string()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn app_config_default() {
        let config = AppConfig::default();
        assert_eq!(config.rest.port, 8080);
        assert_eq!(config.log.level, "info");
        assert_eq!(config.queue.prefetch, 32);
        assert_eq!(config.queue.announce_channel, "trade-announcements");
    }

    #[test]
    fn rest_config_socket_addr() {
        let config = RestConfig::default();
        let addr = config.socket_addr().unwrap();
        assert_eq!(addr.port(), 8080);
    }

    #[test]
    fn log_format_default() {
        let format = LogFormat::default();
        assert_eq!(format, LogFormat::Json);
    }

    #[test]
    fn app_config_validate_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn app_config_validate_invalid_log_level() {
        let mut config = AppConfig::default();
        config.log.level = "invalid".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn app_config_validate_zero_prefetch() {
        let mut config = AppConfig::default();
        config.queue.prefetch = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rest_config_invalid_address() {
        let config = RestConfig {
            host: "invalid host with spaces".to_string(),
            ..Default::default()
        };
        assert!(config.socket_addr().is_err());
    }

    #[test]
    fn parses_toml_sections() {
        let toml = r#"
            [rest]
            port = 9090

            [queue]
            prefetch = 8
            announce_channel = "league-hq"

            [auth]
            secret = "s3cret"
        "#;
        let config: AppConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.rest.port, 9090);
        assert_eq!(config.queue.prefetch, 8);
        assert_eq!(config.queue.announce_channel, "league-hq");
        assert_eq!(config.auth.secret, "s3cret");
        assert_eq!(config.scheduler.run_interval_secs, 300);
    }
}
