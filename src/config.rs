use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::core::RatingStrategy;

/// Application configuration
///
/// Built once at startup and handed to whatever needs it; nothing reads
/// configuration from a global.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub database: DatabaseSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
    #[serde(default)]
    pub rating: RatingSettings,
    #[serde(default)]
    pub reviews: ReviewSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
    #[serde(default = "default_shutdown_timeout_secs")]
    pub shutdown_timeout_secs: u64,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
            shutdown_timeout_secs: default_shutdown_timeout_secs(),
        }
    }
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }
fn default_shutdown_timeout_secs() -> u64 { 5 }

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_acquire_timeout_secs")]
    pub acquire_timeout_secs: u64,
    #[serde(default = "default_statement_timeout_ms")]
    pub statement_timeout_ms: u64,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            acquire_timeout_secs: default_acquire_timeout_secs(),
            statement_timeout_ms: default_statement_timeout_ms(),
        }
    }
}

fn default_max_connections() -> u32 { 10 }
fn default_min_connections() -> u32 { 1 }
fn default_acquire_timeout_secs() -> u64 { 10 }
fn default_statement_timeout_ms() -> u64 { 5000 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "error".to_string() }
fn default_log_format() -> String { "compact".to_string() }

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RatingSettings {
    #[serde(default)]
    pub strategy: RatingStrategy,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReviewSettings {
    #[serde(default = "default_recent_limit")]
    pub recent_limit: i64,
}

impl Default for ReviewSettings {
    fn default() -> Self {
        Self {
            recent_limit: default_recent_limit(),
        }
    }
}

fn default_recent_limit() -> i64 { 6 }

/// Plain environment variables mapped onto config keys
const PLAIN_ENV_OVERRIDES: &[(&str, &str)] = &[
    ("PORT", "server.port"),
    ("LOG_LEVEL", "logging.level"),
    ("LOG_FORMAT", "logging.format"),
    ("DATABASE_URL", "database.url"),
];

impl Settings {
    /// Load configuration from files and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration files (config/default, config/local)
    /// 3. Environment variables prefixed with RATER_
    ///    e.g., RATER__SERVER__PORT -> server.port
    /// 4. PORT, LOG_LEVEL, LOG_FORMAT and DATABASE_URL
    pub fn load() -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(
                Environment::with_prefix("RATER")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            );

        for (var, key) in PLAIN_ENV_OVERRIDES {
            if let Ok(value) = std::env::var(var) {
                builder = builder.set_override(*key, value)?;
            }
        }

        Self::from_config(builder.build()?)
    }

    /// Deserialize and check an already assembled configuration
    pub fn from_config(config: Config) -> Result<Self, ConfigError> {
        let settings: Settings = config.try_deserialize()?;

        if settings.database.url.trim().is_empty() {
            return Err(ConfigError::Message(
                "database url is not configured (set DATABASE_URL)".to_string(),
            ));
        }

        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_with_database_url() {
        let config = Config::builder()
            .set_override("database.url", "postgres://rater@localhost/rater")
            .unwrap()
            .build()
            .unwrap();

        let settings = Settings::from_config(config).unwrap();
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.server.shutdown_timeout_secs, 5);
        assert_eq!(settings.database.max_connections, 10);
        assert_eq!(settings.logging.level, "error");
        assert_eq!(settings.rating.strategy, RatingStrategy::ReadModifyWrite);
        assert_eq!(settings.reviews.recent_limit, 6);
    }

    #[test]
    fn test_missing_database_url_is_fatal() {
        let config = Config::builder().build().unwrap();
        assert!(Settings::from_config(config).is_err());
    }

    #[test]
    fn test_atomic_strategy_parses() {
        let config = Config::builder()
            .set_override("database.url", "postgres://rater@localhost/rater")
            .unwrap()
            .set_override("rating.strategy", "atomic")
            .unwrap()
            .set_override("server.port", 9000)
            .unwrap()
            .build()
            .unwrap();

        let settings = Settings::from_config(config).unwrap();
        assert_eq!(settings.rating.strategy, RatingStrategy::Atomic);
        assert_eq!(settings.server.port, 9000);
    }
}
