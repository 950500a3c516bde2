use std::time::Duration;

use serde::Deserialize;

use crate::infrastructure::observability::ObservabilityConfig;

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub storage: StorageConfig,
    pub cache: CacheConfig,
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Where customer records live
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    #[serde(alias = "in_memory", alias = "inmemory")]
    Memory,
    Postgres,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// Falls back to the `DATABASE_URL` environment variable
    pub database_url: Option<String>,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout_secs: u64,
    /// Create the customers table on startup when missing
    pub ensure_schema: bool,
    /// Load sample Northwind customers into the in-memory backend
    pub seed_sample_data: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub max_capacity: u64,
    /// Idle time after which a cached customer is dropped
    pub sliding_expiration_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            database_url: None,
            max_connections: 10,
            min_connections: 1,
            connect_timeout_secs: 30,
            ensure_schema: true,
            seed_sample_data: true,
        }
    }
}

impl StorageConfig {
    /// Configured URL, else `DATABASE_URL`
    pub fn resolve_database_url(&self) -> Option<String> {
        self.database_url
            .clone()
            .filter(|url| !url.is_empty())
            .or_else(|| std::env::var("DATABASE_URL").ok())
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_capacity: 10_000,
            sliding_expiration_secs: 30 * 60,
        }
    }
}

impl CacheConfig {
    pub fn sliding_expiration(&self) -> Duration {
        Duration::from_secs(self.sliding_expiration_secs)
    }
}

impl AppConfig {
    /// Load `config/default`, then `config/local`, then `APP__*` variables
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from(environment())
    }

    fn load_from(environment: config::Environment) -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(environment)
            .build()?;

        config.try_deserialize()
    }
}

fn environment() -> config::Environment {
    config::Environment::with_prefix("APP")
        .separator("__")
        .try_parsing(true)
}
