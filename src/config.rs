//! Application configuration
//!
//! Loaded from a TOML file, then overridden by environment variables
//! (optionally seeded from `config.env` / `.env`). Every section has
//! defaults, so an absent file or a partial file is valid.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::query::{CountScope, DEFAULT_LIMIT};
use crate::infrastructure::database::{DatabaseConfig, DEFAULT_DATABASE_URL};
use crate::infrastructure::geocoding::StaticPlace;

/// `database.url` value that selects the in-process store
pub const MEMORY_DATABASE_URL: &str = "memory";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// `development` turns on per-request HTTP tracing
    pub environment: String,
    pub request_timeout_secs: u64,
    /// Seconds to wait for in-flight work on shutdown
    pub shutdown_timeout: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            environment: "development".to_string(),
            request_timeout_secs: 30,
            shutdown_timeout: 10,
        }
    }
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn is_development(&self) -> bool {
        self.environment.eq_ignore_ascii_case("development")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    /// SeaORM connection URL, or `memory`
    pub url: String,
    pub max_connections: u32,
    pub connect_timeout_secs: u64,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            url: DEFAULT_DATABASE_URL.to_string(),
            max_connections: 10,
            connect_timeout_secs: 8,
        }
    }
}

impl DatabaseSettings {
    pub fn is_memory(&self) -> bool {
        self.url.trim().eq_ignore_ascii_case(MEMORY_DATABASE_URL)
    }

    pub fn to_database_config(&self) -> DatabaseConfig {
        DatabaseConfig {
            url: self.url.clone(),
            max_connections: self.max_connections,
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeocoderConfig {
    /// `mapquest` or `static`
    pub provider: String,
    pub api_key: Option<String>,
    /// Override for the provider endpoint
    pub base_url: Option<String>,
    pub timeout_secs: u64,
    /// Lookup table for the `static` provider
    pub places: Vec<StaticPlace>,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            provider: "mapquest".to_string(),
            api_key: None,
            base_url: None,
            timeout_secs: 10,
            places: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PaginationConfig {
    pub default_limit: u64,
    pub count_scope: CountScope,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_LIMIT,
            count_scope: CountScope::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, e.g. `info` or `devcamper=debug,sqlx=warn`
    pub level: String,
    /// `text` or `json`
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseSettings,
    pub geocoder: GeocoderConfig,
    pub pagination: PaginationConfig,
    pub logging: LoggingConfig,
    /// Dotenv files applied by [`AppConfig::load`], for logging once tracing is up
    #[serde(skip)]
    pub env_files: Vec<PathBuf>,
}

impl AppConfig {
    /// Read `path` (a missing file means defaults), then apply env overrides
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let env_files = load_dotenv(&[PathBuf::from("config.env"), PathBuf::from(".env")]);

        let mut config = if path.exists() {
            let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            Self::from_toml(&raw).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?
        } else {
            Self::default()
        };

        config.env_files = env_files;
        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }

    /// Apply overrides from any variable source
    pub fn apply_env_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(port) = var("PORT").and_then(|v| v.trim().parse().ok()) {
            self.server.port = port;
        }
        if let Some(host) = var("HOST") {
            self.server.host = host;
        }
        if let Some(env) = var("APP_ENV") {
            self.server.environment = env;
        }
        if let Some(url) = var("DATABASE_URL") {
            self.database.url = url;
        }
        if let Some(provider) = var("GEOCODER_PROVIDER") {
            self.geocoder.provider = provider;
        }
        if let Some(key) = var("GEOCODER_API_KEY") {
            self.geocoder.api_key = Some(key);
        }
        if let Some(level) = var("LOG_LEVEL") {
            self.logging.level = level;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pagination.default_limit == 0 {
            return Err(ConfigError::Invalid(
                "pagination.default_limit must be at least 1".to_string(),
            ));
        }
        if self.server.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "server.request_timeout_secs must be at least 1".to_string(),
            ));
        }
        if self.database.url.trim().is_empty() {
            return Err(ConfigError::Invalid("database.url is empty".to_string()));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.server.request_timeout_secs)
    }
}

/// `$DEVCAMPER_CONFIG`, else `<config dir>/devcamper/config.toml`
pub fn default_config_path() -> PathBuf {
    if let Ok(path) = std::env::var("DEVCAMPER_CONFIG") {
        return PathBuf::from(path);
    }
    dirs_next::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("devcamper")
        .join("config.toml")
}

/// Seed the process environment from `files` in order and return the ones
/// found. Variables already set are never overwritten.
fn load_dotenv(files: &[PathBuf]) -> Vec<PathBuf> {
    files
        .iter()
        .filter_map(|file| dotenvy::from_filename(file).ok())
        .collect()
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn partial_file_keeps_defaults() {
        let config = AppConfig::from_toml(
            r#"
            [server]
            port = 8080

            [pagination]
            count_scope = "collection"
            "#,
        )
        .unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.pagination.count_scope, CountScope::Collection);
        assert_eq!(config.pagination.default_limit, DEFAULT_LIMIT);
        assert_eq!(config.logging.format, "text");
    }

    #[test]
    fn static_places_parse() {
        let config = AppConfig::from_toml(
            r#"
            [geocoder]
            provider = "static"

            [[geocoder.places]]
            query = "02118"
            lng = -71.0589
            lat = 42.3601
            city = "Boston"
            "#,
        )
        .unwrap();
        assert_eq!(config.geocoder.places.len(), 1);
        assert_eq!(config.geocoder.places[0].city.as_deref(), Some("Boston"));
    }

    #[test]
    fn env_overrides_win() {
        let vars: HashMap<&str, &str> = [
            ("PORT", "7000"),
            ("DATABASE_URL", "memory"),
            ("GEOCODER_API_KEY", "secret"),
            ("APP_ENV", "production"),
        ]
        .into_iter()
        .collect();

        let mut config = AppConfig::default();
        config.apply_env_overrides(|k| vars.get(k).map(|v| v.to_string()));

        assert_eq!(config.server.port, 7000);
        assert!(config.database.is_memory());
        assert_eq!(config.geocoder.api_key.as_deref(), Some("secret"));
        assert!(!config.server.is_development());
    }

    #[test]
    fn unparsable_port_is_ignored() {
        let mut config = AppConfig::default();
        config.apply_env_overrides(|k| (k == "PORT").then(|| "eighty".to_string()));
        assert_eq!(config.server.port, 5000);
    }

    #[test]
    fn zero_default_limit_is_rejected() {
        let mut config = AppConfig::default();
        config.pagination.default_limit = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn missing_file_yields_defaults() {
        let path = std::env::temp_dir().join("devcamper-does-not-exist.toml");
        let config = AppConfig::load(&path).unwrap();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn reports_dotenv_files_that_were_applied() {
        let dir = std::env::temp_dir().join(format!("devcamper-env-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let present = dir.join("config.env");
        std::fs::write(&present, "DEVCAMPER_TEST_DOTENV=loaded\n").unwrap();
        let absent = dir.join("missing.env");

        let applied = load_dotenv(&[present.clone(), absent]);
        assert_eq!(applied.len(), 1);
        assert!(applied[0].ends_with("config.env"));
        assert_eq!(std::env::var("DEVCAMPER_TEST_DOTENV").as_deref(), Ok("loaded"));

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
