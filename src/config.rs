//! Configuration module
//!
//! Settings are layered: built-in defaults, then an optional TOML file
//! (`~/.config/dashboard-api/config.toml`), then process environment.
//! CLI flags are applied on top by the binary.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Label used when no deployment mode is configured.
pub const DEFAULT_ENVIRONMENT: &str = "development";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid value for {key}: {value:?} ({reason})")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Default config location: `~/.config/dashboard-api/config.toml`
pub fn default_config_path() -> PathBuf {
    dirs_next::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("dashboard-api")
        .join("config.toml")
}

/// Full application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerSettings,
    pub app: AppSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// Seconds to wait for in-flight requests on shutdown
    pub shutdown_timeout: u64,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            shutdown_timeout: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub environment: Environment,
    pub store: StoreMode,
    pub metrics: MetricsMode,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            environment: Environment::default(),
            store: StoreMode::Seed,
            metrics: MetricsMode::Static,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// `trace`, `debug`, `info`, `warn` or `error` (any `EnvFilter` directive works)
    pub level: String,
    /// `pretty` or `json`
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

/// Deployment-mode label.
///
/// Free text, echoed by `/health`. Only `production` changes behaviour:
/// fault details are withheld from 500 responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Environment(String);

impl From<String> for Environment {
    fn from(label: String) -> Self {
        Self::new(label)
    }
}

impl From<Environment> for String {
    fn from(environment: Environment) -> Self {
        environment.0
    }
}

impl Environment {
    pub fn new(label: impl Into<String>) -> Self {
        let label = label.into();
        let trimmed = label.trim();
        if trimmed.is_empty() {
            Self::default()
        } else {
            Self(trimmed.to_string())
        }
    }

    pub fn production() -> Self {
        Self("production".to_string())
    }

    pub fn label(&self) -> &str {
        &self.0
    }

    pub fn is_production(&self) -> bool {
        self.0.eq_ignore_ascii_case("production")
    }

    /// Whether 500 responses may carry the underlying fault message.
    pub fn exposes_fault_detail(&self) -> bool {
        !self.is_production()
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self(DEFAULT_ENVIRONMENT.to_string())
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Which user store backs the `/api/v1/users` routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreMode {
    /// Fixed seed records, literal `id == "1"` lookup, create is echoed only.
    Seed,
    /// Keyed lookup over a mutable map; created users are retained.
    Memory,
}

impl FromStr for StoreMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "seed" => Ok(Self::Seed),
            "memory" => Ok(Self::Memory),
            _ => Err("expected `seed` or `memory`".to_string()),
        }
    }
}

/// What `GET /metrics` renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricsMode {
    /// Fixed exposition block
    Static,
    /// Live Prometheus recorder fed by the HTTP metrics middleware
    Prometheus,
}

impl FromStr for MetricsMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "static" => Ok(Self::Static),
            "prometheus" => Ok(Self::Prometheus),
            _ => Err("expected `static` or `prometheus`".to_string()),
        }
    }
}

impl AppConfig {
    /// Load from a TOML file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load from file, then overlay the process environment.
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        Self::load_with(path, |key| std::env::var(key).ok())
    }

    /// Load from file, then overlay variables read through `lookup`.
    /// Any invalid variable fails the whole load.
    pub fn load_with<F>(path: &Path, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::load(path)?;
        config.apply_env(lookup)?;
        Ok(config)
    }

    /// Overlay environment variables read through `lookup`.
    ///
    /// `APP_ENV` wins over `NODE_ENV`; empty values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(host) = get("HOST") {
            self.server.host = host;
        }
        if let Some(port) = get("PORT") {
            self.server.port = port.trim().parse().map_err(|e: std::num::ParseIntError| {
                ConfigError::Invalid {
                    key: "PORT",
                    value: port.clone(),
                    reason: e.to_string(),
                }
            })?;
        }
        if let Some(env) = get("APP_ENV").or_else(|| get("NODE_ENV")) {
            self.app.environment = Environment::new(env);
        }
        if let Some(store) = get("USER_STORE") {
            self.app.store = store.parse().map_err(|reason| ConfigError::Invalid {
                key: "USER_STORE",
                value: store.clone(),
                reason,
            })?;
        }
        if let Some(mode) = get("METRICS_MODE") {
            self.app.metrics = mode.parse().map_err(|reason| ConfigError::Invalid {
                key: "METRICS_MODE",
                value: mode.clone(),
                reason,
            })?;
        }
        if let Some(level) = get("LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = get("LOG_FORMAT") {
            self.logging.format = format;
        }

        Ok(())
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_match_documented_values() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.server.port, 3000);
        assert_eq!(cfg.app.environment.label(), "development");
        assert_eq!(cfg.app.store, StoreMode::Seed);
        assert_eq!(cfg.app.metrics, MetricsMode::Static);
    }

    #[test]
    fn env_overrides_port_and_environment() {
        let mut cfg = AppConfig::default();
        cfg.apply_env(lookup(&[("PORT", "8080"), ("NODE_ENV", "production")]))
            .unwrap();
        assert_eq!(cfg.server.port, 8080);
        assert!(cfg.app.environment.is_production());
    }

    #[test]
    fn app_env_wins_over_node_env() {
        let mut cfg = AppConfig::default();
        cfg.apply_env(lookup(&[("APP_ENV", "staging"), ("NODE_ENV", "production")]))
            .unwrap();
        assert_eq!(cfg.app.environment.label(), "staging");
    }

    #[test]
    fn empty_env_values_are_ignored() {
        let mut cfg = AppConfig::default();
        cfg.apply_env(lookup(&[("PORT", ""), ("NODE_ENV", "  ")]))
            .unwrap();
        assert_eq!(cfg.server.port, 3000);
        assert_eq!(cfg.app.environment.label(), "development");
    }

    #[test]
    fn invalid_port_is_rejected() {
        let mut cfg = AppConfig::default();
        let err = cfg.apply_env(lookup(&[("PORT", "not-a-port")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "PORT", .. }));
    }

    #[test]
    fn invalid_store_mode_is_rejected() {
        let mut cfg = AppConfig::default();
        let err = cfg.apply_env(lookup(&[("USER_STORE", "postgres")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "USER_STORE", .. }));
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = AppConfig::load(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg.server.port, 3000);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "[server]\nport = 4100\n\n[app]\nenvironment = \"test\"\nstore = \"memory\""
        )
        .unwrap();

        let cfg = AppConfig::load(&path).unwrap();
        assert_eq!(cfg.server.port, 4100);
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.app.environment.label(), "test");
        assert_eq!(cfg.app.store, StoreMode::Memory);
        assert_eq!(cfg.logging.level, "info");
    }

    #[test]
    fn file_and_env_are_layered() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[server]\nport = 4100\n").unwrap();

        let cfg = AppConfig::load_with(&path, lookup(&[("USER_STORE", "memory")])).unwrap();
        assert_eq!(cfg.server.port, 4100);
        assert_eq!(cfg.app.store, StoreMode::Memory);
    }

    #[test]
    fn invalid_env_value_fails_load_instead_of_falling_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[server]\nport = 4100\n").unwrap();

        let err = AppConfig::load_with(&path, lookup(&[("USER_STORE", "memroy")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "USER_STORE", .. }));
        assert!(err.to_string().contains("memroy"));

        let err = AppConfig::load_with(&path, lookup(&[("PORT", "abc")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "PORT", .. }));
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[server\nport = ").unwrap();
        assert!(matches!(
            AppConfig::load(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn empty_environment_in_file_falls_back_to_development() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[app]\nenvironment = \"\"\n").unwrap();
        let cfg = AppConfig::load(&path).unwrap();
        assert_eq!(cfg.app.environment.label(), "development");

        std::fs::write(&path, "[app]\nenvironment = \"  staging \"\n").unwrap();
        let cfg = AppConfig::load(&path).unwrap();
        assert_eq!(cfg.app.environment.label(), "staging");
    }

    #[test]
    fn environment_label_is_trimmed_and_defaulted() {
        assert_eq!(Environment::new("  qa ").label(), "qa");
        assert_eq!(Environment::new("").label(), "development");
        assert!(Environment::new("Production").is_production());
        assert!(Environment::new("development").exposes_fault_detail());
        assert!(!Environment::production().exposes_fault_detail());
    }
}
