//! Configuration loading: TOML file, then environment, then command line.
//!
//! Looks for `todohubd.toml` in the working directory unless `--config`
//! names another file; a missing file is not an error. Environment
//! variables (including those loaded from `.env`) override file values and
//! command-line flags override both. The merged result is validated into
//! [`Settings`] before anything binds or connects.

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use serde::Deserialize;

use todohub_app::ports::{InvalidTableName, TableName};

/// Config file read when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "todohubd.toml";

/// Command-line flags.
#[derive(Debug, Default, Parser)]
#[command(name = "todohubd")]
#[command(about = "Todo REST service", long_about = None)]
#[command(version)]
pub struct Cli {
    /// TCP port to listen on (overrides `PORT`)
    #[arg(long)]
    pub port: Option<u16>,

    /// Address to bind to (overrides `HOST`)
    #[arg(long)]
    pub host: Option<String>,

    /// Store endpoint: `http(s)://` for `DynamoDB`, `sqlite:` for `SQLite`
    /// (overrides `DYNAMODB_ENDPOINT`)
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Path to the TOML config file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// Raw configuration as read from the file and overridden by environment
/// and flags. Every field is optional until [`Config::resolve`].
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Store settings.
    pub storage: StorageConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to (e.g. `0.0.0.0`).
    pub host: String,
    /// TCP port. Required.
    pub port: Option<u16>,
}

/// Store configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub endpoint: Option<String>,
    pub region: Option<String>,
    pub table_name: Option<String>,
    /// Upper bound for each storage call, in milliseconds.
    pub timeout_ms: u64,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: None,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            region: None,
            table_name: None,
            timeout_ms: 5000,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "todohubd=info,todohub=info,tower_http=debug".to_string(),
        }
    }
}

/// Which store backs the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreSettings {
    /// `sqlite:` connection URL.
    Sqlite { url: String },
    /// `DynamoDB` service endpoint.
    DynamoDb { endpoint: String, region: String },
}

/// Validated settings the daemon runs with.
#[derive(Debug)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    pub store: StoreSettings,
    pub table_name: TableName,
    pub storage_timeout: Duration,
    pub log_filter: String,
}

impl Settings {
    /// Return the `host:port` bind address.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Config {
    /// Load the config file, apply `.env`/process environment and `cli`
    /// overrides, then validate.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but is unreadable or malformed,
    /// or if the merged configuration is incomplete or invalid.
    pub fn load(cli: &Cli) -> Result<Settings, ConfigError> {
        let path = cli
            .config
            .as_deref()
            .unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
        let mut config = Self::from_file(path)?;
        config.apply_env(|key| std::env::var(key).ok())?;
        config.apply_cli(cli);
        config.resolve()
    }

    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<(), ConfigError> {
        if let Some(val) = lookup("HOST") {
            self.server.host = val;
        }
        if let Some(val) = lookup("PORT") {
            let port = val
                .parse()
                .map_err(|_| ConfigError::Validation(format!("PORT is not a port number: {val:?}")))?;
            self.server.port = Some(port);
        }
        if let Some(val) = lookup("DYNAMODB_ENDPOINT") {
            self.storage.endpoint = Some(val);
        }
        if let Some(val) = lookup("AWS_REGION") {
            self.storage.region = Some(val);
        }
        if let Some(val) = lookup("TABLE_NAME") {
            self.storage.table_name = Some(val);
        }
        if let Some(val) = lookup("STORAGE_TIMEOUT_MS") {
            self.storage.timeout_ms = val.parse().map_err(|_| {
                ConfigError::Validation(format!("STORAGE_TIMEOUT_MS is not a number: {val:?}"))
            })?;
        }
        if let Some(val) = lookup("TODOHUB_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = lookup("RUST_LOG") {
            self.logging.filter = val;
        }
        Ok(())
    }

    fn apply_cli(&mut self, cli: &Cli) {
        if let Some(host) = &cli.host {
            self.server.host.clone_from(host);
        }
        if let Some(port) = cli.port {
            self.server.port = Some(port);
        }
        if let Some(endpoint) = &cli.endpoint {
            self.storage.endpoint = Some(endpoint.clone());
        }
    }

    fn resolve(self) -> Result<Settings, ConfigError> {
        let port = self.server.port.ok_or(ConfigError::Missing("PORT"))?;
        if port == 0 {
            return Err(ConfigError::Validation("port must be non-zero".to_string()));
        }

        let table_name: TableName = self
            .storage
            .table_name
            .ok_or(ConfigError::Missing("TABLE_NAME"))?
            .parse()?;

        if self.storage.timeout_ms == 0 {
            return Err(ConfigError::Validation(
                "storage timeout must be non-zero".to_string(),
            ));
        }

        let endpoint = self
            .storage
            .endpoint
            .ok_or(ConfigError::Missing("DYNAMODB_ENDPOINT"))?;
        let store = if endpoint.starts_with("sqlite:") {
            StoreSettings::Sqlite { url: endpoint }
        } else if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
            let region = self
                .storage
                .region
                .ok_or(ConfigError::Missing("AWS_REGION"))?;
            StoreSettings::DynamoDb { endpoint, region }
        } else {
            return Err(ConfigError::Validation(format!(
                "unsupported store endpoint {endpoint:?}: expected http(s):// or sqlite:"
            )));
        };

        Ok(Settings {
            host: self.server.host,
            port,
            store,
            table_name,
            storage_timeout: Duration::from_millis(self.storage.timeout_ms),
            log_filter: self.logging.filter,
        })
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required setting was not provided anywhere.
    #[error("missing required setting {0}")]
    Missing(&'static str),
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// The table name breaks the naming rules.
    #[error(transparent)]
    TableName(#[from] InvalidTableName),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    fn complete_env() -> impl Fn(&str) -> Option<String> {
        env(&[
            ("PORT", "8080"),
            ("DYNAMODB_ENDPOINT", "http://localhost:8000"),
            ("AWS_REGION", "us-east-1"),
            ("TABLE_NAME", "todos"),
        ])
    }

    #[test]
    fn should_produce_sensible_defaults() {
        let config = Config::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, None);
        assert_eq!(config.storage.timeout_ms, 5000);
        assert_eq!(
            config.logging.filter,
            "todohubd=info,todohub=info,tower_http=debug"
        );
    }

    #[test]
    fn should_parse_full_toml() {
        let toml = "
            [server]
            host = '127.0.0.1'
            port = 9090

            [storage]
            endpoint = 'sqlite:todos.db'
            table_name = 'todos'
            timeout_ms = 250

            [logging]
            filter = 'debug'
        ";
        let config: Config = toml::from_str(toml).unwrap();
        let settings = config.resolve().unwrap();
        assert_eq!(settings.bind_addr(), "127.0.0.1:9090");
        assert_eq!(
            settings.store,
            StoreSettings::Sqlite {
                url: "sqlite:todos.db".to_string()
            }
        );
        assert_eq!(settings.storage_timeout, Duration::from_millis(250));
        assert_eq!(settings.log_filter, "debug");
    }

    #[test]
    fn should_return_default_when_file_not_found() {
        let config = Config::from_file(Path::new("nonexistent.toml")).unwrap();
        assert_eq!(config.server.port, None);
    }

    #[test]
    fn should_report_parse_error_for_invalid_toml() {
        let result: Result<Config, _> = toml::from_str("invalid {{{");
        assert!(result.is_err());
    }

    #[test]
    fn should_resolve_dynamodb_store_from_environment() {
        let mut config = Config::default();
        config.apply_env(complete_env()).unwrap();
        let settings = config.resolve().unwrap();

        assert_eq!(settings.bind_addr(), "0.0.0.0:8080");
        assert_eq!(settings.table_name.as_str(), "todos");
        assert_eq!(settings.storage_timeout, Duration::from_secs(5));
        assert_eq!(
            settings.store,
            StoreSettings::DynamoDb {
                endpoint: "http://localhost:8000".to_string(),
                region: "us-east-1".to_string(),
            }
        );
    }

    #[test]
    fn should_let_flags_override_environment() {
        let mut config = Config::default();
        config.apply_env(complete_env()).unwrap();
        config.apply_cli(&Cli {
            port: Some(9000),
            host: Some("127.0.0.1".to_string()),
            endpoint: Some("sqlite::memory:".to_string()),
            config: None,
        });
        let settings = config.resolve().unwrap();

        assert_eq!(settings.bind_addr(), "127.0.0.1:9000");
        assert_eq!(
            settings.store,
            StoreSettings::Sqlite {
                url: "sqlite::memory:".to_string()
            }
        );
    }

    #[test]
    fn should_prefer_rust_log_over_todohub_log() {
        let mut config = Config::default();
        config
            .apply_env(env(&[("TODOHUB_LOG", "warn"), ("RUST_LOG", "trace")]))
            .unwrap();
        assert_eq!(config.logging.filter, "trace");
    }

    #[test]
    fn should_report_each_missing_required_setting() {
        let required = ["PORT", "DYNAMODB_ENDPOINT", "AWS_REGION", "TABLE_NAME"];
        let complete = complete_env();
        for missing in required {
            let mut config = Config::default();
            config
                .apply_env(|key| if key == missing { None } else { complete(key) })
                .unwrap();
            let result = config.resolve();
            assert!(
                matches!(result, Err(ConfigError::Missing(name)) if name == missing),
                "{missing} should be reported"
            );
        }
    }

    #[test]
    fn should_not_require_region_for_sqlite() {
        let mut config = Config::default();
        config
            .apply_env(env(&[
                ("PORT", "8080"),
                ("DYNAMODB_ENDPOINT", "sqlite::memory:"),
                ("TABLE_NAME", "todos"),
            ]))
            .unwrap();
        assert!(config.resolve().is_ok());
    }

    #[test]
    fn should_reject_zero_port() {
        let mut config = Config::default();
        config.apply_env(complete_env()).unwrap();
        config.server.port = Some(0);
        assert!(matches!(config.resolve(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn should_reject_non_numeric_port() {
        let mut config = Config::default();
        let result = config.apply_env(env(&[("PORT", "eighty")]));
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn should_reject_invalid_table_name() {
        let mut config = Config::default();
        config.apply_env(complete_env()).unwrap();
        config.storage.table_name = Some("no spaces".to_string());
        assert!(matches!(config.resolve(), Err(ConfigError::TableName(_))));
    }

    #[test]
    fn should_reject_unknown_endpoint_scheme() {
        let mut config = Config::default();
        config.apply_env(complete_env()).unwrap();
        config.storage.endpoint = Some("postgres://db".to_string());
        assert!(matches!(config.resolve(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn should_reject_zero_storage_timeout() {
        let mut config = Config::default();
        config.apply_env(complete_env()).unwrap();
        config.storage.timeout_ms = 0;
        assert!(matches!(config.resolve(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn should_parse_flags() {
        let cli = Cli::try_parse_from([
            "todohubd",
            "--port",
            "8080",
            "--endpoint",
            "sqlite:todos.db",
        ])
        .unwrap();
        assert_eq!(cli.port, Some(8080));
        assert_eq!(cli.endpoint.as_deref(), Some("sqlite:todos.db"));
        assert_eq!(cli.host, None);
    }
}
