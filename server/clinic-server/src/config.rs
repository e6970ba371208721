//! Server configuration
//!
//! Sources, lowest precedence first:
//!
//! 1. built-in defaults ([`ClinicConfig::default`])
//! 2. `clinic-server.toml` in the working directory, or the file passed with `--config`
//! 3. environment variables prefixed `CLINIC`, nested with `__`
//!    (`CLINIC__DATABASE__URL`, `CLINIC__GRPC__ENABLED`, ...)
//!
//! Command-line flags are applied on top by `main`.

use config::{Config, ConfigError, Environment, File};
use database_layer::PoolSettings;
use logger_redacted::LoggerConfig;
use serde::{Deserialize, Serialize};

pub const DEFAULT_CONFIG_FILE: &str = "clinic-server.toml";
pub const ENV_PREFIX: &str = "CLINIC";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClinicConfig {
    pub server: HttpSettings,
    pub grpc: GrpcSettings,
    pub database: DatabaseSettings,
    pub logging: LoggerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpSettings {
    pub host: String,
    pub port: u16,
    /// Allowed CORS origins; empty means any origin
    pub cors_origins: Vec<String>,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            cors_origins: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GrpcSettings {
    pub enabled: bool,
    pub port: u16,
}

impl Default for GrpcSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            port: 9090,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    /// PostgreSQL connection string; without one the server refuses to start
    /// unless `--in-memory` is given
    pub url: Option<String>,
    pub run_migrations: bool,
    pub pool: PoolSettings,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            url: None,
            run_migrations: true,
            pool: PoolSettings::default(),
        }
    }
}

impl ClinicConfig {
    /// Loads the layered configuration.
    ///
    /// A missing file is not an error; a present but malformed one is.
    ///
    /// # Errors
    ///
    /// Returns the `config` crate error when a source cannot be read or the
    /// merged values do not fit [`ClinicConfig`].
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(p) => File::with_name(p).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        Config::builder()
            .add_source(Config::try_from(&Self::default())?)
            .add_source(file)
            .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()?
            .try_deserialize()
    }

    pub fn http_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn grpc_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.grpc.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_need_no_sources() {
        let config = ClinicConfig::default();
        assert_eq!(config.http_addr(), "0.0.0.0:8080");
        assert!(!config.grpc.enabled);
        assert!(config.database.url.is_none());
        assert!(config.database.run_migrations);
        assert!(config.logging.redaction_enabled);
    }

    #[test]
    fn file_values_override_defaults() {
        let dir = std::env::temp_dir().join(format!("clinic-config-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("clinic.toml");
        std::fs::write(
            &path,
            "[server]\nport = 9000\n\n[grpc]\nenabled = true\n\n[logging]\nformat = \"json\"\n",
        )
        .unwrap();

        let config = ClinicConfig::load(path.to_str()).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert!(config.grpc.enabled);
        assert_eq!(config.grpc_addr(), "0.0.0.0:9090");
        assert_eq!(config.logging.format, logger_redacted::LogFormat::Json);

        std::fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn explicit_file_must_exist() {
        assert!(ClinicConfig::load(Some("/nonexistent/clinic-server.toml")).is_err());
    }
}
