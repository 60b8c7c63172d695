use serde::{Deserialize, Serialize};

use super::errors::ConfigError;
use super::event_store::EventStoreConfig;
use super::logging::LoggingConfig;
use super::server::ServerConfig;
use super::static_records::StaticRecord;

const LOCAL_CONFIG_PATH: &str = "dnsleak.toml";
const SYSTEM_CONFIG_PATH: &str = "/etc/dnsleak/config.toml";

/// Main configuration structure for the probe
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// Listener configuration (port, bind address)
    #[serde(default)]
    pub server: ServerConfig,

    /// Elasticsearch connection
    #[serde(default)]
    pub event_store: EventStoreConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    /// Names answered with a fixed address instead of an empty reply
    #[serde(default)]
    pub static_records: Vec<StaticRecord>,
}

impl Config {
    /// Load configuration from file or use defaults
    ///
    /// Priority order:
    /// 1. Explicitly provided path
    /// 2. dnsleak.toml in current directory
    /// 3. /etc/dnsleak/config.toml
    /// 4. Default configuration
    ///
    /// Overrides are applied on top, then the result is validated.
    pub fn load(path: Option<&str>, cli_overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = path {
            Self::from_file(path)?
        } else if std::path::Path::new(LOCAL_CONFIG_PATH).exists() {
            Self::from_file(LOCAL_CONFIG_PATH)?
        } else if std::path::Path::new(SYSTEM_CONFIG_PATH).exists() {
            Self::from_file(SYSTEM_CONFIG_PATH)?
        } else {
            Self::default()
        };

        config.apply_cli_overrides(cli_overrides);
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.to_string(), e.to_string()))?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn apply_cli_overrides(&mut self, overrides: CliOverrides) {
        if let Some(port) = overrides.dns_port {
            self.server.dns_port = port;
        }
        if let Some(bind) = overrides.bind_address {
            self.server.bind_address = bind;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
        if let Some(host) = overrides.store_host {
            self.event_store.host = host;
        }
        if let Some(port) = overrides.store_port {
            self.event_store.port = port;
        }
        if let Some(username) = overrides.store_username {
            self.event_store.username = Some(username);
        }
        if let Some(password) = overrides.store_password {
            self.event_store.password = Some(password);
        }
        if let Some(verify) = overrides.store_verify_certs {
            self.event_store.verify_certs = verify;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.dns_port == 0 {
            return Err(ConfigError::Validation("DNS port cannot be 0".to_string()));
        }

        if self
            .server
            .listen_addr()
            .parse::<std::net::SocketAddr>()
            .is_err()
        {
            return Err(ConfigError::Validation(format!(
                "Invalid bind address '{}'",
                self.server.bind_address
            )));
        }

        if self.server.recv_buffer_size < 12 {
            return Err(ConfigError::Validation(format!(
                "recv_buffer_size {} cannot hold a DNS header",
                self.server.recv_buffer_size
            )));
        }

        let store = &self.event_store;
        if store.host.trim().is_empty() {
            return Err(ConfigError::Validation(
                "Event store host is required".to_string(),
            ));
        }
        if store.port == 0 {
            return Err(ConfigError::Validation(
                "Event store port cannot be 0".to_string(),
            ));
        }
        if store.scheme != "http" && store.scheme != "https" {
            return Err(ConfigError::Validation(format!(
                "Unsupported event store scheme '{}'",
                store.scheme
            )));
        }
        if store.index.trim().is_empty() {
            return Err(ConfigError::Validation(
                "Event store index is required".to_string(),
            ));
        }
        if store.document_type.trim().is_empty() {
            return Err(ConfigError::Validation(
                "Event store document_type is required".to_string(),
            ));
        }
        if store.password.is_some() && store.username.as_deref().unwrap_or("").is_empty() {
            return Err(ConfigError::Validation(
                "Event store password given without a username".to_string(),
            ));
        }

        if !self.logging.has_valid_level() {
            return Err(ConfigError::Validation(format!(
                "Unknown log level '{}'",
                self.logging.level
            )));
        }

        for record in &self.static_records {
            if !record.has_valid_name() {
                return Err(ConfigError::Validation(format!(
                    "Static record has invalid name '{}'",
                    record.name
                )));
            }
            if record.address().is_none() {
                return Err(ConfigError::Validation(format!(
                    "Static record '{}' has invalid IP '{}'",
                    record.name, record.ip
                )));
            }
        }

        Ok(())
    }
}

/// Command-line and environment overrides for configuration
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub dns_port: Option<u16>,
    pub bind_address: Option<String>,
    pub log_level: Option<String>,
    pub store_host: Option<String>,
    pub store_port: Option<u16>,
    pub store_username: Option<String>,
    pub store_password: Option<String>,
    pub store_verify_certs: Option<bool>,
}
