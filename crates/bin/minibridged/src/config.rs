//! Configuration loading — TOML file with environment variable overrides.
//!
//! Looks for `minibridge.toml` in the working directory, or the file named
//! by `MINIBRIDGE_CONFIG`. Every section has a default so the file is
//! optional; without `[[accessories]]` the bridge simply exposes nothing.
//! Environment variables take precedence over file values.

use std::collections::HashSet;

use serde::Deserialize;

use minibridge_adapter_tcp::TcpConfig;
use minibridge_domain::accessory::AccessoryConfig;

const DEFAULT_PATH: &str = "minibridge.toml";

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Controller link settings.
    pub controller: ControllerConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Accessories exposed to the hub.
    pub accessories: Vec<AccessoryConfig>,
}

/// HTTP listener configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to (e.g. `0.0.0.0`).
    pub host: String,
    /// TCP port.
    pub port: u16,
}

/// Which controller the bridge talks to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControllerMode {
    /// A real controller reached over TCP.
    Tcp,
    /// The in-process simulated controller.
    #[default]
    Virtual,
}

impl std::str::FromStr for ControllerMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "tcp" => Ok(Self::Tcp),
            "virtual" => Ok(Self::Virtual),
            other => Err(ConfigError::Validation(format!(
                "unknown controller mode {other:?}, expected \"tcp\" or \"virtual\""
            ))),
        }
    }
}

/// Controller link configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    pub mode: ControllerMode,
    /// Endpoint used when `mode = "tcp"`.
    pub tcp: TcpConfig,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

impl Config {
    /// Load configuration from the config file (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// result fails validation.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("MINIBRIDGE_CONFIG").unwrap_or_else(|_| DEFAULT_PATH.to_string());
        let mut config = Self::from_file(&path)?;
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Ok(val) = std::env::var("MINIBRIDGE_HOST") {
            self.server.host = val;
        }
        if let Ok(val) = std::env::var("MINIBRIDGE_PORT")
            && let Ok(port) = val.parse()
        {
            self.server.port = port;
        }
        if let Ok(val) = std::env::var("MINIBRIDGE_CONTROLLER") {
            self.controller.mode = val.parse()?;
        }
        if let Ok(val) = std::env::var("MINIBRIDGE_CONTROLLER_ADDR")
            && let Some((host, port)) = val.rsplit_once(':')
        {
            self.controller.tcp.host = host.to_string();
            if let Ok(port) = port.parse() {
                self.controller.tcp.port = port;
            }
        }
        if let Ok(val) = std::env::var("MINIBRIDGE_LOG") {
            self.logging.filter = val;
        }
        if let Ok(val) = std::env::var("RUST_LOG") {
            self.logging.filter = val;
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("port must be non-zero".to_string()));
        }
        if self.controller.mode == ControllerMode::Tcp && self.controller.tcp.port == 0 {
            return Err(ConfigError::Validation(
                "controller port must be non-zero".to_string(),
            ));
        }
        let mut seen = HashSet::new();
        for accessory in &self.accessories {
            if !seen.insert((accessory.kind(), accessory.id())) {
                return Err(ConfigError::Validation(format!(
                    "{} {} is declared more than once",
                    accessory.kind(),
                    accessory.id()
                )));
            }
        }
        Ok(())
    }

    /// Return the `host:port` bind address.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "minibridged=info,minibridge=info,tower_http=debug".to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
