//! Backend location and default timeout.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

const DEFAULT_HOST: &str = "http://localhost";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Where relative requests go and how long a request may take overall.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClientConfig {
    /// Scheme and host, e.g. `http://localhost`. No trailing slash.
    pub host: String,
    pub port: u16,
    pub default_timeout_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            default_timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl ClientConfig {
    pub fn new(host: impl Into<String>, port: u16, default_timeout: Duration) -> Self {
        Self {
            host: host.into(),
            port,
            default_timeout_ms: default_timeout.as_millis() as u64,
        }
    }

    /// Prefix for every relative request path.
    pub fn base_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn default_timeout(&self) -> Duration {
        Duration::from_millis(self.default_timeout_ms)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: ClientConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Read `REQUEST_HOST`, `REQUEST_PORT` and `REQUEST_TIMEOUT_MS`, falling
    /// back to defaults for unset variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(host) = lookup("REQUEST_HOST") {
            config.host = host;
        }
        if let Some(port) = lookup("REQUEST_PORT") {
            config.port = port
                .parse()
                .map_err(|_| ConfigError::Invalid(format!("REQUEST_PORT is not a port: {port}")))?;
        }
        if let Some(timeout) = lookup("REQUEST_TIMEOUT_MS") {
            config.default_timeout_ms = timeout.parse().map_err(|_| {
                ConfigError::Invalid(format!("REQUEST_TIMEOUT_MS is not a number: {timeout}"))
            })?;
        }
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.host.is_empty() {
            return Err(ConfigError::Invalid("host must not be empty".to_string()));
        }
        if self.default_timeout_ms == 0 {
            return Err(ConfigError::Invalid("default_timeout_ms must be greater than zero".to_string()));
        }
        Ok(())
    }
}
