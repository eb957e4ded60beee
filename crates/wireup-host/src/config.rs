//! Host configuration
//!
//! Layered configuration via figment: compiled defaults, then an optional
//! TOML file, then `WIREUP_`-prefixed environment variables. Later layers
//! win, so a deployment can override any single key without a config file.

use std::path::{Path, PathBuf};

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use wireup::{Error, Result};

/// Environment variable prefix for configuration overrides
pub const CONFIG_ENV_PREFIX: &str = "WIREUP";

/// Config file picked up from the working directory when present
pub const DEFAULT_CONFIG_FILE: &str = "wireup.toml";

/// Top-level host configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub service: ServiceConfig,
    pub bus: BusConfig,
    pub logging: LoggingConfig,
}

/// Service identity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Name reported in logs and by the host
    pub name: String,
    pub description: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: "wireup-host".to_string(),
            description: "Processor service host".to_string(),
        }
    }
}

/// Service bus endpoint settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BusConfig {
    pub endpoint: String,
    pub queue: String,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            endpoint: "amqp://localhost:5672".to_string(),
            queue: "importer.events".to_string(),
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive when `WIREUP_LOG` is unset
    pub level: String,
    /// Emit structured JSON lines instead of human-readable output
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
        }
    }
}

/// Builder-style loader for [`AppConfig`]
pub struct ConfigLoader {
    config_path: Option<PathBuf>,
    env_prefix: String,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self {
            config_path: None,
            env_prefix: CONFIG_ENV_PREFIX.to_string(),
        }
    }

    /// Read the given TOML file instead of the default lookup
    #[must_use]
    pub fn with_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    #[must_use]
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Merge defaults, file and environment into a validated config
    pub fn load(&self) -> Result<AppConfig> {
        let mut figment = Figment::new().merge(Serialized::defaults(AppConfig::default()));

        if let Some(path) = &self.config_path {
            figment = figment.merge(Toml::file(path));
        } else if Path::new(DEFAULT_CONFIG_FILE).exists() {
            figment = figment.merge(Toml::file(DEFAULT_CONFIG_FILE));
        }

        figment = figment.merge(Env::prefixed(&format!("{}_", self.env_prefix)).split("_"));

        figment.extract().map_err(|err| Error::Configuration {
            message: "failed to load host configuration".to_string(),
            source: Some(Box::new(err)),
        })
    }
}
