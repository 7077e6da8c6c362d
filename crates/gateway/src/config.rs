//! Gateway configuration
//!
//! Sources, later ones winning: built-in defaults, an optional config file,
//! then `NAMEREG_*` environment variables (`__` separates nested keys, e.g.
//! `NAMEREG_REGISTRY__SUFFIX=.ipn`).

use anyhow::Result;
use config::{Config, Environment, File as ConfigFile};
use namereg_registry::RegistryConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const ENV_PREFIX: &str = "NAMEREG";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    /// `pretty` or `compact`
    pub log_format: String,
    /// JSON file of registrations applied at startup
    pub seed_file: Option<PathBuf>,
    pub registry: RegistryConfig,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            log_level: "info".to_string(),
            log_format: "compact".to_string(),
            seed_file: None,
            registry: RegistryConfig::default(),
        }
    }
}

impl GatewayConfig {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(path) = path {
            if !path.exists() {
                anyhow::bail!(
                    "Configuration file {} not found (specified via --config)",
                    path.display()
                );
            }
            builder = builder.add_source(ConfigFile::from(path));
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__"),
        );

        let config: GatewayConfig = builder.build()?.try_deserialize()?;
        config.registry.validate()?;
        Ok(config)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
