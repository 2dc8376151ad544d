//! Configuration file (`medsched.yml`) and connection-string resolution

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::Path;

/// Config file looked up in the working directory when `--config` is absent
pub const DEFAULT_CONFIG_FILE: &str = "medsched.yml";

/// Local development store
pub const DEFAULT_DSN: &str = "medsched.duckdb";

/// Contents of `medsched.yml`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Database connection configuration
    #[serde(default)]
    pub database: DatabaseConfig,
}

/// Database connection configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    /// Connection string
    #[serde(default = "default_dsn")]
    pub dsn: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self { dsn: default_dsn() }
    }
}

fn default_dsn() -> String {
    DEFAULT_DSN.to_string()
}

impl Config {
    /// Load and validate a config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load `explicit` if given (it must exist), else `./medsched.yml` when
    /// present, else defaults.
    pub fn discover(explicit: Option<&str>, cwd: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(Path::new(path));
        }
        let implicit = cwd.join(DEFAULT_CONFIG_FILE);
        if implicit.exists() {
            log::debug!("Using config file {}", implicit.display());
            Self::load(&implicit)
        } else {
            Ok(Self::default())
        }
    }

    fn validate(&self) -> Result<()> {
        if self.database.dsn.trim().is_empty() {
            bail!("Invalid config: database.dsn cannot be empty");
        }
        Ok(())
    }

    /// Flag (or `MEDSCHED_DSN`, merged in by clap) wins over the file.
    pub fn resolve_dsn(&self, override_dsn: Option<&str>) -> String {
        override_dsn
            .map(str::to_string)
            .unwrap_or_else(|| self.database.dsn.clone())
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
