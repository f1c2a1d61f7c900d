mod defaults;
mod io;
mod types;
mod validation;

pub use defaults::*;
pub use io::*;
pub use types::*;
pub use validation::*;

use crate::secrets::{ChainResolver, EnvResolver, StoreResolver};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub secrets: SecretsConfig,
}

impl Config {
    /// Load configuration from file, environment, and defaults.
    pub fn load(path: Option<&str>) -> Result<Self> {
        let config_path = path.map(PathBuf::from).or_else(find_config_file);

        let mut config = match config_path {
            Some(ref config_path) if config_path.exists() => {
                info!("Loading config from {}", config_path.display());
                load_config_file(config_path)?
            }
            Some(ref config_path) => {
                anyhow::bail!("Config file '{}' not found", config_path.display())
            }
            None => {
                info!("No config file found, using defaults");
                Config::default()
            }
        };

        config.apply_env_overrides();

        Ok(config)
    }

    /// Write default configuration to a file.
    pub fn write_default(path: &str) -> Result<()> {
        let value = serde_json::to_value(Config::default())?;
        write_config_file(Path::new(path), &value)
    }

    /// Build the resolver chain described by `secrets`: store file first,
    /// then environment.
    pub fn build_resolver(&self) -> Result<ChainResolver> {
        let mut chain = ChainResolver::new();

        if let Some(ref store_file) = self.secrets.store_file {
            let store = StoreResolver::load(Path::new(store_file))
                .with_context(|| format!("Failed to load secret store '{store_file}'"))?;
            info!("Secret store '{}' loaded ({} value(s))", store_file, store.len());
            chain = chain.push(store.with_mask(self.secrets.mask));
        }

        if let Some(ref prefix) = self.secrets.env_prefix {
            chain = chain.push(EnvResolver::new(prefix.as_str()).with_mask(self.secrets.mask));
        }

        Ok(chain)
    }

    /// Apply environment variable overrides to the configuration.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    /// Apply `VOLSECRETS_*` overrides read through `lookup`.
    ///
    /// Unparsable values are reported and leave the current setting in place.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(level) = lookup("VOLSECRETS_LOG_LEVEL") {
            match level.parse() {
                Ok(level) => self.logging.level = level,
                Err(e) => warn!("Ignoring VOLSECRETS_LOG_LEVEL: {e}"),
            }
        }

        if let Some(mask) = lookup("VOLSECRETS_MASK") {
            match mask.trim().parse() {
                Ok(mask) => self.secrets.mask = mask,
                Err(e) => warn!("Ignoring VOLSECRETS_MASK '{mask}': {e}"),
            }
        }

        if let Some(policy) = lookup("VOLSECRETS_FAILURE_POLICY") {
            match policy.parse() {
                Ok(policy) => self.secrets.failure_policy = policy,
                Err(e) => warn!("Ignoring VOLSECRETS_FAILURE_POLICY: {e}"),
            }
        }

        if let Some(file) = lookup("VOLSECRETS_STORE_FILE") {
            self.secrets.store_file = Some(file);
        }

        if let Some(prefix) = lookup("VOLSECRETS_ENV_PREFIX") {
            self.secrets.env_prefix = if prefix.is_empty() { None } else { Some(prefix) };
        }
    }
}

/// Find the configuration file in standard locations.
fn find_config_file() -> Option<PathBuf> {
    let candidates = [
        PathBuf::from("volsecrets.json"),
        PathBuf::from("volsecrets.yaml"),
        PathBuf::from("volsecrets.yml"),
        PathBuf::from("volsecrets.toml"),
    ];

    for path in &candidates {
        if path.exists() {
            return Some(path.clone());
        }
    }

    if let Some(home) = dirs::home_dir() {
        let home_config = home.join(HOME_CONFIG_DIR).join("config.json");
        if home_config.exists() {
            return Some(home_config);
        }
    }

    None
}

/// Load configuration from a file path.
fn load_config_file(path: &Path) -> Result<Config> {
    let value = read_config_file(path)?;
    let config = serde_json::from_value(value)
        .with_context(|| format!("Invalid configuration in '{}'", path.display()))?;
    Ok(config)
}
