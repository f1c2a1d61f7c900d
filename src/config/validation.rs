use super::Config;
use anyhow::Result;
use std::path::Path;
use tracing::warn;

/// Validation errors for configuration.
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Validate a configuration object.
pub fn validate_config(config: &Config) -> Vec<ConfigValidationError> {
    let mut errors = Vec::new();

    if let Some(ref store_file) = config.secrets.store_file {
        if store_file.trim().is_empty() {
            errors.push(ConfigValidationError {
                path: "secrets.storeFile".to_string(),
                message: "Store file path must not be empty".to_string(),
            });
        } else if !Path::new(store_file).exists() {
            errors.push(ConfigValidationError {
                path: "secrets.storeFile".to_string(),
                message: format!("Store file '{store_file}' does not exist"),
            });
        }
    }

    if let Some(ref prefix) = config.secrets.env_prefix {
        if !prefix
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
        {
            errors.push(ConfigValidationError {
                path: "secrets.envPrefix".to_string(),
                message: "Env prefix may only contain A-Z, 0-9 and '_'".to_string(),
            });
        }
    }

    if config.secrets.store_file.is_none() && config.secrets.env_prefix.is_none() {
        warn!("No secret source configured; every volume secret will be skipped");
    }

    errors
}

/// Validate configuration and return Result.
pub fn validate_config_object(config: &Config) -> Result<()> {
    let errors = validate_config(config);
    if errors.is_empty() {
        Ok(())
    } else {
        let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
        anyhow::bail!("Configuration validation failed:\n{}", messages.join("\n"));
    }
}
