use anyhow::{bail, Context, Result};
use std::path::Path;

/// Maximum size for a config file (1 MB).
pub const MAX_CONFIG_FILE_BYTES: u64 = 1024 * 1024;

/// Parse a JSON5 configuration string.
pub fn parse_config_json5(content: &str) -> Result<serde_json::Value> {
    let value: serde_json::Value = json5::from_str(content)?;
    Ok(value)
}

/// Read a configuration file into a JSON value, by extension.
///
/// YAML and TOML are converted; everything else is parsed as JSON5, which
/// also accepts plain JSON.
pub fn read_config_file(path: &Path) -> Result<serde_json::Value> {
    let metadata = std::fs::metadata(path)
        .with_context(|| format!("Cannot stat config file '{}'", path.display()))?;

    if metadata.len() > MAX_CONFIG_FILE_BYTES {
        bail!(
            "Config file '{}' is {} bytes, exceeds limit of {} bytes",
            path.display(),
            metadata.len(),
            MAX_CONFIG_FILE_BYTES,
        );
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file '{}'", path.display()))?;

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match ext {
        "yaml" | "yml" => {
            let value: serde_json::Value = serde_yaml::from_str(&content)
                .with_context(|| format!("Invalid YAML in '{}'", path.display()))?;
            Ok(value)
        }
        "toml" => {
            let value: serde_json::Value = toml::from_str(&content)
                .with_context(|| format!("Invalid TOML in '{}'", path.display()))?;
            Ok(value)
        }
        _ => parse_config_json5(&content)
            .with_context(|| format!("Invalid JSON in '{}'", path.display())),
    }
}

/// Write configuration to a JSON file.
pub fn write_config_file(path: &Path, config: &serde_json::Value) -> Result<()> {
    let content = serde_json::to_string_pretty(config)?;
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write config file '{}'", path.display()))?;
    Ok(())
}
