use crate::secrets::FailurePolicy;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LoggingLevel {
    Silent,
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LoggingLevel {
    /// Directive value for `tracing_subscriber::EnvFilter`.
    pub fn as_filter(&self) -> &'static str {
        match self {
            LoggingLevel::Silent => "off",
            LoggingLevel::Error => "error",
            LoggingLevel::Warn => "warn",
            LoggingLevel::Info => "info",
            LoggingLevel::Debug => "debug",
            LoggingLevel::Trace => "trace",
        }
    }
}

impl FromStr for LoggingLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "silent" | "off" => Ok(LoggingLevel::Silent),
            "error" => Ok(LoggingLevel::Error),
            "warn" | "warning" => Ok(LoggingLevel::Warn),
            "info" => Ok(LoggingLevel::Info),
            "debug" => Ok(LoggingLevel::Debug),
            "trace" => Ok(LoggingLevel::Trace),
            other => Err(format!("unknown logging level '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct LoggingConfig {
    #[serde(default)]
    pub level: LoggingLevel,
    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecretsConfig {
    /// Mark materialized secrets as masked in engine output.
    #[serde(default = "default_mask")]
    pub mask: bool,
    #[serde(default)]
    pub failure_policy: FailurePolicy,
    /// Secret store file (`{store: {key: value}}`) for the store resolver.
    pub store_file: Option<String>,
    /// Prefix for the environment resolver; unset disables it.
    pub env_prefix: Option<String>,
}

fn default_mask() -> bool {
    true
}

impl Default for SecretsConfig {
    fn default() -> Self {
        Self {
            mask: default_mask(),
            failure_policy: FailurePolicy::default(),
            store_file: None,
            env_prefix: Some(super::DEFAULT_ENV_PREFIX.to_string()),
        }
    }
}
