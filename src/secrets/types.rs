//! Core types for volume secret materialization.

use crate::engine::Secret;
use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

// ============================================================================
// Reference types
// ============================================================================

/// Store entry name and the key within it that a volume needs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SecretNameKey {
    /// Name of the secret-store entry.
    pub name: String,
    /// Key within the entry.
    pub key: String,
}

impl SecretNameKey {
    pub fn new(name: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            key: key.into(),
        }
    }
}

/// A named secret as returned by an external store query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretRecord {
    pub name: String,
    pub data: String,
}

impl SecretRecord {
    pub fn new(name: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
        }
    }
}

/// A deduplicated volume secret reference, with the steps that mount it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeSecretRef {
    pub global_name: String,
    pub volume: String,
    pub store: String,
    pub key: String,
    pub steps: Vec<String>,
}

// ============================================================================
// Resolver trait
// ============================================================================

/// Turns a volume secret reference into a materialized engine secret.
///
/// `resolve` returning `None` means the secret is not materialized; this is
/// never an error at the transform layer. Resolvers that can tell a genuine
/// failure apart from absence should also override `try_resolve`.
pub trait VolumeSecretResolver {
    fn resolve(&self, name: &str, store: &str, key: &str) -> Option<Secret>;

    /// Fallible variant used by the checked transform.
    fn try_resolve(&self, name: &str, store: &str, key: &str) -> Result<Option<Secret>, Error> {
        Ok(self.resolve(name, store, key))
    }
}

impl<F> VolumeSecretResolver for F
where
    F: Fn(&str, &str, &str) -> Option<Secret>,
{
    fn resolve(&self, name: &str, store: &str, key: &str) -> Option<Secret> {
        self(name, store, key)
    }
}

/// What the checked transform does when a resolver reports a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Log the failure and continue without that secret.
    #[default]
    Skip,
    /// Stop at the first failure and leave the spec untouched.
    Abort,
}

impl FromStr for FailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "skip" => Ok(FailurePolicy::Skip),
            "abort" => Ok(FailurePolicy::Abort),
            other => Err(format!("unknown failure policy '{other}'")),
        }
    }
}

/// Outcome counts of a checked materialization pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterializeReport {
    pub resolved: usize,
    pub absent: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failed: Vec<String>,
}

impl MaterializeReport {
    pub fn total(&self) -> usize {
        self.resolved + self.absent + self.failed.len()
    }
}

/// Redact a secret value for display (first 2 and last 2 chars).
pub fn redact_secret(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    if chars.len() <= 6 {
        return "***".to_string();
    }
    let head: String = chars[..2].iter().collect();
    let tail: String = chars[chars.len() - 2..].iter().collect();
    format!("{head}…{tail}")
}
