//! Built-in volume secret resolvers.
//!
//! - [`StoreResolver`]: in-memory `store -> key -> value` table, loadable
//!   from a JSON or YAML file or from flat `store/key` secret records.
//! - [`EnvResolver`]: reads `{PREFIX}{STORE}_{KEY}` from the environment.
//! - [`ChainResolver`]: first resolver that produces a secret wins.

use super::indexer::to_secret_map;
use super::types::{SecretRecord, VolumeSecretResolver};
use crate::engine::{read_to_string_bounded, Secret};
use crate::error::{Error, Result};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, warn};

// ============================================================================
// Store resolver
// ============================================================================

/// Maximum size for a secret store file (1 MB).
pub const MAX_STORE_FILE_BYTES: u64 = 1024 * 1024;

/// Resolves secrets from an in-memory copy of a secret store.
#[derive(Debug, Clone, Default)]
pub struct StoreResolver {
    entries: HashMap<String, HashMap<String, String>>,
    mask: bool,
}

impl StoreResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark produced secrets as masked.
    pub fn with_mask(mut self, mask: bool) -> Self {
        self.mask = mask;
        self
    }

    pub fn insert(&mut self, store: impl Into<String>, key: impl Into<String>, value: impl Into<String>) {
        self.entries
            .entry(store.into())
            .or_default()
            .insert(key.into(), value.into());
    }

    /// Build from records named `store/key`. Records without a `/` are ignored.
    pub fn from_records(records: &[SecretRecord]) -> Self {
        let mut resolver = Self::new();
        for (name, data) in to_secret_map(records) {
            match name.split_once('/') {
                Some((store, key)) if !store.is_empty() && !key.is_empty() => {
                    resolver.insert(store, key, data);
                }
                _ => warn!("Ignoring secret record '{}': expected 'store/key'", name),
            }
        }
        resolver
    }

    /// Load a store file shaped `{ "<store>": { "<key>": "<value>" } }`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = read_to_string_bounded(path, MAX_STORE_FILE_BYTES)?;
        let entries: HashMap<String, HashMap<String, String>> =
            match path.extension().and_then(|e| e.to_str()) {
                Some("yaml") | Some("yml") => {
                    serde_yaml::from_str(&content).map_err(|e| Error::parse(path, e))?
                }
                _ => serde_json::from_str(&content).map_err(|e| Error::parse(path, e))?,
            };
        debug!(
            "Loaded {} secret store entr(ies) from {}",
            entries.len(),
            path.display()
        );
        Ok(Self {
            entries,
            mask: false,
        })
    }

    pub fn len(&self) -> usize {
        self.entries.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl VolumeSecretResolver for StoreResolver {
    fn resolve(&self, name: &str, store: &str, key: &str) -> Option<Secret> {
        let value = self.entries.get(store)?.get(key)?;
        Some(Secret::new(name, value.as_str()).masked(self.mask))
    }
}

// ============================================================================
// Environment resolver
// ============================================================================

/// Resolves secrets from environment variables.
#[derive(Debug, Clone, Default)]
pub struct EnvResolver {
    prefix: String,
    mask: bool,
}

impl EnvResolver {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            mask: false,
        }
    }

    pub fn with_mask(mut self, mask: bool) -> Self {
        self.mask = mask;
        self
    }

    /// Environment variable consulted for `store`/`key`.
    pub fn var_name(&self, store: &str, key: &str) -> String {
        let raw = format!("{}_{}", store, key);
        let sanitized: String = raw
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() {
                    c.to_ascii_uppercase()
                } else {
                    '_'
                }
            })
            .collect();
        format!("{}{}", self.prefix, sanitized)
    }
}

impl VolumeSecretResolver for EnvResolver {
    fn resolve(&self, name: &str, store: &str, key: &str) -> Option<Secret> {
        self.try_resolve(name, store, key).ok().flatten()
    }

    fn try_resolve(&self, name: &str, store: &str, key: &str) -> Result<Option<Secret>> {
        let var = self.var_name(store, key);
        match std::env::var(&var) {
            Ok(value) if !value.is_empty() => {
                Ok(Some(Secret::new(name, value).masked(self.mask)))
            }
            Ok(_) | Err(std::env::VarError::NotPresent) => {
                debug!("Environment variable '{}' is not set", var);
                Ok(None)
            }
            Err(std::env::VarError::NotUnicode(_)) => Err(Error::Resolve {
                name: name.to_string(),
                message: format!("environment variable '{var}' is not valid unicode"),
            }),
        }
    }
}

// ============================================================================
// Chain resolver
// ============================================================================

/// Tries each resolver in order.
#[derive(Default)]
pub struct ChainResolver {
    resolvers: Vec<Box<dyn VolumeSecretResolver + Send + Sync>>,
}

impl ChainResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push<R>(mut self, resolver: R) -> Self
    where
        R: VolumeSecretResolver + Send + Sync + 'static,
    {
        self.resolvers.push(Box::new(resolver));
        self
    }

    pub fn len(&self) -> usize {
        self.resolvers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resolvers.is_empty()
    }
}

impl VolumeSecretResolver for ChainResolver {
    fn resolve(&self, name: &str, store: &str, key: &str) -> Option<Secret> {
        self.resolvers
            .iter()
            .find_map(|r| r.resolve(name, store, key))
    }

    fn try_resolve(&self, name: &str, store: &str, key: &str) -> Result<Option<Secret>> {
        for (idx, resolver) in self.resolvers.iter().enumerate() {
            if let Some(secret) = resolver.try_resolve(name, store, key)? {
                debug!("Volume secret '{}' resolved by resolver #{}", name, idx);
                return Ok(Some(secret));
            }
        }
        Ok(None)
    }
}
