//! Engine-facing spec types.
//!
//! These mirror the shape a container execution engine consumes: a compiled
//! spec with its steps, the docker sub-spec holding declared volumes, and the
//! flat list of secrets the engine injects at runtime.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Identifying metadata shared by specs, steps, volumes and secrets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub uid: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub namespace: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
}

impl Metadata {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

/// Compiled execution unit handed to the engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Spec {
    #[serde(default)]
    pub metadata: Metadata,
    #[serde(default)]
    pub steps: Vec<Step>,
    /// Container platform sub-spec. Absent for non-container engines.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub docker: Option<DockerConfig>,
    #[serde(default)]
    pub secrets: Vec<Secret>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DockerConfig {
    #[serde(default)]
    pub volumes: Vec<Volume>,
}

/// A named mount declaration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Volume {
    pub metadata: Metadata,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub empty_dir: Option<VolumeEmptyDir>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host_path: Option<VolumeHostPath>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret: Option<VolumeSecret>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeEmptyDir {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medium: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_limit: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeHostPath {
    pub path: String,
}

/// Secret-store entry projected into a volume.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeSecret {
    /// Name of the entry in the secret store.
    pub name: String,
    #[serde(default)]
    pub items: Vec<VolumeSecretItem>,
}

/// A single key of a store entry, projected as a file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeSecretItem {
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    pub metadata: Metadata,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub image: String,
    #[serde(default)]
    pub volumes: Vec<VolumeMount>,
}

/// Reference from a step to a declared volume.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeMount {
    pub name: String,
    pub path: String,
}

/// Materialized secret injected by the engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Secret {
    pub metadata: Metadata,
    pub data: String,
    /// Whether the engine should mask the value in step output.
    #[serde(default)]
    pub mask: bool,
}

impl Secret {
    pub fn new(name: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            metadata: Metadata::named(name),
            data: data.into(),
            mask: false,
        }
    }

    pub fn masked(mut self, mask: bool) -> Self {
        self.mask = mask;
        self
    }

    pub fn name(&self) -> &str {
        &self.metadata.name
    }
}
