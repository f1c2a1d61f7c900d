//! Read-only listing of the volume secrets a spec would materialize.

use super::builder::volume_secret_items;
use super::types::VolumeSecretRef;
use crate::engine::Spec;
use std::collections::BTreeMap;
use tracing::info;

/// List each distinct volume secret reference with the steps that mount it.
///
/// Nothing is resolved. Entries are ordered by global name.
pub fn audit_volume_secrets(spec: &Spec) -> Vec<VolumeSecretRef> {
    let mut refs: BTreeMap<String, VolumeSecretRef> = BTreeMap::new();

    for item in volume_secret_items(spec) {
        refs.entry(item.global_name())
            .or_insert_with_key(|global_name| VolumeSecretRef {
                global_name: global_name.clone(),
                volume: item.volume.to_string(),
                store: item.store.to_string(),
                key: item.key.to_string(),
                steps: mounting_steps(spec, item.volume),
            });
    }

    info!("Secrets audit: found {} volume secret reference(s)", refs.len());
    refs.into_values().collect()
}

fn mounting_steps(spec: &Spec, volume: &str) -> Vec<String> {
    spec.steps
        .iter()
        .filter(|step| step.volumes.iter().any(|m| m.name == volume))
        .map(|step| step.metadata.name.clone())
        .collect()
}
