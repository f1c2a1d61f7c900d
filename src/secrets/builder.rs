//! Collects the distinct set of volume secret references in a spec.

use super::types::SecretNameKey;
use crate::engine::Spec;
use std::collections::BTreeMap;
use tracing::debug;

/// Name under which a volume's secret item is materialized in the engine's
/// flat secret namespace.
pub fn global_secret_name(volume: &str, store: &str, key: &str) -> String {
    format!("{volume}-{store}-{key}")
}

/// One secret item as declared on a volume, borrowed from the spec.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VolumeSecretItemRef<'a> {
    pub volume: &'a str,
    pub store: &'a str,
    pub key: &'a str,
}

impl VolumeSecretItemRef<'_> {
    pub fn global_name(&self) -> String {
        global_secret_name(self.volume, self.store, self.key)
    }
}

/// Every secret item mounted through a volume, in declaration order.
///
/// Repeated declarations are yielded as often as they appear.
pub fn volume_secret_items(spec: &Spec) -> impl Iterator<Item = VolumeSecretItemRef<'_>> {
    spec.docker
        .iter()
        .flat_map(|docker| docker.volumes.iter())
        .filter_map(|vol| vol.secret.as_ref().map(|secret| (vol, secret)))
        .flat_map(|(vol, secret)| {
            secret.items.iter().map(move |item| VolumeSecretItemRef {
                volume: &vol.metadata.name,
                store: &secret.name,
                key: &item.key,
            })
        })
}

/// Map every secret item mounted through a volume to its global name.
///
/// Identical (volume, store, key) triples land on the same map key, so each
/// appears once however many steps mount the volume. Specs without a docker
/// sub-spec yield an empty map.
pub fn collect_volume_secrets(spec: &Spec) -> BTreeMap<String, SecretNameKey> {
    let mut set = BTreeMap::new();

    for item in volume_secret_items(spec) {
        let name = item.global_name();
        debug!(
            "Volume '{}' references secret '{}' key '{}' as '{}'",
            item.volume, item.store, item.key, name
        );
        set.insert(name, SecretNameKey::new(item.store, item.key));
    }

    set
}
