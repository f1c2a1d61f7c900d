//! Volume secret materialization.
//!
//! Two-step pass over a compiled spec:
//! 1. **Collect**: every secret item mounted through a volume, deduplicated
//!    under its global name `{volume}-{store}-{key}`
//! 2. **Materialize**: each distinct reference goes through a resolver and
//!    the produced secrets are appended to the spec
//!
//! The indexer turns flat secret-store query results into a name lookup.

pub mod audit;
pub mod builder;
pub mod indexer;
pub mod materializer;
pub mod resolvers;
pub mod types;

pub use audit::audit_volume_secrets;
pub use builder::{
    collect_volume_secrets, global_secret_name, volume_secret_items, VolumeSecretItemRef,
};
pub use indexer::to_secret_map;
pub use materializer::{
    apply_transforms, apply_volume_secrets, apply_volume_secrets_checked,
    with_volume_secret_func, SpecTransform,
};
pub use resolvers::{ChainResolver, EnvResolver, StoreResolver};
pub use types::{
    redact_secret, FailurePolicy, MaterializeReport, SecretNameKey, SecretRecord,
    VolumeSecretRef, VolumeSecretResolver,
};
