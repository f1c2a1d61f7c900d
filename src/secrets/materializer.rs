//! Resolves collected volume secrets and appends them to the spec.

use super::builder::collect_volume_secrets;
use super::types::{FailurePolicy, MaterializeReport, VolumeSecretResolver};
use crate::engine::Spec;
use crate::error::{Error, Result};
use tracing::{debug, info, warn};

/// A transform applied to a compiled spec before it reaches the engine.
pub type SpecTransform = Box<dyn Fn(&mut Spec) + Send + Sync>;

/// Materialize every volume secret referenced by `spec`.
///
/// The resolver is called once per distinct global name. `Some` results are
/// appended to `spec.secrets`; `None` results are skipped.
pub fn apply_volume_secrets<R>(spec: &mut Spec, resolver: &R)
where
    R: VolumeSecretResolver + ?Sized,
{
    let set = collect_volume_secrets(spec);
    if set.is_empty() {
        return;
    }
    info!("Found {} volume secret reference(s) in spec", set.len());

    let before = spec.secrets.len();
    for (name, reference) in &set {
        match resolver.resolve(name, &reference.name, &reference.key) {
            Some(secret) => spec.secrets.push(secret),
            None => debug!("Volume secret '{}' not materialized", name),
        }
    }

    info!(
        "Volume secrets materialized: {} of {}",
        spec.secrets.len() - before,
        set.len()
    );
}

/// Package [`apply_volume_secrets`] as a reusable transform.
pub fn with_volume_secret_func<R>(resolver: R) -> SpecTransform
where
    R: VolumeSecretResolver + Send + Sync + 'static,
{
    Box::new(move |spec: &mut Spec| apply_volume_secrets(spec, &resolver))
}

/// Run transforms over a spec in order.
pub fn apply_transforms(spec: &mut Spec, transforms: &[SpecTransform]) {
    for transform in transforms {
        transform(spec);
    }
}

/// Like [`apply_volume_secrets`], but honours resolver failures.
///
/// Under [`FailurePolicy::Abort`] the first failure is returned and the
/// spec's secret list is left exactly as it was.
pub fn apply_volume_secrets_checked<R>(
    spec: &mut Spec,
    resolver: &R,
    policy: FailurePolicy,
) -> Result<MaterializeReport>
where
    R: VolumeSecretResolver + ?Sized,
{
    let set = collect_volume_secrets(spec);
    let mut report = MaterializeReport::default();
    if set.is_empty() {
        return Ok(report);
    }
    info!("Found {} volume secret reference(s) in spec", set.len());

    let mut staged = Vec::with_capacity(set.len());
    for (name, reference) in &set {
        match resolver.try_resolve(name, &reference.name, &reference.key) {
            Ok(Some(secret)) => {
                staged.push(secret);
                report.resolved += 1;
            }
            Ok(None) => {
                debug!("Volume secret '{}' not materialized", name);
                report.absent += 1;
            }
            Err(e) => match policy {
                FailurePolicy::Abort => {
                    return Err(match e {
                        Error::Resolve { .. } => e,
                        other => Error::Resolve {
                            name: name.clone(),
                            message: other.to_string(),
                        },
                    });
                }
                FailurePolicy::Skip => {
                    warn!("Skipping volume secret '{}': {}", name, e);
                    report.failed.push(name.clone());
                }
            },
        }
    }

    spec.secrets.extend(staged);
    info!(
        "Volume secret resolution complete: {} resolved, {} absent, {} failed",
        report.resolved,
        report.absent,
        report.failed.len()
    );

    Ok(report)
}
