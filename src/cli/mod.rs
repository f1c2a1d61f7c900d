use crate::config::Config;
use crate::engine::{read_spec, Spec};
use crate::secrets::{
    apply_volume_secrets_checked, audit_volume_secrets, redact_secret, FailurePolicy,
    MaterializeReport, VolumeSecretRef,
};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(
    name = "volsecrets",
    version,
    about = "Materialize volume-mounted secrets into compiled pipeline specs"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the volume secrets a spec references, without resolving them.
    Audit(AuditOpts),
    /// Resolve volume secrets and write the updated spec.
    Apply(ApplyOpts),
    Config(ConfigOpts),
    Version,
}

#[derive(clap::Args)]
pub struct AuditOpts {
    #[arg(short, long, env = "VOLSECRETS_CONFIG")]
    pub config: Option<String>,
    pub spec: PathBuf,
    /// Print the report as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(clap::Args)]
pub struct ApplyOpts {
    #[arg(short, long, env = "VOLSECRETS_CONFIG")]
    pub config: Option<String>,
    pub spec: PathBuf,
    /// Secret store file, overriding `secrets.storeFile`.
    #[arg(short, long)]
    pub store: Option<String>,
    /// Write the spec here instead of stdout (format by extension).
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    /// Abort on the first resolver failure.
    #[arg(long)]
    pub strict: bool,
    /// Show the secrets that would be added, values redacted.
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(clap::Args)]
pub struct ConfigOpts {
    #[arg(short, long, env = "VOLSECRETS_CONFIG")]
    pub config: Option<String>,
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    Show,
    Validate,
    Init,
}

/// Read a spec and list its volume secret references.
pub fn run_audit(opts: &AuditOpts) -> Result<Vec<VolumeSecretRef>> {
    let spec = read_spec(&opts.spec)
        .with_context(|| format!("Failed to load spec '{}'", opts.spec.display()))?;
    Ok(audit_volume_secrets(&spec))
}

/// Read a spec, materialize its volume secrets and return the result.
///
/// The spec is not written anywhere; callers decide where it goes.
pub fn run_apply(opts: &ApplyOpts, config: &Config) -> Result<(Spec, MaterializeReport)> {
    let mut spec = read_spec(&opts.spec)
        .with_context(|| format!("Failed to load spec '{}'", opts.spec.display()))?;

    let mut config = config.clone();
    if let Some(ref store) = opts.store {
        config.secrets.store_file = Some(store.clone());
    }
    let policy = if opts.strict {
        FailurePolicy::Abort
    } else {
        config.secrets.failure_policy
    };

    let resolver = config.build_resolver()?;
    let report = apply_volume_secrets_checked(&mut spec, &resolver, policy)?;
    info!(
        "Spec '{}' now carries {} secret(s)",
        spec.metadata.name,
        spec.secrets.len()
    );

    Ok((spec, report))
}

/// One line per audited reference: `name  store/key  steps`.
pub fn format_audit(refs: &[VolumeSecretRef]) -> String {
    refs.iter()
        .map(|r| {
            let steps = if r.steps.is_empty() {
                "-".to_string()
            } else {
                r.steps.join(",")
            };
            format!("{}\t{}/{}\t{}", r.global_name, r.store, r.key, steps)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Redacted listing of secrets added to `spec` beyond the first `before`.
pub fn format_dry_run(spec: &Spec, before: usize) -> String {
    spec.secrets
        .iter()
        .skip(before)
        .map(|s| format!("{}\t{}", s.name(), redact_secret(&s.data)))
        .collect::<Vec<_>>()
        .join("\n")
}
