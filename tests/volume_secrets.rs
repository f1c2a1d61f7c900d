//! Integration tests for volume secret materialization.
//!
//! These exercise the full path from a compiled spec on disk through the
//! configured resolver chain to the updated spec, plus the scenarios the
//! transform must hold for any resolver.

use pretty_assertions::assert_eq;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

use volsecrets::cli::{run_apply, run_audit, ApplyOpts, AuditOpts};
use volsecrets::config::{Config, SecretsConfig};
use volsecrets::engine::{
    read_spec, write_spec, DockerConfig, Metadata, Secret, Spec, Step, Volume, VolumeMount,
    VolumeSecret, VolumeSecretItem,
};
use volsecrets::secrets::{
    apply_volume_secrets, global_secret_name, to_secret_map, with_volume_secret_func,
    SecretRecord, StoreResolver,
};

// ============================================================================
// Fixtures
// ============================================================================

fn secret_volume(name: &str, store: &str, keys: &[&str]) -> Volume {
    Volume {
        metadata: Metadata::named(name),
        secret: Some(VolumeSecret {
            name: store.into(),
            items: keys
                .iter()
                .map(|k| VolumeSecretItem {
                    key: (*k).into(),
                    path: Some(format!("{k}.pem")),
                    mode: Some(0o400),
                })
                .collect(),
        }),
        ..Default::default()
    }
}

fn mounting_step(name: &str, volume: &str) -> Step {
    Step {
        metadata: Metadata::named(name),
        image: "alpine:3".into(),
        volumes: vec![VolumeMount {
            name: volume.into(),
            path: "/etc/tls".into(),
        }],
    }
}

/// One `certs` volume backed by store `tls`, mounted by two steps.
fn certs_spec() -> Spec {
    Spec {
        metadata: Metadata::named("pipeline-42"),
        steps: vec![mounting_step("build", "certs"), mounting_step("deploy", "certs")],
        docker: Some(DockerConfig {
            volumes: vec![secret_volume("certs", "tls", &["crt", "key"])],
        }),
        secrets: Vec::new(),
    }
}

fn secret_names(spec: &Spec) -> Vec<String> {
    spec.secrets.iter().map(|s| s.name().to_string()).collect()
}

// ============================================================================
// Transform properties
// ============================================================================

#[test]
fn end_to_end_two_steps_one_volume() {
    let mut spec = certs_spec();
    let calls = RefCell::new(Vec::new());
    let resolver = |name: &str, store: &str, key: &str| {
        calls.borrow_mut().push(name.to_string());
        Some(Secret::new(name, format!("{store}:{key}")))
    };

    apply_volume_secrets(&mut spec, &resolver);

    let mut names = secret_names(&spec);
    names.sort();
    assert_eq!(names, vec!["certs-tls-crt", "certs-tls-key"]);
    assert_eq!(calls.borrow().len(), 2);
    assert_eq!(spec.secrets.len(), 2);
}

#[test]
fn repeated_volume_declarations_resolve_once() {
    let mut spec = certs_spec();
    if let Some(docker) = spec.docker.as_mut() {
        docker
            .volumes
            .push(secret_volume("certs", "tls", &["crt", "key"]));
    }
    let counts: RefCell<HashMap<String, usize>> = RefCell::new(HashMap::new());
    let resolver = |name: &str, _: &str, _: &str| {
        *counts.borrow_mut().entry(name.to_string()).or_default() += 1;
        Some(Secret::new(name, "v"))
    };

    apply_volume_secrets(&mut spec, &resolver);

    assert!(counts.borrow().values().all(|&n| n == 1));
    assert_eq!(spec.secrets.len(), 2);
}

#[test]
fn no_docker_spec_is_unchanged() {
    let mut spec = Spec {
        docker: None,
        secrets: vec![Secret::new("plain", "x")],
        ..certs_spec()
    };
    let before = spec.clone();

    with_volume_secret_func(|name: &str, _: &str, _: &str| Some(Secret::new(name, "v")))(
        &mut spec,
    );

    assert_eq!(spec, before);
}

#[test]
fn volume_declarations_are_not_mutated() {
    let mut spec = certs_spec();
    let volumes_before = spec.docker.clone();

    apply_volume_secrets(&mut spec, &|name: &str, _: &str, _: &str| {
        Some(Secret::new(name, "v"))
    });

    assert_eq!(spec.docker, volumes_before);
}

#[test]
fn naming_is_deterministic() {
    assert_eq!(
        global_secret_name("app", "db-creds", "password"),
        "app-db-creds-password"
    );
}

#[test]
fn indexer_last_write_wins() {
    let records = vec![
        SecretRecord::new("a", "1"),
        SecretRecord::new("b", "2"),
        SecretRecord::new("a", "3"),
    ];
    let map = to_secret_map(&records);

    assert_eq!(map.len(), 2);
    assert_eq!(map["a"], "3");
    assert_eq!(map["b"], "2");
}

#[test]
fn store_built_from_records_feeds_transform() {
    let records = vec![
        SecretRecord::new("tls/crt", "CERT"),
        SecretRecord::new("tls/key", "KEY"),
    ];
    let resolver = StoreResolver::from_records(&records).with_mask(true);
    let mut spec = certs_spec();

    apply_volume_secrets(&mut spec, &resolver);

    assert_eq!(secret_names(&spec), vec!["certs-tls-crt", "certs-tls-key"]);
    assert_eq!(spec.secrets[0].data, "CERT");
    assert!(spec.secrets.iter().all(|s| s.mask));
}

// ============================================================================
// CLI flow
// ============================================================================

fn write_fixture(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

fn store_only_config(store: &PathBuf) -> Config {
    Config {
        secrets: SecretsConfig {
            store_file: Some(store.display().to_string()),
            env_prefix: None,
            ..Default::default()
        },
        ..Default::default()
    }
}

fn apply_opts(spec: PathBuf) -> ApplyOpts {
    ApplyOpts {
        config: None,
        spec,
        store: None,
        output: None,
        strict: false,
        dry_run: false,
    }
}

#[test]
fn cli_apply_resolves_from_store_file() {
    let dir = TempDir::new().unwrap();
    let spec_path = dir.path().join("spec.yaml");
    write_spec(&spec_path, &certs_spec()).unwrap();
    let store = write_fixture(&dir, "store.yaml", "tls:\n  crt: CERT\n");

    let (spec, report) = run_apply(&apply_opts(spec_path), &store_only_config(&store)).unwrap();

    assert_eq!(report.resolved, 1);
    assert_eq!(report.absent, 1);
    assert_eq!(secret_names(&spec), vec!["certs-tls-crt"]);
    assert_eq!(spec.secrets[0].data, "CERT");
}

#[test]
fn cli_apply_store_flag_overrides_config() {
    let dir = TempDir::new().unwrap();
    let spec_path = dir.path().join("spec.json");
    write_spec(&spec_path, &certs_spec()).unwrap();
    let configured = write_fixture(&dir, "configured.json", r#"{"tls": {}}"#);
    let flagged = write_fixture(&dir, "flagged.json", r#"{"tls": {"crt": "A", "key": "B"}}"#);

    let mut opts = apply_opts(spec_path);
    opts.store = Some(flagged.display().to_string());
    let (spec, report) = run_apply(&opts, &store_only_config(&configured)).unwrap();

    assert_eq!(report.resolved, 2);
    assert_eq!(spec.secrets.len(), 2);
}

#[test]
fn cli_apply_written_output_reads_back() {
    let dir = TempDir::new().unwrap();
    let spec_path = dir.path().join("spec.json");
    write_spec(&spec_path, &certs_spec()).unwrap();
    let store = write_fixture(&dir, "store.json", r#"{"tls": {"crt": "A", "key": "B"}}"#);

    let (spec, _) = run_apply(&apply_opts(spec_path), &store_only_config(&store)).unwrap();
    let out = dir.path().join("out.yaml");
    write_spec(&out, &spec).unwrap();

    assert_eq!(read_spec(&out).unwrap(), spec);
}

#[test]
fn cli_apply_missing_spec_fails() {
    let dir = TempDir::new().unwrap();
    let store = write_fixture(&dir, "store.json", "{}");

    let err = run_apply(
        &apply_opts(dir.path().join("missing.json")),
        &store_only_config(&store),
    )
    .unwrap_err();

    assert!(err.to_string().contains("Failed to load spec"));
}

#[test]
fn cli_audit_lists_references() {
    let dir = TempDir::new().unwrap();
    let spec_path = dir.path().join("spec.json");
    write_spec(&spec_path, &certs_spec()).unwrap();

    let refs = run_audit(&AuditOpts {
        config: None,
        spec: spec_path,
        json: false,
    })
    .unwrap();

    assert_eq!(refs.len(), 2);
    assert_eq!(refs[0].global_name, "certs-tls-crt");
    assert_eq!(refs[0].steps, vec!["build", "deploy"]);
}
