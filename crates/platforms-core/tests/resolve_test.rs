//! End-to-end resolution against layered TOML registries.

use std::sync::Arc;
use std::thread;

use platforms_core::{
    PlatformLookupError, PlatformRegistry, PlatformResolver, Resolution, ResolveMode, TaskConfig,
    TaskPlatform, select_host,
};

const SITE: &str = r#"
[platforms.localhost]
hosts = "localhost"
batch-system = "background"

[platforms."hpc.*"]
hosts = ["hpc-login1", "hpc-login2"]
batch-system = "pbs"
batch-submit-command-template = "qsub %(job)s"
shell = "/bin/bash"

[platforms.sugar]
batch-system = "slurm"
"#;

const USER: &str = r#"
[platforms."hpc-gpu"]
hosts = "gpu-login"
batch-system = "slurm"
"#;

fn layered() -> PlatformResolver {
    let mut registry = PlatformRegistry::from_toml_str(SITE).expect("site layer");
    registry.merge_toml_str(USER).expect("user layer");
    PlatformResolver::new(Arc::new(registry))
}

fn task(json: &str) -> TaskPlatform {
    serde_json::from_str(json).expect("task config")
}

fn resolve_platform(resolver: &PlatformResolver, task: &TaskPlatform) -> Resolution {
    resolver
        .resolve(Some(task), "model.20260101T00", ResolveMode::Strict)
        .expect("resolves")
}

#[test]
fn user_layer_wins_over_overlapping_site_pattern() {
    let resolver = layered();

    let gpu = resolver.by_name(Some("hpc-gpu")).unwrap();
    assert_eq!(gpu.batch_system, "slurm");
    assert_eq!(gpu.hosts, vec!["gpu-login"]);

    let other = resolver.by_name(Some("hpc-cpu")).unwrap();
    assert_eq!(other.name, "hpc-cpu");
    assert_eq!(other.batch_system, "pbs");
    assert_eq!(other.hosts, vec!["hpc-login1", "hpc-login2"]);
    assert_eq!(
        other.batch_submit_command_template.as_deref(),
        Some("qsub %(job)s")
    );
    assert_eq!(other.settings["shell"], "/bin/bash");
}

#[test]
fn explicit_platform_from_a_task_fragment() {
    let resolver = layered();
    let resolved = resolve_platform(&resolver, &task(r#"{"platform": "hpc-gpu"}"#));
    assert_eq!(resolved.platform().unwrap().name, "hpc-gpu");
}

#[test]
fn bare_string_task_is_a_platform_name() {
    let resolver = layered();
    let resolved = resolve_platform(&resolver, &task(r#""sugar""#));
    let platform = resolved.into_platform().unwrap();
    assert_eq!(platform.name, "sugar");
    assert_eq!(platform.hosts, vec!["sugar"]);
}

#[test]
fn legacy_host_and_batch_system_pick_a_site_platform() {
    let resolver = layered();
    let resolved = resolve_platform(
        &resolver,
        &task(r#"{"job": {"batch-system": "pbs"}, "remote": {"host": "hpc-login2"}}"#),
    );
    let platform = resolved.into_platform().unwrap();
    // rule 2 returns the pattern itself, which then matches by name
    assert_eq!(platform.name, "hpc.*");
    assert_eq!(platform.batch_system, "pbs");
}

#[test]
fn legacy_host_matching_a_pattern_becomes_the_platform() {
    let resolver = layered();
    let resolved = resolve_platform(
        &resolver,
        &task(r#"{"job": {"batch-system": "slurm"}, "remote": {"host": "sugar"}}"#),
    );
    assert_eq!(resolved.platform().unwrap().name, "sugar");
}

#[test]
fn legacy_batch_system_without_host_and_no_localhost_match_fails() {
    let resolver = layered();
    let err = resolver
        .resolve(
            Some(&task(r#"{"job": {"batch-system": "slurm"}}"#)),
            "foo",
            ResolveMode::Strict,
        )
        .unwrap_err();
    assert_eq!(err, PlatformLookupError::NoLegacyMatch);
}

#[test]
fn warn_only_returns_messages_for_callers_to_report() {
    let resolver = layered();
    let resolved = resolver
        .resolve(
            Some(&task(r#"{"remote": {"host": "hpc-login1"}}"#)),
            "foo",
            ResolveMode::WarnOnly,
        )
        .unwrap();
    let Resolution::Deprecated(deprecations) = resolved else {
        panic!("expected deprecations");
    };
    assert_eq!(deprecations.len(), 1);
    assert!(deprecations[0].to_string().contains("[runtime][foo][remote]host = hpc-login1"));
}

#[test]
fn conflict_is_reported_before_lookup() {
    let resolver = layered();
    let err = resolver
        .resolve(
            Some(&task(r#"{"platform": "nonexistent", "remote": {"host": "hpc-login1"}}"#)),
            "foo",
            ResolveMode::Strict,
        )
        .unwrap_err();
    assert!(matches!(err, PlatformLookupError::Conflict { .. }));
}

#[test]
fn mutating_a_resolved_platform_leaves_the_registry_alone() {
    let resolver = layered();
    let mut first = resolver.by_name(Some("hpc-cpu")).unwrap();
    first.hosts.clear();
    first.settings.insert("shell".into(), "/bin/zsh".into());

    let second = resolver.by_name(Some("hpc-cpu")).unwrap();
    assert_eq!(second.hosts, vec!["hpc-login1", "hpc-login2"]);
    assert_eq!(second.settings["shell"], "/bin/bash");
}

#[test]
fn concurrent_resolution_against_a_shared_registry() {
    let resolver = layered();
    let expected = resolver.by_name(Some("hpc-cpu")).unwrap();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let resolver = resolver.clone();
            thread::spawn(move || resolver.by_name(Some("hpc-cpu")).unwrap())
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().expect("thread"), expected);
    }
}

#[test]
fn host_is_selected_after_resolution() {
    let resolver = layered();
    let platform = resolve_platform(
        &resolver,
        &TaskPlatform::ByTaskFragment(TaskConfig::with_platform("hpc-cpu")),
    )
    .into_platform()
    .unwrap();

    assert_eq!(select_host(&platform, Some("first")).unwrap(), "hpc-login1");
    let random = select_host(&platform, None).unwrap();
    assert!(platform.hosts.contains(&random));
}
