//! Attaching remediation text to diagnostic results.

use std::fs;
use std::path::Path;

use kubemedic_core::{
    AnalysisReport, DiagnosticResult, Failure, IndexRecord, KnowledgeBase, ResolutionPolicy,
    Resolver,
};

fn record(pattern: &str, file: &str) -> IndexRecord {
    IndexRecord {
        pattern: pattern.to_string(),
        file: file.to_string(),
    }
}

fn kb_with(dir: &Path, entries: &[(&str, &str, Option<&str>)]) -> KnowledgeBase {
    let mut records = Vec::new();
    for (pattern, file, body) in entries {
        if let Some(body) = body {
            fs::write(dir.join(file), body).unwrap();
        }
        records.push(record(pattern, file));
    }
    KnowledgeBase::from_records(dir, records).unwrap()
}

fn pod(failures: &[&str]) -> DiagnosticResult {
    DiagnosticResult::new(
        "Pod",
        "ns1",
        "pod-a",
        failures.iter().map(|t| Failure::new(*t)).collect(),
    )
}

#[test]
fn crashloop_template_is_filled_in() {
    let dir = tempfile::tempdir().unwrap();
    let kb = kb_with(
        dir.path(),
        &[(
            "CrashLoopBackOff: (.*)",
            "crashloop.txt",
            Some("Pod {{resource}} in {{namespace}} is restarting. See {{1}}."),
        )],
    );

    let resolved = Resolver::new(&kb).resolve(pod(&["CrashLoopBackOff: exit code 137"]));
    assert!(resolved.warning.is_none());
    assert_eq!(
        resolved.result.details(),
        "Pod pod-a in ns1 is restarting. See exit code 137."
    );
    assert_eq!(resolved.result.resolution_ref(), "crashloop.txt");
}

#[test]
fn only_first_failure_is_considered_by_default() {
    let dir = tempfile::tempdir().unwrap();
    let kb = kb_with(dir.path(), &[("OOMKilled", "oom.txt", Some("oom"))]);

    let resolved = Resolver::new(&kb).resolve(pod(&["image pull failed", "OOMKilled"]));
    assert_eq!(resolved.result.details(), "");
    assert_eq!(resolved.result.resolution_ref(), "");
}

#[test]
fn first_matching_failure_policy_scans_all_failures() {
    let dir = tempfile::tempdir().unwrap();
    let kb = kb_with(dir.path(), &[("OOMKilled", "oom.txt", Some("{{resource}} ran out"))]);

    let resolved = Resolver::new(&kb)
        .with_policy(ResolutionPolicy::FirstMatchingFailure)
        .resolve(pod(&["image pull failed", "OOMKilled"]));
    assert_eq!(resolved.result.details(), "pod-a ran out");
    assert_eq!(resolved.result.resolution_ref(), "oom.txt");
}

#[test]
fn result_without_failures_is_left_empty() {
    let dir = tempfile::tempdir().unwrap();
    let kb = kb_with(dir.path(), &[(".*", "any.txt", Some("anything"))]);

    let resolved = Resolver::new(&kb).resolve(pod(&[]));
    assert_eq!(resolved.result.details(), "");
    assert_eq!(resolved.result.resolution_ref(), "");
    assert!(resolved.warning.is_none());
}

#[test]
fn match_without_capture_groups_still_resolves() {
    let dir = tempfile::tempdir().unwrap();
    let kb = kb_with(dir.path(), &[("no endpoints", "svc.txt", Some("check {{1}}"))]);

    let resolved = Resolver::new(&kb).resolve(pod(&["Service has no endpoints"]));
    assert_eq!(resolved.result.details(), "check {{1}}");
}

#[test]
fn unreadable_template_becomes_warning_and_keeps_ref() {
    let dir = tempfile::tempdir().unwrap();
    let kb = kb_with(dir.path(), &[("CrashLoopBackOff", "missing.txt", None)]);

    let resolved = Resolver::new(&kb).resolve(pod(&["CrashLoopBackOff"]));
    assert_eq!(resolved.result.details(), "");
    assert_eq!(resolved.result.resolution_ref(), "missing.txt");
    let warning = resolved.warning.expect("template warning");
    assert_eq!(warning.path, dir.path().join("missing.txt"));
}

#[test]
fn resolve_all_collects_warnings_in_result_order() {
    let dir = tempfile::tempdir().unwrap();
    let kb = kb_with(
        dir.path(),
        &[
            ("OOMKilled", "oom.txt", Some("oom")),
            ("CrashLoopBackOff", "gone.txt", None),
        ],
    );

    let mut report = AnalysisReport::new("").with_results(vec![
        pod(&["OOMKilled"]),
        pod(&["CrashLoopBackOff"]),
        pod(&["unknown"]),
    ]);
    report.resolve_all(&Resolver::new(&kb));

    let refs: Vec<&str> = report.results.iter().map(|r| r.resolution_ref()).collect();
    assert_eq!(refs, vec!["oom.txt", "gone.txt", ""]);
    assert_eq!(report.results[0].details(), "oom");
    assert_eq!(report.warnings.len(), 1);
    assert!(report.warnings[0].contains("gone.txt"));
}

#[test]
fn resolver_is_shared_across_threads() {
    let dir = tempfile::tempdir().unwrap();
    let kb = kb_with(dir.path(), &[("OOMKilled", "oom.txt", Some("{{namespace}}"))]);
    let resolver = Resolver::new(&kb);

    std::thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|i| {
                s.spawn(move || {
                    let failures = vec![Failure::new("OOMKilled")];
                    let result = DiagnosticResult::new("Pod", format!("ns{}", i), "p", failures);
                    resolver.resolve(result).result.details().to_string()
                })
            })
            .collect();
        let details: Vec<String> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(details, vec!["ns0", "ns1", "ns2", "ns3"]);
    });
}
