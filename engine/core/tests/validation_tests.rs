// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use rulegraph_core::application::{format_validation_report, ManifestValidator};
use rulegraph_core::infrastructure::{AlwaysPresent, FileSystemProbe, ManifestParser};
use rulegraph_core::{
    CoverageReason, FindingKind, GatingPolicy, ManifestDocument, Partition, Priority, Rule, Severity,
};
use std::path::PathBuf;

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn fixture_document() -> ManifestDocument {
    let json = std::fs::read_to_string(fixtures_dir().join("manifest.json")).unwrap();
    ManifestParser::parse_json_document(&json, "fixture").unwrap()
}

// ── Integrity ──

#[test]
fn test_fixture_is_clean_on_disk() {
    let manifest = fixture_document().build().unwrap();
    let probe = FileSystemProbe::new(fixtures_dir());
    let report = ManifestValidator::new(&manifest, &probe).validate();

    assert!(report.integrity.valid, "{:?}", report.integrity.errors);
    assert!(report.integrity.warnings.is_empty(), "{:?}", report.integrity.warnings);
    assert!(report.coverage.is_complete());
    assert!(report.passes(GatingPolicy::Strict));
    assert_eq!(report.integrity.stats.total_rules, 11);
}

#[test]
fn test_dangling_cross_reference_warning() {
    let manifest = ManifestDocument::new("ARCH-000")
        .with_partition(Partition::Architecture, 1)
        .with_partition(Partition::Integration, 2)
        .with_rule(Rule::new("ARCH-000", Partition::Architecture, Priority::Absolute))
        .with_rule(
            Rule::new("INT-002", Partition::Integration, Priority::Medium)
                .with_triggers(["retry"])
                .with_cross_references(["INT-999"]),
        )
        .build()
        .unwrap();

    let report = ManifestValidator::new(&manifest, &AlwaysPresent).validate_integrity();
    assert!(report.valid);
    assert_eq!(report.warnings.len(), 1);

    let json = serde_json::to_value(&report.warnings[0]).unwrap();
    assert_eq!(json["type"], "missing_cross_reference");
    assert_eq!(report.warnings[0].severity, Severity::Warning);
}

#[test]
fn test_missing_dependency_reported_exactly_once() {
    let mut document = fixture_document();
    document
        .rules
        .get_mut("UI-001")
        .unwrap()
        .dependencies
        .push("UI-404".to_string());
    let manifest = document.build().unwrap();

    let report = ManifestValidator::new(&manifest, &AlwaysPresent).validate_integrity();
    assert!(!report.valid);
    let findings: Vec<_> = report.findings_of(FindingKind::MissingDependency).collect();
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].rule_id.as_deref(), Some("UI-001"));
    assert_eq!(findings[0].target.as_deref(), Some("UI-404"));
    assert_eq!(report.errors.len(), 1);
}

#[test]
fn test_missing_files_counted() {
    let mut document = fixture_document();
    document.rules.get_mut("HUB-001").unwrap().path = "hub/renamed.md".to_string();
    let manifest = document.build().unwrap();

    let probe = FileSystemProbe::new(fixtures_dir());
    let report = ManifestValidator::new(&manifest, &probe).validate_integrity();
    assert_eq!(report.stats.missing_files, vec!["HUB-001"]);
    assert!(!report.valid);
}

// ── Coverage ──

#[test]
fn test_single_edge_removal_uncovers_rule() {
    let manifest = fixture_document().build().unwrap();
    let coverage = ManifestValidator::new(&manifest, &AlwaysPresent).validate_routing();
    assert!(coverage.is_complete());
    assert_eq!(
        coverage.reason_for("UI-002"),
        Some(&CoverageReason::CrossReferenceFrom { rule_id: "UI-001".into() })
    );
    assert_eq!(
        coverage.reason_for("DATA-011"),
        Some(&CoverageReason::RedFlagPartition { partition: Partition::Data })
    );

    let mut document = fixture_document();
    document.rules.get_mut("UI-001").unwrap().cross_references.clear();
    let manifest = document.build().unwrap();

    let coverage = ManifestValidator::new(&manifest, &AlwaysPresent).validate_routing();
    assert_eq!(coverage.uncovered, vec!["UI-002"]);

    let report = ManifestValidator::new(&manifest, &AlwaysPresent).validate();
    assert!(!report.passes(GatingPolicy::Strict));
    assert!(report.passes(GatingPolicy::Lenient));
    assert_eq!(report.integrity.findings_of(FindingKind::OrphanRule).count(), 1);
}

#[test]
fn test_keyword_trigger_keeps_rule_covered_without_inbound_edges() {
    let document = ManifestDocument::new("ARCH-000")
        .with_partition(Partition::Architecture, 1)
        .with_partition(Partition::Ui, 2)
        .with_rule(
            Rule::new("ARCH-000", Partition::Architecture, Priority::Absolute)
                .with_triggers(["*"])
                .with_cross_references(["UI-001"]),
        )
        .with_rule(Rule::new("UI-001", Partition::Ui, Priority::Medium).with_triggers(["button"]));

    let manifest = document.clone().build().unwrap();
    let coverage = ManifestValidator::new(&manifest, &AlwaysPresent).validate_routing();
    assert!(coverage.is_complete());

    let mut document = document;
    document.rules.get_mut("ARCH-000").unwrap().cross_references.clear();
    let manifest = document.build().unwrap();

    let report = ManifestValidator::new(&manifest, &AlwaysPresent).validate();
    assert!(report.coverage.is_complete());
    assert_eq!(report.coverage.reason_for("UI-001"), Some(&CoverageReason::KeywordTrigger));
    assert_eq!(report.integrity.findings_of(FindingKind::OrphanRule).count(), 0);
    assert!(report.passes(GatingPolicy::Strict));
}

#[test]
fn test_red_flag_makes_trigger_less_partition_reachable() {
    let mut document = fixture_document();
    document.rules.get_mut("INT-001").unwrap().dependencies.clear();
    let manifest = document.build().unwrap();

    // INT-002 stays covered through the payment|billing red flag
    let coverage = ManifestValidator::new(&manifest, &AlwaysPresent).validate_routing();
    assert!(coverage.is_complete());
    assert_eq!(
        coverage.reason_for("INT-002"),
        Some(&CoverageReason::RedFlagPartition {
            partition: Partition::Integration
        })
    );
}

// ── Report formatting ──

#[test]
fn test_report_format_is_stable() {
    let manifest = fixture_document().build().unwrap();
    let probe = FileSystemProbe::new(fixtures_dir());
    let report = ManifestValidator::new(&manifest, &probe).validate();

    let expected = "\
Integrity: VALID
Total rules: 11
Rules per partition:
  shared: 1
  architecture: 2
  hub: 1
  apps: 1
  data: 2
  ui: 2
  integration: 2
Missing files: (none)
Errors: (none)
Warnings: (none)

Coverage: COMPLETE
Covered: 11/11
Uncovered: (none)
";
    assert_eq!(format_validation_report(&report), expected);

    let again = ManifestValidator::new(&manifest, &probe).validate();
    assert_eq!(format_validation_report(&again), expected);
}
