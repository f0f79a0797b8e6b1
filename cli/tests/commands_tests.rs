// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use rulegraph_cli::commands::config::{render_config, sample_config};
use rulegraph_cli::commands::route::render_route;
use rulegraph_cli::commands::rule::{parse_partition, render_rule_table};
use rulegraph_cli::commands::validate::run_validation;
use rulegraph_cli::commands::Overrides;
use rulegraph_core::{EngineConfig, GatingPolicy, Partition};
use std::path::PathBuf;
use tempfile::TempDir;

fn fixture_manifest() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../engine/core/tests/fixtures/manifest.json")
}

/// Explicit config file so discovery never picks up a stray `./rulegraph.yaml`.
fn overrides_with_config(dir: &TempDir, yaml: &str) -> Overrides {
    let path = dir.path().join("rulegraph.yaml");
    std::fs::write(&path, yaml).unwrap();
    Overrides {
        config: Some(path),
        manifest: None,
    }
}

// ── Overrides ──

#[test]
fn test_manifest_flag_wins_over_config_file() {
    let dir = TempDir::new().unwrap();
    let mut overrides = overrides_with_config(&dir, "manifestPath: nowhere/manifest.json\ngating: lenient\n");
    overrides.manifest = Some(fixture_manifest());

    let config = overrides.load_config().unwrap();
    assert_eq!(config.manifest_path, fixture_manifest());
    assert_eq!(config.gating, GatingPolicy::Lenient);
}

#[test]
fn test_explicit_config_must_exist() {
    let overrides = Overrides {
        config: Some(PathBuf::from("/nonexistent/rulegraph.yaml")),
        manifest: None,
    };
    let err = overrides.load_config().unwrap_err();
    assert!(format!("{:#}", err).contains("Failed to load configuration"));
}

#[test]
fn test_start_service_against_fixture() {
    let dir = TempDir::new().unwrap();
    let mut overrides = overrides_with_config(&dir, sample_config(false));
    overrides.manifest = Some(fixture_manifest());

    let service = overrides.start_service().unwrap();
    assert!(service.is_ready());
    assert_eq!(service.primary_directive().unwrap().id, "ARCH-000");
}

#[test]
fn test_start_service_missing_manifest_fails() {
    let dir = TempDir::new().unwrap();
    let mut overrides = overrides_with_config(&dir, sample_config(false));
    overrides.manifest = Some(dir.path().join("missing.json"));

    let err = overrides.start_service().unwrap_err();
    assert!(format!("{:#}", err).contains("Failed to initialize rules"));
}

// ── validate ──

#[test]
fn test_run_validation_on_fixture() {
    let config = EngineConfig::for_manifest(fixture_manifest());
    let report = run_validation(&config).unwrap();
    assert!(report.passes(GatingPolicy::Strict));
    assert_eq!(report.integrity.stats.total_rules, 11);
}

#[test]
fn test_run_validation_reports_missing_content() {
    let dir = TempDir::new().unwrap();
    let config = EngineConfig::for_manifest(fixture_manifest()).with_rules_root(dir.path());

    let report = run_validation(&config).unwrap();
    assert!(!report.integrity.valid);
    assert_eq!(report.integrity.stats.missing_files.len(), 11);
    assert!(!report.passes(GatingPolicy::Strict));
}

// ── route ──

#[test]
fn test_render_route() {
    colored::control::set_override(false);

    let config = EngineConfig::for_manifest(fixture_manifest());
    let service = rulegraph_core::application::RuleService::from_config(&config);
    service.initialize().unwrap();
    let result = service.route_task("how do I design the database schema").unwrap();

    let rendered = render_route(&result);
    let lines: Vec<&str> = rendered.lines().collect();
    assert_eq!(lines[0], "Partitions: architecture, shared, data");
    assert_eq!(lines[1], "Read order: (5)");
    assert!(lines[2].contains("ARCH-000"));
    assert!(lines[6].contains("DATA-010"));
    assert!(lines[6].contains("*"));
    assert!(rendered.ends_with("Not applicable: UI-*, INT-*, HUB-*, APPS-*\n"));
}

// ── rule / config ──

#[test]
fn test_rule_table_and_partition_parsing() {
    assert_eq!(parse_partition("INTEGRATION").unwrap(), Partition::Integration);
    assert!(parse_partition("billing").is_err());
    assert_eq!(render_rule_table(&[]).lines().count(), 1);
}

#[test]
fn test_render_config_with_explicit_rules_root() {
    let config = EngineConfig::for_manifest("m.json").with_rules_root("/srv/rules");
    assert!(render_config(&config).contains("Rules root: /srv/rules\n"));
}
