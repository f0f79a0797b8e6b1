// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! # Manifest Validator
//!
//! Two read-only passes over a loaded [`Manifest`]:
//!
//! - **Integrity**: every reference resolves, every rule has content, every
//!   partition is declared.
//! - **Coverage**: every rule is reachable from some routing seed by following
//!   dependency and cross-reference edges forward.
//!
//! Findings are collected, never raised. Whether they block start-up is the
//! caller's decision (see `GatingPolicy`).

use crate::domain::manifest::Manifest;
use crate::domain::rule::Partition;
use crate::domain::validation::{
    CoverageReason, CoverageReport, FindingKind, IntegrityReport, IntegrityStats, ValidationFinding,
    ValidationReport,
};
use crate::infrastructure::content_probe::ContentProbe;
use std::collections::{BTreeMap, BTreeSet};

pub struct ManifestValidator<'a> {
    manifest: &'a Manifest,
    probe: &'a dyn ContentProbe,
}

impl<'a> ManifestValidator<'a> {
    pub fn new(manifest: &'a Manifest, probe: &'a dyn ContentProbe) -> Self {
        Self { manifest, probe }
    }

    pub fn validate(&self) -> ValidationReport {
        let report = ValidationReport {
            integrity: self.validate_integrity(),
            coverage: self.validate_routing(),
        };
        tracing::info!(
            valid = report.integrity.valid,
            errors = report.integrity.errors.len(),
            warnings = report.integrity.warnings.len(),
            uncovered = report.coverage.uncovered.len(),
            "Manifest validation complete"
        );
        report
    }

    pub fn validate_integrity(&self) -> IntegrityReport {
        let manifest = self.manifest;
        let mut report = IntegrityReport {
            valid: true,
            ..Default::default()
        };
        let mut stats = IntegrityStats {
            total_rules: manifest.len(),
            ..Default::default()
        };
        for partition in manifest.partitions().keys() {
            stats.rules_per_partition.insert(*partition, 0);
        }

        if !manifest.contains_rule(manifest.primary_directive_id()) {
            report.record(
                ValidationFinding::new(
                    FindingKind::PrimaryDirectiveMissing,
                    format!("primary directive '{}' does not resolve", manifest.primary_directive_id()),
                )
                .with_target(manifest.primary_directive_id()),
            );
        }

        for (key, rule) in manifest.rule_entries() {
            *stats.rules_per_partition.entry(rule.partition).or_insert(0) += 1;

            if key != rule.id {
                report.record(
                    ValidationFinding::new(
                        FindingKind::IdMismatch,
                        format!("rule stored under '{}' declares id '{}'", key, rule.id),
                    )
                    .for_rule(key)
                    .with_target(&rule.id),
                );
            }

            if !self.probe.exists(&rule.path) {
                stats.missing_files.push(key.to_string());
                report.record(
                    ValidationFinding::new(FindingKind::MissingFile, format!("content '{}' not found", rule.path))
                        .for_rule(key)
                        .with_target(&rule.path),
                );
            }

            if manifest.partition_config(rule.partition).is_none() {
                report.record(
                    ValidationFinding::new(
                        FindingKind::UndeclaredPartition,
                        format!("partition '{}' is not declared", rule.partition),
                    )
                    .for_rule(key)
                    .with_target(rule.partition.as_str()),
                );
            }

            for dep in rule.dependencies.iter().filter(|d| !manifest.contains_rule(d)) {
                report.record(
                    ValidationFinding::new(
                        FindingKind::MissingDependency,
                        format!("dependency '{}' does not resolve", dep),
                    )
                    .for_rule(key)
                    .with_target(dep),
                );
            }

            for xref in rule.cross_references.iter().filter(|x| !manifest.contains_rule(x)) {
                report.record(
                    ValidationFinding::new(
                        FindingKind::MissingCrossReference,
                        format!("cross-reference '{}' does not resolve", xref),
                    )
                    .for_rule(key)
                    .with_target(xref),
                );
            }
        }

        for id in manifest.always_include_ids().iter().filter(|id| !manifest.contains_rule(id)) {
            report.record(
                ValidationFinding::new(
                    FindingKind::MissingAlwaysInclude,
                    format!("always-include '{}' does not resolve", id),
                )
                .with_target(id),
            );
        }

        let red_flag_partitions = manifest.red_flag_partitions();
        for partition in red_flag_partitions
            .iter()
            .filter(|p| manifest.partition_config(**p).is_none())
        {
            report.record(
                ValidationFinding::new(
                    FindingKind::UndeclaredRedFlagPartition,
                    format!("red flag targets undeclared partition '{}'", partition),
                )
                .with_target(partition.as_str()),
            );
        }

        for id in self.orphans(&red_flag_partitions) {
            report.record(
                ValidationFinding::new(FindingKind::OrphanRule, "rule has no triggers and nothing routes to it")
                    .for_rule(id),
            );
        }

        report.stats = stats;
        report.valid = report.errors.is_empty();

        for finding in &report.errors {
            tracing::debug!(kind = %finding.kind, rule_id = ?finding.rule_id, "{}", finding.message);
        }
        report
    }

    fn orphans(&self, red_flag_partitions: &BTreeSet<Partition>) -> Vec<&'a str> {
        let manifest = self.manifest;
        let referenced: BTreeSet<&str> = manifest
            .all_rules()
            .flat_map(|r| {
                r.dependencies
                    .iter()
                    .chain(r.cross_references.iter())
                    .filter(move |target| **target != r.id)
                    .map(String::as_str)
            })
            .collect();

        manifest
            .rule_entries()
            .filter(|(key, rule)| {
                !rule.has_wildcard_trigger()
                    && !rule.has_keyword_triggers()
                    && *key != manifest.primary_directive_id()
                    && !manifest.always_include_ids().iter().any(|a| a == *key)
                    && !red_flag_partitions.contains(&rule.partition)
                    && !referenced.contains(key)
            })
            .map(|(key, _)| key)
            .collect()
    }

    /// Reachability closure from every routing seed.
    pub fn validate_routing(&self) -> CoverageReport {
        let manifest = self.manifest;
        let mut reasons: BTreeMap<String, CoverageReason> = BTreeMap::new();

        let mut seed = |id: &str, reason: CoverageReason| {
            if manifest.contains_rule(id) && !reasons.contains_key(id) {
                reasons.insert(id.to_string(), reason);
            }
        };

        seed(manifest.primary_directive_id(), CoverageReason::PrimaryDirective);
        for id in manifest.always_include_ids() {
            seed(id, CoverageReason::AlwaysInclude);
        }
        for rule in manifest.all_rules().filter(|r| r.has_wildcard_trigger()) {
            seed(&rule.id, CoverageReason::WildcardTrigger);
        }
        for partition in manifest.red_flag_partitions() {
            for rule in manifest.rules_by_partition(partition) {
                seed(&rule.id, CoverageReason::RedFlagPartition { partition });
            }
        }
        for rule in manifest.all_rules().filter(|r| r.has_keyword_triggers()) {
            seed(&rule.id, CoverageReason::KeywordTrigger);
        }

        loop {
            let mut added = false;
            for rule in manifest.all_rules() {
                if !reasons.contains_key(&rule.id) {
                    continue;
                }
                for target in manifest.rule_dependencies(&rule.id) {
                    if !reasons.contains_key(&target.id) {
                        reasons.insert(
                            target.id.clone(),
                            CoverageReason::DependencyOf { rule_id: rule.id.clone() },
                        );
                        added = true;
                    }
                }
                for target in manifest.rule_cross_references(&rule.id) {
                    if !reasons.contains_key(&target.id) {
                        reasons.insert(
                            target.id.clone(),
                            CoverageReason::CrossReferenceFrom { rule_id: rule.id.clone() },
                        );
                        added = true;
                    }
                }
            }
            if !added {
                break;
            }
        }

        let (covered, uncovered): (Vec<String>, Vec<String>) = manifest
            .all_rules()
            .map(|r| r.id.clone())
            .partition(|id| reasons.contains_key(id));

        if !uncovered.is_empty() {
            tracing::warn!(uncovered = ?uncovered, "Rules unreachable by any routing path");
        }

        CoverageReport {
            covered,
            uncovered,
            reasons,
        }
    }
}
