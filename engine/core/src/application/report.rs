// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Plain-text rendering of validation reports.
//!
//! Output depends only on report contents, so it is stable across runs.

use crate::domain::validation::{CoverageReport, IntegrityReport, ValidationFinding, ValidationReport};
use std::fmt::Write;

pub fn format_integrity_report(report: &IntegrityReport) -> String {
    let mut out = String::new();
    let status = if report.valid { "VALID" } else { "INVALID" };
    let _ = writeln!(out, "Integrity: {}", status);
    let _ = writeln!(out, "Total rules: {}", report.stats.total_rules);

    out.push_str("Rules per partition:\n");
    if report.stats.rules_per_partition.is_empty() {
        out.push_str("  (none)\n");
    }
    for (partition, count) in &report.stats.rules_per_partition {
        let _ = writeln!(out, "  {}: {}", partition, count);
    }

    if report.stats.missing_files.is_empty() {
        out.push_str("Missing files: (none)\n");
    } else {
        let _ = writeln!(out, "Missing files: {}", report.stats.missing_files.join(", "));
    }

    write_findings(&mut out, "Errors", &report.errors);
    write_findings(&mut out, "Warnings", &report.warnings);
    out
}

fn write_findings(out: &mut String, label: &str, findings: &[ValidationFinding]) {
    if findings.is_empty() {
        let _ = writeln!(out, "{}: (none)", label);
        return;
    }
    let _ = writeln!(out, "{} ({}):", label, findings.len());
    for finding in findings {
        let _ = writeln!(
            out,
            "  - [{}] {}: {}",
            finding.kind,
            finding.rule_id.as_deref().unwrap_or("manifest"),
            finding.message
        );
    }
}

pub fn format_coverage_report(report: &CoverageReport) -> String {
    let mut out = String::new();
    let total = report.covered.len() + report.uncovered.len();
    let status = if report.is_complete() { "COMPLETE" } else { "INCOMPLETE" };
    let _ = writeln!(out, "Coverage: {}", status);
    let _ = writeln!(out, "Covered: {}/{}", report.covered.len(), total);

    if report.uncovered.is_empty() {
        out.push_str("Uncovered: (none)\n");
    } else {
        let _ = writeln!(out, "Uncovered ({}):", report.uncovered.len());
        for id in &report.uncovered {
            let _ = writeln!(out, "  - {}", id);
        }
    }
    out
}

pub fn format_validation_report(report: &ValidationReport) -> String {
    format!(
        "{}\n{}",
        format_integrity_report(&report.integrity),
        format_coverage_report(&report.coverage)
    )
}
