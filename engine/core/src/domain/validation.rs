// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Manifest Validation Domain
//!
//! Findings produced by `application::validator::ManifestValidator`. Findings
//! are data, not errors: the validator never fails and never mutates the
//! manifest.
//!
//! ## Key Concepts
//!
//! | Type | Description |
//! |------|-------------|
//! | `ValidationFinding` | One error- or warning-severity observation |
//! | `IntegrityReport` | Referential integrity + per-partition statistics |
//! | `CoverageReport` | Reachability closure: covered / uncovered rules and why |
//! | `ValidationReport` | Both of the above, gated by a `GatingPolicy` |

use crate::domain::engine_config::GatingPolicy;
use crate::domain::rule::Partition;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingKind {
    MissingFile,
    MissingDependency,
    MissingCrossReference,
    PrimaryDirectiveMissing,
    MissingAlwaysInclude,
    UndeclaredPartition,
    UndeclaredRedFlagPartition,
    IdMismatch,
    OrphanRule,
}

impl FindingKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MissingFile => "missing_file",
            Self::MissingDependency => "missing_dependency",
            Self::MissingCrossReference => "missing_cross_reference",
            Self::PrimaryDirectiveMissing => "primary_directive_missing",
            Self::MissingAlwaysInclude => "missing_always_include",
            Self::UndeclaredPartition => "undeclared_partition",
            Self::UndeclaredRedFlagPartition => "undeclared_red_flag_partition",
            Self::IdMismatch => "id_mismatch",
            Self::OrphanRule => "orphan_rule",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            Self::MissingCrossReference | Self::UndeclaredRedFlagPartition | Self::OrphanRule => {
                Severity::Warning
            }
            _ => Severity::Error,
        }
    }
}

impl fmt::Display for FindingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationFinding {
    #[serde(rename = "type")]
    pub kind: FindingKind,
    pub severity: Severity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule_id: Option<String>,
    /// Offending reference (dangling id, missing path, undeclared partition).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    pub message: String,
}

impl ValidationFinding {
    pub fn new(kind: FindingKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity: kind.severity(),
            rule_id: None,
            target: None,
            message: message.into(),
        }
    }

    pub fn for_rule(mut self, rule_id: impl Into<String>) -> Self {
        self.rule_id = Some(rule_id.into());
        self
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntegrityStats {
    pub total_rules: usize,
    pub rules_per_partition: BTreeMap<Partition, usize>,
    pub missing_files: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntegrityReport {
    pub valid: bool,
    pub errors: Vec<ValidationFinding>,
    pub warnings: Vec<ValidationFinding>,
    pub stats: IntegrityStats,
}

impl IntegrityReport {
    /// Sort a finding into errors or warnings by its severity.
    pub fn record(&mut self, finding: ValidationFinding) {
        match finding.severity {
            Severity::Error => self.errors.push(finding),
            Severity::Warning => self.warnings.push(finding),
        }
        self.valid = self.errors.is_empty();
    }

    pub fn findings_of(&self, kind: FindingKind) -> impl Iterator<Item = &ValidationFinding> {
        self.errors
            .iter()
            .chain(self.warnings.iter())
            .filter(move |f| f.kind == kind)
    }
}

/// Why a rule is reachable by at least one routing path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CoverageReason {
    PrimaryDirective,
    AlwaysInclude,
    WildcardTrigger,
    KeywordTrigger,
    RedFlagPartition { partition: Partition },
    DependencyOf { rule_id: String },
    CrossReferenceFrom { rule_id: String },
}

impl fmt::Display for CoverageReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PrimaryDirective => f.write_str("primary directive"),
            Self::AlwaysInclude => f.write_str("always-include"),
            Self::WildcardTrigger => f.write_str("wildcard trigger"),
            Self::KeywordTrigger => f.write_str("keyword trigger"),
            Self::RedFlagPartition { partition } => write!(f, "red-flag partition {}", partition),
            Self::DependencyOf { rule_id } => write!(f, "dependency of {}", rule_id),
            Self::CrossReferenceFrom { rule_id } => write!(f, "cross-reference from {}", rule_id),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverageReport {
    pub covered: Vec<String>,
    pub uncovered: Vec<String>,
    pub reasons: BTreeMap<String, CoverageReason>,
}

impl CoverageReport {
    pub fn is_complete(&self) -> bool {
        self.uncovered.is_empty()
    }

    pub fn reason_for(&self, rule_id: &str) -> Option<&CoverageReason> {
        self.reasons.get(rule_id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub integrity: IntegrityReport,
    pub coverage: CoverageReport,
}

impl ValidationReport {
    pub fn has_blocking_findings(&self) -> bool {
        !self.integrity.valid || !self.coverage.is_complete()
    }

    /// Whether this report allows the service to become ready.
    pub fn passes(&self, policy: GatingPolicy) -> bool {
        match policy {
            GatingPolicy::Strict => !self.has_blocking_findings(),
            GatingPolicy::Lenient => true,
        }
    }
}
