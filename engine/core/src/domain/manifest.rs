// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Rule Manifest Aggregate
//!
//! [`ManifestDocument`] is the wire shape of the manifest (JSON or YAML, see
//! `infrastructure::manifest_parser`). [`Manifest`] is the aggregate root built
//! from it: red-flag patterns compiled, partition index derived, everything
//! kept in ordered maps so iteration is deterministic.
//!
//! ```json
//! {
//!   "primaryDirective": "ARCH-000",
//!   "rules": { "ARCH-000": { "id": "ARCH-000", "title": "...", "path": "...",
//!              "partition": "architecture", "priority": "ABSOLUTE" } },
//!   "partitions": { "architecture": { "description": "...", "readOrder": 1 } },
//!   "routing": { "redFlags": [ { "pattern": "schema|migration", "partitions": ["data"] } ],
//!                "alwaysInclude": ["ARCH-000"] }
//! }
//! ```
//!
//! A `Manifest` is immutable once built. Reloading produces a new one.

use crate::domain::errors::ManifestError;
use crate::domain::rule::{Partition, Rule};
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

// ============================================================================
// Wire format
// ============================================================================

/// Per-partition presentation metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartitionConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default)]
    pub description: String,
    /// Consultation order, ascending. Presentation only.
    pub read_order: u32,
}

impl PartitionConfig {
    pub fn new(read_order: u32) -> Self {
        Self {
            path: None,
            description: String::new(),
            read_order,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedFlagSpec {
    pub pattern: String,
    pub partitions: Vec<Partition>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutingDocument {
    #[serde(default)]
    pub red_flags: Vec<RedFlagSpec>,
    #[serde(default)]
    pub always_include: Vec<String>,
}

/// Manifest as authored on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestDocument {
    pub primary_directive: String,
    pub rules: BTreeMap<String, Rule>,
    #[serde(default)]
    pub partitions: BTreeMap<Partition, PartitionConfig>,
    #[serde(default)]
    pub routing: RoutingDocument,
}

impl ManifestDocument {
    pub fn new(primary_directive: impl Into<String>) -> Self {
        Self {
            primary_directive: primary_directive.into(),
            rules: BTreeMap::new(),
            partitions: BTreeMap::new(),
            routing: RoutingDocument::default(),
        }
    }

    pub fn with_rule(mut self, rule: Rule) -> Self {
        self.rules.insert(rule.id.clone(), rule);
        self
    }

    pub fn with_partition(mut self, partition: Partition, read_order: u32) -> Self {
        self.partitions.insert(partition, PartitionConfig::new(read_order));
        self
    }

    pub fn with_red_flag(mut self, pattern: impl Into<String>, partitions: Vec<Partition>) -> Self {
        self.routing.red_flags.push(RedFlagSpec {
            pattern: pattern.into(),
            partitions,
        });
        self
    }

    pub fn with_always_include(mut self, id: impl Into<String>) -> Self {
        self.routing.always_include.push(id.into());
        self
    }

    /// Compile into a [`Manifest`].
    pub fn build(self) -> Result<Manifest, ManifestError> {
        Manifest::from_document(self)
    }
}

// ============================================================================
// Aggregate
// ============================================================================

/// Compiled red flag: a case-insensitive, unanchored pattern that pulls in
/// every rule of its partitions.
#[derive(Debug, Clone)]
pub struct RedFlag {
    pub pattern: String,
    pub partitions: Vec<Partition>,
    regex: Regex,
}

impl RedFlag {
    pub fn compile(spec: RedFlagSpec) -> Result<Self, ManifestError> {
        let regex = RegexBuilder::new(&spec.pattern)
            .case_insensitive(true)
            .build()
            .map_err(|source| ManifestError::InvalidPattern {
                pattern: spec.pattern.clone(),
                source,
            })?;
        Ok(Self {
            pattern: spec.pattern,
            partitions: spec.partitions,
            regex,
        })
    }

    /// Search (not full-match) the text for the pattern.
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    pub fn covers(&self, partition: Partition) -> bool {
        self.partitions.contains(&partition)
    }
}

#[derive(Debug, Clone, Default)]
pub struct RoutingConfig {
    pub red_flags: Vec<RedFlag>,
    pub always_include: Vec<String>,
}

/// Aggregate root of the rule graph.
#[derive(Debug, Clone)]
pub struct Manifest {
    primary_directive: String,
    rules: BTreeMap<String, Rule>,
    partitions: BTreeMap<Partition, PartitionConfig>,
    routing: RoutingConfig,
    by_partition: BTreeMap<Partition, Vec<String>>,
}

impl Manifest {
    pub fn from_document(document: ManifestDocument) -> Result<Self, ManifestError> {
        let red_flags = document
            .routing
            .red_flags
            .into_iter()
            .map(RedFlag::compile)
            .collect::<Result<Vec<_>, _>>()?;

        let mut by_partition: BTreeMap<Partition, Vec<String>> = BTreeMap::new();
        for (key, rule) in &document.rules {
            by_partition.entry(rule.partition).or_default().push(key.clone());
        }

        Ok(Self {
            primary_directive: document.primary_directive,
            rules: document.rules,
            partitions: document.partitions,
            routing: RoutingConfig {
                red_flags,
                always_include: document.routing.always_include,
            },
            by_partition,
        })
    }

    pub fn primary_directive_id(&self) -> &str {
        &self.primary_directive
    }

    /// The root rule. Absence is fatal for callers: nothing routes without it.
    pub fn primary_directive(&self) -> Result<&Rule, ManifestError> {
        self.rules
            .get(&self.primary_directive)
            .ok_or_else(|| ManifestError::PrimaryDirectiveMissing(self.primary_directive.clone()))
    }

    pub fn get_rule(&self, id: &str) -> Option<&Rule> {
        self.rules.get(id)
    }

    pub fn contains_rule(&self, id: &str) -> bool {
        self.rules.contains_key(id)
    }

    /// All rules in id order.
    pub fn all_rules(&self) -> impl Iterator<Item = &Rule> {
        self.rules.values()
    }

    /// Map entries as authored, including the key each rule is stored under.
    pub fn rule_entries(&self) -> impl Iterator<Item = (&str, &Rule)> {
        self.rules.iter().map(|(k, r)| (k.as_str(), r))
    }

    pub fn rules_by_partition(&self, partition: Partition) -> Vec<&Rule> {
        self.by_partition
            .get(&partition)
            .map(|ids| ids.iter().filter_map(|id| self.rules.get(id)).collect())
            .unwrap_or_default()
    }

    /// Resolved dependency targets of `id`; dangling ids are skipped.
    pub fn rule_dependencies(&self, id: &str) -> Vec<&Rule> {
        self.resolve_edges(id, |r| &r.dependencies)
    }

    /// Resolved cross-reference targets of `id`; dangling ids are skipped.
    pub fn rule_cross_references(&self, id: &str) -> Vec<&Rule> {
        self.resolve_edges(id, |r| &r.cross_references)
    }

    fn resolve_edges<'a>(&'a self, id: &str, edges: impl Fn(&'a Rule) -> &'a Vec<String>) -> Vec<&'a Rule> {
        let Some(rule) = self.rules.get(id) else {
            return Vec::new();
        };
        edges(rule)
            .iter()
            .filter_map(|target| {
                let resolved = self.rules.get(target);
                if resolved.is_none() {
                    tracing::debug!(rule_id = %id, target = %target, "Skipping unresolved edge");
                }
                resolved
            })
            .collect()
    }

    pub fn partition_config(&self, partition: Partition) -> Option<&PartitionConfig> {
        self.partitions.get(&partition)
    }

    pub fn partitions(&self) -> &BTreeMap<Partition, PartitionConfig> {
        &self.partitions
    }

    /// Read order of a partition; undeclared partitions sort last.
    pub fn read_order_of(&self, partition: Partition) -> u32 {
        self.partitions
            .get(&partition)
            .map(|c| c.read_order)
            .unwrap_or(u32::MAX)
    }

    /// Declared partitions sorted by `readOrder`, ties broken by partition order.
    pub fn partitions_by_read_order(&self) -> Vec<Partition> {
        let mut partitions: Vec<Partition> = self.partitions.keys().copied().collect();
        partitions.sort_by_key(|p| (self.read_order_of(*p), *p));
        partitions
    }

    pub fn red_flags(&self) -> &[RedFlag] {
        &self.routing.red_flags
    }

    /// Partitions covered by at least one red flag.
    pub fn red_flag_partitions(&self) -> BTreeSet<Partition> {
        self.routing
            .red_flags
            .iter()
            .flat_map(|f| f.partitions.iter().copied())
            .collect()
    }

    pub fn always_include_ids(&self) -> &[String] {
        &self.routing.always_include
    }

    /// Resolved always-include rules; dangling ids are skipped.
    pub fn always_include_rules(&self) -> Vec<&Rule> {
        self.routing
            .always_include
            .iter()
            .filter_map(|id| self.rules.get(id))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::rule::Priority;

    fn sample() -> Manifest {
        ManifestDocument::new("ARCH-000")
            .with_partition(Partition::Architecture, 1)
            .with_partition(Partition::Data, 3)
            .with_partition(Partition::Ui, 2)
            .with_rule(
                Rule::new("ARCH-000", Partition::Architecture, Priority::Absolute)
                    .with_dependencies(["ARCH-001", "GONE-404"]),
            )
            .with_rule(Rule::new("ARCH-001", Partition::Architecture, Priority::High))
            .with_rule(
                Rule::new("DATA-010", Partition::Data, Priority::High)
                    .with_cross_references(["ARCH-001", "INT-999"]),
            )
            .with_red_flag("drop\\s+table", vec![Partition::Data])
            .with_always_include("ARCH-000")
            .with_always_include("NOPE-1")
            .build()
            .unwrap()
    }

    #[test]
    fn test_lookup_and_partition_index() {
        let manifest = sample();
        assert_eq!(manifest.len(), 3);
        assert!(manifest.get_rule("DATA-010").is_some());
        assert!(manifest.get_rule("DATA-011").is_none());

        let arch: Vec<_> = manifest
            .rules_by_partition(Partition::Architecture)
            .iter()
            .map(|r| r.id.as_str())
            .collect();
        assert_eq!(arch, vec!["ARCH-000", "ARCH-001"]);
        assert!(manifest.rules_by_partition(Partition::Hub).is_empty());
    }

    #[test]
    fn test_edges_drop_dangling_ids() {
        let manifest = sample();
        let deps: Vec<_> = manifest.rule_dependencies("ARCH-000").iter().map(|r| r.id.clone()).collect();
        assert_eq!(deps, vec!["ARCH-001"]);

        let xrefs: Vec<_> = manifest.rule_cross_references("DATA-010").iter().map(|r| r.id.clone()).collect();
        assert_eq!(xrefs, vec!["ARCH-001"]);

        assert!(manifest.rule_dependencies("MISSING").is_empty());
    }

    #[test]
    fn test_primary_directive_resolution() {
        let manifest = sample();
        assert_eq!(manifest.primary_directive().unwrap().id, "ARCH-000");

        let broken = ManifestDocument::new("ARCH-404")
            .with_rule(Rule::new("ARCH-000", Partition::Architecture, Priority::Absolute))
            .build()
            .unwrap();
        assert!(matches!(
            broken.primary_directive(),
            Err(ManifestError::PrimaryDirectiveMissing(id)) if id == "ARCH-404"
        ));
    }

    #[test]
    fn test_partitions_by_read_order() {
        let manifest = sample();
        assert_eq!(
            manifest.partitions_by_read_order(),
            vec![Partition::Architecture, Partition::Ui, Partition::Data]
        );
        assert_eq!(manifest.read_order_of(Partition::Hub), u32::MAX);
    }

    #[test]
    fn test_red_flags_compiled_case_insensitive() {
        let manifest = sample();
        let flag = &manifest.red_flags()[0];
        assert!(flag.is_match("please DROP   TABLE users"));
        assert!(!flag.is_match("drop the table"));
        assert!(flag.covers(Partition::Data));
        assert_eq!(manifest.red_flag_partitions().len(), 1);
    }

    #[test]
    fn test_invalid_red_flag_pattern() {
        let result = ManifestDocument::new("ARCH-000")
            .with_red_flag("(unclosed", vec![Partition::Data])
            .build();
        assert!(matches!(result, Err(ManifestError::InvalidPattern { .. })));
    }

    #[test]
    fn test_always_include_rules_skip_dangling() {
        let manifest = sample();
        assert_eq!(manifest.always_include_ids().len(), 2);
        let resolved: Vec<_> = manifest.always_include_rules().iter().map(|r| r.id.clone()).collect();
        assert_eq!(resolved, vec!["ARCH-000"]);
    }
}
