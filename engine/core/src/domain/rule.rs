// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Rule Value Types
//!
//! A [`Rule`] is a named directive node in the routing graph. Rules are
//! grouped by [`Partition`] and ranked by [`Priority`]; they point at other
//! rules through hard `dependencies` and advisory `cross_references`.
//!
//! The engine never reads a rule's content. `path` is an opaque locator that
//! only the validator's content probe looks at.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Trigger sentinel meaning "matches any task" for reachability purposes.
pub const WILDCARD_TRIGGER: &str = "*";

/// Ordered rule priority. `Absolute` outranks everything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Priority {
    Absolute,
    Critical,
    High,
    Medium,
    Low,
}

impl Priority {
    /// Sort rank, 0 for `Absolute` through 4 for `Low`.
    pub fn rank(&self) -> u8 {
        match self {
            Self::Absolute => 0,
            Self::Critical => 1,
            Self::High => 2,
            Self::Medium => 3,
            Self::Low => 4,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Absolute => "ABSOLUTE",
            Self::Critical => "CRITICAL",
            Self::High => "HIGH",
            Self::Medium => "MEDIUM",
            Self::Low => "LOW",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Closed set of rule categories. Every rule belongs to exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Partition {
    Shared,
    Architecture,
    Hub,
    Apps,
    Data,
    Ui,
    Integration,
}

impl Partition {
    pub const ALL: [Partition; 7] = [
        Partition::Shared,
        Partition::Architecture,
        Partition::Hub,
        Partition::Apps,
        Partition::Data,
        Partition::Ui,
        Partition::Integration,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Shared => "shared",
            Self::Architecture => "architecture",
            Self::Hub => "hub",
            Self::Apps => "apps",
            Self::Data => "data",
            Self::Ui => "ui",
            Self::Integration => "integration",
        }
    }

    /// Rule-id prefix used by citations (`ARCH-*`, `DATA-*`, ...).
    pub fn rule_prefix(&self) -> &'static str {
        match self {
            Self::Shared => "SHARED",
            Self::Architecture => "ARCH",
            Self::Hub => "HUB",
            Self::Apps => "APPS",
            Self::Data => "DATA",
            Self::Ui => "UI",
            Self::Integration => "INT",
        }
    }

    /// Parse a lower-case partition tag.
    pub fn parse(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.as_str() == tag)
    }
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single addressable directive in the rule graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    pub id: String,
    pub title: String,
    /// Opaque content locator, resolved only by a `ContentProbe`.
    pub path: String,
    pub partition: Partition,
    pub priority: Priority,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub triggers: Vec<String>,
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(default)]
    pub cross_references: Vec<String>,
    #[serde(default)]
    pub description: String,
}

impl Rule {
    pub fn new(
        id: impl Into<String>,
        partition: Partition,
        priority: Priority,
    ) -> Self {
        let id = id.into();
        Self {
            title: id.clone(),
            path: format!("{}/{}.md", partition.as_str(), id),
            id,
            partition,
            priority,
            version: String::new(),
            triggers: Vec::new(),
            dependencies: Vec::new(),
            cross_references: Vec::new(),
            description: String::new(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    pub fn with_triggers<I, S>(mut self, triggers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.triggers = triggers.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_dependencies<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependencies = ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_cross_references<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.cross_references = ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn has_wildcard_trigger(&self) -> bool {
        self.triggers.iter().any(|t| t == WILDCARD_TRIGGER)
    }

    /// Triggers usable for keyword matching (wildcard and blank entries excluded).
    pub fn keyword_triggers(&self) -> impl Iterator<Item = &str> {
        self.triggers
            .iter()
            .map(String::as_str)
            .filter(|t| *t != WILDCARD_TRIGGER && !t.trim().is_empty())
    }

    pub fn has_keyword_triggers(&self) -> bool {
        self.keyword_triggers().next().is_some()
    }

    /// Keyword triggers contained in `lowered_text`, which must already be
    /// lower-cased. Matching is plain substring containment.
    pub fn matched_triggers(&self, lowered_text: &str) -> Vec<String> {
        self.keyword_triggers()
            .filter(|t| lowered_text.contains(&t.to_lowercase()))
            .map(str::to_string)
            .collect()
    }

    /// True if this rule lists `id` as a dependency or cross-reference.
    pub fn references(&self, id: &str) -> bool {
        self.dependencies.iter().any(|d| d == id) || self.cross_references.iter().any(|c| c == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_rank_order() {
        let ranks: Vec<u8> = [
            Priority::Absolute,
            Priority::Critical,
            Priority::High,
            Priority::Medium,
            Priority::Low,
        ]
        .iter()
        .map(Priority::rank)
        .collect();
        assert_eq!(ranks, vec![0, 1, 2, 3, 4]);
        assert!(Priority::Absolute < Priority::Low);
    }

    #[test]
    fn test_priority_serde_uppercase() {
        let p: Priority = serde_json::from_str("\"CRITICAL\"").unwrap();
        assert_eq!(p, Priority::Critical);
        assert_eq!(serde_json::to_string(&Priority::Low).unwrap(), "\"LOW\"");
    }

    #[test]
    fn test_partition_parse_and_prefix() {
        assert_eq!(Partition::parse("architecture"), Some(Partition::Architecture));
        assert_eq!(Partition::parse("Architecture"), None);
        assert_eq!(Partition::Integration.rule_prefix(), "INT");
        assert_eq!(Partition::Data.to_string(), "data");
    }

    #[test]
    fn test_unknown_partition_rejected() {
        let err = serde_json::from_str::<Partition>("\"marketing\"");
        assert!(err.is_err());
    }

    #[test]
    fn test_rule_deserialize_defaults() {
        let json = r#"{
            "id": "DATA-010",
            "title": "Schema design",
            "path": "data/DATA-010.md",
            "partition": "data",
            "priority": "HIGH"
        }"#;
        let rule: Rule = serde_json::from_str(json).unwrap();
        assert_eq!(rule.id, "DATA-010");
        assert!(rule.triggers.is_empty());
        assert!(rule.cross_references.is_empty());
        assert_eq!(rule.version, "");
    }

    #[test]
    fn test_matched_triggers_case_insensitive_substring() {
        let rule = Rule::new("DATA-010", Partition::Data, Priority::High)
            .with_triggers(["Database", "migration", "*"]);
        let matched = rule.matched_triggers("design the database schema");
        assert_eq!(matched, vec!["Database".to_string()]);

        // no word-boundary requirement
        assert_eq!(rule.matched_triggers("remigrations").len(), 1);
    }

    #[test]
    fn test_wildcard_not_a_keyword_trigger() {
        let rule = Rule::new("ARCH-001", Partition::Architecture, Priority::Critical)
            .with_triggers(["*"]);
        assert!(rule.has_wildcard_trigger());
        assert!(!rule.has_keyword_triggers());
        assert!(rule.matched_triggers("anything at all *").is_empty());
    }

    #[test]
    fn test_references() {
        let rule = Rule::new("UI-001", Partition::Ui, Priority::Medium)
            .with_dependencies(["ARCH-000"])
            .with_cross_references(["DATA-010"]);
        assert!(rule.references("ARCH-000"));
        assert!(rule.references("DATA-010"));
        assert!(!rule.references("HUB-001"));
    }
}
