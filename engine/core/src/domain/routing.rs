// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Routing result value types.

use crate::domain::rule::{Partition, Priority};
use serde::{Deserialize, Serialize};

/// Why a rule ended up in a routing result. The first mechanism to match a
/// rule is the one recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MatchReason {
    AlwaysInclude,
    RedFlag { pattern: String },
    Trigger { triggers: Vec<String> },
    Dependency { of: String },
    CrossReference { from: String },
}

impl MatchReason {
    /// Direct matches come from the task text itself (red flag or trigger),
    /// not from configuration or closure.
    pub fn is_direct(&self) -> bool {
        matches!(self, Self::RedFlag { .. } | Self::Trigger { .. })
    }

    pub fn describe(&self) -> String {
        match self {
            Self::AlwaysInclude => "always-include".to_string(),
            Self::RedFlag { pattern } => format!("red flag /{}/", pattern),
            Self::Trigger { triggers } => format!("trigger {}", triggers.join(", ")),
            Self::Dependency { of } => format!("dependency of {}", of),
            Self::CrossReference { from } => format!("cross-reference from {}", from),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchedRule {
    pub rule_id: String,
    pub partition: Partition,
    pub priority: Priority,
    pub reason: MatchReason,
}

/// Outcome of routing one task description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteResult {
    pub task: String,
    /// Matched rules in the order they were matched; each id appears once.
    pub matched: Vec<MatchedRule>,
    pub partitions_to_consult: Vec<Partition>,
    /// Matched rule ids sorted by partition read order, then priority.
    pub read_order: Vec<String>,
    pub citation: String,
}

impl RouteResult {
    pub fn contains(&self, rule_id: &str) -> bool {
        self.matched.iter().any(|m| m.rule_id == rule_id)
    }

    pub fn reason_for(&self, rule_id: &str) -> Option<&MatchReason> {
        self.matched
            .iter()
            .find(|m| m.rule_id == rule_id)
            .map(|m| &m.reason)
    }

    pub fn rule_ids(&self) -> Vec<&str> {
        self.matched.iter().map(|m| m.rule_id.as_str()).collect()
    }

    pub fn direct_matches(&self) -> impl Iterator<Item = &MatchedRule> {
        self.matched.iter().filter(|m| m.reason.is_direct())
    }

    pub fn len(&self) -> usize {
        self.matched.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matched.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direct_reasons() {
        assert!(MatchReason::RedFlag { pattern: "x".into() }.is_direct());
        assert!(MatchReason::Trigger { triggers: vec!["db".into()] }.is_direct());
        assert!(!MatchReason::AlwaysInclude.is_direct());
        assert!(!MatchReason::Dependency { of: "A".into() }.is_direct());
        assert!(!MatchReason::CrossReference { from: "A".into() }.is_direct());
    }

    #[test]
    fn test_reason_serialization_is_tagged() {
        let json = serde_json::to_value(MatchReason::Dependency { of: "ARCH-000".into() }).unwrap();
        assert_eq!(json["type"], "dependency");
        assert_eq!(json["of"], "ARCH-000");
    }

    #[test]
    fn test_describe() {
        let reason = MatchReason::Trigger {
            triggers: vec!["database".into(), "schema".into()],
        };
        assert_eq!(reason.describe(), "trigger database, schema");
        assert_eq!(MatchReason::AlwaysInclude.describe(), "always-include");
    }
}
