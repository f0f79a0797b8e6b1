// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Task router.
//!
//! Resolves which rules apply to a free-text task description. Matching runs
//! in a fixed sequence and the first mechanism to add a rule is the one
//! recorded for it:
//!
//! 1. always-include rules
//! 2. red flags (whole partitions)
//! 3. keyword triggers
//! 4. dependency / cross-reference closure

use crate::domain::manifest::Manifest;
use crate::domain::routing::{MatchReason, MatchedRule, RouteResult};
use crate::domain::rule::{Partition, Rule, WILDCARD_TRIGGER};
use std::collections::{BTreeSet, HashSet, VecDeque};

/// Citation line used when only configuration-driven rules matched.
pub const PRIMARY_DIRECTIVE_ONLY: &str = "(Primary Directive only)";

/// Accumulates matches, keeping the first reason per rule id.
#[derive(Debug, Default)]
struct MatchSet {
    matched: Vec<MatchedRule>,
    seen: HashSet<String>,
}

impl MatchSet {
    /// Returns false if the rule was already matched.
    fn add_unique(&mut self, rule: &Rule, reason: MatchReason) -> bool {
        if !self.seen.insert(rule.id.clone()) {
            return false;
        }
        self.matched.push(MatchedRule {
            rule_id: rule.id.clone(),
            partition: rule.partition,
            priority: rule.priority,
            reason,
        });
        true
    }

    fn contains(&self, id: &str) -> bool {
        self.seen.contains(id)
    }
}

pub struct TaskRouter<'a> {
    manifest: &'a Manifest,
}

impl<'a> TaskRouter<'a> {
    pub fn new(manifest: &'a Manifest) -> Self {
        Self { manifest }
    }

    pub fn route_task(&self, text: &str) -> RouteResult {
        let manifest = self.manifest;
        let lowered = text.to_lowercase();
        let mut set = MatchSet::default();

        for rule in manifest.always_include_rules() {
            set.add_unique(rule, MatchReason::AlwaysInclude);
        }

        for flag in manifest.red_flags().iter().filter(|f| f.is_match(&lowered)) {
            for partition in &flag.partitions {
                for rule in manifest.rules_by_partition(*partition) {
                    set.add_unique(
                        rule,
                        MatchReason::RedFlag {
                            pattern: flag.pattern.clone(),
                        },
                    );
                }
            }
        }

        for rule in manifest.all_rules() {
            if set.contains(&rule.id) {
                continue;
            }
            let triggers = rule.matched_triggers(&lowered);
            if !triggers.is_empty() {
                set.add_unique(rule, MatchReason::Trigger { triggers });
            }
        }

        self.expand_closure(&mut set);

        let partitions_to_consult = self.partitions_to_consult(&set.matched);
        let read_order = self.read_order(&set.matched);
        let citation = self.citation(&set.matched, &read_order, &partitions_to_consult);

        tracing::debug!(
            matched = set.matched.len(),
            partitions = partitions_to_consult.len(),
            "Routed task"
        );

        RouteResult {
            task: text.to_string(),
            matched: set.matched,
            partitions_to_consult,
            read_order,
            citation,
        }
    }

    /// Worklist expansion along dependencies, then cross-references.
    fn expand_closure(&self, set: &mut MatchSet) {
        let mut queue: VecDeque<String> = set.matched.iter().map(|m| m.rule_id.clone()).collect();

        while let Some(id) = queue.pop_front() {
            for dep in self.manifest.rule_dependencies(&id) {
                if set.add_unique(dep, MatchReason::Dependency { of: id.clone() }) {
                    queue.push_back(dep.id.clone());
                }
            }
            for xref in self.manifest.rule_cross_references(&id) {
                if set.add_unique(xref, MatchReason::CrossReference { from: id.clone() }) {
                    queue.push_back(xref.id.clone());
                }
            }
        }
    }

    fn partitions_to_consult(&self, matched: &[MatchedRule]) -> Vec<Partition> {
        let distinct: BTreeSet<Partition> = matched.iter().map(|m| m.partition).collect();
        let mut partitions: Vec<Partition> = distinct.into_iter().collect();
        partitions.sort_by_key(|p| (self.manifest.read_order_of(*p), *p));
        partitions
    }

    fn read_order(&self, matched: &[MatchedRule]) -> Vec<String> {
        let mut ordered: Vec<&MatchedRule> = matched.iter().collect();
        ordered.sort_by(|a, b| {
            (self.manifest.read_order_of(a.partition), a.priority.rank(), &a.rule_id).cmp(&(
                self.manifest.read_order_of(b.partition),
                b.priority.rank(),
                &b.rule_id,
            ))
        });
        ordered.into_iter().map(|m| m.rule_id.clone()).collect()
    }

    fn citation(&self, matched: &[MatchedRule], read_order: &[String], touched: &[Partition]) -> String {
        let direct: HashSet<&str> = matched
            .iter()
            .filter(|m| m.reason.is_direct())
            .map(|m| m.rule_id.as_str())
            .collect();
        let consulted: Vec<&str> = read_order
            .iter()
            .map(String::as_str)
            .filter(|id| direct.contains(id))
            .collect();

        let not_applicable: Vec<String> = self
            .manifest
            .partitions_by_read_order()
            .into_iter()
            .filter(|p| !touched.contains(p))
            .map(|p| format!("{}-*", p.rule_prefix()))
            .collect();

        format!(
            "Rules consulted: {}\nNot applicable: {}",
            if consulted.is_empty() {
                PRIMARY_DIRECTIVE_ONLY.to_string()
            } else {
                consulted.join(", ")
            },
            if not_applicable.is_empty() {
                "(none)".to_string()
            } else {
                not_applicable.join(", ")
            }
        )
    }

    /// Rules whose keyword triggers overlap any of `keywords` (containment in
    /// either direction, case-insensitive). No closure is applied.
    pub fn suggest_rules_for_keywords<S: AsRef<str>>(&self, keywords: &[S]) -> Vec<&'a Rule> {
        let keywords: Vec<String> = keywords
            .iter()
            .map(|k| k.as_ref().trim().to_lowercase())
            .filter(|k| !k.is_empty() && k != WILDCARD_TRIGGER)
            .collect();
        if keywords.is_empty() {
            return Vec::new();
        }

        self.manifest
            .all_rules()
            .filter(|rule| {
                rule.keyword_triggers().any(|trigger| {
                    let trigger = trigger.to_lowercase();
                    keywords
                        .iter()
                        .any(|k| trigger.contains(k.as_str()) || k.contains(trigger.as_str()))
                })
            })
            .collect()
    }
}
