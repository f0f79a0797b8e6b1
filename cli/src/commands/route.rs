// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! `rulegraph route` and `rulegraph citation`

use anyhow::Result;
use colored::Colorize;
use rulegraph_core::{MatchedRule, RouteResult};
use std::collections::HashMap;
use std::fmt::Write;

use super::Overrides;

pub fn handle_route(overrides: &Overrides, text: &str, json: bool) -> Result<()> {
    let service = overrides.start_service()?;
    let result = service.route_task(text)?;
    tracing::debug!(matched = result.len(), "Routed task from command line");

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print!("{}", render_route(&result));
    }
    Ok(())
}

pub fn handle_citation(overrides: &Overrides, text: &str) -> Result<()> {
    let service = overrides.start_service()?;
    println!("{}", service.format_citation_for_task(text)?);
    Ok(())
}

/// Human-readable routing result: partitions, rules in read order, citation.
pub fn render_route(result: &RouteResult) -> String {
    let by_id: HashMap<&str, &MatchedRule> = result
        .matched
        .iter()
        .map(|m| (m.rule_id.as_str(), m))
        .collect();

    let mut out = String::new();
    let partitions: Vec<&str> = result.partitions_to_consult.iter().map(|p| p.as_str()).collect();
    let _ = writeln!(out, "{} {}", "Partitions:".bold(), partitions.join(", "));
    let _ = writeln!(out, "{} ({})", "Read order:".bold(), result.read_order.len());

    for (i, id) in result.read_order.iter().enumerate() {
        let Some(matched) = by_id.get(id.as_str()) else {
            continue;
        };
        let marker = if matched.reason.is_direct() { "*" } else { " " };
        let _ = writeln!(
            out,
            "  {:>2}.{} {:<12} {:<9} {:<13} {}",
            i + 1,
            marker,
            id,
            matched.priority.as_str(),
            matched.partition.as_str(),
            matched.reason.describe().dimmed()
        );
    }

    out.push('\n');
    out.push_str(&result.citation);
    out.push('\n');
    out
}
