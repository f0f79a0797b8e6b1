// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Rule lookup commands
//!
//! Commands: show, list

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;
use rulegraph_core::{Partition, Rule};
use std::fmt::Write;

use super::Overrides;

#[derive(Subcommand)]
pub enum RuleCommand {
    /// Show a rule (YAML)
    Show {
        /// Rule ID
        #[arg(value_name = "RULE_ID")]
        id: String,
    },

    /// List rules
    List {
        /// Only rules in this partition
        #[arg(short, long, value_name = "PARTITION")]
        partition: Option<String>,
    },
}

pub fn handle_command(command: RuleCommand, overrides: &Overrides) -> Result<()> {
    let service = overrides.start_service()?;

    match command {
        RuleCommand::Show { id } => {
            let rule = service
                .get_rule(&id)?
                .with_context(|| format!("Rule '{}' not found", id))?;
            let yaml = serde_yaml::to_string(&rule).context("Failed to serialize rule")?;
            print!("{}", yaml);
            Ok(())
        }
        RuleCommand::List { partition } => {
            let rules = match partition {
                Some(tag) => service.rules_by_partition(parse_partition(&tag)?)?,
                None => service.all_rules()?,
            };
            if rules.is_empty() {
                println!("{}", "No rules found".yellow());
                return Ok(());
            }
            println!("{} rules found:", rules.len());
            print!("{}", render_rule_table(&rules));
            Ok(())
        }
    }
}

pub fn parse_partition(tag: &str) -> Result<Partition> {
    Partition::parse(&tag.to_lowercase()).with_context(|| {
        let known: Vec<&str> = Partition::ALL.iter().map(|p| p.as_str()).collect();
        format!("Unknown partition '{}'. Expected one of: {}", tag, known.join(", "))
    })
}

pub fn render_rule_table(rules: &[Rule]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:<12} {:<9} {:<13} {}", "ID", "PRIORITY", "PARTITION", "TITLE");
    for rule in rules {
        let _ = writeln!(
            out,
            "{:<12} {:<9} {:<13} {}",
            rule.id,
            rule.priority.as_str(),
            rule.partition.as_str(),
            rule.title
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rulegraph_core::Priority;

    #[test]
    fn test_parse_partition() {
        assert_eq!(parse_partition("Data").unwrap(), Partition::Data);
        let err = parse_partition("marketing").unwrap_err();
        assert!(err.to_string().contains("integration"));
    }

    #[test]
    fn test_render_rule_table() {
        let rules = vec![
            Rule::new("DATA-010", Partition::Data, Priority::High).with_title("Schema Design"),
        ];
        let table = render_rule_table(&rules);
        let lines: Vec<_> = table.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[1].starts_with("DATA-010"));
        assert!(lines[1].ends_with("Schema Design"));
    }
}
