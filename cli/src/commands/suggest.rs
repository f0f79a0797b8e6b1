// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use anyhow::Result;
use colored::Colorize;

use super::rule::render_rule_table;
use super::Overrides;

pub fn handle_command(overrides: &Overrides, keywords: &[String]) -> Result<()> {
    let service = overrides.start_service()?;
    let rules = service.suggest_rules(keywords)?;

    if rules.is_empty() {
        println!("{}", "No rules match those keywords".yellow());
        return Ok(());
    }

    println!("{} rules suggested:", rules.len());
    print!("{}", render_rule_table(&rules));
    Ok(())
}
