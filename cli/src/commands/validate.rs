// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! `rulegraph validate`
//!
//! Runs validation directly against the store rather than through
//! `RuleService`, so a manifest that would fail strict start-up can still be
//! reported on.

use anyhow::{Context, Result};
use colored::Colorize;
use rulegraph_core::application::{format_validation_report, ManifestValidator};
use rulegraph_core::infrastructure::{FileSystemProbe, ManifestStore};
use rulegraph_core::{EngineConfig, ValidationReport};

use super::Overrides;

pub fn handle_command(overrides: &Overrides, json: bool) -> Result<()> {
    let config = overrides.load_config()?;
    let report = run_validation(&config)?;
    tracing::info!(
        errors = report.integrity.errors.len(),
        warnings = report.integrity.warnings.len(),
        uncovered = report.coverage.uncovered.len(),
        "Validation finished"
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Validating {}", config.manifest_path.display().to_string().bold());
        println!();
        print!("{}", format_validation_report(&report));
        println!();
    }

    if !report.passes(config.gating) {
        anyhow::bail!(
            "Manifest failed validation ({} errors, {} uncovered rules, {} gating)",
            report.integrity.errors.len(),
            report.coverage.uncovered.len(),
            config.gating
        );
    }

    if !json {
        if report.has_blocking_findings() {
            println!("{}", format!("⚠ Manifest has findings ({} gating)", config.gating).yellow());
        } else {
            println!("{}", "✓ Manifest is valid".green());
        }
    }
    Ok(())
}

/// Load the configured manifest and run both validation passes.
pub fn run_validation(config: &EngineConfig) -> Result<ValidationReport> {
    let store = ManifestStore::from_file(&config.manifest_path);
    let manifest = store
        .load()
        .with_context(|| format!("Failed to load manifest {:?}", config.manifest_path))?;
    let probe = FileSystemProbe::new(config.resolved_rules_root());
    Ok(ManifestValidator::new(&manifest, &probe).validate())
}
