// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Configuration management commands
//!
//! Commands: show, validate, generate

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;
use rulegraph_core::domain::engine_config::{
    CONFIG_PATH_ENV, GATING_ENV, MANIFEST_PATH_ENV, RULES_ROOT_ENV,
};
use rulegraph_core::EngineConfig;
use std::path::{Path, PathBuf};

use super::Overrides;

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Show config file paths checked
        #[arg(long)]
        paths: bool,
    },

    /// Validate configuration file
    Validate {
        /// Path to config file (default: discover)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
    },

    /// Generate sample configuration
    Generate {
        /// Output path (default: ./rulegraph.yaml)
        #[arg(short, long, default_value = "./rulegraph.yaml")]
        output: PathBuf,

        /// Include examples and comments
        #[arg(long)]
        examples: bool,
    },
}

pub fn handle_command(command: ConfigCommand, overrides: &Overrides) -> Result<()> {
    match command {
        ConfigCommand::Show { paths } => show(overrides, paths),
        ConfigCommand::Validate { file } => validate(file.or_else(|| overrides.config.clone())),
        ConfigCommand::Generate { output, examples } => generate(&output, examples),
    }
}

fn show(overrides: &Overrides, show_paths: bool) -> Result<()> {
    let config = overrides.load_config()?;

    if show_paths {
        println!("{}", "Configuration discovery paths:".bold());
        match &overrides.config {
            Some(path) => println!("  1. --config flag: {}", path.display()),
            None => println!("  1. --config flag: {}", "(not set)".dimmed()),
        }
        println!("  2. {}: {}", CONFIG_PATH_ENV, env_or_unset(CONFIG_PATH_ENV).dimmed());
        println!("  3. ./rulegraph.yaml");
        println!("  4. ~/.rulegraph/config.yaml");
        println!("  5. /etc/rulegraph/config.yaml");
        println!();

        println!("{}", "Environment overrides:".bold());
        for key in [MANIFEST_PATH_ENV, RULES_ROOT_ENV, GATING_ENV] {
            println!("  {}: {}", key, env_or_unset(key).dimmed());
        }
        println!();
    }

    println!("{}", "Current configuration:".bold());
    println!();
    print!("{}", render_config(&config));

    Ok(())
}

fn validate(config_path: Option<PathBuf>) -> Result<()> {
    println!("Validating configuration...");

    let config = EngineConfig::load_or_default(config_path).context("Failed to load configuration")?;

    config.validate().context("Configuration validation failed")?;

    if !config.manifest_path.exists() {
        println!(
            "{}",
            format!("⚠ Manifest not found: {}", config.manifest_path.display()).yellow()
        );
    }

    println!("{}", "✓ Configuration is valid".green());

    Ok(())
}

fn generate(output: &Path, with_examples: bool) -> Result<()> {
    tracing::debug!(output = %output.display(), with_examples, "Generating sample configuration");
    std::fs::write(output, sample_config(with_examples))
        .with_context(|| format!("Failed to write config to {:?}", output))?;

    println!(
        "{}",
        format!("✓ Configuration generated: {}", output.display()).green()
    );

    Ok(())
}

pub fn sample_config(with_examples: bool) -> &'static str {
    if with_examples {
        include_str!("../../templates/config-with-examples.yaml")
    } else {
        include_str!("../../templates/config-minimal.yaml")
    }
}

pub fn render_config(config: &EngineConfig) -> String {
    let rules_root = match &config.rules_root {
        Some(root) => root.display().to_string(),
        None => format!("{} (manifest directory)", config.resolved_rules_root().display()),
    };
    format!(
        "  Manifest: {}\n  Rules root: {}\n  Gating: {}\n  Validate on init: {}\n",
        config.manifest_path.display(),
        rules_root,
        config.gating,
        config.validate_on_init
    )
}

fn env_or_unset(key: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| "(not set)".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rulegraph_core::GatingPolicy;

    #[test]
    fn test_sample_configs_parse() {
        for with_examples in [false, true] {
            let config = EngineConfig::from_yaml_str(sample_config(with_examples)).unwrap();
            config.validate().unwrap();
        }
    }

    #[test]
    fn test_render_config() {
        let config = EngineConfig::for_manifest("rules/manifest.json").with_gating(GatingPolicy::Lenient);
        let rendered = render_config(&config);
        assert!(rendered.contains("Manifest: rules/manifest.json"));
        assert!(rendered.contains("Rules root: rules (manifest directory)"));
        assert!(rendered.contains("Gating: lenient"));
    }
}
