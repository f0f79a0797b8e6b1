// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! # rulegraph CLI
//!
//! The `rulegraph` binary validates a rule manifest and routes task
//! descriptions to the rules that must be consulted.
//!
//! ## Commands
//!
//! - `rulegraph validate` - Integrity and routing coverage report
//! - `rulegraph route <TEXT>` - Matched rules, read order and citation
//! - `rulegraph citation <TEXT>` - Citation block only
//! - `rulegraph suggest <KEYWORD>...` - Rules whose triggers overlap keywords
//! - `rulegraph rule show|list` - Rule lookup
//! - `rulegraph config show|validate|generate` - Configuration management

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

use rulegraph_cli::commands::{self, ConfigCommand, RuleCommand};

/// rulegraph - Rule manifest routing and validation
#[derive(Parser)]
#[command(name = "rulegraph")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to configuration file (overrides discovery)
    #[arg(
        short,
        long,
        global = true,
        env = "RULEGRAPH_CONFIG_PATH",
        value_name = "FILE"
    )]
    config: Option<PathBuf>,

    /// Path to the rule manifest (overrides configuration)
    #[arg(
        short,
        long,
        global = true,
        env = "RULEGRAPH_MANIFEST_PATH",
        value_name = "FILE"
    )]
    manifest: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "RULEGRAPH_LOG_LEVEL", default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate manifest integrity and routing coverage
    Validate {
        /// Emit the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Route a task description to rules
    Route {
        /// Task description
        #[arg(value_name = "TEXT")]
        text: String,

        /// Emit the routing result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the citation block for a task description
    Citation {
        /// Task description
        #[arg(value_name = "TEXT")]
        text: String,
    },

    /// Suggest rules for keywords
    Suggest {
        /// Keywords to match against rule triggers
        #[arg(value_name = "KEYWORD", required = true)]
        keywords: Vec<String>,
    },

    /// Rule lookup
    #[command(name = "rule")]
    Rule {
        #[command(subcommand)]
        command: RuleCommand,
    },

    /// Configuration management
    #[command(name = "config")]
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(&cli.log_level)?;

    let overrides = commands::Overrides {
        config: cli.config,
        manifest: cli.manifest,
    };

    match cli.command {
        Some(Commands::Validate { json }) => commands::validate::handle_command(&overrides, json),
        Some(Commands::Route { text, json }) => commands::route::handle_route(&overrides, &text, json),
        Some(Commands::Citation { text }) => commands::route::handle_citation(&overrides, &text),
        Some(Commands::Suggest { keywords }) => commands::suggest::handle_command(&overrides, &keywords),
        Some(Commands::Rule { command }) => commands::rule::handle_command(command, &overrides),
        Some(Commands::Config { command }) => commands::config::handle_command(command, &overrides),
        None => {
            // No command provided - show help
            eprintln!("{}", "No command specified. Use --help for usage.".yellow());
            std::process::exit(1);
        }
    }
}

/// Initialize tracing subscriber for logging
fn init_logging(level: &str) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(level))
        .context("Failed to create log filter")?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();

    Ok(())
}
