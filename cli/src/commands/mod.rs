// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Command implementations for rulegraph CLI

use anyhow::{Context, Result};
use rulegraph_core::application::RuleService;
use rulegraph_core::EngineConfig;
use std::path::PathBuf;

pub mod config;
pub mod route;
pub mod rule;
pub mod suggest;
pub mod validate;

pub use self::config::ConfigCommand;
pub use self::rule::RuleCommand;

/// Global flags that override configuration discovery.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub config: Option<PathBuf>,
    pub manifest: Option<PathBuf>,
}

impl Overrides {
    /// Discovered (or explicit) configuration with the `--manifest` override
    /// applied last.
    pub fn load_config(&self) -> Result<EngineConfig> {
        let mut config =
            EngineConfig::load_or_default(self.config.clone()).context("Failed to load configuration")?;
        if let Some(manifest) = &self.manifest {
            config.manifest_path = manifest.clone();
        }
        config.validate().context("Configuration validation failed")?;
        tracing::debug!(
            manifest = %config.manifest_path.display(),
            gating = %config.gating,
            "Effective configuration"
        );
        Ok(config)
    }

    /// Ready rule service for the effective configuration.
    pub fn start_service(&self) -> Result<RuleService> {
        let config = self.load_config()?;
        let service = RuleService::from_config(&config);
        service
            .initialize()
            .with_context(|| format!("Failed to initialize rules from {:?}", config.manifest_path))?;
        tracing::info!(manifest = %config.manifest_path.display(), "Rule service started");
        Ok(service)
    }
}
