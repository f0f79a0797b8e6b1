// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Owned registry of rule services keyed by manifest path.

use crate::application::rule_service::RuleService;
use crate::domain::engine_config::EngineConfig;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Debug, Default)]
pub struct ServiceRegistry {
    services: RwLock<HashMap<PathBuf, Arc<RuleService>>>,
}

impl ServiceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Existing service for the configured manifest path, or a new
    /// uninitialized one.
    pub fn get_or_create(&self, config: &EngineConfig) -> Arc<RuleService> {
        if let Some(service) = self.services.read().get(&config.manifest_path) {
            return service.clone();
        }

        self.services
            .write()
            .entry(config.manifest_path.clone())
            .or_insert_with(|| {
                tracing::debug!(manifest = ?config.manifest_path, "Registering rule service");
                Arc::new(RuleService::from_config(config))
            })
            .clone()
    }

    pub fn get(&self, manifest_path: &Path) -> Option<Arc<RuleService>> {
        self.services.read().get(manifest_path).cloned()
    }

    pub fn remove(&self, manifest_path: &Path) -> Option<Arc<RuleService>> {
        self.services.write().remove(manifest_path)
    }

    pub fn len(&self) -> usize {
        self.services.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.read().is_empty()
    }
}
