// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! # Rule Service
//!
//! Facade over the manifest store, validator and router. Queries are only
//! served once [`RuleService::initialize`] has loaded a manifest that passes
//! the configured [`GatingPolicy`].
//!
//! ```text
//! Uninitialized ──initialize──▶ Initializing ──ok──▶ Ready ──reload──▶ Ready
//!                                     │
//!                                     └──err──▶ Failed ──initialize──▶ ...
//! ```

use crate::application::report::format_validation_report;
use crate::application::router::TaskRouter;
use crate::application::validator::ManifestValidator;
use crate::domain::engine_config::{EngineConfig, GatingPolicy};
use crate::domain::errors::ManifestError;
use crate::domain::manifest::Manifest;
use crate::domain::routing::RouteResult;
use crate::domain::rule::{Partition, Rule};
use crate::domain::validation::ValidationReport;
use crate::infrastructure::content_probe::{ContentProbe, FileSystemProbe};
use crate::infrastructure::manifest_store::ManifestStore;
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

pub const CITATION_HEADER: &str = "[Rule Routing]";
pub const CITATION_FOOTER: &str = "[/Rule Routing]";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceState {
    Uninitialized,
    Initializing,
    Ready,
    Failed,
}

impl fmt::Display for ServiceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Uninitialized => "uninitialized",
            Self::Initializing => "initializing",
            Self::Ready => "ready",
            Self::Failed => "failed",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Rule service is not ready (state: {0})")]
    NotReady(ServiceState),

    #[error(transparent)]
    Manifest(#[from] ManifestError),

    #[error("Manifest failed validation:\n{report}")]
    ValidationFailed { report: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceOptions {
    pub gating: GatingPolicy,
    pub validate_on_init: bool,
}

impl Default for ServiceOptions {
    fn default() -> Self {
        Self {
            gating: GatingPolicy::Strict,
            validate_on_init: true,
        }
    }
}

impl From<&EngineConfig> for ServiceOptions {
    fn from(config: &EngineConfig) -> Self {
        Self {
            gating: config.gating,
            validate_on_init: config.validate_on_init,
        }
    }
}

#[derive(Debug)]
struct ServiceInner {
    state: ServiceState,
    manifest: Option<Arc<Manifest>>,
    last_validation: Option<ValidationReport>,
}

pub struct RuleService {
    store: ManifestStore,
    probe: Box<dyn ContentProbe>,
    options: ServiceOptions,
    inner: RwLock<ServiceInner>,
    /// Serializes `initialize` and `reload`; queries never take it.
    lifecycle: Mutex<()>,
}

impl RuleService {
    pub fn new(store: ManifestStore, probe: impl ContentProbe + 'static, options: ServiceOptions) -> Self {
        Self {
            store,
            probe: Box::new(probe),
            options,
            inner: RwLock::new(ServiceInner {
                state: ServiceState::Uninitialized,
                manifest: None,
                last_validation: None,
            }),
            lifecycle: Mutex::new(()),
        }
    }

    /// Service over the configured manifest file, probing rule content on disk.
    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(
            ManifestStore::from_file(&config.manifest_path),
            FileSystemProbe::new(config.resolved_rules_root()),
            ServiceOptions::from(config),
        )
    }

    pub fn state(&self) -> ServiceState {
        self.inner.read().state
    }

    pub fn is_ready(&self) -> bool {
        self.state() == ServiceState::Ready
    }

    pub fn options(&self) -> ServiceOptions {
        self.options
    }

    pub fn store(&self) -> &ManifestStore {
        &self.store
    }

    /// Load, validate and gate the manifest. Concurrent callers wait for the
    /// attempt in progress; one that finds the service ready returns `Ok`.
    pub fn initialize(&self) -> Result<(), ServiceError> {
        let _lifecycle = self.lifecycle.lock();
        {
            let mut inner = self.inner.write();
            if inner.state == ServiceState::Ready {
                return Ok(());
            }
            inner.state = ServiceState::Initializing;
        }

        tracing::info!(source = %self.store.source().describe(), "Initializing rule service");

        match self.bootstrap() {
            Ok((manifest, report)) => {
                let mut inner = self.inner.write();
                inner.manifest = Some(manifest);
                inner.last_validation = report;
                inner.state = ServiceState::Ready;
                tracing::info!("Rule service ready");
                Ok(())
            }
            Err(e) => {
                self.store.reload();
                let mut inner = self.inner.write();
                inner.manifest = None;
                inner.last_validation = None;
                inner.state = ServiceState::Failed;
                tracing::error!(error = %e, "Rule service initialization failed");
                Err(e)
            }
        }
    }

    fn bootstrap(&self) -> Result<(Arc<Manifest>, Option<ValidationReport>), ServiceError> {
        let manifest = self.store.load()?;
        let primary = manifest.primary_directive()?;
        tracing::debug!(primary_directive = %primary.id, rules = manifest.len(), "Manifest loaded");

        if !self.options.validate_on_init {
            return Ok((manifest, None));
        }

        let report = ManifestValidator::new(&manifest, self.probe.as_ref()).validate();
        if !report.passes(self.options.gating) {
            return Err(ServiceError::ValidationFailed {
                report: format_validation_report(&report),
            });
        }
        if report.has_blocking_findings() {
            tracing::warn!(
                errors = report.integrity.errors.len(),
                uncovered = report.coverage.uncovered.len(),
                "Manifest has validation findings; continuing under lenient gating"
            );
        }
        Ok((manifest, Some(report)))
    }

    /// Re-read the manifest. On any failure the previous manifest keeps
    /// serving and the error is returned.
    pub fn reload(&self) -> Result<(), ServiceError> {
        let _lifecycle = self.lifecycle.lock();
        self.snapshot()?;

        self.store.reload();
        let loaded = self.store.load().and_then(|m| {
            m.primary_directive()?;
            Ok(m)
        });
        let manifest = match loaded {
            Ok(manifest) => manifest,
            Err(e) => {
                tracing::warn!(error = %e, "Manifest reload failed; keeping previous manifest");
                return Err(e.into());
            }
        };

        let report = ManifestValidator::new(&manifest, self.probe.as_ref()).validate();
        if report.has_blocking_findings() {
            tracing::warn!(
                errors = report.integrity.errors.len(),
                uncovered = report.coverage.uncovered.len(),
                "Reloaded manifest has validation findings"
            );
        }

        let mut inner = self.inner.write();
        inner.manifest = Some(manifest);
        inner.last_validation = Some(report);
        tracing::info!("Rule manifest reloaded");
        Ok(())
    }

    /// Current manifest snapshot. Fails unless the service is ready.
    pub fn snapshot(&self) -> Result<Arc<Manifest>, ServiceError> {
        let inner = self.inner.read();
        match (&inner.state, &inner.manifest) {
            (ServiceState::Ready, Some(manifest)) => Ok(manifest.clone()),
            (state, _) => Err(ServiceError::NotReady(*state)),
        }
    }

    pub fn route_task(&self, text: &str) -> Result<RouteResult, ServiceError> {
        let manifest = self.snapshot()?;
        let result = TaskRouter::new(&manifest).route_task(text);
        tracing::info!(
            matched = result.len(),
            direct = result.direct_matches().count(),
            "Task routed"
        );
        Ok(result)
    }

    pub fn suggest_rules<S: AsRef<str>>(&self, keywords: &[S]) -> Result<Vec<Rule>, ServiceError> {
        let manifest = self.snapshot()?;
        let rules: Vec<Rule> = TaskRouter::new(&manifest)
            .suggest_rules_for_keywords(keywords)
            .into_iter()
            .cloned()
            .collect();
        tracing::debug!(suggested = rules.len(), "Suggested rules for keywords");
        Ok(rules)
    }

    pub fn get_rule(&self, id: &str) -> Result<Option<Rule>, ServiceError> {
        Ok(self.snapshot()?.get_rule(id).cloned())
    }

    pub fn all_rules(&self) -> Result<Vec<Rule>, ServiceError> {
        Ok(self.snapshot()?.all_rules().cloned().collect())
    }

    pub fn rules_by_partition(&self, partition: Partition) -> Result<Vec<Rule>, ServiceError> {
        Ok(self
            .snapshot()?
            .rules_by_partition(partition)
            .into_iter()
            .cloned()
            .collect())
    }

    pub fn primary_directive(&self) -> Result<Rule, ServiceError> {
        Ok(self.snapshot()?.primary_directive()?.clone())
    }

    /// Run both validation passes against the current manifest.
    pub fn validate(&self) -> Result<ValidationReport, ServiceError> {
        let manifest = self.snapshot()?;
        let report = ManifestValidator::new(&manifest, self.probe.as_ref()).validate();
        self.inner.write().last_validation = Some(report.clone());
        Ok(report)
    }

    pub fn last_validation(&self) -> Result<Option<ValidationReport>, ServiceError> {
        self.snapshot()?;
        Ok(self.inner.read().last_validation.clone())
    }

    pub fn format_citation_for_task(&self, text: &str) -> Result<String, ServiceError> {
        let result = self.route_task(text)?;
        Ok(format!("{}\n{}\n{}", CITATION_HEADER, result.citation, CITATION_FOOTER))
    }
}

impl fmt::Debug for RuleService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleService")
            .field("source", &self.store.source().describe())
            .field("state", &self.state())
            .field("options", &self.options)
            .finish()
    }
}
