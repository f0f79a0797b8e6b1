// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Caching manifest store.
//!
//! Owns one manifest source and the parsed [`Manifest`] built from it. The
//! cache holds a whole `Arc<Manifest>`: loads swap a new one in, reloads swap
//! it out, so readers only ever see a complete snapshot.

use crate::domain::errors::ManifestError;
use crate::domain::manifest::Manifest;
use crate::domain::rule::{Partition, Rule};
use crate::infrastructure::manifest_parser::{ManifestFormat, ManifestParser};
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestSource {
    /// Format chosen from the file extension.
    File(PathBuf),
    Inline { format: ManifestFormat, content: String },
}

impl ManifestSource {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::File(path.into())
    }

    pub fn inline_json(content: impl Into<String>) -> Self {
        Self::Inline {
            format: ManifestFormat::Json,
            content: content.into(),
        }
    }

    pub fn inline_yaml(content: impl Into<String>) -> Self {
        Self::Inline {
            format: ManifestFormat::Yaml,
            content: content.into(),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::File(path) => Some(path),
            Self::Inline { .. } => None,
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Self::File(path) => path.display().to_string(),
            Self::Inline { format, .. } => format!("<inline {:?}>", format).to_lowercase(),
        }
    }

    fn parse(&self) -> Result<Manifest, ManifestError> {
        match self {
            Self::File(path) => ManifestParser::parse_file(path),
            Self::Inline { format, content } => ManifestParser::parse_str(content, *format, &self.describe()),
        }
    }
}

#[derive(Debug, Clone)]
struct CachedManifest {
    manifest: Arc<Manifest>,
    loaded_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct ManifestStore {
    source: ManifestSource,
    cache: RwLock<Option<CachedManifest>>,
}

impl ManifestStore {
    pub fn new(source: ManifestSource) -> Self {
        Self {
            source,
            cache: RwLock::new(None),
        }
    }

    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        Self::new(ManifestSource::file(path))
    }

    pub fn source(&self) -> &ManifestSource {
        &self.source
    }

    /// Cached manifest, parsing the source on first use.
    pub fn load(&self) -> Result<Arc<Manifest>, ManifestError> {
        if let Some(cached) = self.cache.read().as_ref() {
            return Ok(cached.manifest.clone());
        }

        // Parse outside the lock; a concurrent loader may win the swap.
        let manifest = Arc::new(self.source.parse()?);

        let mut cache = self.cache.write();
        let cached = cache.get_or_insert_with(|| {
            tracing::info!(
                source = %self.source.describe(),
                rules = manifest.len(),
                "Loaded rule manifest"
            );
            CachedManifest {
                manifest,
                loaded_at: Utc::now(),
            }
        });
        Ok(cached.manifest.clone())
    }

    /// Drop the cache. The next `load()` re-parses the source.
    pub fn reload(&self) {
        if self.cache.write().take().is_some() {
            tracing::debug!(source = %self.source.describe(), "Manifest cache invalidated");
        }
    }

    /// Cached manifest without triggering a parse.
    pub fn current(&self) -> Option<Arc<Manifest>> {
        self.cache.read().as_ref().map(|c| c.manifest.clone())
    }

    pub fn is_loaded(&self) -> bool {
        self.cache.read().is_some()
    }

    /// Time of the last successful parse, if one is cached.
    pub fn loaded_at(&self) -> Option<DateTime<Utc>> {
        self.cache.read().as_ref().map(|c| c.loaded_at)
    }

    // ------------------------------------------------------------------------
    // Query delegations
    // ------------------------------------------------------------------------

    pub fn get_rule(&self, id: &str) -> Result<Option<Rule>, ManifestError> {
        Ok(self.load()?.get_rule(id).cloned())
    }

    pub fn all_rules(&self) -> Result<Vec<Rule>, ManifestError> {
        Ok(self.load()?.all_rules().cloned().collect())
    }

    pub fn rules_by_partition(&self, partition: Partition) -> Result<Vec<Rule>, ManifestError> {
        Ok(self.load()?.rules_by_partition(partition).into_iter().cloned().collect())
    }

    pub fn rule_dependencies(&self, id: &str) -> Result<Vec<Rule>, ManifestError> {
        Ok(self.load()?.rule_dependencies(id).into_iter().cloned().collect())
    }

    pub fn rule_cross_references(&self, id: &str) -> Result<Vec<Rule>, ManifestError> {
        Ok(self.load()?.rule_cross_references(id).into_iter().cloned().collect())
    }

    pub fn primary_directive(&self) -> Result<Rule, ManifestError> {
        self.load()?.primary_directive().cloned()
    }
}
