// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Rule Manifest Parser
//!
//! Parses JSON or YAML manifests into the [`Manifest`] aggregate.
//!
//! # Architecture
//!
//! - **Layer:** Infrastructure
//! - **Purpose:** Parse external JSON/YAML → Domain objects
//! - **Anti-Corruption:** Serde errors are translated into [`ManifestError::Parse`]
//!
//! Structural problems that still parse (dangling ids, undeclared partitions,
//! missing content) are left for the validator. Only content that cannot
//! form a `Manifest` at all (bad syntax, unknown partition or priority tags,
//! invalid red-flag regexes) fails here.

use crate::domain::errors::ManifestError;
use crate::domain::manifest::{Manifest, ManifestDocument};
use std::path::Path;

/// Serialization format of a manifest source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ManifestFormat {
    Json,
    Yaml,
}

impl ManifestFormat {
    /// `.yaml` / `.yml` → YAML; anything else is treated as JSON.
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("yaml") | Some("yml") => Self::Yaml,
            _ => Self::Json,
        }
    }
}

// ============================================================================
// Parser API
// ============================================================================

pub struct ManifestParser;

impl ManifestParser {
    /// Parse a manifest document from a JSON string
    pub fn parse_json_document(json: &str, origin: &str) -> Result<ManifestDocument, ManifestError> {
        serde_json::from_str(json).map_err(|e| ManifestError::Parse {
            origin: origin.to_string(),
            message: e.to_string(),
        })
    }

    /// Parse a manifest document from a YAML string
    pub fn parse_yaml_document(yaml: &str, origin: &str) -> Result<ManifestDocument, ManifestError> {
        serde_yaml::from_str(yaml).map_err(|e| ManifestError::Parse {
            origin: origin.to_string(),
            message: e.to_string(),
        })
    }

    pub fn parse_json(json: &str) -> Result<Manifest, ManifestError> {
        Self::parse_str(json, ManifestFormat::Json, "<inline json>")
    }

    pub fn parse_yaml(yaml: &str) -> Result<Manifest, ManifestError> {
        Self::parse_str(yaml, ManifestFormat::Yaml, "<inline yaml>")
    }

    /// Parse and compile a manifest. `origin` names the source in errors.
    pub fn parse_str(content: &str, format: ManifestFormat, origin: &str) -> Result<Manifest, ManifestError> {
        let document = match format {
            ManifestFormat::Json => Self::parse_json_document(content, origin)?,
            ManifestFormat::Yaml => Self::parse_yaml_document(content, origin)?,
        };
        Manifest::from_document(document)
    }

    /// Parse a manifest file, choosing the format from its extension.
    pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Manifest, ManifestError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                ManifestError::NotFound(path.to_path_buf())
            } else {
                ManifestError::Io {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;

        Self::parse_str(&content, ManifestFormat::from_path(path), &path.display().to_string())
    }

    /// Serialize a manifest document to pretty JSON.
    pub fn to_json(document: &ManifestDocument) -> Result<String, ManifestError> {
        serde_json::to_string_pretty(document).map_err(|e| ManifestError::Parse {
            origin: "<serialize json>".to_string(),
            message: e.to_string(),
        })
    }

    pub fn to_yaml(document: &ManifestDocument) -> Result<String, ManifestError> {
        serde_yaml::to_string(document).map_err(|e| ManifestError::Parse {
            origin: "<serialize yaml>".to_string(),
            message: e.to_string(),
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
