// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Manifest error taxonomy.
//!
//! Load failures are all-or-nothing: a manifest either parses completely into
//! a [`crate::domain::manifest::Manifest`] or produces one of these errors.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("Manifest not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read manifest {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse manifest {origin}: {message}")]
    Parse { origin: String, message: String },

    #[error("Invalid red-flag pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Primary directive '{0}' does not resolve to a rule")]
    PrimaryDirectiveMissing(String),
}

impl ManifestError {
    /// True for errors caused by malformed manifest content rather than a
    /// missing or unreadable source.
    pub fn is_parse_error(&self) -> bool {
        matches!(self, Self::Parse { .. } | Self::InvalidPattern { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ManifestError::NotFound(PathBuf::from("/tmp/missing.json"));
        assert!(err.to_string().contains("/tmp/missing.json"));

        let err = ManifestError::PrimaryDirectiveMissing("ARCH-000".to_string());
        assert!(err.to_string().contains("ARCH-000"));
        assert!(!err.is_parse_error());

        let err = ManifestError::Parse {
            origin: "inline".to_string(),
            message: "expected value".to_string(),
        };
        assert!(err.is_parse_error());
    }
}
