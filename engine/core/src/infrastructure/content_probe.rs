// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Rule content existence checks.
//!
//! The validator only needs to know whether a rule's `path` locator points at
//! something. How that is decided is up to the probe.

use std::path::{Path, PathBuf};

pub trait ContentProbe: Send + Sync {
    fn exists(&self, locator: &str) -> bool;
}

/// Resolves locators relative to a root directory.
#[derive(Debug, Clone)]
pub struct FileSystemProbe {
    root: PathBuf,
}

impl FileSystemProbe {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn resolve(&self, locator: &str) -> PathBuf {
        self.root.join(locator)
    }
}

impl ContentProbe for FileSystemProbe {
    fn exists(&self, locator: &str) -> bool {
        self.resolve(locator).is_file()
    }
}

/// Treats every locator as present. For manifests whose content lives
/// elsewhere.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysPresent;

impl ContentProbe for AlwaysPresent {
    fn exists(&self, _locator: &str) -> bool {
        true
    }
}

impl<F> ContentProbe for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn exists(&self, locator: &str) -> bool {
        self(locator)
    }
}
