// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

pub mod manifest_parser;
pub mod manifest_store;
pub mod content_probe;

pub use manifest_parser::{ManifestFormat, ManifestParser};
pub use manifest_store::{ManifestSource, ManifestStore};
pub use content_probe::{AlwaysPresent, ContentProbe, FileSystemProbe};
