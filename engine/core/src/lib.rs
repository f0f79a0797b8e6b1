// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # `rulegraph-core` - Rule Manifest Routing Engine
//!
//! Loads a declarative rule graph, validates its integrity and routing
//! coverage, and resolves the ordered set of rules relevant to a free-text
//! task description.
//!
//! ## Crate Layout
//!
//! | Module | Layer | Contents |
//! |--------|-------|----------|
//! | [`domain`] | Domain | `Rule`, `Manifest`, routing and validation value types |
//! | [`infrastructure`] | Infrastructure | manifest parser, caching `ManifestStore`, content probes |
//! | [`application`] | Application | `ManifestValidator`, `TaskRouter`, `RuleService` facade |

pub mod domain;
pub mod application;
pub mod infrastructure;

pub use domain::*;
