// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Rule Graph Domain Layer
//!
//! Pure types for the rule graph. No I/O dependencies.
//!
//! | Module | Key Types |
//! |--------|-----------|
//! | [`rule`] | `Rule`, `Priority`, `Partition` |
//! | [`manifest`] | `Manifest`, `ManifestDocument`, `RedFlag`, `RoutingConfig` |
//! | [`routing`] | `RouteResult`, `MatchReason` |
//! | [`validation`] | `ValidationFinding`, `IntegrityReport`, `CoverageReport` |
//! | [`engine_config`] | `EngineConfig`, `GatingPolicy` |

pub mod rule;
pub mod manifest;
pub mod routing;
pub mod validation;
pub mod engine_config;
pub mod errors;

pub use rule::*;
pub use manifest::*;
pub use routing::*;
pub use validation::*;
pub use engine_config::*;
pub use errors::*;
