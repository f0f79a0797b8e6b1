// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

pub mod validator;
pub mod router;
pub mod report;
pub mod rule_service;
pub mod registry;

pub use validator::ManifestValidator;
pub use router::TaskRouter;
pub use report::{format_coverage_report, format_integrity_report, format_validation_report};
pub use rule_service::{RuleService, ServiceError, ServiceOptions, ServiceState};
pub use registry::ServiceRegistry;
