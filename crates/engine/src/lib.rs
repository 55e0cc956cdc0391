// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Shardrun execution engine

pub mod env;
mod error;
mod execute;
mod grant;
mod orchestrator;
mod report;
mod results;
mod source;
mod unit;

#[cfg(test)]
mod test_helpers;

pub use error::{ExecuteError, GrantError, OrchestratorError, SourceError, UnitError};
pub use execute::{execute, ExecuteOutcome};
pub use grant::{policy_document, trust_document, PermissionGrant, BUILD_SERVICE_PRINCIPAL};
pub use orchestrator::{Orchestrator, RunDeps, RunOutcome};
pub use report::{formatter_for, unit_reports, Formatter, Json, Pretty, UnitReport, FORMATS};
pub use results::{ResultEntry, ResultStore, Slot, NOT_FOUND};
pub use source::{archive, target_files, Source};
pub use unit::BuildUnit;
