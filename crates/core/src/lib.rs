// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! sr-core: domain types for fanning one command out into remote builds

pub mod build;
pub mod clock;
pub mod command;
pub mod config;
pub mod id;
pub mod naming;
pub mod partition;
pub mod template;

pub use build::{
    is_access_denied_race, BuildInfo, BuildPhase, BuildStatus, PhaseContext, PhaseError,
    UnknownStatus, ACCESS_DENIED,
};
pub use clock::{Clock, FakeClock, SystemClock};
pub use command::{interpolate_files, BuildSpecTemplate, FILES_PLACEHOLDER};
pub use config::{ComputeType, ConfigError, EnvVar, RunConfig};
pub use id::{BuildId, ProjectName, ResultKey};
pub use naming::{OutputNames, RunNames, DEFAULT_PREFIX};
pub use partition::{partition, PartitionError};
