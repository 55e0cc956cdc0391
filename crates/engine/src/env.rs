// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the engine crate.

use std::time::Duration;

fn parse_duration_ms(var: &str) -> Option<Duration> {
    std::env::var(var)
        .ok()
        .and_then(|s| s.trim().parse::<u64>().ok())
        .map(Duration::from_millis)
}

/// Interval between status polls (`SR_POLL_MS`, falling back to `configured`).
pub fn poll_interval(configured: Duration) -> Duration {
    parse_duration_ms("SR_POLL_MS").unwrap_or(configured)
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
