// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Report formatters and the run's exit status.

use crate::results::{ResultEntry, Slot};
use crate::unit::BuildUnit;
use indexmap::IndexMap;
use serde_json::json;
use sr_adapters::BuildService;
use sr_core::{BuildStatus, ResultKey};
use std::fmt::Write;

const RULE: &str =
    "-------------------------------------------------------------------------------------------";

/// Outcome of one build, joined with its fetched outputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitReport {
    pub key: ResultKey,
    /// Last observed status; `None` when no build matched the key.
    pub status: Option<BuildStatus>,
    pub stdout: Slot,
    pub stderr: Slot,
    pub exit_status: Slot,
    /// The exit status object is missing or not a number.
    pub invalid: bool,
}

impl UnitReport {
    pub fn new(key: ResultKey, status: Option<BuildStatus>, entry: ResultEntry) -> Self {
        let invalid = parse_exit_status(&entry.exit_status).is_none();
        Self {
            key,
            status,
            stdout: entry.stdout,
            stderr: entry.stderr,
            exit_status: entry.exit_status,
            invalid,
        }
    }

    pub fn success(&self) -> bool {
        !self.invalid && self.status.is_some_and(BuildStatus::is_success)
    }

    /// Exit code this build contributes to the run.
    pub fn exit_code(&self) -> i32 {
        let code = parse_exit_status(&self.exit_status).unwrap_or(1);
        if self.status.is_some_and(BuildStatus::is_success) {
            code
        } else {
            code.max(1)
        }
    }
}

fn parse_exit_status(slot: &Slot) -> Option<i32> {
    slot.as_found().and_then(|text| text.trim().parse().ok())
}

/// Join finished units with the collected entries, in registry order.
pub fn unit_reports<B: BuildService>(
    units: &[BuildUnit<B>],
    entries: &IndexMap<ResultKey, ResultEntry>,
) -> Vec<UnitReport> {
    entries
        .iter()
        .map(|(key, entry)| {
            let status = units
                .iter()
                .find(|unit| unit.result_key().as_ref() == Some(key))
                .and_then(BuildUnit::cached_status);
            UnitReport::new(key.clone(), status, entry.clone())
        })
        .collect()
}

/// Renders a finished run for people or machines.
pub trait Formatter: Send + Sync {
    fn render(&self, units: &[UnitReport]) -> String;

    /// Highest exit code over all builds; 0 for an empty run.
    fn exit_status(&self, units: &[UnitReport]) -> i32 {
        units.iter().map(UnitReport::exit_code).max().unwrap_or(0)
    }
}

/// Human-readable block per build.
pub struct Pretty;

impl Formatter for Pretty {
    fn render(&self, units: &[UnitReport]) -> String {
        let mut out = String::new();
        for unit in units {
            let result = if unit.success() { "SUCCESS" } else { "FAILED" };
            let _ = writeln!(out);
            let _ = writeln!(out, "{RULE}");
            let _ = writeln!(out, "BUILD_ID: {}", unit.key);
            let _ = writeln!(out, "RESULT: {result}");
            for (label, slot) in [
                ("STDOUT", &unit.stdout),
                ("STDERR", &unit.stderr),
                ("EXIT_STATUS", &unit.exit_status),
            ] {
                if let Some(text) = slot.as_found() {
                    let _ = writeln!(out, "{label}: {}", text.trim_end());
                }
            }
            let _ = writeln!(out, "{RULE}");
            let _ = writeln!(out);
        }
        out
    }
}

/// One JSON document listing every build.
pub struct Json;

impl Formatter for Json {
    fn render(&self, units: &[UnitReport]) -> String {
        let builds: Vec<_> = units
            .iter()
            .map(|unit| {
                json!({
                    "build_id": unit.key.as_str(),
                    "status": unit.status.map(BuildStatus::as_str),
                    "result": if unit.success() { "SUCCESS" } else { "FAILED" },
                    "stdout": unit.stdout.to_string(),
                    "stderr": unit.stderr.to_string(),
                    "exit_status": unit.exit_status.to_string(),
                })
            })
            .collect();
        format!("{:#}\n", json!({ "builds": builds }))
    }
}

/// Keys accepted by [`formatter_for`].
pub const FORMATS: &[&str] = &["pretty", "json"];

/// Look up a formatter by its configuration key.
pub fn formatter_for(key: &str) -> Option<&'static dyn Formatter> {
    match key {
        "pretty" => Some(&Pretty),
        "json" => Some(&Json),
        _ => None,
    }
}

#[cfg(test)]
#[path = "report_tests.rs"]
mod tests;
