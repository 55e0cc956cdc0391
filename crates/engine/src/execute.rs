// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! End-to-end run: stage the source, orchestrate the builds, render the report.

use crate::error::ExecuteError;
use crate::orchestrator::{Orchestrator, RunDeps};
use crate::report::{formatter_for, unit_reports, UnitReport};
use crate::results::ResultEntry;
use crate::source::Source;
use indexmap::IndexMap;
use sr_adapters::{BlobStore, BuildService, IdentityService};
use sr_core::{Clock, ResultKey, RunConfig, RunNames, DEFAULT_PREFIX};
use std::path::Path;
use tracing::Instrument;

/// Rendered report and exit status of a finished run.
#[derive(Debug, Clone)]
pub struct ExecuteOutcome {
    pub names: RunNames,
    pub report: String,
    pub exit_code: i32,
    pub units: Vec<UnitReport>,
    /// Collected outputs, keyed by the final attempt of each unit.
    pub results: IndexMap<ResultKey, ResultEntry>,
}

/// Run `config` against the working tree at `root`.
///
/// Configuration problems and an empty target selection are reported before
/// any remote resource exists. Unless `debug` is set, every resource the run
/// created is gone by the time this returns, on success and on failure.
pub async fn execute<B, S, I, C>(
    deps: RunDeps<B, S, I>,
    config: &RunConfig,
    root: &Path,
    clock: &C,
) -> Result<ExecuteOutcome, ExecuteError>
where
    B: BuildService,
    S: BlobStore,
    I: IdentityService,
    C: Clock,
{
    config.validate()?;
    let formatter = formatter_for(&config.format)
        .ok_or_else(|| ExecuteError::UnknownFormat(config.format.clone()))?;
    let template = config.buildspec_template()?;
    let names = RunNames::new(DEFAULT_PREFIX, clock.epoch_secs());

    let span = tracing::info_span!("run", project = %names.project);
    async move {
        let source =
            Source::stage(deps.blobs.clone(), root, &config.file_pattern, &names).await?;

        let orchestrator = Orchestrator::new(deps, config.clone(), names.clone(), template);
        let outcome = match orchestrator
            .run(&source.location(), source.target_files())
            .await
        {
            Ok(outcome) => outcome,
            Err(e) => {
                if !config.debug {
                    if let Err(e) = source.delete().await {
                        tracing::error!(error = %e, "failed to delete source");
                    }
                }
                return Err(ExecuteError::from(e));
            }
        };

        let results = outcome.results.entries();
        let units = unit_reports(&outcome.units, &results);
        let report = formatter.render(&units);
        let exit_code = formatter.exit_status(&units);

        if config.debug {
            tracing::info!(
                source = %source.location(),
                results = %outcome.results.container(),
                "debug mode, keeping source and result store"
            );
        } else {
            if let Err(e) = outcome.results.teardown().await {
                tracing::error!(error = %e, "failed to delete result store");
            }
            if let Err(e) = source.delete().await {
                tracing::error!(error = %e, "failed to delete source");
            }
        }

        tracing::info!(builds = units.len(), exit_code, "run finished");
        Ok::<_, ExecuteError>(ExecuteOutcome {
            names,
            report,
            exit_code,
            units,
            results,
        })
    }
    .instrument(span)
    .await
}

#[cfg(test)]
#[path = "execute_tests.rs"]
mod tests;
