// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Drives one run: grant, project, fan-out, polling with retries, collection.

use crate::env;
use crate::error::OrchestratorError;
use crate::grant::PermissionGrant;
use crate::results::ResultStore;
use crate::unit::BuildUnit;
use sr_adapters::{BlobStore, BuildService, IdentityService, ProjectSpec};
use sr_core::{partition, BuildSpecTemplate, BuildStatus, ProjectName, ResultKey, RunConfig, RunNames};
use std::collections::HashSet;

/// Adapter dependencies of a run
#[derive(Clone)]
pub struct RunDeps<B, S, I> {
    pub builds: B,
    pub blobs: S,
    pub identity: I,
}

/// What a finished run hands back to its caller.
pub struct RunOutcome<B, S> {
    pub project: ProjectName,
    pub units: Vec<BuildUnit<B>>,
    pub results: ResultStore<S>,
}

/// Owns the run-wide remote resources and the polling loop over all units.
pub struct Orchestrator<B, S, I> {
    deps: RunDeps<B, S, I>,
    config: RunConfig,
    names: RunNames,
    template: BuildSpecTemplate,
}

impl<B, S, I> Orchestrator<B, S, I>
where
    B: BuildService,
    S: BlobStore,
    I: IdentityService,
{
    pub fn new(
        deps: RunDeps<B, S, I>,
        config: RunConfig,
        names: RunNames,
        template: BuildSpecTemplate,
    ) -> Self {
        Self {
            deps,
            config,
            names,
            template,
        }
    }

    pub fn names(&self) -> &RunNames {
        &self.names
    }

    /// Run every target through the remote service and collect the outputs.
    ///
    /// Fatal errors tear down whatever was already created (unless debug)
    /// before they are returned. Per-build failures never abort the run.
    pub async fn run(
        &self,
        source_location: &str,
        targets: &[String],
    ) -> Result<RunOutcome<B, S>, OrchestratorError> {
        let results = ResultStore::create(
            self.deps.blobs.clone(),
            self.names.result_container.clone(),
            self.names.outputs.clone(),
        )
        .await
        .map_err(OrchestratorError::Results)?;

        let grant =
            match PermissionGrant::create(self.deps.identity.clone(), &self.names, source_location)
                .await
            {
                Ok(grant) => grant,
                Err(e) => {
                    self.abort(None, false, &results).await;
                    return Err(e.into());
                }
            };

        if let Err(e) = self.create_project(source_location, &grant).await {
            self.abort(Some(grant), false, &results).await;
            return Err(e);
        }

        let mut units = match self.launch_units(targets, &results).await {
            Ok(units) => units,
            Err(e) => {
                self.abort(Some(grant), true, &results).await;
                return Err(e);
            }
        };

        self.poll(&mut units, &results).await;
        tracing::info!(builds = units.len(), "builds completed");

        results.collect().await;
        self.teardown(grant).await;

        Ok(RunOutcome {
            project: self.names.project.clone(),
            units,
            results,
        })
    }

    async fn create_project(
        &self,
        source_location: &str,
        grant: &PermissionGrant<I>,
    ) -> Result<(), OrchestratorError> {
        let spec = ProjectSpec {
            name: self.names.project.clone(),
            source_location: source_location.to_string(),
            artifact_container: self.names.result_container.clone(),
            image: self.config.image.clone(),
            compute_type: self.config.compute_type.remote_name().to_string(),
            environment_variables: self.config.environment_variables(),
            service_role: grant.role().arn.clone(),
            timeout_minutes: self.config.timeout,
        };

        let limit = self.config.project_retry_limit.max(1);
        let mut attempt = 1;
        loop {
            match self.deps.builds.create_project(&spec).await {
                Ok(()) => {
                    tracing::info!(project = %spec.name, attempt, "created project");
                    return Ok(());
                }
                // The new role is not assumable until it propagates
                Err(e) if e.is_transient_auth() && attempt < limit => {
                    tracing::info!(attempt, error = %e, "project creation refused, retrying");
                    tokio::time::sleep(self.config.project_retry_delay()).await;
                    attempt += 1;
                }
                Err(source) => {
                    return Err(OrchestratorError::Project {
                        attempts: attempt,
                        source,
                    })
                }
            }
        }
    }

    async fn launch_units(
        &self,
        targets: &[String],
        results: &ResultStore<S>,
    ) -> Result<Vec<BuildUnit<B>>, OrchestratorError> {
        let groups = partition(targets, self.config.concurrency)?;
        tracing::info!(
            files = targets.len(),
            concurrency = self.config.concurrency,
            real_concurrency = groups.len(),
            "starting parallel build"
        );

        let mut units = Vec::with_capacity(groups.len());
        for group in groups {
            let buildspec =
                self.template
                    .render(&self.config.commands, &group, &self.names.outputs)?;
            tracing::debug!(%buildspec, "rendered build spec");
            let mut unit = BuildUnit::new(
                self.deps.builds.clone(),
                self.names.project.clone(),
                group,
                buildspec,
                self.config.retry_limit,
            );
            unit.launch().await?;
            if let Some(key) = unit.result_key() {
                results.register(key);
            }
            units.push(unit);
        }
        Ok(units)
    }

    /// Poll until no unit is running.
    ///
    /// Each tick: retry access-denied units, then count running units and
    /// report failures, then sleep and refresh. A retried unit has no
    /// cached status, so it counts as running in the tick it was retried.
    async fn poll(&self, units: &mut [BuildUnit<B>], results: &ResultStore<S>) {
        let interval = env::poll_interval(self.config.poll_interval());
        let mut reported: HashSet<ResultKey> = HashSet::new();

        loop {
            for unit in units.iter_mut() {
                match unit.access_denied().await {
                    Ok(true) if unit.retriable() => retry(unit, results).await,
                    Ok(_) => {}
                    Err(e) => tracing::warn!(error = %e, "status lookup failed"),
                }
            }

            let mut running = 0;
            for unit in units.iter_mut() {
                match unit.cached_status() {
                    None => running += 1,
                    Some(status) if status.is_running() => running += 1,
                    Some(BuildStatus::Failed) => {
                        if let Some(key) = unit.result_key() {
                            if reported.insert(key) {
                                warn_failure(unit).await;
                            }
                        }
                    }
                    Some(_) => {}
                }
            }

            if running == 0 {
                break;
            }
            tracing::info!(
                finished = units.len() - running,
                total = units.len(),
                "waiting for builds"
            );
            tokio::time::sleep(interval).await;
            units.iter_mut().for_each(BuildUnit::refresh);
        }
    }

    async fn teardown(&self, grant: PermissionGrant<I>) {
        if self.config.debug {
            tracing::info!(project = %self.names.project, "debug mode, keeping project and grant");
            return;
        }
        if let Err(e) = grant.delete().await {
            tracing::error!(error = %e, "failed to delete permission grant");
        }
        match self.deps.builds.delete_project(&self.names.project).await {
            Ok(()) => tracing::info!(project = %self.names.project, "deleted project"),
            Err(e) => tracing::error!(error = %e, "failed to delete project"),
        }
    }

    /// Best-effort cleanup after a fatal error.
    async fn abort(
        &self,
        grant: Option<PermissionGrant<I>>,
        project_created: bool,
        results: &ResultStore<S>,
    ) {
        if self.config.debug {
            tracing::info!("debug mode, keeping resources of the failed run");
            return;
        }
        if project_created {
            if let Err(e) = self.deps.builds.delete_project(&self.names.project).await {
                tracing::error!(error = %e, "failed to delete project");
            }
        }
        if let Some(grant) = grant {
            if let Err(e) = grant.delete().await {
                tracing::error!(error = %e, "failed to delete permission grant");
            }
        }
        if let Err(e) = results.teardown().await {
            tracing::error!(error = %e, "failed to delete result store");
        }
    }
}

/// Resubmit an access-denied unit and swap its result key.
async fn retry<B: BuildService, S: BlobStore>(unit: &mut BuildUnit<B>, results: &ResultStore<S>) {
    let Some(old) = unit.result_key() else {
        return;
    };
    match unit.retry().await {
        Ok(_) => {
            if let Some(new) = unit.result_key() {
                results.replace(&old, new);
            }
        }
        Err(e) => tracing::warn!(build = %old, error = %e, "retry failed"),
    }
}

async fn warn_failure<B: BuildService>(unit: &mut BuildUnit<B>) {
    let build = unit.build_id().map(ToString::to_string).unwrap_or_default();
    let errors = match unit.errors().await {
        Ok(errors) => errors,
        Err(e) => {
            tracing::warn!(%build, error = %e, "build failed");
            return;
        }
    };
    if errors.is_empty() {
        tracing::warn!(%build, "build failed");
    }
    for error in errors {
        tracing::warn!(
            %build,
            phase_type = %error.phase_type,
            phase_status = %error.phase_status,
            status = %error.status,
            message = %error.message,
            "build failed"
        );
    }
}

#[cfg(test)]
#[path = "orchestrator_tests.rs"]
mod tests;
