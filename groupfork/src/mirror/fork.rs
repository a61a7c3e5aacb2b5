//! Forking every source project into its mirrored group.
//!
//! Forks are independent of each other, so unlike group creation they may
//! run with bounded concurrency. Jobs start in plan order and a limit of
//! one gives a strictly sequential run.

use std::sync::Arc;

use tokio::task::JoinSet;

use crate::error::{ClientError, MirrorError, Result};
use crate::gitlab::RemoteDirectory;
use crate::models::{EntityDescriptor, EntityId};
use crate::tree::HierarchyTree;

use super::{DestinationLayout, IdentityMap, MirrorEvent, MirrorObserver};

/// What to do when a fork request fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Abort the remaining forks on the first failure.
    #[default]
    FailFast,
    /// Record the failure and keep forking.
    Continue,
}

/// A single planned fork.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForkJob {
    /// Project to fork.
    pub project: EntityDescriptor,
    /// Destination group receiving the fork.
    pub namespace: EntityId,
}

/// A successful fork.
#[derive(Debug, Clone)]
pub struct ForkedProject {
    pub source: EntityDescriptor,
    pub fork: EntityDescriptor,
}

/// A failed fork, kept when running with [`FailurePolicy::Continue`].
#[derive(Debug)]
pub struct FailedFork {
    pub project: EntityDescriptor,
    pub namespace: EntityId,
    pub error: ClientError,
}

/// Outcome of a fork run.
#[derive(Debug, Default)]
pub struct ForkReport {
    /// Successful forks in plan order.
    pub forked: Vec<ForkedProject>,
    /// Failed forks in plan order.
    pub failed: Vec<FailedFork>,
    /// Number of groups in the destination.
    pub groups: usize,
}

impl ForkReport {
    pub fn forked_count(&self) -> usize {
        self.forked.len()
    }

    /// One-line summary for the operator.
    pub fn summary(&self) -> String {
        format!(
            "Forked {} projects into {} groups",
            self.forked_count(),
            self.groups
        )
    }
}

/// Plans and executes project forks.
pub struct ForkOrchestrator<C> {
    client: Arc<C>,
    concurrency: usize,
    policy: FailurePolicy,
}

impl<C: RemoteDirectory + 'static> ForkOrchestrator<C> {
    /// Sequential, fail-fast orchestrator.
    pub fn new(client: Arc<C>) -> Self {
        Self {
            client,
            concurrency: 1,
            policy: FailurePolicy::FailFast,
        }
    }

    /// Allow up to `limit` forks in flight (at least one).
    #[must_use]
    pub fn with_concurrency(mut self, limit: usize) -> Self {
        self.concurrency = limit.max(1);
        self
    }

    #[must_use]
    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Fork every project of every source group into its mirror.
    ///
    /// # Errors
    ///
    /// See [`Self::plan`] and [`Self::execute`].
    pub async fn run(
        &self,
        source: &HierarchyTree,
        destination: &DestinationLayout,
        observer: &dyn MirrorObserver,
    ) -> Result<ForkReport> {
        let jobs = self.plan(source, &destination.identities).await?;
        observer.notify(&MirrorEvent::ForksPlanned {
            projects: jobs.len(),
        });

        let mut report = self.execute(jobs, observer).await?;
        report.groups = destination.tree.size();
        Ok(report)
    }

    /// List the projects of each source group and pair them with the
    /// group's mirror.
    ///
    /// # Errors
    ///
    /// - [`MirrorError::UnmappedGroup`] if a source group was never mirrored
    /// - [`MirrorError::ProjectListing`] if a listing fails
    pub async fn plan(
        &self,
        source: &HierarchyTree,
        identities: &IdentityMap,
    ) -> Result<Vec<ForkJob>> {
        let mut jobs = Vec::new();

        for group_id in source.preorder() {
            let namespace = identities
                .get(group_id)
                .ok_or(MirrorError::UnmappedGroup { id: group_id })?;

            let projects = self
                .client
                .list_projects(group_id)
                .await
                .map_err(|err| MirrorError::ProjectListing {
                    group: source
                        .get(group_id)
                        .map_or_else(|_| group_id.to_string(), |g| g.full_path.clone()),
                    source: err,
                })?;

            jobs.extend(
                projects
                    .into_iter()
                    .map(|project| ForkJob { project, namespace }),
            );
        }

        Ok(jobs)
    }

    /// Run fork jobs with at most `concurrency` requests in flight.
    ///
    /// # Errors
    ///
    /// With [`FailurePolicy::FailFast`], the first failed fork aborts the
    /// run with [`MirrorError::Fork`]. Forks that already succeeded are
    /// not undone.
    pub async fn execute(
        &self,
        jobs: Vec<ForkJob>,
        observer: &dyn MirrorObserver,
    ) -> Result<ForkReport> {
        let mut pending = jobs.into_iter().enumerate();
        let mut in_flight = JoinSet::new();
        let mut forked = Vec::new();
        let mut failed = Vec::new();

        loop {
            while in_flight.len() < self.concurrency {
                let Some((index, job)) = pending.next() else {
                    break;
                };
                let client = Arc::clone(&self.client);
                in_flight.spawn(async move {
                    let result = client.fork_project(job.project.id, job.namespace).await;
                    (index, job, result)
                });
            }

            let Some(joined) = in_flight.join_next().await else {
                break;
            };
            let (index, job, result) = joined.map_err(|err| MirrorError::ForkTask {
                message: err.to_string(),
            })?;

            match result {
                Ok(fork) => {
                    observer.notify(&MirrorEvent::ProjectForked {
                        project: job.project.full_path.clone(),
                        name: job.project.name.clone(),
                        namespace: job.namespace,
                        fork: fork.id,
                    });
                    forked.push((
                        index,
                        ForkedProject {
                            source: job.project,
                            fork,
                        },
                    ));
                }
                Err(error) => {
                    observer.notify(&MirrorEvent::ForkFailed {
                        project: job.project.full_path.clone(),
                        namespace: job.namespace,
                        error: error.to_string(),
                    });
                    match self.policy {
                        FailurePolicy::FailFast => {
                            in_flight.abort_all();
                            return Err(MirrorError::Fork {
                                project: job.project.full_path,
                                namespace: job.namespace,
                                source: error,
                            });
                        }
                        FailurePolicy::Continue => failed.push((
                            index,
                            FailedFork {
                                project: job.project,
                                namespace: job.namespace,
                                error,
                            },
                        )),
                    }
                }
            }
        }

        forked.sort_by_key(|(index, _)| *index);
        failed.sort_by_key(|(index, _)| *index);
        Ok(ForkReport {
            forked: forked.into_iter().map(|(_, fork)| fork).collect(),
            failed: failed.into_iter().map(|(_, fork)| fork).collect(),
            groups: 0,
        })
    }
}
