//! Progress events emitted by the mirror phases.

use tracing::{debug, info, warn};

use crate::models::EntityId;

/// Event emitted while mirroring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MirrorEvent {
    /// A source group was added to the source tree.
    GroupDiscovered {
        id: EntityId,
        parent: Option<EntityId>,
        full_path: String,
    },

    /// The whole source hierarchy has been read.
    DiscoveryFinished { groups: usize },

    /// A destination group was created for a source group.
    GroupCreated {
        source: EntityId,
        created: EntityId,
        full_path: String,
    },

    /// Projects have been listed and fork jobs planned.
    ForksPlanned { projects: usize },

    /// A project was forked.
    ProjectForked {
        /// Full path of the source project.
        project: String,
        /// Display name of the source project.
        name: String,
        namespace: EntityId,
        fork: EntityId,
    },

    /// A fork request failed.
    ForkFailed {
        project: String,
        namespace: EntityId,
        error: String,
    },
}

/// Receiver of [`MirrorEvent`]s.
pub trait MirrorObserver: Send + Sync {
    fn notify(&self, event: &MirrorEvent);
}

/// Observer that turns events into `tracing` events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl MirrorObserver for TracingObserver {
    fn notify(&self, event: &MirrorEvent) {
        match event {
            MirrorEvent::GroupDiscovered {
                id,
                parent,
                full_path,
            } => match parent {
                Some(parent) => debug!(%id, %parent, %full_path, "Found sub-group"),
                None => debug!(%id, %full_path, "Found source group"),
            },
            MirrorEvent::DiscoveryFinished { groups } => {
                info!(groups, "Finished reading source groups");
            }
            MirrorEvent::GroupCreated {
                source,
                created,
                full_path,
            } => info!(%source, %created, %full_path, "Group created"),
            MirrorEvent::ForksPlanned { projects } => info!(projects, "Projects to fork"),
            MirrorEvent::ProjectForked {
                project,
                namespace,
                fork,
                ..
            } => info!(%project, %namespace, %fork, "Forked project"),
            MirrorEvent::ForkFailed {
                project,
                namespace,
                error,
            } => warn!(%project, %namespace, %error, "Fork failed"),
        }
    }
}
