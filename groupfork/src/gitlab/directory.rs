//! The operations the mirror needs from the remote platform.

use async_trait::async_trait;

use crate::error::ClientError;
use crate::models::{EntityDescriptor, EntityId, NewGroup};

/// Group and project lookups, group creation, and project forking.
///
/// Implementations perform one remote request sequence per call and never
/// retry.
#[async_trait]
pub trait RemoteDirectory: Send + Sync {
    /// Look up a group by numeric id or full path.
    async fn lookup_group(&self, path_or_id: &str) -> Result<EntityDescriptor, ClientError>;

    /// Direct subgroups of a group.
    async fn list_subgroups(&self, group: EntityId) -> Result<Vec<EntityDescriptor>, ClientError>;

    /// Create a group, nested when `request.parent_id` is set.
    async fn create_group(&self, request: &NewGroup) -> Result<EntityDescriptor, ClientError>;

    /// Projects directly contained in a group.
    async fn list_projects(&self, group: EntityId) -> Result<Vec<EntityDescriptor>, ClientError>;

    /// Fork a project into a namespace, returning the new project.
    async fn fork_project(
        &self,
        project: EntityId,
        namespace: EntityId,
    ) -> Result<EntityDescriptor, ClientError>;
}
