//! Creation of the destination group hierarchy.

use std::collections::HashMap;

use crate::error::{MirrorError, Result, TreeError};
use crate::gitlab::RemoteDirectory;
use crate::models::{EntityId, NewGroup};
use crate::tree::HierarchyTree;

use super::{MirrorEvent, MirrorObserver};

/// Mapping from source group identity to the identity of its mirror.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentityMap {
    mirrors: HashMap<EntityId, EntityId>,
}

impl IdentityMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `source` is mirrored by `destination`.
    pub fn record(&mut self, source: EntityId, destination: EntityId) {
        self.mirrors.insert(source, destination);
    }

    /// Destination identity of a source group, if it has been created.
    pub fn get(&self, source: EntityId) -> Option<EntityId> {
        self.mirrors.get(&source).copied()
    }

    pub fn len(&self) -> usize {
        self.mirrors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mirrors.is_empty()
    }
}

/// Result of building the destination.
#[derive(Debug, Clone)]
pub struct DestinationLayout {
    /// Tree of the created destination groups.
    pub tree: HierarchyTree,
    /// Source to destination identity of every mirrored group.
    pub identities: IdentityMap,
}

/// Check that `name` can be created as a top-level group.
///
/// # Errors
///
/// Returns [`MirrorError::InvalidDestination`] for an empty name or one
/// containing a path separator.
pub fn validate_destination(name: &str) -> Result<()> {
    let reason = if name.trim().is_empty() {
        "destination name is empty"
    } else if name.contains('/') {
        "creating the destination inside another group is not supported"
    } else {
        return Ok(());
    };

    Err(MirrorError::InvalidDestination {
        name: name.to_string(),
        reason: reason.to_string(),
    })
}

/// Recreates a source hierarchy under a new top-level group.
pub struct DestinationBuilder<'a, C: ?Sized> {
    client: &'a C,
    observer: &'a dyn MirrorObserver,
}

impl<'a, C: RemoteDirectory + ?Sized> DestinationBuilder<'a, C> {
    pub fn new(client: &'a C, observer: &'a dyn MirrorObserver) -> Self {
        Self { client, observer }
    }

    /// Create `destination` and one group per source subgroup beneath it.
    ///
    /// Groups are created in preorder of the source tree, so every parent
    /// exists before its children are requested. Nothing is cleaned up on
    /// failure; already created groups stay on the remote.
    ///
    /// # Errors
    ///
    /// - [`MirrorError::InvalidDestination`] before any remote call
    /// - [`MirrorError::DestinationCreate`] if the root or any subgroup
    ///   cannot be created, e.g. because the name is taken
    pub async fn build(
        &self,
        destination: &str,
        source: &HierarchyTree,
    ) -> Result<DestinationLayout> {
        validate_destination(destination)?;
        let source_root = source.root().ok_or(TreeError::EmptyTree)?;

        let root = self
            .client
            .create_group(&NewGroup::top_level(destination))
            .await
            .map_err(|err| MirrorError::DestinationCreate {
                full_path: destination.to_string(),
                source: err,
            })?;

        let mut identities = IdentityMap::new();
        let mut tree = HierarchyTree::new();
        identities.record(source_root, root.id);
        self.observer.notify(&MirrorEvent::GroupCreated {
            source: source_root,
            created: root.id,
            full_path: root.full_path.clone(),
        });
        tree.insert(None, root)?;

        for source_id in source.preorder().skip(1) {
            let group = source.get(source_id)?;
            let source_parent = source
                .parent_of(source_id)?
                .ok_or(TreeError::NotFound { id: source_id })?;
            let parent = identities
                .get(source_parent)
                .ok_or(MirrorError::UnmappedGroup { id: source_parent })?;

            let created = self
                .client
                .create_group(&NewGroup::mirror_of(group, parent))
                .await
                .map_err(|err| MirrorError::DestinationCreate {
                    full_path: tree.get(parent).map_or_else(
                        |_| group.path.clone(),
                        |p| format!("{}/{}", p.full_path, group.path),
                    ),
                    source: err,
                })?;

            identities.record(source_id, created.id);
            self.observer.notify(&MirrorEvent::GroupCreated {
                source: source_id,
                created: created.id,
                full_path: created.full_path.clone(),
            });
            tree.insert(Some(parent), created)?;
        }

        Ok(DestinationLayout { tree, identities })
    }
}
