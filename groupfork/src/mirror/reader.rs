//! Discovery of the source group hierarchy.

use crate::error::{MirrorError, Result};
use crate::gitlab::RemoteDirectory;
use crate::tree::HierarchyTree;

use super::{MirrorEvent, MirrorObserver};

/// Reads a source namespace and all of its subgroups into a tree.
///
/// Only lookups and listings are issued; nothing is written remotely.
pub struct SourceReader<'a, C: ?Sized> {
    client: &'a C,
    observer: &'a dyn MirrorObserver,
}

impl<'a, C: RemoteDirectory + ?Sized> SourceReader<'a, C> {
    pub fn new(client: &'a C, observer: &'a dyn MirrorObserver) -> Self {
        Self { client, observer }
    }

    /// Build the tree rooted at the group `root_path`.
    ///
    /// Subgroups are discovered depth first with an explicit worklist, so
    /// nesting depth is bounded only by the remote hierarchy.
    ///
    /// # Errors
    ///
    /// - [`MirrorError::SourceNotFound`] if the root group does not exist
    /// - [`MirrorError::Discovery`] if any lookup or listing fails; no
    ///   partial tree is returned
    pub async fn read(&self, root_path: &str) -> Result<HierarchyTree> {
        let root = self.client.lookup_group(root_path).await.map_err(|source| {
            if source.is_not_found() {
                MirrorError::SourceNotFound {
                    path: root_path.to_string(),
                }
            } else {
                MirrorError::Discovery {
                    group: root_path.to_string(),
                    source,
                }
            }
        })?;

        let mut tree = HierarchyTree::new();
        let root_id = root.id;
        self.observer.notify(&MirrorEvent::GroupDiscovered {
            id: root_id,
            parent: None,
            full_path: root.full_path.clone(),
        });
        tree.insert(None, root)?;

        let mut pending = vec![root_id];
        while let Some(group_id) = pending.pop() {
            let subgroups = self
                .client
                .list_subgroups(group_id)
                .await
                .map_err(|source| MirrorError::Discovery {
                    group: tree
                        .get(group_id)
                        .map_or_else(|_| group_id.to_string(), |g| g.full_path.clone()),
                    source,
                })?;

            for subgroup in subgroups {
                self.observer.notify(&MirrorEvent::GroupDiscovered {
                    id: subgroup.id,
                    parent: Some(group_id),
                    full_path: subgroup.full_path.clone(),
                });
                tree.insert(Some(group_id), subgroup)?;
            }

            // Reversed so the first child is expanded next
            pending.extend(tree.children(group_id)?.iter().rev().copied());
        }

        self.observer.notify(&MirrorEvent::DiscoveryFinished {
            groups: tree.size(),
        });
        Ok(tree)
    }
}
