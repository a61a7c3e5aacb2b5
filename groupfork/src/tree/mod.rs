//! In-memory hierarchy of groups keyed by remote identity.
//!
//! A [`HierarchyTree`] is a rooted, ordered multi-way tree:
//! - Exactly one root, inserted first and without a parent
//! - Every other node is inserted under a parent already in the tree
//! - Children keep their insertion order, so traversals are deterministic
//!
//! Traversal uses an explicit stack and never recurses, so arbitrarily
//! deep hierarchies are safe to walk.

mod render;

use std::collections::HashMap;

use crate::error::TreeError;
use crate::models::{DescriptorUpdate, EntityDescriptor, EntityId};

/// A single tree node and its edges.
#[derive(Debug, Clone)]
struct Node {
    descriptor: EntityDescriptor,
    parent: Option<EntityId>,
    children: Vec<EntityId>,
}

/// Ordered tree of entity descriptors.
#[derive(Debug, Clone, Default)]
pub struct HierarchyTree {
    root: Option<EntityId>,
    nodes: HashMap<EntityId, Node>,
}

impl HierarchyTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `descriptor` under `parent`.
    ///
    /// Without a parent the node becomes the root, which is only allowed
    /// for the first insertion.
    ///
    /// # Errors
    ///
    /// - [`TreeError::MissingParent`] if `parent` is not in the tree
    /// - [`TreeError::DuplicateRoot`] if a root already exists and `parent` is `None`
    /// - [`TreeError::EmptyTree`] if a parent is given before a root exists
    /// - [`TreeError::DuplicateNode`] if the identity is already present
    pub fn insert(
        &mut self,
        parent: Option<EntityId>,
        descriptor: EntityDescriptor,
    ) -> Result<(), TreeError> {
        let id = descriptor.id;
        if self.nodes.contains_key(&id) {
            return Err(TreeError::DuplicateNode { id });
        }

        match parent {
            None => {
                if let Some(existing) = self.root {
                    return Err(TreeError::DuplicateRoot { existing, id });
                }
                self.root = Some(id);
            }
            Some(parent_id) => {
                if self.root.is_none() {
                    return Err(TreeError::EmptyTree);
                }
                let parent_node = self.nodes.get_mut(&parent_id).ok_or(TreeError::MissingParent {
                    parent: parent_id,
                    child: id,
                })?;
                parent_node.children.push(id);
            }
        }

        self.nodes.insert(
            id,
            Node {
                descriptor,
                parent,
                children: Vec::new(),
            },
        );
        Ok(())
    }

    /// Get the descriptor of a node.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::NotFound`] for an unknown identity.
    pub fn get(&self, id: EntityId) -> Result<&EntityDescriptor, TreeError> {
        self.node(id).map(|node| &node.descriptor)
    }

    /// Parent of a node, `None` for the root.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::NotFound`] for an unknown identity.
    pub fn parent_of(&self, id: EntityId) -> Result<Option<EntityId>, TreeError> {
        self.node(id).map(|node| node.parent)
    }

    /// Children of a node in insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::NotFound`] for an unknown identity.
    pub fn children(&self, id: EntityId) -> Result<&[EntityId], TreeError> {
        self.node(id).map(|node| node.children.as_slice())
    }

    /// Merge the fields present in `update` into a node's descriptor.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::NotFound`] for an unknown identity.
    pub fn update(&mut self, id: EntityId, update: DescriptorUpdate) -> Result<(), TreeError> {
        let node = self.nodes.get_mut(&id).ok_or(TreeError::NotFound { id })?;
        node.descriptor.apply(update);
        Ok(())
    }

    /// Number of edges between a node and the root.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::NotFound`] for an unknown identity.
    pub fn depth(&self, id: EntityId) -> Result<usize, TreeError> {
        let mut depth = 0;
        let mut current = self.node(id)?.parent;
        while let Some(parent) = current {
            depth += 1;
            current = self.node(parent)?.parent;
        }
        Ok(depth)
    }

    /// Identity of the root, if any node has been inserted.
    pub const fn root(&self) -> Option<EntityId> {
        self.root
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Number of nodes.
    pub fn size(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Depth-first preorder walk from the root.
    ///
    /// A node is always yielded before any of its descendants, and siblings
    /// are yielded in insertion order. Each call starts a fresh walk.
    pub fn preorder(&self) -> Preorder<'_> {
        Preorder {
            tree: self,
            stack: self.root.into_iter().collect(),
        }
    }

    fn node(&self, id: EntityId) -> Result<&Node, TreeError> {
        self.nodes.get(&id).ok_or(TreeError::NotFound { id })
    }
}

/// Lazy preorder iterator over node identities.
#[derive(Debug, Clone)]
pub struct Preorder<'a> {
    tree: &'a HierarchyTree,
    stack: Vec<EntityId>,
}

impl Iterator for Preorder<'_> {
    type Item = EntityId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        if let Some(node) = self.tree.nodes.get(&id) {
            // Reversed so the first child is popped next
            self.stack.extend(node.children.iter().rev().copied());
        }
        Some(id)
    }
}
