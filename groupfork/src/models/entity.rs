//! Entity descriptors for groups and projects.

use serde::{Deserialize, Serialize};

/// Identity assigned by the remote platform to a group or project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub u64);

impl EntityId {
    /// Raw numeric id as used in API paths.
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for EntityId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Kind of entity a descriptor refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    /// A container namespace that may hold subgroups and projects.
    Group,
    /// A forkable repository.
    Project,
}

impl EntityKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Group => "group",
            Self::Project => "project",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A group or project as known at the time it was fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityDescriptor {
    /// Remote identity.
    pub id: EntityId,
    /// Group or project.
    pub kind: EntityKind,
    /// Display name.
    pub name: String,
    /// Last path segment (URL slug).
    pub path: String,
    /// Free-form description, empty when the remote has none.
    pub description: String,
    /// Full path including all parent namespaces.
    pub full_path: String,
}

impl EntityDescriptor {
    /// Create a group descriptor whose full path equals its path.
    pub fn group(id: impl Into<EntityId>, name: &str, path: &str) -> Self {
        Self {
            id: id.into(),
            kind: EntityKind::Group,
            name: name.to_string(),
            path: path.to_string(),
            description: String::new(),
            full_path: path.to_string(),
        }
    }

    /// Create a project descriptor whose full path equals its path.
    #[cfg(test)]
    pub(crate) fn project(id: impl Into<EntityId>, name: &str, path: &str) -> Self {
        Self {
            kind: EntityKind::Project,
            ..Self::group(id, name, path)
        }
    }

    /// Set the full path.
    #[must_use]
    #[cfg(test)]
    pub(crate) fn with_full_path(mut self, full_path: impl Into<String>) -> Self {
        self.full_path = full_path.into();
        self
    }

    /// Set the description.
    #[must_use]
    #[cfg(test)]
    pub(crate) fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Merge the fields present in `update` into this descriptor.
    pub fn apply(&mut self, update: DescriptorUpdate) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(path) = update.path {
            self.path = path;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(full_path) = update.full_path {
            self.full_path = full_path;
        }
    }
}

/// Partial descriptor used to update metadata of an existing tree node.
///
/// The identity and kind of a node never change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DescriptorUpdate {
    pub name: Option<String>,
    pub path: Option<String>,
    pub description: Option<String>,
    pub full_path: Option<String>,
}
