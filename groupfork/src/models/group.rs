//! Request model for creating a group.

use serde::Serialize;

use super::{EntityDescriptor, EntityId};

/// Parameters of a group creation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewGroup {
    pub name: String,
    pub path: String,
    /// Parent group; `None` creates a top-level group.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<EntityId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl NewGroup {
    /// A top-level group whose name and path are both `name`.
    pub fn top_level(name: &str) -> Self {
        Self {
            name: name.to_string(),
            path: name.to_string(),
            parent_id: None,
            description: None,
        }
    }

    /// A copy of `source` nested under `parent`.
    pub fn mirror_of(source: &EntityDescriptor, parent: EntityId) -> Self {
        Self {
            name: source.name.clone(),
            path: source.path.clone(),
            parent_id: Some(parent),
            description: if source.description.is_empty() {
                None
            } else {
                Some(source.description.clone())
            },
        }
    }
}
