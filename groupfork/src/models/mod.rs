//! Data models for groups and projects on the remote platform.

mod entity;
mod group;

pub use entity::{DescriptorUpdate, EntityDescriptor, EntityId, EntityKind};
pub use group::NewGroup;
