//! Error types for groupfork.

use thiserror::Error;

use crate::models::EntityId;

/// Result type alias using groupfork's error type.
pub type Result<T> = std::result::Result<T, MirrorError>;

/// Structural errors raised by [`crate::tree::HierarchyTree`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// Declared parent is not in the tree
    #[error("Cannot insert node {child}: parent {parent} is not in the tree")]
    MissingParent { parent: EntityId, child: EntityId },

    /// Lookup of an unknown identity
    #[error("Node {id} not found in tree")]
    NotFound { id: EntityId },

    /// A parentless insert into a tree that already has a root
    #[error("Tree already has root {existing}, cannot add {id} as a second root")]
    DuplicateRoot { existing: EntityId, id: EntityId },

    /// The same identity inserted twice
    #[error("Node {id} is already in the tree")]
    DuplicateNode { id: EntityId },

    /// A child inserted before any root
    #[error("Tree is empty, the first node must be inserted without a parent")]
    EmptyTree,
}

/// Errors returned by a [`crate::gitlab::RemoteDirectory`] implementation.
#[derive(Error, Debug)]
pub enum ClientError {
    /// The remote has no such resource
    #[error("{resource} not found")]
    NotFound { resource: String },

    /// The remote answered with a non-success status
    #[error("{method} {url} returned {status}: {body}")]
    Status {
        method: String,
        url: String,
        status: u16,
        body: String,
    },

    /// Transport or decoding failure
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Base URL could not be used to build API URLs
    #[error("Invalid base URL: {url}")]
    InvalidUrl { url: String },
}

impl ClientError {
    /// Whether the remote reported the resource as missing.
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Errors that abort a mirror run.
#[derive(Error, Debug)]
pub enum MirrorError {
    /// No usable configuration, e.g. no API token
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// The source namespace does not exist
    #[error("Source namespace '{path}' not found")]
    SourceNotFound { path: String },

    /// Reading the source hierarchy failed partway
    #[error("Failed to discover subgroups of '{group}'")]
    Discovery {
        group: String,
        #[source]
        source: ClientError,
    },

    /// Destination is not a bare top-level name
    #[error("Invalid destination '{name}': {reason}")]
    InvalidDestination { name: String, reason: String },

    /// Creating the destination root or one of its subgroups failed
    #[error("Failed to create destination group '{full_path}'")]
    DestinationCreate {
        full_path: String,
        #[source]
        source: ClientError,
    },

    /// A source group has no recorded destination counterpart
    #[error("Source group {id} has no destination group")]
    UnmappedGroup { id: EntityId },

    /// Listing the projects of a source group failed
    #[error("Failed to list projects of '{group}'")]
    ProjectListing {
        group: String,
        #[source]
        source: ClientError,
    },

    /// Forking a project failed
    #[error("Failed to fork project '{project}' into namespace {namespace}")]
    Fork {
        project: String,
        namespace: EntityId,
        #[source]
        source: ClientError,
    },

    /// A fork task panicked or was cancelled
    #[error("Fork task did not complete: {message}")]
    ForkTask { message: String },

    #[error(transparent)]
    Tree(#[from] TreeError),
}
