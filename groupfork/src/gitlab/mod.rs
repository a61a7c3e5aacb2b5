//! Access to the remote group and project directory.

mod client;
mod directory;

pub use client::{GitLabClient, DEFAULT_TIMEOUT};
pub use directory::RemoteDirectory;
