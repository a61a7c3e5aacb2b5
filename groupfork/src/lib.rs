//! Groupfork - mirror a GitLab group hierarchy into a new namespace.
//!
//! A run has three phases:
//! - Read the source group and all nested subgroups into a tree
//! - Create a new top-level group and recreate every subgroup under it
//! - Fork every project of every source group into its mirrored group
//!
//! The remote platform is reached through [`gitlab::RemoteDirectory`];
//! [`gitlab::GitLabClient`] implements it over the GitLab REST API.

pub mod cli;
pub mod config;
pub mod error;
pub mod gitlab;
pub mod mirror;
pub mod models;
pub mod tree;

#[cfg(test)]
mod testing;

pub use error::{ClientError, MirrorError, Result, TreeError};
