//! The three mirror phases.
//!
//! 1. [`SourceReader`] discovers the source group hierarchy
//! 2. [`DestinationBuilder`] recreates it under a new top-level group
//! 3. [`ForkOrchestrator`] forks every project into its mirrored group
//!
//! Each phase reports progress as [`MirrorEvent`]s to an injected
//! [`MirrorObserver`].

mod builder;
mod events;
mod fork;
mod reader;

pub use builder::{validate_destination, DestinationBuilder, DestinationLayout, IdentityMap};
pub use events::{MirrorEvent, MirrorObserver, TracingObserver};
pub use fork::{FailedFork, FailurePolicy, ForkJob, ForkOrchestrator, ForkReport, ForkedProject};
pub use reader::SourceReader;
