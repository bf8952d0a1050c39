//! Workspace and update-cycle engine for Weft.
//!
//! [`Workspace`] is the process-wide owner of all live components and all
//! active couplings. Each [`tick()`](Workspace::tick) runs one
//! deterministic round in three phases:
//!
//! 1. **Update** — every component's update hook, in registration order.
//! 2. **Resolve** — every coupling, in registration order: read the
//!    producer's current value, write it to the consumer. A failure skips
//!    that one coupling and is reported as a warning; the round completes.
//! 3. **Commit** — every component's round-completed hook, then queued
//!    structural commands are applied and observers are notified.
//!
//! Structural mutations requested while a session runs are serialized at
//! the tick boundary through a bounded [`CommandQueue`]; mutations made
//! between ticks use the synchronous `Workspace` methods directly.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod command;
pub mod error;
pub mod events;
pub mod metrics;
pub mod persist;
pub mod workspace;

pub use command::{CommandQueue, Receipt, WorkspaceCommand};
pub use error::{CommandError, WorkspaceError};
pub use events::{DetachReason, WorkspaceEvent};
pub use metrics::TickMetrics;
pub use persist::LoadWarning;
pub use workspace::{ResolveSkip, TickReport, Workspace};
