//! Bounded command queue: tick-boundary serialization of structural
//! mutations.
//!
//! The workspace's component list and coupling set are never mutated
//! concurrently with an in-progress Resolve phase. Callers that want a
//! mutation while a session is running submit a [`WorkspaceCommand`];
//! accepted commands sit in a bounded FIFO queue and are drained and
//! applied at the next Commit phase, each yielding a [`Receipt`] in that
//! tick's report.

use std::collections::VecDeque;

use weft_core::{AttributeRef, CouplingId, TickId};

use crate::error::CommandError;

/// A structural mutation to apply at the next tick boundary.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WorkspaceCommand {
    /// Create a coupling between two by-name endpoints.
    CreateCoupling {
        /// The producer endpoint.
        producer: AttributeRef,
        /// The consumer endpoint.
        consumer: AttributeRef,
    },
    /// Remove a coupling by ID. Applying this is idempotent: removing an
    /// unknown ID succeeds as a no-op.
    RemoveCoupling {
        /// The coupling to remove.
        id: CouplingId,
    },
    /// Close a component by display name, detaching every coupling that
    /// touches it first.
    CloseComponent {
        /// Display name of the component to close.
        component: String,
    },
}

/// Outcome of one submitted command.
///
/// Issued twice per command at most: once at submission (only to report
/// `QueueFull`) and once when the command is applied at a Commit phase.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Receipt {
    /// Monotonic sequence number assigned at submission.
    pub seq: u64,
    /// Whether the command was accepted (enqueued, or applied cleanly).
    pub accepted: bool,
    /// The tick whose Commit phase applied the command, if it was applied.
    pub applied_tick: Option<TickId>,
    /// Why the command was rejected, if it was.
    pub rejection: Option<CommandError>,
}

/// A command paired with its submission sequence number.
#[derive(Clone, Debug)]
pub struct QueuedCommand {
    /// The command to apply.
    pub command: WorkspaceCommand,
    /// Sequence number assigned at submission, echoed in the receipt.
    pub seq: u64,
}

/// Bounded FIFO queue for workspace commands.
///
/// Assigns monotonic sequence numbers at submission and rejects overflow
/// immediately rather than blocking — the engine never waits on callers.
pub struct CommandQueue {
    queue: VecDeque<QueuedCommand>,
    capacity: usize,
    next_seq: u64,
}

impl CommandQueue {
    /// Create a queue with the given capacity.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "CommandQueue capacity must be at least 1");
        Self {
            queue: VecDeque::with_capacity(capacity),
            capacity,
            next_seq: 0,
        }
    }

    /// Submit a batch of commands.
    ///
    /// Returns one receipt per command: accepted commands are enqueued
    /// with `applied_tick: None` (application happens at the next Commit
    /// phase); commands past capacity are rejected with
    /// [`CommandError::QueueFull`].
    pub fn submit(&mut self, commands: Vec<WorkspaceCommand>) -> Vec<Receipt> {
        let mut receipts = Vec::with_capacity(commands.len());
        for command in commands {
            let seq = self.next_seq;
            self.next_seq += 1;
            if self.queue.len() >= self.capacity {
                receipts.push(Receipt {
                    seq,
                    accepted: false,
                    applied_tick: None,
                    rejection: Some(CommandError::QueueFull),
                });
            } else {
                self.queue.push_back(QueuedCommand { command, seq });
                receipts.push(Receipt {
                    seq,
                    accepted: true,
                    applied_tick: None,
                    rejection: None,
                });
            }
        }
        receipts
    }

    /// Remove and return all queued commands, in submission order.
    pub fn drain(&mut self) -> Vec<QueuedCommand> {
        self.queue.drain(..).collect()
    }

    /// Discard all queued commands without applying them.
    pub fn clear(&mut self) {
        self.queue.clear();
    }

    /// Number of commands currently queued.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Whether the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
