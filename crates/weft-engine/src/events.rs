//! Workspace change notifications for observers (GUI panels, loggers).
//!
//! Observers subscribe through a crossbeam channel and receive every
//! structural change plus a round-completed marker after each Commit
//! phase. The bus never blocks the engine: channels are unbounded and
//! disconnected subscribers are pruned on the next broadcast.

use crossbeam_channel::{Receiver, Sender};

use weft_core::{ComponentId, CouplingId, TickId};

/// Why a coupling was removed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DetachReason {
    /// An explicit removal request.
    Requested,
    /// A new coupling onto the same consumer attribute replaced it
    /// (last-bind-wins rebinding).
    Replaced,
    /// An endpoint's owning component was closed.
    ComponentClosed,
    /// The whole workspace was cleared.
    WorkspaceCleared,
}

/// A change notification from the workspace.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WorkspaceEvent {
    /// A component was registered.
    ComponentAdded {
        /// The new component's ID.
        id: ComponentId,
        /// The new component's display name.
        name: String,
    },
    /// A component was closed and dropped. Every coupling touching it was
    /// detached (with [`DetachReason::ComponentClosed`]) first.
    ComponentClosed {
        /// The closed component's ID.
        id: ComponentId,
        /// The closed component's display name.
        name: String,
    },
    /// A coupling was installed.
    CouplingCreated {
        /// The new coupling's ID.
        id: CouplingId,
    },
    /// A coupling was removed. For a rebind, this fires with
    /// [`DetachReason::Replaced`] before the replacement's
    /// [`CouplingCreated`](Self::CouplingCreated).
    CouplingRemoved {
        /// The removed coupling's ID.
        id: CouplingId,
        /// Why it was removed.
        reason: DetachReason,
    },
    /// A full Update → Resolve → Commit round finished; all coupling
    /// writes for the round have landed.
    RoundCompleted {
        /// The completed tick.
        tick: TickId,
    },
}

/// Fan-out bus for [`WorkspaceEvent`]s.
#[derive(Default)]
pub struct EventBus {
    senders: Vec<Sender<WorkspaceEvent>>,
}

impl EventBus {
    /// Create a bus with no subscribers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to all future events.
    ///
    /// The channel is unbounded; a subscriber that stops draining it leaks
    /// memory in its own channel, never stalls the engine. Dropping the
    /// receiver unsubscribes (lazily, at the next broadcast).
    pub fn subscribe(&mut self) -> Receiver<WorkspaceEvent> {
        let (tx, rx) = crossbeam_channel::unbounded();
        self.senders.push(tx);
        rx
    }

    /// Deliver an event to every live subscriber, pruning dead ones.
    pub fn broadcast(&mut self, event: WorkspaceEvent) {
        self.senders.retain(|tx| tx.send(event.clone()).is_ok());
    }

    /// Number of live subscribers as of the last broadcast.
    pub fn subscriber_count(&self) -> usize {
        self.senders.len()
    }
}
