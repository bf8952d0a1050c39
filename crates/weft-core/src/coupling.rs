//! The coupling: an immutable producer → consumer binding.

use std::fmt;

use crate::attribute::Attribute;
use crate::id::{ComponentId, CouplingId};

/// A binding from exactly one producer attribute to exactly one consumer
/// attribute.
///
/// Immutable once created: rebinding a consumer means removing the old
/// coupling and creating a new one, which the workspace performs as an
/// explicit replace-with-removal so observers see both transitions.
/// Creating or removing a coupling never moves data; values flow only
/// during the workspace's Resolve phase.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Coupling {
    /// Workspace-assigned identifier.
    pub id: CouplingId,
    /// The attribute values are read from.
    pub producer: Attribute,
    /// The attribute values are written to.
    pub consumer: Attribute,
}

impl Coupling {
    /// Whether either endpoint belongs to `component`.
    ///
    /// Used by the workspace to find every coupling that must be detached
    /// when a component closes.
    pub fn touches(&self, component: ComponentId) -> bool {
        self.producer.component == component || self.consumer.component == component
    }
}

impl fmt::Display for Coupling {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "coupling {}: {}:{} -> {}:{}",
            self.id,
            self.producer.component,
            self.producer.name,
            self.consumer.component,
            self.consumer.name
        )
    }
}
