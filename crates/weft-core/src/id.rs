//! Strongly-typed identifiers for components, couplings, and ticks.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Counter for unique [`ComponentId`] allocation.
static COMPONENT_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique per-instance identifier for a workspace component.
///
/// Allocated from a monotonic atomic counter via [`ComponentId::next`].
/// Two distinct components always have different IDs, even if they carry
/// the same display name at different points in a session. Couplings hold
/// `ComponentId`s so that a closed component's attributes can never be
/// confused with those of a later component reusing its name.
///
/// IDs are transient: persistence refers to components by display name,
/// and a reloaded workspace allocates fresh IDs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentId(u64);

impl ComponentId {
    /// Allocate a fresh, unique component ID.
    ///
    /// Each call returns an ID that has never been returned before within
    /// this process. Thread-safe.
    pub fn next() -> Self {
        Self(COMPONENT_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifies a coupling within a workspace.
///
/// Allocated sequentially by the workspace at coupling creation; never
/// reused within a session, so a removed coupling's ID stays dangling
/// rather than aliasing a newer coupling.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CouplingId(pub u64);

impl fmt::Display for CouplingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for CouplingId {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

/// Monotonically increasing tick counter.
///
/// Incremented each time the workspace completes one full
/// Update → Resolve → Commit round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TickId(pub u64);

impl fmt::Display for TickId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for TickId {
    fn from(v: u64) -> Self {
        Self(v)
    }
}
