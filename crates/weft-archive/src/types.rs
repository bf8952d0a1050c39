//! Manifest data types for workspace archives.

use weft_core::AttributeRef;

/// One persisted component: its opener key, display name, and the opaque
/// payload its `save()` produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ComponentRecord {
    /// Opener registry key (e.g. `"data_table"`).
    pub type_tag: String,
    /// Display name, unique within the archive. Coupling records reference
    /// components by this name.
    pub name: String,
    /// The component's serialized state, opaque to the archive layer.
    pub payload: Vec<u8>,
}

/// One persisted coupling, as a pair of by-name endpoint references.
///
/// Endpoints are `(componentName, attributeName)` pairs, never in-memory
/// identities: they are re-resolved against live components when the
/// archive is loaded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CouplingRecord {
    /// The producer endpoint.
    pub producer: AttributeRef,
    /// The consumer endpoint.
    pub consumer: AttributeRef,
}

/// The complete persisted form of a workspace: components plus couplings,
/// both in registration order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WorkspaceArchive {
    /// Persisted components, in workspace registration order.
    pub components: Vec<ComponentRecord>,
    /// Persisted couplings, in coupling registration order.
    pub couplings: Vec<CouplingRecord>,
}
