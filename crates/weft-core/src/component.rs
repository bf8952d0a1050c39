//! The [`WorkspaceComponent`] trait: the polymorphic unit of simulation
//! state driven once per tick.

use std::any::Any;

use crate::container::CouplingContainer;
use crate::error::{AttributeError, SaveError};
use crate::value::Value;

/// A polymorphic unit of simulation state (network, tabular world, chart)
/// registered in a workspace and driven once per tick.
///
/// # Contract
///
/// - [`update`](Self::update) is called exactly once per tick, in
///   registration order, before any coupling resolves. It must not block;
///   long-running work belongs between ticks.
/// - [`produce`](Self::produce) must be side-effect-free and return the
///   component's current internal value synchronously.
/// - [`consume`](Self::consume) applies immediately. Only single-attribute
///   atomicity is guaranteed; a component that wants a full "row" of inputs
///   before reacting buffers internally and reacts in
///   [`round_completed`](Self::round_completed).
/// - [`round_completed`](Self::round_completed) fires after all couplings
///   have resolved. Implementations must not read coupling values
///   re-entrantly from it; every write for the round has already landed.
/// - [`save`](Self::save) must round-trip attribute names and types
///   exactly: opening the saved bytes yields a component whose
///   [`attributes`](Self::attributes) registry is identical. Opening is
///   supplied by the persistence layer, keyed on
///   [`type_tag`](Self::type_tag).
///
/// The attribute registry may only change between update rounds; under the
/// single-threaded workspace model that means anywhere except inside the
/// tick hooks.
pub trait WorkspaceComponent {
    /// Stable discriminator for the persistence layer's opener registry
    /// (e.g. `"data_table"`). Must never change across versions of a
    /// component that should reload old archives.
    fn type_tag(&self) -> &'static str;

    /// Display name. Unique within a workspace; persisted coupling
    /// endpoints reference components by this name.
    fn name(&self) -> &str;

    /// The component's current attribute registry.
    fn attributes(&self) -> &CouplingContainer;

    /// Read the current value of a producer attribute.
    fn produce(&self, attribute: &str) -> Result<Value, AttributeError>;

    /// Write a value to a consumer attribute.
    fn consume(&mut self, attribute: &str, value: Value) -> Result<(), AttributeError>;

    /// Per-tick update hook: recompute internal state (propagate
    /// activations, advance to the next row, redraw a buffer).
    ///
    /// Values written by couplings are not delivered here; cross-component
    /// propagation happens afterwards, in the Resolve phase.
    fn update(&mut self);

    /// Round-completed hook, fired in the Commit phase after every
    /// coupling has resolved.
    fn round_completed(&mut self) {}

    /// Whether the component has changed since it was last saved.
    fn is_dirty(&self) -> bool {
        false
    }

    /// Clear the changed-since-save flag. Called by the workspace after a
    /// successful save.
    fn mark_saved(&mut self) {}

    /// Serialize the component's state.
    fn save(&self) -> Result<Vec<u8>, SaveError>;

    /// Upcast for callers that need the concrete type (GUI panels, tests).
    fn as_any(&self) -> &dyn Any;

    /// Mutable upcast for callers that need the concrete type.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}
