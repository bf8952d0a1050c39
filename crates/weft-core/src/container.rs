//! The per-component attribute registry.

use indexmap::IndexMap;

use crate::value::ValueType;

/// Registry of the attributes a component currently exposes.
///
/// Owned exclusively by its component: created at construction, mutated as
/// the component's internal structure changes (a table gaining a column
/// registers a new producer named after that column), dropped with the
/// component. The workspace queries it to validate coupling endpoints; it
/// holds no values, only names and types. Value access goes through
/// [`WorkspaceComponent::produce`](crate::WorkspaceComponent::produce) and
/// [`consume`](crate::WorkspaceComponent::consume) on the owning component.
///
/// Both sides are insertion-ordered so that listings are deterministic
/// across runs and across save/load.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CouplingContainer {
    producers: IndexMap<String, ValueType>,
    consumers: IndexMap<String, ValueType>,
}

impl CouplingContainer {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a producer attribute. Replaces any existing producer of the
    /// same name (keeping its position in the listing order).
    ///
    /// Components may only call this between update rounds.
    pub fn add_producer(&mut self, name: impl Into<String>, value_type: ValueType) {
        self.producers.insert(name.into(), value_type);
    }

    /// Register a consumer attribute. Replaces any existing consumer of the
    /// same name (keeping its position in the listing order).
    ///
    /// Components may only call this between update rounds.
    pub fn add_consumer(&mut self, name: impl Into<String>, value_type: ValueType) {
        self.consumers.insert(name.into(), value_type);
    }

    /// Remove a producer attribute. Returns whether it was present.
    ///
    /// Listing order of the remaining producers is preserved.
    pub fn remove_producer(&mut self, name: &str) -> bool {
        self.producers.shift_remove(name).is_some()
    }

    /// Remove a consumer attribute. Returns whether it was present.
    ///
    /// Listing order of the remaining consumers is preserved.
    pub fn remove_consumer(&mut self, name: &str) -> bool {
        self.consumers.shift_remove(name).is_some()
    }

    /// The type of the named producer attribute, if registered.
    pub fn producer_type(&self, name: &str) -> Option<ValueType> {
        self.producers.get(name).copied()
    }

    /// The type of the named consumer attribute, if registered.
    pub fn consumer_type(&self, name: &str) -> Option<ValueType> {
        self.consumers.get(name).copied()
    }

    /// Current producer attributes, in registration order.
    pub fn producers(&self) -> impl Iterator<Item = (&str, ValueType)> {
        self.producers.iter().map(|(n, t)| (n.as_str(), *t))
    }

    /// Current consumer attributes, in registration order.
    pub fn consumers(&self) -> impl Iterator<Item = (&str, ValueType)> {
        self.consumers.iter().map(|(n, t)| (n.as_str(), *t))
    }

    /// Number of registered producer attributes.
    pub fn producer_count(&self) -> usize {
        self.producers.len()
    }

    /// Number of registered consumer attributes.
    pub fn consumer_count(&self) -> usize {
        self.consumers.len()
    }
}
