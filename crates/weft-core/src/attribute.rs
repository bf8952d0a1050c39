//! Attribute descriptors: the named scalar endpoints components expose.

use std::fmt;

use crate::id::ComponentId;
use crate::value::ValueType;

/// Whether an attribute is read from or written to during the Resolve phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AttributeDirection {
    /// The attribute is readable: it supplies values to couplings.
    Producer,
    /// The attribute is writable: it receives values from couplings.
    Consumer,
}

impl fmt::Display for AttributeDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Producer => write!(f, "producer"),
            Self::Consumer => write!(f, "consumer"),
        }
    }
}

/// A resolved attribute descriptor: one endpoint of a coupling.
///
/// Identity is `(component, name, direction)`. Descriptors are immutable
/// once created; a component changes its attribute set by registering or
/// removing entries in its [`CouplingContainer`](crate::CouplingContainer)
/// between update rounds, never by mutating an existing descriptor.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Attribute {
    /// The component that owns this attribute.
    pub component: ComponentId,
    /// Attribute name, unique per component and direction
    /// (e.g. `"neuron3.activation"`, `"col2"`).
    pub name: String,
    /// Producer or consumer.
    pub direction: AttributeDirection,
    /// The scalar type this attribute carries.
    pub value_type: ValueType,
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{} ({}, {})",
            self.component, self.name, self.direction, self.value_type
        )
    }
}

/// A by-name reference to an attribute: `(componentName, attributeName)`.
///
/// This is the stable key used at coupling creation and in persisted
/// workspace manifests. It is resolved to a live [`Attribute`] only when a
/// coupling is created, so references survive serialization round-trips
/// where in-memory identities do not.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct AttributeRef {
    /// Display name of the owning component.
    pub component: String,
    /// Name of the attribute within that component.
    pub attribute: String,
}

impl AttributeRef {
    /// Build a reference from component and attribute names.
    pub fn new(component: impl Into<String>, attribute: impl Into<String>) -> Self {
        Self {
            component: component.into(),
            attribute: attribute.into(),
        }
    }
}

impl fmt::Display for AttributeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.component, self.attribute)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attribute_identity_includes_direction() {
        let id = ComponentId::next();
        let prod = Attribute {
            component: id,
            name: "value".into(),
            direction: AttributeDirection::Producer,
            value_type: ValueType::Float,
        };
        let cons = Attribute {
            direction: AttributeDirection::Consumer,
            ..prod.clone()
        };
        assert_ne!(prod, cons);
    }

    #[test]
    fn attribute_ref_display() {
        let r = AttributeRef::new("NetA", "neuron3.activation");
        assert_eq!(r.to_string(), "NetA/neuron3.activation");
    }
}
