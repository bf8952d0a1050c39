//! Error types for the Weft coupling workspace.
//!
//! Structural errors (invalid coupling creation, bad attribute access) are
//! synchronous and returned to the caller. Resolve-phase failures are not
//! errors at all at the tick level: they degrade a single coupling to a
//! skipped no-op, recorded as a [`SkipReason`] warning in the tick report.

use std::error::Error;
use std::fmt;
use std::io;

use crate::attribute::AttributeDirection;
use crate::id::ComponentId;
use crate::value::ValueType;

/// Errors from coupling creation.
///
/// All variants are rejected synchronously at creation time; an invalid
/// coupling is never silently dropped or partially installed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CouplingError {
    /// An endpoint names a component that is not live in the workspace.
    UnknownComponent {
        /// The component display name that failed to resolve.
        name: String,
    },
    /// An endpoint names an attribute the component does not currently
    /// register with the required direction.
    UnknownAttribute {
        /// Display name of the component that was queried.
        component: String,
        /// The attribute name that failed to resolve.
        attribute: String,
        /// The direction the endpoint was required to have.
        direction: AttributeDirection,
    },
    /// The producer's type is neither equal nor convertible to the
    /// consumer's type.
    TypeMismatch {
        /// Type of the producer attribute.
        producer: ValueType,
        /// Type of the consumer attribute.
        consumer: ValueType,
    },
}

impl fmt::Display for CouplingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownComponent { name } => write!(f, "unknown component '{name}'"),
            Self::UnknownAttribute {
                component,
                attribute,
                direction,
            } => write!(
                f,
                "component '{component}' has no {direction} attribute '{attribute}'"
            ),
            Self::TypeMismatch { producer, consumer } => write!(
                f,
                "producer type {producer} is not convertible to consumer type {consumer}"
            ),
        }
    }
}

impl Error for CouplingError {}

/// Errors from a component's attribute value access
/// ([`produce`](crate::WorkspaceComponent::produce) /
/// [`consume`](crate::WorkspaceComponent::consume)).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AttributeError {
    /// The component does not currently register the named attribute in
    /// the accessed direction.
    UnknownAttribute {
        /// The attribute name that failed to resolve.
        attribute: String,
    },
    /// The written value's type does not match the consumer attribute.
    TypeMismatch {
        /// The type the attribute carries.
        expected: ValueType,
        /// The type of the value that arrived.
        got: ValueType,
    },
    /// The component could not produce or apply the value.
    Failed {
        /// Human-readable description of the failure.
        reason: String,
    },
}

impl fmt::Display for AttributeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownAttribute { attribute } => {
                write!(f, "unknown attribute '{attribute}'")
            }
            Self::TypeMismatch { expected, got } => {
                write!(f, "expected {expected}, got {got}")
            }
            Self::Failed { reason } => write!(f, "attribute access failed: {reason}"),
        }
    }
}

impl Error for AttributeError {}

/// Why a single coupling was skipped during a Resolve phase.
///
/// A skip degrades exactly one coupling for exactly one tick; the rest of
/// the Resolve phase still runs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SkipReason {
    /// An endpoint's owning component is no longer registered.
    ComponentGone {
        /// ID of the missing component.
        component: ComponentId,
    },
    /// Reading the producer attribute failed.
    Read {
        /// The underlying attribute error.
        error: AttributeError,
    },
    /// Writing the consumer attribute failed.
    Write {
        /// The underlying attribute error.
        error: AttributeError,
    },
    /// The produced value could not be converted to the consumer's type
    /// (an attribute was re-registered with a different type mid-session).
    TypeDrift {
        /// Type produced this tick.
        produced: ValueType,
        /// Type the consumer attribute carries.
        consumer: ValueType,
    },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ComponentGone { component } => {
                write!(f, "component {component} is no longer registered")
            }
            Self::Read { error } => write!(f, "producer read failed: {error}"),
            Self::Write { error } => write!(f, "consumer write failed: {error}"),
            Self::TypeDrift { produced, consumer } => write!(
                f,
                "produced type {produced} is not convertible to consumer type {consumer}"
            ),
        }
    }
}

impl Error for SkipReason {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Read { error } | Self::Write { error } => Some(error),
            _ => None,
        }
    }
}

/// Errors from [`WorkspaceComponent::save`](crate::WorkspaceComponent::save).
#[derive(Debug)]
pub enum SaveError {
    /// An I/O error while writing the serialized form.
    Io(io::Error),
    /// The component state could not be encoded.
    Encode {
        /// Human-readable description of what went wrong.
        detail: String,
    },
}

impl fmt::Display for SaveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Encode { detail } => write!(f, "encode failed: {detail}"),
        }
    }
}

impl Error for SaveError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Encode { .. } => None,
        }
    }
}

impl From<io::Error> for SaveError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coupling_error_display() {
        let e = CouplingError::UnknownAttribute {
            component: "TableB".into(),
            attribute: "col9".into(),
            direction: AttributeDirection::Consumer,
        };
        assert_eq!(
            e.to_string(),
            "component 'TableB' has no consumer attribute 'col9'"
        );
    }

    #[test]
    fn skip_reason_sources_attribute_error() {
        let skip = SkipReason::Read {
            error: AttributeError::Failed {
                reason: "sensor offline".into(),
            },
        };
        assert!(skip.source().is_some());
        assert!(skip.to_string().contains("sensor offline"));
    }
}
