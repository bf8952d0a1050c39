//! Error types for the workspace engine.

use std::error::Error;
use std::fmt;

use weft_core::CouplingError;

/// Errors from synchronous structural operations on the workspace.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WorkspaceError {
    /// A component with this display name is already registered.
    ///
    /// Names are the stable keys persisted coupling endpoints resolve
    /// against, so they must be unique for a session to reload correctly.
    DuplicateComponentName {
        /// The colliding display name.
        name: String,
    },
}

impl fmt::Display for WorkspaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateComponentName { name } => {
                write!(f, "a component named '{name}' is already registered")
            }
        }
    }
}

impl Error for WorkspaceError {}

/// Why a queued workspace command was rejected.
///
/// Carried in [`Receipt::rejection`](crate::Receipt) at submit time
/// (`QueueFull`) or at the Commit phase where commands are applied.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CommandError {
    /// The command queue is at capacity; the command was never enqueued.
    QueueFull,
    /// A `CreateCoupling` command failed validation.
    Coupling(CouplingError),
    /// A `CloseComponent` command named a component that is not live.
    UnknownComponent {
        /// The component display name that failed to resolve.
        name: String,
    },
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::QueueFull => write!(f, "command queue full"),
            Self::Coupling(e) => write!(f, "{e}"),
            Self::UnknownComponent { name } => write!(f, "unknown component '{name}'"),
        }
    }
}

impl Error for CommandError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Coupling(e) => Some(e),
            _ => None,
        }
    }
}

impl From<CouplingError> for CommandError {
    fn from(e: CouplingError) -> Self {
        Self::Coupling(e)
    }
}
