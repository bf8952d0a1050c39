//! Error types for the archive system.

use std::fmt;
use std::io;

/// Errors from writing or reading a workspace archive.
#[derive(Debug)]
pub enum ArchiveError {
    /// An I/O error occurred during read or write.
    Io(io::Error),
    /// The stream does not start with the expected `b"WEFT"` magic bytes.
    InvalidMagic,
    /// The format version is not supported by this build.
    UnsupportedVersion {
        /// The version found in the stream.
        found: u8,
    },
    /// A record could not be decoded (truncated or corrupt data).
    Malformed {
        /// Human-readable description of what went wrong.
        detail: String,
    },
    /// No opener is registered for a component's type tag.
    UnknownComponentType {
        /// The unrecognized type tag.
        tag: String,
    },
    /// A component's saved payload could not be reconstructed.
    ///
    /// Workspace-level load treats this as a per-component warning and
    /// continues with the remaining components; it is only an error when
    /// surfaced from a direct single-component open.
    ComponentLoad {
        /// Display name of the component that failed to open.
        name: String,
        /// Human-readable description of the failure.
        detail: String,
    },
    /// A component failed to serialize during archive writing.
    ComponentSave {
        /// Display name of the component that failed to save.
        name: String,
        /// Human-readable description of the failure.
        detail: String,
    },
}

impl fmt::Display for ArchiveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::InvalidMagic => write!(f, "invalid magic bytes (expected b\"WEFT\")"),
            Self::UnsupportedVersion { found } => {
                write!(f, "unsupported format version {found}")
            }
            Self::Malformed { detail } => write!(f, "malformed archive: {detail}"),
            Self::UnknownComponentType { tag } => {
                write!(f, "no opener registered for component type '{tag}'")
            }
            Self::ComponentLoad { name, detail } => {
                write!(f, "component '{name}' failed to open: {detail}")
            }
            Self::ComponentSave { name, detail } => {
                write!(f, "component '{name}' failed to save: {detail}")
            }
        }
    }
}

impl std::error::Error for ArchiveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for ArchiveError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

/// Error returned by a component opener when its payload cannot be
/// reconstructed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ComponentLoadError {
    /// Human-readable description of the failure.
    pub detail: String,
}

impl ComponentLoadError {
    /// Build a load error from anything displayable.
    pub fn new(detail: impl fmt::Display) -> Self {
        Self {
            detail: detail.to_string(),
        }
    }
}

impl fmt::Display for ComponentLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "component load failed: {}", self.detail)
    }
}

impl std::error::Error for ComponentLoadError {}
