//! The opener registry: reconstructing components from saved payloads.

use indexmap::IndexMap;

use weft_core::WorkspaceComponent;

use crate::error::{ArchiveError, ComponentLoadError};

/// A function that reconstructs a component from its saved payload.
///
/// Each component type supplies one (conventionally an associated
/// `open(&[u8])` function) and registers it under the component's
/// [`type_tag`](weft_core::WorkspaceComponent::type_tag).
pub type Opener = fn(&[u8]) -> Result<Box<dyn WorkspaceComponent>, ComponentLoadError>;

/// Maps component type tags to their [`Opener`] functions.
///
/// The archive layer stores payloads opaquely; this registry is the only
/// place the mapping from tag to concrete type exists, so hosts decide
/// which component types a session can load simply by what they register.
#[derive(Default)]
pub struct OpenerRegistry {
    openers: IndexMap<String, Opener>,
}

impl OpenerRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an opener for `type_tag`, replacing any previous one.
    pub fn register(&mut self, type_tag: impl Into<String>, opener: Opener) {
        self.openers.insert(type_tag.into(), opener);
    }

    /// Whether an opener is registered for `type_tag`.
    pub fn contains(&self, type_tag: &str) -> bool {
        self.openers.contains_key(type_tag)
    }

    /// Reconstruct a component from its tag and payload.
    ///
    /// Fails with [`ArchiveError::UnknownComponentType`] if no opener is
    /// registered, or [`ArchiveError::ComponentLoad`] if the opener
    /// rejects the payload. `name` is only used to attribute the failure.
    pub fn open(
        &self,
        type_tag: &str,
        name: &str,
        payload: &[u8],
    ) -> Result<Box<dyn WorkspaceComponent>, ArchiveError> {
        let opener = self
            .openers
            .get(type_tag)
            .ok_or_else(|| ArchiveError::UnknownComponentType {
                tag: type_tag.to_string(),
            })?;
        opener(payload).map_err(|e| ArchiveError::ComponentLoad {
            name: name.to_string(),
            detail: e.detail,
        })
    }
}
