//! Core types and traits for the Weft coupling workspace.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the fundamental abstractions used throughout the Weft workspace:
//! component and coupling IDs, scalar values, attribute descriptors,
//! the per-component attribute registry, error types, and the
//! [`WorkspaceComponent`] trait.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod attribute;
pub mod component;
pub mod container;
pub mod coupling;
pub mod error;
pub mod id;
pub mod value;

pub use attribute::{Attribute, AttributeDirection, AttributeRef};
pub use component::WorkspaceComponent;
pub use container::CouplingContainer;
pub use coupling::Coupling;
pub use error::{AttributeError, CouplingError, SaveError, SkipReason};
pub use id::{ComponentId, CouplingId, TickId};
pub use value::{Value, ValueType};
