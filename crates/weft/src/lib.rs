//! Weft: a coupling and update-cycle engine for composable simulation
//! workspaces.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all Weft sub-crates. For most users, adding `weft` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use weft::prelude::*;
//! use weft::components::{Gain, RandomSource};
//!
//! // A seeded random producer feeding a gain stage.
//! let mut ws = Workspace::new();
//! ws.add_component(Box::new(RandomSource::new("rng", 42, 0.0, 1.0)))
//!     .unwrap();
//! ws.add_component(Box::new(Gain::new("gain", 2.0))).unwrap();
//! ws.couple(
//!     &AttributeRef::new("rng", "value"),
//!     &AttributeRef::new("gain", "input"),
//! )
//! .unwrap();
//!
//! // One full Update → Resolve → Commit round.
//! let report = ws.tick();
//! assert_eq!(report.tick, TickId(1));
//! assert!(report.skips.is_empty());
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the
//! prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `weft-core` | Values, attributes, couplings, IDs, the component trait |
//! | [`archive`] | `weft-archive` | Archive format, codec, opener registry |
//! | [`engine`] | `weft-engine` | The workspace, update cycle, commands, events, persistence |
//! | [`components`] | `weft-components` | Reference components (table, random source, gain, chart) |

#![forbid(unsafe_code)]

/// Core types and the component contract (`weft-core`).
///
/// Contains [`types::Value`], [`types::Attribute`], [`types::Coupling`],
/// the ID newtypes, and the [`types::WorkspaceComponent`] trait every
/// pluggable component implements.
pub use weft_core as types;

/// Archive format and component openers (`weft-archive`).
///
/// Read and write workspace archives with [`archive::read_archive`] /
/// [`archive::write_archive`]; register component deserializers in an
/// [`archive::OpenerRegistry`].
pub use weft_archive as archive;

/// The workspace and its update cycle (`weft-engine`).
///
/// [`engine::Workspace`] owns components and couplings and drives the
/// three-phase tick; it also carries persistence
/// ([`engine::Workspace::save_archive`]) and the tick-boundary command
/// queue.
pub use weft_engine as engine;

/// Reference component implementations (`weft-components`).
///
/// Includes [`components::DataTable`], [`components::RandomSource`],
/// [`components::Gain`], and [`components::PieChart`].
pub use weft_components as components;

/// Common imports for typical Weft usage.
///
/// ```rust
/// use weft::prelude::*;
/// ```
///
/// This imports the most frequently used types: the workspace, the
/// component trait, attribute references, values, and the event and
/// report types.
pub mod prelude {
    // Core model
    pub use weft_core::{
        Attribute, AttributeDirection, AttributeRef, ComponentId, CouplingContainer, CouplingId,
        TickId, Value, ValueType, WorkspaceComponent,
    };

    // Errors and skip reasons
    pub use weft_core::{AttributeError, CouplingError, SaveError, SkipReason};

    // Archive
    pub use weft_archive::{ArchiveError, OpenerRegistry};

    // Engine
    pub use weft_engine::{
        DetachReason, LoadWarning, Receipt, ResolveSkip, TickMetrics, TickReport, Workspace,
        WorkspaceCommand, WorkspaceEvent,
    };
}
