//! Test fixtures and mock components for Weft development.
//!
//! Provides small [`WorkspaceComponent`](weft_core::WorkspaceComponent)
//! implementations for exercising the update cycle and persistence without
//! pulling in real components.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

mod fixtures;

pub use fixtures::{
    register_openers, ConstSource, CounterSource, FlakySource, PhaseRecorder, Probe,
};
