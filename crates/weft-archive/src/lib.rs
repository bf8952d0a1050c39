//! Binary workspace archives and component openers for Weft.
//!
//! A workspace archive captures everything needed to reconstruct a
//! session: each component's type tag, display name, and opaque saved
//! payload, plus every coupling as a pair of by-name endpoint references.
//! Couplings are persisted at the workspace level — components never see
//! them — and reference endpoints as `(componentName, attributeName)`
//! pairs so they rebind to fresh in-memory objects on load.
//!
//! # Format
//!
//! ```text
//! [MAGIC "WEFT"] [VERSION u8]
//! [component count u32] [ComponentRecord ...]
//! [coupling count u32]  [CouplingRecord ...]
//! ```
//!
//! All integers are little-endian. Strings and byte arrays are
//! length-prefixed with a `u32` length. The format is intentionally
//! simple — no compression, no alignment padding, no self-describing
//! schema, no serde.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod codec;
pub mod error;
pub mod opener;
pub mod reader;
pub mod types;
pub mod writer;

pub use error::{ArchiveError, ComponentLoadError};
pub use opener::{Opener, OpenerRegistry};
pub use reader::read_archive;
pub use types::{ComponentRecord, CouplingRecord, WorkspaceArchive};
pub use writer::write_archive;

/// Magic bytes at the start of every workspace archive.
pub const MAGIC: [u8; 4] = *b"WEFT";

/// Current binary format version.
pub const FORMAT_VERSION: u8 = 1;
