//! Archive serialization.

use std::io::Write;

use crate::codec::{write_length_prefixed_bytes, write_length_prefixed_str, write_u32_le, write_u8};
use crate::error::ArchiveError;
use crate::types::{ComponentRecord, CouplingRecord, WorkspaceArchive};
use crate::{FORMAT_VERSION, MAGIC};

/// Serialize a [`WorkspaceArchive`] to any `Write` sink.
///
/// Writes the magic bytes and format version, then all component records,
/// then all coupling records, preserving the archive's ordering.
pub fn write_archive(w: &mut dyn Write, archive: &WorkspaceArchive) -> Result<(), ArchiveError> {
    w.write_all(&MAGIC)?;
    write_u8(w, FORMAT_VERSION)?;

    write_u32_le(w, archive.components.len() as u32)?;
    for record in &archive.components {
        write_component(w, record)?;
    }

    write_u32_le(w, archive.couplings.len() as u32)?;
    for record in &archive.couplings {
        write_coupling(w, record)?;
    }
    Ok(())
}

fn write_component(w: &mut dyn Write, record: &ComponentRecord) -> Result<(), ArchiveError> {
    write_length_prefixed_str(w, &record.type_tag)?;
    write_length_prefixed_str(w, &record.name)?;
    write_length_prefixed_bytes(w, &record.payload)
}

fn write_coupling(w: &mut dyn Write, record: &CouplingRecord) -> Result<(), ArchiveError> {
    write_length_prefixed_str(w, &record.producer.component)?;
    write_length_prefixed_str(w, &record.producer.attribute)?;
    write_length_prefixed_str(w, &record.consumer.component)?;
    write_length_prefixed_str(w, &record.consumer.attribute)
}
