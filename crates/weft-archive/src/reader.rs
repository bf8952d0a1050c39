//! Archive deserialization.

use std::io::Read;

use weft_core::AttributeRef;

use crate::codec::{read_length_prefixed_bytes, read_length_prefixed_str, read_u32_le, read_u8};
use crate::error::ArchiveError;
use crate::types::{ComponentRecord, CouplingRecord, WorkspaceArchive};
use crate::{FORMAT_VERSION, MAGIC};

/// Deserialize a [`WorkspaceArchive`] from any `Read` source.
///
/// Validates the magic bytes and format version before reading any
/// records. Component payloads are returned opaque; opening them is the
/// caller's job (via an [`OpenerRegistry`](crate::OpenerRegistry)).
pub fn read_archive(r: &mut dyn Read) -> Result<WorkspaceArchive, ArchiveError> {
    let mut magic = [0u8; 4];
    r.read_exact(&mut magic)?;
    if magic != MAGIC {
        return Err(ArchiveError::InvalidMagic);
    }
    let version = read_u8(r)?;
    if version != FORMAT_VERSION {
        return Err(ArchiveError::UnsupportedVersion { found: version });
    }

    let component_count = read_u32_le(r)?;
    let mut components = Vec::with_capacity(component_count as usize);
    for _ in 0..component_count {
        components.push(read_component(r)?);
    }

    let coupling_count = read_u32_le(r)?;
    let mut couplings = Vec::with_capacity(coupling_count as usize);
    for _ in 0..coupling_count {
        couplings.push(read_coupling(r)?);
    }

    Ok(WorkspaceArchive {
        components,
        couplings,
    })
}

fn read_component(r: &mut dyn Read) -> Result<ComponentRecord, ArchiveError> {
    Ok(ComponentRecord {
        type_tag: read_length_prefixed_str(r)?,
        name: read_length_prefixed_str(r)?,
        payload: read_length_prefixed_bytes(r)?,
    })
}

fn read_coupling(r: &mut dyn Read) -> Result<CouplingRecord, ArchiveError> {
    let producer_component = read_length_prefixed_str(r)?;
    let producer_attribute = read_length_prefixed_str(r)?;
    let consumer_component = read_length_prefixed_str(r)?;
    let consumer_attribute = read_length_prefixed_str(r)?;
    Ok(CouplingRecord {
        producer: AttributeRef::new(producer_component, producer_attribute),
        consumer: AttributeRef::new(consumer_component, consumer_attribute),
    })
}
