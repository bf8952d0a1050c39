//! Write-only chart sink with one consumer attribute per slice.
//!
//! Incoming values are staged on `consume`; the fractions are recomputed
//! once when the round completes, so the displayed chart never shows a
//! half-written set of slice values.

use std::any::Any;

use indexmap::IndexMap;

use weft_archive::codec;
use weft_archive::{ArchiveError, ComponentLoadError};
use weft_core::{
    AttributeError, CouplingContainer, SaveError, Value, ValueType, WorkspaceComponent,
};

/// Per-slice values normalized into fractions of the whole.
///
/// Slice magnitudes are taken as absolute values; negative writes count
/// by magnitude. If all slices are zero, all fractions are zero.
pub struct PieChart {
    name: String,
    /// Slice name to current value, in slice registration order.
    slices: IndexMap<String, f64>,
    fractions: Vec<f64>,
    staged: IndexMap<String, f64>,
    attributes: CouplingContainer,
    dirty: bool,
}

impl PieChart {
    /// A chart with the given slices, all starting at zero.
    pub fn new(name: impl Into<String>, slices: &[&str]) -> Self {
        let mut attributes = CouplingContainer::new();
        let mut slice_map = IndexMap::new();
        for slice in slices {
            attributes.add_consumer(*slice, ValueType::Float);
            slice_map.insert(slice.to_string(), 0.0);
        }
        let count = slices.len();
        Self {
            name: name.into(),
            slices: slice_map,
            fractions: vec![0.0; count],
            staged: IndexMap::new(),
            attributes,
            dirty: true,
        }
    }

    /// Add a slice at zero. Returns `false` if the name is taken.
    pub fn add_slice(&mut self, slice: &str) -> bool {
        if self.slices.contains_key(slice) {
            return false;
        }
        self.slices.insert(slice.to_string(), 0.0);
        self.fractions.push(0.0);
        self.attributes.add_consumer(slice, ValueType::Float);
        self.dirty = true;
        true
    }

    /// The fraction of the whole this slice held at the last completed
    /// round.
    pub fn fraction(&self, slice: &str) -> Option<f64> {
        let index = self.slices.get_index_of(slice)?;
        self.fractions.get(index).copied()
    }

    /// Number of slices.
    pub fn slice_count(&self) -> usize {
        self.slices.len()
    }

    fn recompute_fractions(&mut self) {
        let total: f64 = self.slices.values().map(|v| v.abs()).sum();
        self.fractions = if total > 0.0 {
            self.slices.values().map(|v| v.abs() / total).collect()
        } else {
            vec![0.0; self.slices.len()]
        };
    }

    /// Rebuild a chart from its archive payload.
    pub fn open(payload: &[u8]) -> Result<Box<dyn WorkspaceComponent>, ComponentLoadError> {
        let mut r = payload;
        Self::decode(&mut r).map_err(ComponentLoadError::new)
    }

    fn decode(r: &mut &[u8]) -> Result<Box<dyn WorkspaceComponent>, ArchiveError> {
        let name = codec::read_length_prefixed_str(r)?;
        let count = codec::read_u32_le(r)? as usize;
        let mut chart = PieChart::new(name, &[]);
        for _ in 0..count {
            let slice = codec::read_length_prefixed_str(r)?;
            let value = codec::read_f64_le(r)?;
            if !chart.add_slice(&slice) {
                return Err(ArchiveError::Malformed {
                    detail: format!("duplicate slice {slice:?}"),
                });
            }
            chart.slices[&slice] = value;
        }
        chart.recompute_fractions();
        chart.dirty = false;
        Ok(Box::new(chart))
    }
}

impl WorkspaceComponent for PieChart {
    fn type_tag(&self) -> &'static str {
        "pie_chart"
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn attributes(&self) -> &CouplingContainer {
        &self.attributes
    }

    fn produce(&self, attribute: &str) -> Result<Value, AttributeError> {
        Err(AttributeError::UnknownAttribute {
            attribute: attribute.to_string(),
        })
    }

    fn consume(&mut self, attribute: &str, value: Value) -> Result<(), AttributeError> {
        if !self.slices.contains_key(attribute) {
            return Err(AttributeError::UnknownAttribute {
                attribute: attribute.to_string(),
            });
        }
        match value {
            Value::Float(v) => {
                self.staged.insert(attribute.to_string(), v);
                Ok(())
            }
            other => Err(AttributeError::TypeMismatch {
                expected: ValueType::Float,
                got: other.value_type(),
            }),
        }
    }

    fn update(&mut self) {}

    fn round_completed(&mut self) {
        if self.staged.is_empty() {
            return;
        }
        let staged = std::mem::take(&mut self.staged);
        for (slice, value) in staged {
            if let Some(v) = self.slices.get_mut(&slice) {
                *v = value;
            }
        }
        self.recompute_fractions();
        self.dirty = true;
    }

    fn is_dirty(&self) -> bool {
        self.dirty
    }

    fn mark_saved(&mut self) {
        self.dirty = false;
    }

    fn save(&self) -> Result<Vec<u8>, SaveError> {
        let mut buf = Vec::new();
        let encode = |buf: &mut Vec<u8>| -> Result<(), ArchiveError> {
            codec::write_length_prefixed_str(buf, &self.name)?;
            codec::write_u32_le(buf, self.slices.len() as u32)?;
            for (slice, value) in &self.slices {
                codec::write_length_prefixed_str(buf, slice)?;
                codec::write_f64_le(buf, *value)?;
            }
            Ok(())
        };
        encode(&mut buf).map_err(|e| SaveError::Encode {
            detail: e.to_string(),
        })?;
        Ok(buf)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
