//! Seeded uniform random producer.
//!
//! Respects the determinism contract: a ChaCha8 RNG seeded from a `u64`
//! produces identical value sequences for identical seeds, so coupled
//! runs replay bit-exactly.

use std::any::Any;

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

use weft_archive::codec;
use weft_archive::{ArchiveError, ComponentLoadError};
use weft_core::{
    AttributeError, CouplingContainer, SaveError, Value, ValueType, WorkspaceComponent,
};

/// Produces a fresh uniform draw from `[low, high)` on attribute `value`
/// each update.
pub struct RandomSource {
    name: String,
    seed: u64,
    low: f64,
    high: f64,
    rng: ChaCha8Rng,
    value: f64,
    attributes: CouplingContainer,
    dirty: bool,
}

impl RandomSource {
    /// A source over `[low, high)`. The first value is drawn immediately
    /// so `value` is well-defined before the first update.
    pub fn new(name: impl Into<String>, seed: u64, low: f64, high: f64) -> Self {
        let mut attributes = CouplingContainer::new();
        attributes.add_producer("value", ValueType::Float);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let value = Self::draw(&mut rng, low, high);
        Self {
            name: name.into(),
            seed,
            low,
            high,
            rng,
            value,
            attributes,
            dirty: true,
        }
    }

    fn draw(rng: &mut ChaCha8Rng, low: f64, high: f64) -> f64 {
        low + (high - low) * rng.random::<f64>()
    }

    /// The current value, without advancing the sequence.
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Rebuild a source from its archive payload. The RNG restarts from
    /// the persisted seed; a reloaded run replays the sequence from the
    /// beginning.
    pub fn open(payload: &[u8]) -> Result<Box<dyn WorkspaceComponent>, ComponentLoadError> {
        let mut r = payload;
        Self::decode(&mut r).map_err(ComponentLoadError::new)
    }

    fn decode(r: &mut &[u8]) -> Result<Box<dyn WorkspaceComponent>, ArchiveError> {
        let name = codec::read_length_prefixed_str(r)?;
        let seed = codec::read_u64_le(r)?;
        let low = codec::read_f64_le(r)?;
        let high = codec::read_f64_le(r)?;
        if !(low < high) {
            return Err(ArchiveError::Malformed {
                detail: format!("invalid bounds [{low}, {high})"),
            });
        }
        let mut source = RandomSource::new(name, seed, low, high);
        source.dirty = false;
        Ok(Box::new(source))
    }
}

impl WorkspaceComponent for RandomSource {
    fn type_tag(&self) -> &'static str {
        "random_source"
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn attributes(&self) -> &CouplingContainer {
        &self.attributes
    }

    fn produce(&self, attribute: &str) -> Result<Value, AttributeError> {
        if attribute == "value" {
            Ok(Value::Float(self.value))
        } else {
            Err(AttributeError::UnknownAttribute {
                attribute: attribute.to_string(),
            })
        }
    }

    fn consume(&mut self, attribute: &str, _value: Value) -> Result<(), AttributeError> {
        Err(AttributeError::UnknownAttribute {
            attribute: attribute.to_string(),
        })
    }

    fn update(&mut self) {
        self.value = Self::draw(&mut self.rng, self.low, self.high);
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
            codec::write_u64_le(buf, self.seed)?;
            codec::write_f64_le(buf, self.low)?;
            codec::write_f64_le(buf, self.high)?;
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
