//! Minimal consumer-to-producer pass-through.
//!
//! Consumes `input`, produces `output = gain * input`. The output is
//! recomputed during the update phase, so a value written at tick N's
//! resolve appears scaled on the output at tick N+1 — a one-tick
//! pipeline delay, consistent with deferred cross-component propagation.

use std::any::Any;

use weft_archive::codec;
use weft_archive::{ArchiveError, ComponentLoadError};
use weft_core::{
    AttributeError, CouplingContainer, SaveError, Value, ValueType, WorkspaceComponent,
};

/// Scales its input by a constant factor.
pub struct Gain {
    name: String,
    gain: f64,
    input: f64,
    output: f64,
    attributes: CouplingContainer,
    dirty: bool,
}

impl Gain {
    /// A gain stage with the given factor. Input and output start at zero.
    pub fn new(name: impl Into<String>, gain: f64) -> Self {
        let mut attributes = CouplingContainer::new();
        attributes.add_consumer("input", ValueType::Float);
        attributes.add_producer("output", ValueType::Float);
        Self {
            name: name.into(),
            gain,
            input: 0.0,
            output: 0.0,
            attributes,
            dirty: true,
        }
    }

    /// The scaled value most recently computed.
    pub fn output(&self) -> f64 {
        self.output
    }

    /// Rebuild a gain stage from its archive payload.
    pub fn open(payload: &[u8]) -> Result<Box<dyn WorkspaceComponent>, ComponentLoadError> {
        let mut r = payload;
        Self::decode(&mut r).map_err(ComponentLoadError::new)
    }

    fn decode(r: &mut &[u8]) -> Result<Box<dyn WorkspaceComponent>, ArchiveError> {
        let name = codec::read_length_prefixed_str(r)?;
        let gain = codec::read_f64_le(r)?;
        let mut stage = Gain::new(name, gain);
        stage.dirty = false;
        Ok(Box::new(stage))
    }
}

impl WorkspaceComponent for Gain {
    fn type_tag(&self) -> &'static str {
        "gain"
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn attributes(&self) -> &CouplingContainer {
        &self.attributes
    }

    fn produce(&self, attribute: &str) -> Result<Value, AttributeError> {
        if attribute == "output" {
            Ok(Value::Float(self.output))
        } else {
            Err(AttributeError::UnknownAttribute {
                attribute: attribute.to_string(),
            })
        }
    }

    fn consume(&mut self, attribute: &str, value: Value) -> Result<(), AttributeError> {
        if attribute != "input" {
            return Err(AttributeError::UnknownAttribute {
                attribute: attribute.to_string(),
            });
        }
        match value {
            Value::Float(v) => {
                self.input = v;
                Ok(())
            }
            other => Err(AttributeError::TypeMismatch {
                expected: ValueType::Float,
                got: other.value_type(),
            }),
        }
    }

    fn update(&mut self) {
        self.output = self.gain * self.input;
    }

    fn is_dirty(&self) -> bool {
        self.dirty
    }

    fn mark_saved(&mut self) {
        self.dirty = false;
    }

    fn save(&self) -> Result<Vec<u8>, SaveError> {
        let mut buf = Vec::new();
        codec::write_length_prefixed_str(&mut buf, &self.name)
            .and_then(|()| codec::write_f64_le(&mut buf, self.gain))
            .map_err(|e| SaveError::Encode {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scales_input_on_update() {
        let mut g = Gain::new("g", 3.0);
        g.consume("input", Value::Float(2.0)).unwrap();
        assert_eq!(g.output(), 0.0);
        g.update();
        assert_eq!(g.produce("output").unwrap(), Value::Float(6.0));
    }

    #[test]
    fn rejects_non_float_input() {
        let mut g = Gain::new("g", 1.0);
        assert!(matches!(
            g.consume("input", Value::Bool(true)),
            Err(AttributeError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn save_open_preserves_factor() {
        let g = Gain::new("g", 0.5);
        let payload = g.save().unwrap();
        let mut reopened = Gain::open(&payload).unwrap();
        reopened.consume("input", Value::Float(8.0)).unwrap();
        reopened.update();
        assert_eq!(reopened.produce("output").unwrap(), Value::Float(4.0));
    }
}
