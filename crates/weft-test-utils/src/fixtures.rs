//! Reusable component test fixtures.
//!
//! Five standard components for update-cycle and persistence testing:
//!
//! - [`ConstSource`] — produces a fixed value on attribute `value`.
//! - [`CounterSource`] — produces the number of completed updates.
//! - [`Probe`] — records every value written to its consumer attributes.
//! - [`FlakySource`] — produce fails deterministically after N successful
//!   reads.
//! - [`PhaseRecorder`] — appends to a shared log from each lifecycle hook.

use std::any::Any;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use weft_archive::codec;
use weft_archive::ComponentLoadError;
use weft_core::{
    AttributeError, CouplingContainer, SaveError, Value, ValueType, WorkspaceComponent,
};

/// Register openers for the persistable fixtures ([`ConstSource`] and
/// [`Probe`]) in archive round-trip tests.
pub fn register_openers(registry: &mut weft_archive::OpenerRegistry) {
    registry.register("const_source", ConstSource::open);
    registry.register("probe", Probe::open);
}

fn decode(payload: &[u8], f: impl FnOnce(&mut &[u8]) -> Result<Box<dyn WorkspaceComponent>, weft_archive::ArchiveError>) -> Result<Box<dyn WorkspaceComponent>, ComponentLoadError> {
    let mut r = payload;
    f(&mut r).map_err(ComponentLoadError::new)
}

// ── ConstSource ─────────────────────────────────────────────────

/// Produces a fixed value on producer attribute `value`.
///
/// Starts dirty so save-tracking tests have an unsaved component to work
/// with; [`mark_saved`](WorkspaceComponent::mark_saved) clears the flag.
pub struct ConstSource {
    pub name: String,
    pub value: Value,
    attributes: CouplingContainer,
    dirty: bool,
}

impl ConstSource {
    pub fn new(name: impl Into<String>, value: Value) -> Self {
        let mut attributes = CouplingContainer::new();
        attributes.add_producer("value", value.value_type());
        Self {
            name: name.into(),
            value,
            attributes,
            dirty: true,
        }
    }

    /// Replace the produced value. The declared type must not change.
    pub fn set_value(&mut self, value: Value) {
        self.value = value;
        self.dirty = true;
    }

    pub fn open(payload: &[u8]) -> Result<Box<dyn WorkspaceComponent>, ComponentLoadError> {
        decode(payload, |r| {
            let name = codec::read_length_prefixed_str(r)?;
            let value = codec::read_value(r)?;
            let mut source = ConstSource::new(name, value);
            source.dirty = false;
            Ok(Box::new(source))
        })
    }
}

impl WorkspaceComponent for ConstSource {
    fn type_tag(&self) -> &'static str {
        "const_source"
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn attributes(&self) -> &CouplingContainer {
        &self.attributes
    }

    fn produce(&self, attribute: &str) -> Result<Value, AttributeError> {
        if attribute == "value" {
            Ok(self.value)
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

    fn update(&mut self) {}

    fn is_dirty(&self) -> bool {
        self.dirty
    }

    fn mark_saved(&mut self) {
        self.dirty = false;
    }

    fn save(&self) -> Result<Vec<u8>, SaveError> {
        let mut buf = Vec::new();
        codec::write_length_prefixed_str(&mut buf, &self.name)
            .and_then(|()| codec::write_value(&mut buf, self.value))
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

// ── CounterSource ───────────────────────────────────────────────

/// Produces the number of completed updates on producer attribute `count`
/// (as a float). Pins down Update-before-Resolve ordering: after the
/// first tick a coupled consumer sees `1.0`, not `0.0`.
pub struct CounterSource {
    pub name: String,
    pub count: u64,
    attributes: CouplingContainer,
}

impl CounterSource {
    pub fn new(name: impl Into<String>) -> Self {
        let mut attributes = CouplingContainer::new();
        attributes.add_producer("count", ValueType::Float);
        Self {
            name: name.into(),
            count: 0,
            attributes,
        }
    }
}

impl WorkspaceComponent for CounterSource {
    fn type_tag(&self) -> &'static str {
        "counter_source"
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn attributes(&self) -> &CouplingContainer {
        &self.attributes
    }

    fn produce(&self, attribute: &str) -> Result<Value, AttributeError> {
        if attribute == "count" {
            Ok(Value::Float(self.count as f64))
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
        self.count += 1;
    }

    fn save(&self) -> Result<Vec<u8>, SaveError> {
        let mut buf = Vec::new();
        codec::write_length_prefixed_str(&mut buf, &self.name)
            .and_then(|()| codec::write_u64_le(&mut buf, self.count))
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

// ── Probe ───────────────────────────────────────────────────────

/// Records every value written to its consumer attributes, in write order.
///
/// If the resolved values match what the producers held, the coupling
/// plumbing is working correctly.
pub struct Probe {
    pub name: String,
    value_type: ValueType,
    inputs: Vec<String>,
    received: Vec<Value>,
    attributes: CouplingContainer,
}

impl Probe {
    /// A probe with a single consumer attribute `input`.
    pub fn new(name: impl Into<String>, value_type: ValueType) -> Self {
        Self::with_inputs(name, value_type, &["input"])
    }

    /// A probe with one consumer attribute per name in `inputs`.
    pub fn with_inputs(name: impl Into<String>, value_type: ValueType, inputs: &[&str]) -> Self {
        let mut attributes = CouplingContainer::new();
        for input in inputs {
            attributes.add_consumer(*input, value_type);
        }
        Self {
            name: name.into(),
            value_type,
            inputs: inputs.iter().map(|s| s.to_string()).collect(),
            received: Vec::new(),
            attributes,
        }
    }

    /// All values written so far, oldest first.
    pub fn received(&self) -> Vec<Value> {
        self.received.clone()
    }

    pub fn open(payload: &[u8]) -> Result<Box<dyn WorkspaceComponent>, ComponentLoadError> {
        decode(payload, |r| {
            let name = codec::read_length_prefixed_str(r)?;
            let value_type = codec::read_value_type(r)?;
            let count = codec::read_u32_le(r)?;
            let mut inputs = Vec::with_capacity(count as usize);
            for _ in 0..count {
                inputs.push(codec::read_length_prefixed_str(r)?);
            }
            let borrowed: Vec<&str> = inputs.iter().map(String::as_str).collect();
            Ok(Box::new(Probe::with_inputs(name, value_type, &borrowed)))
        })
    }
}

impl WorkspaceComponent for Probe {
    fn type_tag(&self) -> &'static str {
        "probe"
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
        if !self.inputs.iter().any(|i| i == attribute) {
            return Err(AttributeError::UnknownAttribute {
                attribute: attribute.to_string(),
            });
        }
        if value.value_type() != self.value_type {
            return Err(AttributeError::TypeMismatch {
                expected: self.value_type,
                got: value.value_type(),
            });
        }
        self.received.push(value);
        Ok(())
    }

    fn update(&mut self) {}

    fn save(&self) -> Result<Vec<u8>, SaveError> {
        let mut buf = Vec::new();
        let encode = |buf: &mut Vec<u8>| -> Result<(), weft_archive::ArchiveError> {
            codec::write_length_prefixed_str(buf, &self.name)?;
            codec::write_value_type(buf, self.value_type)?;
            codec::write_u32_le(buf, self.inputs.len() as u32)?;
            for input in &self.inputs {
                codec::write_length_prefixed_str(buf, input)?;
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

// ── FlakySource ─────────────────────────────────────────────────

/// Produce succeeds `succeed_count` times, then fails every call.
///
/// Exercises resolve-phase degradation: the owning coupling must be
/// skipped with a warning while the rest of the round proceeds.
pub struct FlakySource {
    pub name: String,
    succeed_count: usize,
    calls: AtomicUsize,
    attributes: CouplingContainer,
}

impl FlakySource {
    pub fn new(name: impl Into<String>, succeed_count: usize) -> Self {
        let mut attributes = CouplingContainer::new();
        attributes.add_producer("value", ValueType::Float);
        Self {
            name: name.into(),
            succeed_count,
            calls: AtomicUsize::new(0),
            attributes,
        }
    }
}

impl WorkspaceComponent for FlakySource {
    fn type_tag(&self) -> &'static str {
        "flaky_source"
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn attributes(&self) -> &CouplingContainer {
        &self.attributes
    }

    fn produce(&self, attribute: &str) -> Result<Value, AttributeError> {
        if attribute != "value" {
            return Err(AttributeError::UnknownAttribute {
                attribute: attribute.to_string(),
            });
        }
        let call = self.calls.fetch_add(1, Ordering::Relaxed);
        if call < self.succeed_count {
            Ok(Value::Float(call as f64))
        } else {
            Err(AttributeError::Failed {
                reason: format!("deterministic failure on call {call}"),
            })
        }
    }

    fn consume(&mut self, attribute: &str, _value: Value) -> Result<(), AttributeError> {
        Err(AttributeError::UnknownAttribute {
            attribute: attribute.to_string(),
        })
    }

    fn update(&mut self) {}

    fn save(&self) -> Result<Vec<u8>, SaveError> {
        let mut buf = Vec::new();
        codec::write_length_prefixed_str(&mut buf, &self.name)
            .and_then(|()| codec::write_u64_le(&mut buf, self.succeed_count as u64))
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

// ── PhaseRecorder ───────────────────────────────────────────────

/// Appends `update:<name>` and `round:<name>` entries to a shared log from
/// its lifecycle hooks, for asserting phase ordering across components.
pub struct PhaseRecorder {
    pub name: String,
    log: Arc<Mutex<Vec<String>>>,
    attributes: CouplingContainer,
}

impl PhaseRecorder {
    /// A fresh shared log, cloneable into multiple recorders.
    pub fn log() -> Arc<Mutex<Vec<String>>> {
        Arc::new(Mutex::new(Vec::new()))
    }

    pub fn new(name: impl Into<String>, log: &Arc<Mutex<Vec<String>>>) -> Self {
        Self {
            name: name.into(),
            log: Arc::clone(log),
            attributes: CouplingContainer::new(),
        }
    }

    fn record(&self, phase: &str) {
        if let Ok(mut log) = self.log.lock() {
            log.push(format!("{phase}:{}", self.name));
        }
    }
}

impl WorkspaceComponent for PhaseRecorder {
    fn type_tag(&self) -> &'static str {
        "phase_recorder"
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

    fn consume(&mut self, attribute: &str, _value: Value) -> Result<(), AttributeError> {
        Err(AttributeError::UnknownAttribute {
            attribute: attribute.to_string(),
        })
    }

    fn update(&mut self) {
        self.record("update");
    }

    fn round_completed(&mut self) {
        self.record("round");
    }

    fn save(&self) -> Result<Vec<u8>, SaveError> {
        Ok(Vec::new())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
