//! Workspace persistence: saving the component/coupling graph to an
//! archive stream and rebuilding a workspace from one.
//!
//! Couplings are persisted by name, not by ID: each endpoint is stored as
//! `(componentName, attributeName)` and re-resolved against the live
//! registry at load time. Numeric IDs are session-scoped and never written.

use std::fmt;
use std::io::{Read, Write};

use weft_archive::{
    read_archive, write_archive, ArchiveError, ComponentRecord, CouplingRecord, OpenerRegistry,
    WorkspaceArchive,
};
use weft_core::AttributeRef;

use crate::workspace::Workspace;

/// One item that did not survive a load.
///
/// Loads degrade per item: a component whose opener fails, or a coupling
/// whose endpoints no longer resolve, is dropped with a warning while the
/// rest of the archive loads normally.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadWarning {
    /// A component record could not be turned into a live component.
    Component {
        /// Display name from the archive record.
        name: String,
        /// What went wrong.
        detail: String,
    },
    /// A coupling record did not resolve against the loaded components.
    Coupling {
        /// Persisted producer endpoint.
        producer: AttributeRef,
        /// Persisted consumer endpoint.
        consumer: AttributeRef,
        /// What went wrong.
        detail: String,
    },
}

impl fmt::Display for LoadWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Component { name, detail } => {
                write!(f, "component {name:?} dropped: {detail}")
            }
            Self::Coupling {
                producer,
                consumer,
                detail,
            } => {
                write!(f, "coupling {producer} -> {consumer} dropped: {detail}")
            }
        }
    }
}

impl Workspace {
    /// Serialize every component and coupling to `w`.
    ///
    /// Each component contributes its own payload via
    /// [`WorkspaceComponent::save`](weft_core::WorkspaceComponent::save);
    /// components that saved successfully are marked clean afterwards.
    pub fn save_archive(&mut self, w: &mut dyn Write) -> Result<(), ArchiveError> {
        let mut archive = WorkspaceArchive::default();

        let ids: Vec<_> = self.components().map(|(id, _)| id).collect();
        for id in &ids {
            // Components are only removed through close(), which detaches
            // their couplings, so every collected ID is still live here.
            let Some(component) = self.component(*id) else {
                continue;
            };
            let payload = component
                .save()
                .map_err(|e| ArchiveError::ComponentSave {
                    name: component.name().to_string(),
                    detail: e.to_string(),
                })?;
            archive.components.push(ComponentRecord {
                type_tag: component.type_tag().to_string(),
                name: component.name().to_string(),
                payload,
            });
        }

        for coupling in self.couplings() {
            let producer = self.component(coupling.producer.component);
            let consumer = self.component(coupling.consumer.component);
            let (Some(producer), Some(consumer)) = (producer, consumer) else {
                continue;
            };
            archive.couplings.push(CouplingRecord {
                producer: AttributeRef::new(producer.name(), coupling.producer.name.clone()),
                consumer: AttributeRef::new(consumer.name(), coupling.consumer.name.clone()),
            });
        }

        write_archive(w, &archive)?;

        for id in ids {
            if let Some(component) = self.component_mut(id) {
                component.mark_saved();
            }
        }
        Ok(())
    }

    /// Rebuild a workspace from an archive stream.
    ///
    /// A malformed stream is an error. Individual items that fail are
    /// dropped with a [`LoadWarning`] instead of aborting the load: a
    /// component whose type tag has no registered opener, a component
    /// whose opener rejects its payload, or a coupling whose endpoints
    /// are gone (their component having been dropped, or its attributes
    /// having changed).
    pub fn load_archive(
        r: &mut dyn Read,
        openers: &OpenerRegistry,
    ) -> Result<(Workspace, Vec<LoadWarning>), ArchiveError> {
        let archive = read_archive(r)?;
        let mut ws = Workspace::new();
        let mut warnings = Vec::new();

        for record in &archive.components {
            let component = match openers.open(&record.type_tag, &record.name, &record.payload) {
                Ok(component) => component,
                Err(e) => {
                    warnings.push(LoadWarning::Component {
                        name: record.name.clone(),
                        detail: e.to_string(),
                    });
                    continue;
                }
            };
            if let Err(e) = ws.add_component(component) {
                warnings.push(LoadWarning::Component {
                    name: record.name.clone(),
                    detail: e.to_string(),
                });
            }
        }

        for record in &archive.couplings {
            if let Err(e) = ws.couple(&record.producer, &record.consumer) {
                warnings.push(LoadWarning::Coupling {
                    producer: record.producer.clone(),
                    consumer: record.consumer.clone(),
                    detail: e.to_string(),
                });
            }
        }

        Ok((ws, warnings))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use weft_core::{Value, ValueType};
    use weft_test_utils::{register_openers, ConstSource, Probe};

    fn sample_workspace() -> Workspace {
        let mut ws = Workspace::new();
        ws.add_component(Box::new(ConstSource::new("Source", Value::Float(0.5))))
            .unwrap();
        ws.add_component(Box::new(Probe::new("Probe", ValueType::Float)))
            .unwrap();
        ws.couple(
            &AttributeRef::new("Source", "value"),
            &AttributeRef::new("Probe", "input"),
        )
        .unwrap();
        ws
    }

    #[test]
    fn save_load_round_trip_preserves_graph() {
        let mut ws = sample_workspace();
        let mut buf = Vec::new();
        ws.save_archive(&mut buf).unwrap();

        let mut openers = OpenerRegistry::new();
        register_openers(&mut openers);
        let (mut loaded, warnings) =
            Workspace::load_archive(&mut buf.as_slice(), &openers).unwrap();

        assert!(warnings.is_empty());
        assert_eq!(loaded.component_count(), 2);
        assert_eq!(loaded.coupling_count(), 1);

        // The rebuilt graph propagates like the original.
        loaded.tick();
        let probe = loaded.component_id("Probe").unwrap();
        let received = loaded
            .component(probe)
            .unwrap()
            .as_any()
            .downcast_ref::<Probe>()
            .unwrap()
            .received();
        assert_eq!(received, vec![Value::Float(0.5)]);
    }

    #[test]
    fn unknown_type_tag_degrades_to_warning() {
        let mut ws = sample_workspace();
        let mut buf = Vec::new();
        ws.save_archive(&mut buf).unwrap();

        // A registry that only knows the probe: the source is dropped,
        // and so is the coupling that referenced it.
        let mut openers = OpenerRegistry::new();
        openers.register("probe", Probe::open);
        let (loaded, warnings) =
            Workspace::load_archive(&mut buf.as_slice(), &openers).unwrap();

        assert_eq!(loaded.component_count(), 1);
        assert_eq!(loaded.coupling_count(), 0);
        assert_eq!(warnings.len(), 2);
        assert!(matches!(warnings[0], LoadWarning::Component { .. }));
        assert!(matches!(warnings[1], LoadWarning::Coupling { .. }));
    }

    #[test]
    fn save_marks_components_clean() {
        let mut ws = Workspace::new();
        let id = ws
            .add_component(Box::new(ConstSource::new("S", Value::Float(1.0))))
            .unwrap();
        assert!(ws.component(id).unwrap().is_dirty());
        let mut buf = Vec::new();
        ws.save_archive(&mut buf).unwrap();
        assert!(!ws.component(id).unwrap().is_dirty());
    }

    #[test]
    fn malformed_stream_is_an_error() {
        let openers = OpenerRegistry::new();
        let err = Workspace::load_archive(&mut &b"NOPE"[..], &openers).err().unwrap();
        assert!(matches!(err, ArchiveError::InvalidMagic));
    }
}
