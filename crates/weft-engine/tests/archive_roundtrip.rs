//! Integration test: full-session archive save and reload.
//!
//! A workspace of real components is saved mid-session and rebuilt from
//! the archive bytes; the reloaded graph must keep ticking. Also covers
//! per-item load degradation when records no longer resolve.

use weft_archive::{write_archive, ComponentRecord, CouplingRecord, OpenerRegistry, WorkspaceArchive};
use weft_components::{register_openers, DataTable, Gain, PieChart, RandomSource};
use weft_core::{AttributeRef, ValueType, WorkspaceComponent};
use weft_engine::{LoadWarning, Workspace};

fn sample_session() -> Workspace {
    let mut ws = Workspace::new();
    ws.add_component(Box::new(RandomSource::new("rng", 7, 0.0, 1.0)))
        .unwrap();
    ws.add_component(Box::new(Gain::new("gain", 2.0))).unwrap();
    ws.add_component(Box::new(DataTable::new("table", &["a"], 1)))
        .unwrap();
    ws.add_component(Box::new(PieChart::new("chart", &["a"])))
        .unwrap();
    ws.couple(
        &AttributeRef::new("rng", "value"),
        &AttributeRef::new("gain", "input"),
    )
    .unwrap();
    ws.couple(
        &AttributeRef::new("gain", "output"),
        &AttributeRef::new("table", "a"),
    )
    .unwrap();
    ws.couple(
        &AttributeRef::new("table", "a"),
        &AttributeRef::new("chart", "a"),
    )
    .unwrap();
    ws
}

#[test]
fn full_session_survives_save_and_reload() {
    let mut ws = sample_session();
    ws.tick();
    ws.tick();

    let mut bytes = Vec::new();
    ws.save_archive(&mut bytes).unwrap();

    let mut openers = OpenerRegistry::new();
    register_openers(&mut openers);
    let (mut loaded, warnings) = Workspace::load_archive(&mut bytes.as_slice(), &openers).unwrap();

    assert!(warnings.is_empty());
    assert_eq!(loaded.component_count(), 4);
    assert_eq!(loaded.coupling_count(), 3);

    // Every reopened component exposes the identical attribute registry.
    for (_, original) in ws.components() {
        let id = loaded.component_id(original.name()).unwrap();
        let reopened = loaded.component(id).unwrap();
        let producers = |c: &dyn WorkspaceComponent| -> Vec<(String, ValueType)> {
            c.attributes()
                .producers()
                .map(|(n, t)| (n.to_string(), t))
                .collect()
        };
        let consumers = |c: &dyn WorkspaceComponent| -> Vec<(String, ValueType)> {
            c.attributes()
                .consumers()
                .map(|(n, t)| (n.to_string(), t))
                .collect()
        };
        assert_eq!(producers(original), producers(reopened));
        assert_eq!(consumers(original), consumers(reopened));
    }
    // Endpoints were re-resolved by name against the rebuilt registry.
    for coupling in loaded.couplings() {
        assert!(loaded.component(coupling.producer.component).is_some());
        assert!(loaded.component(coupling.consumer.component).is_some());
    }

    let report = loaded.tick();
    assert!(report.skips.is_empty());
}

#[test]
fn saved_table_state_is_preserved() {
    let mut ws = Workspace::new();
    let mut table = DataTable::new("table", &["a", "b"], 2);
    table.set(1, "b", 7.5);
    ws.add_component(Box::new(table)).unwrap();

    let mut bytes = Vec::new();
    ws.save_archive(&mut bytes).unwrap();

    let mut openers = OpenerRegistry::new();
    register_openers(&mut openers);
    let (loaded, warnings) = Workspace::load_archive(&mut bytes.as_slice(), &openers).unwrap();
    assert!(warnings.is_empty());

    let id = loaded.component_id("table").unwrap();
    let table = loaded
        .component(id)
        .unwrap()
        .as_any()
        .downcast_ref::<DataTable>()
        .unwrap();
    assert_eq!(table.get(1, "b"), Some(7.5));
    assert!(!table.is_dirty());
}

#[test]
fn coupling_with_vanished_attribute_is_dropped_with_warning() {
    // An archive whose coupling references an attribute its component no
    // longer exposes: the component loads, the coupling does not.
    let gain = Gain::new("gain", 1.0);
    let archive = WorkspaceArchive {
        components: vec![ComponentRecord {
            type_tag: "gain".to_string(),
            name: "gain".to_string(),
            payload: gain.save().unwrap(),
        }],
        couplings: vec![CouplingRecord {
            producer: AttributeRef::new("gain", "output"),
            consumer: AttributeRef::new("gain", "vanished"),
        }],
    };
    let mut bytes = Vec::new();
    write_archive(&mut bytes, &archive).unwrap();

    let mut openers = OpenerRegistry::new();
    register_openers(&mut openers);
    let (loaded, warnings) = Workspace::load_archive(&mut bytes.as_slice(), &openers).unwrap();

    assert_eq!(loaded.component_count(), 1);
    assert_eq!(loaded.coupling_count(), 0);
    assert_eq!(warnings.len(), 1);
    assert!(matches!(warnings[0], LoadWarning::Coupling { .. }));
}

#[test]
fn reloaded_seeded_source_replays_from_start() {
    let mut ws = Workspace::new();
    ws.add_component(Box::new(RandomSource::new("rng", 42, 0.0, 1.0)))
        .unwrap();
    let first = {
        let id = ws.component_id("rng").unwrap();
        ws.component(id)
            .unwrap()
            .as_any()
            .downcast_ref::<RandomSource>()
            .unwrap()
            .value()
    };

    let mut bytes = Vec::new();
    ws.save_archive(&mut bytes).unwrap();

    let mut openers = OpenerRegistry::new();
    register_openers(&mut openers);
    let (loaded, _) = Workspace::load_archive(&mut bytes.as_slice(), &openers).unwrap();
    let id = loaded.component_id("rng").unwrap();
    let reloaded = loaded
        .component(id)
        .unwrap()
        .as_any()
        .downcast_ref::<RandomSource>()
        .unwrap();
    assert_eq!(reloaded.value(), first);
}
