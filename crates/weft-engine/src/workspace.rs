//! The workspace: process-wide owner of components and couplings, and the
//! single-threaded update cycle that drives them.
//!
//! # Cooperative scheduling
//!
//! One tick runs to completion before the next begins; there is no
//! concurrent in-flight tick. All mutating methods take `&mut self`, so
//! structural mutations cannot race an in-progress Resolve phase — callers
//! that want a mutation mid-session submit a
//! [`WorkspaceCommand`](crate::WorkspaceCommand) instead, which is applied
//! at the next Commit phase. Cancellation granularity is "do not call
//! [`tick()`](Workspace::tick) again"; a started tick always completes.

use std::time::Instant;

use indexmap::IndexMap;
use smallvec::SmallVec;

use weft_core::{
    Attribute, AttributeDirection, AttributeRef, ComponentId, Coupling, CouplingError, CouplingId,
    SkipReason, TickId, WorkspaceComponent,
};

use crate::command::{CommandQueue, Receipt, WorkspaceCommand};
use crate::error::{CommandError, WorkspaceError};
use crate::events::{DetachReason, EventBus, WorkspaceEvent};
use crate::metrics::TickMetrics;

/// Default capacity of the workspace command queue.
pub const DEFAULT_COMMAND_CAPACITY: usize = 1024;

// ── TickReport ──────────────────────────────────────────────────

/// One coupling skipped during a Resolve phase.
///
/// A skip degrades exactly one coupling for exactly one tick; it is a
/// warning, never an error, and the coupling is retried next tick.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolveSkip {
    /// The coupling that did not propagate.
    pub coupling: CouplingId,
    /// Why it was skipped.
    pub reason: SkipReason,
}

/// Outcome of one full Update → Resolve → Commit round.
///
/// Ticks are infallible by design: the worst outcome for the cycle is a
/// skipped value propagation, reported here rather than raised.
#[derive(Debug)]
pub struct TickReport {
    /// The tick that just completed.
    pub tick: TickId,
    /// Receipts for queued commands applied at this tick's Commit phase.
    pub receipts: Vec<Receipt>,
    /// Couplings that were skipped this tick, in coupling order.
    pub skips: SmallVec<[ResolveSkip; 4]>,
    /// Timing and outcome counters for this tick.
    pub metrics: TickMetrics,
}

// ── Workspace ───────────────────────────────────────────────────

/// Process-wide registry of live components and active couplings, and the
/// engine that drives them through synchronized, totally ordered ticks.
///
/// Components iterate in registration order; couplings resolve in
/// registration order. Both orderings are stable across a session, which
/// makes runs deterministic and test outcomes reproducible.
pub struct Workspace {
    components: IndexMap<ComponentId, Box<dyn WorkspaceComponent>>,
    couplings: IndexMap<CouplingId, Coupling>,
    next_coupling_id: u64,
    current_tick: TickId,
    queue: CommandQueue,
    events: EventBus,
    last_metrics: TickMetrics,
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new()
    }
}

impl Workspace {
    /// Create an empty workspace with the default command queue capacity.
    pub fn new() -> Self {
        Self::with_command_capacity(DEFAULT_COMMAND_CAPACITY)
    }

    /// Create an empty workspace with a specific command queue capacity.
    pub fn with_command_capacity(capacity: usize) -> Self {
        Self {
            components: IndexMap::new(),
            couplings: IndexMap::new(),
            next_coupling_id: 1,
            current_tick: TickId(0),
            queue: CommandQueue::new(capacity),
            events: EventBus::new(),
            last_metrics: TickMetrics::default(),
        }
    }

    // ── Component registry ──────────────────────────────────────

    /// Register a component. Its attributes become available as coupling
    /// endpoints immediately.
    ///
    /// Display names must be unique: they are the stable keys persisted
    /// coupling endpoints resolve against.
    pub fn add_component(
        &mut self,
        component: Box<dyn WorkspaceComponent>,
    ) -> Result<ComponentId, WorkspaceError> {
        let name = component.name().to_string();
        if self.component_id(&name).is_some() {
            return Err(WorkspaceError::DuplicateComponentName { name });
        }
        let id = ComponentId::next();
        self.components.insert(id, component);
        self.events
            .broadcast(WorkspaceEvent::ComponentAdded { id, name });
        Ok(id)
    }

    /// Close a component: detach every coupling touching it, then drop it.
    ///
    /// Returns `false` if the ID is not live (idempotent teardown).
    /// Detaching is pure bookkeeping, so closing cannot fail because of
    /// coupling state.
    pub fn close_component(&mut self, id: ComponentId) -> bool {
        let Some(component) = self.components.get(&id) else {
            return false;
        };
        let name = component.name().to_string();
        let touching: Vec<CouplingId> = self
            .couplings
            .values()
            .filter(|c| c.touches(id))
            .map(|c| c.id)
            .collect();
        for coupling in touching {
            self.detach(coupling, DetachReason::ComponentClosed);
        }
        self.components.shift_remove(&id);
        self.events
            .broadcast(WorkspaceEvent::ComponentClosed { id, name });
        true
    }

    /// Full teardown: remove every coupling, close every component, and
    /// reset the tick counter. Supports "new workspace" operations.
    pub fn clear(&mut self) {
        let couplings: Vec<CouplingId> = self.couplings.keys().copied().collect();
        for coupling in couplings {
            self.detach(coupling, DetachReason::WorkspaceCleared);
        }
        let components: Vec<ComponentId> = self.components.keys().copied().collect();
        for id in components {
            self.close_component(id);
        }
        self.queue.clear();
        self.current_tick = TickId(0);
        self.last_metrics = TickMetrics::default();
    }

    /// The component with this ID, if live.
    pub fn component(&self, id: ComponentId) -> Option<&dyn WorkspaceComponent> {
        self.components.get(&id).map(|c| c.as_ref())
    }

    /// Mutable access to the component with this ID, if live.
    ///
    /// For between-tick reconfiguration (adding a table column, renaming a
    /// slice); never call into this during a tick.
    pub fn component_mut(
        &mut self,
        id: ComponentId,
    ) -> Option<&mut (dyn WorkspaceComponent + 'static)> {
        self.components.get_mut(&id).map(|c| c.as_mut())
    }

    /// The ID of the component with this display name, if live.
    pub fn component_id(&self, name: &str) -> Option<ComponentId> {
        self.components
            .iter()
            .find(|(_, c)| c.name() == name)
            .map(|(id, _)| *id)
    }

    /// All live components with their IDs, in registration order.
    pub fn components(&self) -> impl Iterator<Item = (ComponentId, &dyn WorkspaceComponent)> {
        self.components.iter().map(|(id, c)| (*id, c.as_ref()))
    }

    /// Number of live components.
    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    // ── Coupling registry ───────────────────────────────────────

    /// Create a coupling from a producer attribute to a consumer
    /// attribute, both referenced by `(componentName, attributeName)`.
    ///
    /// Endpoints are resolved to live attributes at this moment and
    /// validated: both components must be live, both attributes currently
    /// registered with the right direction, and the producer type
    /// convertible to the consumer type. If the consumer attribute already
    /// has a coupling, that coupling is removed first — observers see
    /// [`CouplingRemoved`](WorkspaceEvent::CouplingRemoved) with
    /// [`DetachReason::Replaced`] before the new
    /// [`CouplingCreated`](WorkspaceEvent::CouplingCreated).
    ///
    /// Creating a coupling moves no data; values flow at the next Resolve
    /// phase. A producer may feed any number of couplings.
    pub fn couple(
        &mut self,
        producer: &AttributeRef,
        consumer: &AttributeRef,
    ) -> Result<CouplingId, CouplingError> {
        let (producer_id, producer_component) = self
            .component_by_name(&producer.component)
            .ok_or_else(|| CouplingError::UnknownComponent {
                name: producer.component.clone(),
            })?;
        let producer_type = producer_component
            .attributes()
            .producer_type(&producer.attribute)
            .ok_or_else(|| CouplingError::UnknownAttribute {
                component: producer.component.clone(),
                attribute: producer.attribute.clone(),
                direction: AttributeDirection::Producer,
            })?;

        let (consumer_id, consumer_component) = self
            .component_by_name(&consumer.component)
            .ok_or_else(|| CouplingError::UnknownComponent {
                name: consumer.component.clone(),
            })?;
        let consumer_type = consumer_component
            .attributes()
            .consumer_type(&consumer.attribute)
            .ok_or_else(|| CouplingError::UnknownAttribute {
                component: consumer.component.clone(),
                attribute: consumer.attribute.clone(),
                direction: AttributeDirection::Consumer,
            })?;

        if !producer_type.convertible_to(consumer_type) {
            return Err(CouplingError::TypeMismatch {
                producer: producer_type,
                consumer: consumer_type,
            });
        }

        // Last-bind-wins: a consumer attribute holds at most one coupling.
        let prior = self
            .couplings
            .values()
            .find(|c| c.consumer.component == consumer_id && c.consumer.name == consumer.attribute)
            .map(|c| c.id);
        if let Some(prior) = prior {
            self.detach(prior, DetachReason::Replaced);
        }

        let id = CouplingId(self.next_coupling_id);
        self.next_coupling_id += 1;
        self.couplings.insert(
            id,
            Coupling {
                id,
                producer: Attribute {
                    component: producer_id,
                    name: producer.attribute.clone(),
                    direction: AttributeDirection::Producer,
                    value_type: producer_type,
                },
                consumer: Attribute {
                    component: consumer_id,
                    name: consumer.attribute.clone(),
                    direction: AttributeDirection::Consumer,
                    value_type: consumer_type,
                },
            },
        );
        self.events.broadcast(WorkspaceEvent::CouplingCreated { id });
        Ok(id)
    }

    /// Remove a coupling. Returns `false` (not an error) if the ID is not
    /// active — removal is idempotent to support teardown paths that race
    /// component closure.
    pub fn remove_coupling(&mut self, id: CouplingId) -> bool {
        self.detach(id, DetachReason::Requested)
    }

    /// The coupling with this ID, if active.
    pub fn coupling(&self, id: CouplingId) -> Option<&Coupling> {
        self.couplings.get(&id)
    }

    /// All active couplings, in registration order.
    pub fn couplings(&self) -> impl Iterator<Item = &Coupling> {
        self.couplings.values()
    }

    /// Number of active couplings.
    pub fn coupling_count(&self) -> usize {
        self.couplings.len()
    }

    fn detach(&mut self, id: CouplingId, reason: DetachReason) -> bool {
        if self.couplings.shift_remove(&id).is_some() {
            self.events
                .broadcast(WorkspaceEvent::CouplingRemoved { id, reason });
            true
        } else {
            false
        }
    }

    fn component_by_name(&self, name: &str) -> Option<(ComponentId, &dyn WorkspaceComponent)> {
        self.components
            .iter()
            .find(|(_, c)| c.name() == name)
            .map(|(id, c)| (*id, c.as_ref()))
    }

    // ── Commands and events ─────────────────────────────────────

    /// Queue structural commands for application at the next Commit phase.
    ///
    /// Returns one receipt per command; commands past queue capacity are
    /// rejected immediately with
    /// [`CommandError::QueueFull`](crate::CommandError::QueueFull).
    /// Application receipts arrive in the next [`TickReport`].
    pub fn submit(&mut self, commands: Vec<WorkspaceCommand>) -> Vec<Receipt> {
        self.queue.submit(commands)
    }

    /// Subscribe to workspace change events.
    pub fn subscribe(&mut self) -> crossbeam_channel::Receiver<WorkspaceEvent> {
        self.events.subscribe()
    }

    // ── Tick execution ──────────────────────────────────────────

    /// Execute one tick: Update, then Resolve, then Commit.
    ///
    /// Never fails. Per-coupling Resolve failures are degraded to skips in
    /// the report; everything else in the cycle is infallible bookkeeping.
    pub fn tick(&mut self) -> TickReport {
        let tick_start = Instant::now();
        let next_tick = TickId(self.current_tick.0 + 1);

        // 1. Update phase: every component, registration order, exactly
        //    once. Cross-component values from this tick are not visible
        //    here; propagation is deferred to the Resolve phase.
        let mut update_us = Vec::with_capacity(self.components.len());
        for component in self.components.values_mut() {
            let start = Instant::now();
            component.update();
            update_us.push((
                component.name().to_string(),
                start.elapsed().as_micros() as u64,
            ));
        }

        // 2. Resolve phase: every coupling, registration order. A failed
        //    read or write skips that one coupling; the rest still run.
        let resolve_start = Instant::now();
        let mut skips: SmallVec<[ResolveSkip; 4]> = SmallVec::new();
        let mut resolved: u32 = 0;
        for coupling in self.couplings.values() {
            match resolve_one(&mut self.components, coupling) {
                Ok(()) => resolved += 1,
                Err(reason) => skips.push(ResolveSkip {
                    coupling: coupling.id,
                    reason,
                }),
            }
        }
        let resolve_us = resolve_start.elapsed().as_micros() as u64;

        // 3. Commit phase: round-completed hooks (all writes for the round
        //    have landed), then queued structural commands, then the
        //    round-completed notification.
        let commit_start = Instant::now();
        for component in self.components.values_mut() {
            component.round_completed();
        }
        let receipts = self.apply_queued(next_tick);
        self.events
            .broadcast(WorkspaceEvent::RoundCompleted { tick: next_tick });
        let commit_us = commit_start.elapsed().as_micros() as u64;

        self.current_tick = next_tick;
        let metrics = TickMetrics {
            total_us: tick_start.elapsed().as_micros() as u64,
            update_us,
            resolve_us,
            commit_us,
            couplings_resolved: resolved,
            couplings_skipped: skips.len() as u32,
        };
        self.last_metrics = metrics.clone();

        TickReport {
            tick: next_tick,
            receipts,
            skips,
            metrics,
        }
    }

    /// Drain the command queue and apply each command, issuing receipts.
    fn apply_queued(&mut self, tick: TickId) -> Vec<Receipt> {
        let drained = self.queue.drain();
        let mut receipts = Vec::with_capacity(drained.len());
        for queued in drained {
            let outcome: Result<(), CommandError> = match queued.command {
                WorkspaceCommand::CreateCoupling { producer, consumer } => self
                    .couple(&producer, &consumer)
                    .map(|_| ())
                    .map_err(CommandError::from),
                WorkspaceCommand::RemoveCoupling { id } => {
                    // Idempotent: removing an unknown ID is a clean no-op.
                    self.remove_coupling(id);
                    Ok(())
                }
                WorkspaceCommand::CloseComponent { component } => {
                    match self.component_id(&component) {
                        Some(id) => {
                            self.close_component(id);
                            Ok(())
                        }
                        None => Err(CommandError::UnknownComponent { name: component }),
                    }
                }
            };
            receipts.push(match outcome {
                Ok(()) => Receipt {
                    seq: queued.seq,
                    accepted: true,
                    applied_tick: Some(tick),
                    rejection: None,
                },
                Err(e) => Receipt {
                    seq: queued.seq,
                    accepted: false,
                    applied_tick: None,
                    rejection: Some(e),
                },
            });
        }
        receipts
    }

    /// The tick counter: number of completed rounds this session.
    pub fn current_tick(&self) -> TickId {
        self.current_tick
    }

    /// Metrics from the most recent tick.
    pub fn last_metrics(&self) -> &TickMetrics {
        &self.last_metrics
    }
}

/// Resolve a single coupling: read the producer's current value, convert
/// it to the consumer's type, and write it.
///
/// Free function over the component map so the caller can iterate the
/// coupling set immutably while components are written.
fn resolve_one(
    components: &mut IndexMap<ComponentId, Box<dyn WorkspaceComponent>>,
    coupling: &Coupling,
) -> Result<(), SkipReason> {
    let producer = components
        .get(&coupling.producer.component)
        .ok_or(SkipReason::ComponentGone {
            component: coupling.producer.component,
        })?;
    let value = producer
        .produce(&coupling.producer.name)
        .map_err(|error| SkipReason::Read { error })?;

    // The declared types were compatible at creation time, but a component
    // may have re-registered the attribute with a new type since.
    let value = value
        .convert_to(coupling.consumer.value_type)
        .ok_or(SkipReason::TypeDrift {
            produced: value.value_type(),
            consumer: coupling.consumer.value_type,
        })?;

    let consumer = components
        .get_mut(&coupling.consumer.component)
        .ok_or(SkipReason::ComponentGone {
            component: coupling.consumer.component,
        })?;
    consumer
        .consume(&coupling.consumer.name, value)
        .map_err(|error| SkipReason::Write { error })
}

#[cfg(test)]
mod tests {
    use super::*;
    use weft_core::{Value, ValueType};
    use weft_test_utils::{ConstSource, CounterSource, FlakySource, PhaseRecorder, Probe};

    fn probe_received(ws: &Workspace, id: ComponentId) -> Vec<Value> {
        ws.component(id)
            .unwrap()
            .as_any()
            .downcast_ref::<Probe>()
            .unwrap()
            .received()
    }

    fn wired_pair(value: f64) -> (Workspace, ComponentId, CouplingId) {
        let mut ws = Workspace::new();
        ws.add_component(Box::new(ConstSource::new("Source", Value::Float(value))))
            .unwrap();
        let probe = ws
            .add_component(Box::new(Probe::new("Probe", ValueType::Float)))
            .unwrap();
        let coupling = ws
            .couple(
                &AttributeRef::new("Source", "value"),
                &AttributeRef::new("Probe", "input"),
            )
            .unwrap();
        (ws, probe, coupling)
    }

    // ── Propagation ──────────────────────────────────────────

    #[test]
    fn one_tick_propagates_exactly_once() {
        let (mut ws, probe, _) = wired_pair(0.73);
        ws.tick();
        assert_eq!(probe_received(&ws, probe), vec![Value::Float(0.73)]);
    }

    #[test]
    fn coupling_creation_moves_no_data() {
        let (ws, probe, _) = wired_pair(0.73);
        assert!(probe_received(&ws, probe).is_empty());
    }

    #[test]
    fn fan_out_propagates_to_all_consumers() {
        let mut ws = Workspace::new();
        ws.add_component(Box::new(ConstSource::new("Source", Value::Float(7.0))))
            .unwrap();
        let probes: Vec<ComponentId> = (0..3)
            .map(|i| {
                let id = ws
                    .add_component(Box::new(Probe::new(format!("Probe{i}"), ValueType::Float)))
                    .unwrap();
                ws.couple(
                    &AttributeRef::new("Source", "value"),
                    &AttributeRef::new(format!("Probe{i}"), "input"),
                )
                .unwrap();
                id
            })
            .collect();

        ws.tick();
        for probe in probes {
            assert_eq!(probe_received(&ws, probe), vec![Value::Float(7.0)]);
        }
    }

    #[test]
    fn resolve_reads_post_update_value() {
        // CounterSource increments during Update; Resolve must see the
        // incremented value of the same tick.
        let mut ws = Workspace::new();
        ws.add_component(Box::new(CounterSource::new("Counter")))
            .unwrap();
        let probe = ws
            .add_component(Box::new(Probe::new("Probe", ValueType::Float)))
            .unwrap();
        ws.couple(
            &AttributeRef::new("Counter", "count"),
            &AttributeRef::new("Probe", "input"),
        )
        .unwrap();

        for _ in 0..3 {
            ws.tick();
        }
        assert_eq!(
            probe_received(&ws, probe),
            vec![Value::Float(1.0), Value::Float(2.0), Value::Float(3.0)]
        );
    }

    #[test]
    fn int_producer_widens_to_float_consumer() {
        let mut ws = Workspace::new();
        ws.add_component(Box::new(ConstSource::new("Source", Value::Int(3))))
            .unwrap();
        let probe = ws
            .add_component(Box::new(Probe::new("Probe", ValueType::Float)))
            .unwrap();
        ws.couple(
            &AttributeRef::new("Source", "value"),
            &AttributeRef::new("Probe", "input"),
        )
        .unwrap();
        ws.tick();
        assert_eq!(probe_received(&ws, probe), vec![Value::Float(3.0)]);
    }

    // ── Coupling validation ──────────────────────────────────

    #[test]
    fn unknown_component_rejected() {
        let mut ws = Workspace::new();
        ws.add_component(Box::new(Probe::new("Probe", ValueType::Float)))
            .unwrap();
        let err = ws
            .couple(
                &AttributeRef::new("Ghost", "value"),
                &AttributeRef::new("Probe", "input"),
            )
            .unwrap_err();
        assert_eq!(err, CouplingError::UnknownComponent { name: "Ghost".into() });
    }

    #[test]
    fn unknown_attribute_rejected() {
        let mut ws = Workspace::new();
        ws.add_component(Box::new(ConstSource::new("Source", Value::Float(1.0))))
            .unwrap();
        ws.add_component(Box::new(Probe::new("Probe", ValueType::Float)))
            .unwrap();
        let err = ws
            .couple(
                &AttributeRef::new("Source", "nonsense"),
                &AttributeRef::new("Probe", "input"),
            )
            .unwrap_err();
        assert!(matches!(
            err,
            CouplingError::UnknownAttribute {
                direction: AttributeDirection::Producer,
                ..
            }
        ));
    }

    #[test]
    fn producer_name_does_not_satisfy_consumer_lookup() {
        // "value" exists on ConstSource as a producer only; coupling into
        // it as a consumer must fail.
        let mut ws = Workspace::new();
        ws.add_component(Box::new(ConstSource::new("A", Value::Float(1.0))))
            .unwrap();
        ws.add_component(Box::new(ConstSource::new("B", Value::Float(2.0))))
            .unwrap();
        let err = ws
            .couple(
                &AttributeRef::new("A", "value"),
                &AttributeRef::new("B", "value"),
            )
            .unwrap_err();
        assert!(matches!(
            err,
            CouplingError::UnknownAttribute {
                direction: AttributeDirection::Consumer,
                ..
            }
        ));
    }

    #[test]
    fn type_mismatch_rejected() {
        let mut ws = Workspace::new();
        ws.add_component(Box::new(ConstSource::new("Source", Value::Float(1.0))))
            .unwrap();
        ws.add_component(Box::new(Probe::new("Probe", ValueType::Int)))
            .unwrap();
        let err = ws
            .couple(
                &AttributeRef::new("Source", "value"),
                &AttributeRef::new("Probe", "input"),
            )
            .unwrap_err();
        assert_eq!(
            err,
            CouplingError::TypeMismatch {
                producer: ValueType::Float,
                consumer: ValueType::Int,
            }
        );
    }

    // ── Rebinding ────────────────────────────────────────────

    #[test]
    fn rebind_is_atomic_last_bind_wins() {
        let mut ws = Workspace::new();
        ws.add_component(Box::new(ConstSource::new("A", Value::Float(1.0))))
            .unwrap();
        ws.add_component(Box::new(ConstSource::new("B", Value::Float(2.0))))
            .unwrap();
        let probe = ws
            .add_component(Box::new(Probe::new("Probe", ValueType::Float)))
            .unwrap();

        let first = ws
            .couple(
                &AttributeRef::new("A", "value"),
                &AttributeRef::new("Probe", "input"),
            )
            .unwrap();
        let second = ws
            .couple(
                &AttributeRef::new("B", "value"),
                &AttributeRef::new("Probe", "input"),
            )
            .unwrap();

        assert!(ws.coupling(first).is_none());
        assert!(ws.coupling(second).is_some());
        assert_eq!(ws.coupling_count(), 1);

        ws.tick();
        // C holds B's value, never A's: exactly one write this tick.
        assert_eq!(probe_received(&ws, probe), vec![Value::Float(2.0)]);
    }

    #[test]
    fn rebind_emits_removal_before_creation() {
        let mut ws = Workspace::new();
        ws.add_component(Box::new(ConstSource::new("A", Value::Float(1.0))))
            .unwrap();
        ws.add_component(Box::new(ConstSource::new("B", Value::Float(2.0))))
            .unwrap();
        ws.add_component(Box::new(Probe::new("Probe", ValueType::Float)))
            .unwrap();
        let first = ws
            .couple(
                &AttributeRef::new("A", "value"),
                &AttributeRef::new("Probe", "input"),
            )
            .unwrap();

        let rx = ws.subscribe();
        let second = ws
            .couple(
                &AttributeRef::new("B", "value"),
                &AttributeRef::new("Probe", "input"),
            )
            .unwrap();

        assert_eq!(
            rx.try_recv().unwrap(),
            WorkspaceEvent::CouplingRemoved {
                id: first,
                reason: DetachReason::Replaced,
            }
        );
        assert_eq!(
            rx.try_recv().unwrap(),
            WorkspaceEvent::CouplingCreated { id: second }
        );
    }

    #[test]
    fn same_producer_may_feed_same_consumer_component_on_two_attributes() {
        let mut ws = Workspace::new();
        ws.add_component(Box::new(ConstSource::new("Source", Value::Float(5.0))))
            .unwrap();
        let probe = ws
            .add_component(Box::new(Probe::with_inputs(
                "Probe",
                ValueType::Float,
                &["input", "aux"],
            )))
            .unwrap();
        ws.couple(
            &AttributeRef::new("Source", "value"),
            &AttributeRef::new("Probe", "input"),
        )
        .unwrap();
        ws.couple(
            &AttributeRef::new("Source", "value"),
            &AttributeRef::new("Probe", "aux"),
        )
        .unwrap();
        assert_eq!(ws.coupling_count(), 2);
        ws.tick();
        assert_eq!(probe_received(&ws, probe).len(), 2);
    }

    // ── Removal and closure ──────────────────────────────────

    #[test]
    fn remove_coupling_is_idempotent() {
        let (mut ws, probe, coupling) = wired_pair(1.0);
        assert!(ws.remove_coupling(coupling));
        assert!(!ws.remove_coupling(coupling));
        ws.tick();
        assert!(probe_received(&ws, probe).is_empty());
    }

    #[test]
    fn close_detaches_all_touching_couplings() {
        let mut ws = Workspace::new();
        let source = ws
            .add_component(Box::new(ConstSource::new("Source", Value::Float(1.0))))
            .unwrap();
        ws.add_component(Box::new(Probe::new("P1", ValueType::Float)))
            .unwrap();
        ws.add_component(Box::new(Probe::new("P2", ValueType::Float)))
            .unwrap();
        for name in ["P1", "P2"] {
            ws.couple(
                &AttributeRef::new("Source", "value"),
                &AttributeRef::new(name, "input"),
            )
            .unwrap();
        }
        assert_eq!(ws.coupling_count(), 2);

        assert!(ws.close_component(source));
        assert_eq!(ws.coupling_count(), 0);
        assert_eq!(ws.component_count(), 2);

        // Referencing the closed component's attributes now fails.
        let err = ws
            .couple(
                &AttributeRef::new("Source", "value"),
                &AttributeRef::new("P1", "input"),
            )
            .unwrap_err();
        assert_eq!(
            err,
            CouplingError::UnknownComponent {
                name: "Source".into()
            }
        );
    }

    #[test]
    fn close_is_idempotent() {
        let mut ws = Workspace::new();
        let id = ws
            .add_component(Box::new(ConstSource::new("S", Value::Float(1.0))))
            .unwrap();
        assert!(ws.close_component(id));
        assert!(!ws.close_component(id));
    }

    #[test]
    fn clear_supports_fresh_reinitialization() {
        let (mut ws, _, _) = wired_pair(1.0);
        ws.tick();
        assert_eq!(ws.current_tick(), TickId(1));

        ws.clear();
        assert_eq!(ws.component_count(), 0);
        assert_eq!(ws.coupling_count(), 0);
        assert_eq!(ws.current_tick(), TickId(0));

        // A fresh session works in the same workspace.
        ws.add_component(Box::new(ConstSource::new("Source", Value::Float(2.0))))
            .unwrap();
        let probe = ws
            .add_component(Box::new(Probe::new("Probe", ValueType::Float)))
            .unwrap();
        ws.couple(
            &AttributeRef::new("Source", "value"),
            &AttributeRef::new("Probe", "input"),
        )
        .unwrap();
        ws.tick();
        assert_eq!(probe_received(&ws, probe), vec![Value::Float(2.0)]);
    }

    #[test]
    fn component_mut_supports_between_tick_reconfiguration() {
        let (mut ws, probe, _) = wired_pair(1.0);
        let source = ws.component_id("Source").unwrap();
        ws.tick();

        ws.component_mut(source)
            .unwrap()
            .as_any_mut()
            .downcast_mut::<ConstSource>()
            .unwrap()
            .set_value(Value::Float(2.0));

        ws.tick();
        assert_eq!(
            probe_received(&ws, probe),
            vec![Value::Float(1.0), Value::Float(2.0)]
        );
    }

    #[test]
    fn duplicate_component_name_rejected() {
        let mut ws = Workspace::new();
        ws.add_component(Box::new(ConstSource::new("S", Value::Float(1.0))))
            .unwrap();
        let err = ws
            .add_component(Box::new(ConstSource::new("S", Value::Float(2.0))))
            .unwrap_err();
        assert_eq!(err, WorkspaceError::DuplicateComponentName { name: "S".into() });
        assert_eq!(ws.component_count(), 1);
    }

    // ── Resolve-phase degradation ────────────────────────────

    #[test]
    fn one_skip_does_not_abort_the_round() {
        let mut ws = Workspace::new();
        ws.add_component(Box::new(ConstSource::new("Ok1", Value::Float(1.0))))
            .unwrap();
        ws.add_component(Box::new(FlakySource::new("Flaky", 0)))
            .unwrap();
        ws.add_component(Box::new(ConstSource::new("Ok2", Value::Float(2.0))))
            .unwrap();
        let probes: Vec<ComponentId> = ["Ok1", "Flaky", "Ok2"]
            .iter()
            .enumerate()
            .map(|(i, source)| {
                let id = ws
                    .add_component(Box::new(Probe::new(format!("P{i}"), ValueType::Float)))
                    .unwrap();
                ws.couple(
                    &AttributeRef::new(*source, "value"),
                    &AttributeRef::new(format!("P{i}"), "input"),
                )
                .unwrap();
                id
            })
            .collect();

        let report = ws.tick();

        assert_eq!(report.skips.len(), 1);
        assert!(matches!(report.skips[0].reason, SkipReason::Read { .. }));
        assert_eq!(report.metrics.couplings_resolved, 2);
        assert_eq!(report.metrics.couplings_skipped, 1);

        assert_eq!(probe_received(&ws, probes[0]), vec![Value::Float(1.0)]);
        assert!(probe_received(&ws, probes[1]).is_empty());
        assert_eq!(probe_received(&ws, probes[2]), vec![Value::Float(2.0)]);
    }

    #[test]
    fn skip_degrades_one_tick_only() {
        let mut ws = Workspace::new();
        ws.add_component(Box::new(FlakySource::new("Flaky", 1)))
            .unwrap();
        let probe = ws
            .add_component(Box::new(Probe::new("Probe", ValueType::Float)))
            .unwrap();
        ws.couple(
            &AttributeRef::new("Flaky", "value"),
            &AttributeRef::new("Probe", "input"),
        )
        .unwrap();

        let first = ws.tick();
        assert!(first.skips.is_empty());
        let second = ws.tick();
        assert_eq!(second.skips.len(), 1);
        // The coupling stays installed; only the one propagation was lost.
        assert_eq!(ws.coupling_count(), 1);
        assert_eq!(probe_received(&ws, probe).len(), 1);
    }

    // ── Phase ordering ───────────────────────────────────────

    #[test]
    fn phases_run_in_order_across_components() {
        let log = PhaseRecorder::log();
        let mut ws = Workspace::new();
        ws.add_component(Box::new(PhaseRecorder::new("A", &log)))
            .unwrap();
        ws.add_component(Box::new(PhaseRecorder::new("B", &log)))
            .unwrap();

        ws.tick();
        let entries = log.lock().unwrap().clone();
        assert_eq!(
            entries,
            vec!["update:A", "update:B", "round:A", "round:B"]
        );
    }

    #[test]
    fn ticks_are_totally_ordered() {
        let log = PhaseRecorder::log();
        let mut ws = Workspace::new();
        ws.add_component(Box::new(PhaseRecorder::new("A", &log)))
            .unwrap();
        ws.tick();
        ws.tick();
        let entries = log.lock().unwrap().clone();
        assert_eq!(
            entries,
            vec!["update:A", "round:A", "update:A", "round:A"]
        );
        assert_eq!(ws.current_tick(), TickId(2));
    }

    // ── Queued commands ──────────────────────────────────────

    #[test]
    fn queued_coupling_applies_at_commit() {
        let mut ws = Workspace::new();
        ws.add_component(Box::new(ConstSource::new("Source", Value::Float(4.0))))
            .unwrap();
        let probe = ws
            .add_component(Box::new(Probe::new("Probe", ValueType::Float)))
            .unwrap();

        let receipts = ws.submit(vec![WorkspaceCommand::CreateCoupling {
            producer: AttributeRef::new("Source", "value"),
            consumer: AttributeRef::new("Probe", "input"),
        }]);
        assert!(receipts[0].accepted);
        assert_eq!(receipts[0].applied_tick, None);

        // Tick 1: the command applies at Commit, after Resolve — no data
        // moves yet.
        let report = ws.tick();
        assert_eq!(report.receipts.len(), 1);
        assert_eq!(report.receipts[0].applied_tick, Some(TickId(1)));
        assert!(probe_received(&ws, probe).is_empty());
        assert_eq!(ws.coupling_count(), 1);

        // Tick 2: the new coupling resolves.
        ws.tick();
        assert_eq!(probe_received(&ws, probe), vec![Value::Float(4.0)]);
    }

    #[test]
    fn queued_command_rejections_are_reported() {
        let mut ws = Workspace::new();
        ws.submit(vec![
            WorkspaceCommand::CloseComponent {
                component: "Ghost".into(),
            },
            WorkspaceCommand::RemoveCoupling { id: CouplingId(99) },
        ]);
        let report = ws.tick();
        assert_eq!(report.receipts.len(), 2);
        assert!(!report.receipts[0].accepted);
        assert_eq!(
            report.receipts[0].rejection,
            Some(CommandError::UnknownComponent {
                name: "Ghost".into()
            })
        );
        // RemoveCoupling of an unknown ID is an accepted no-op.
        assert!(report.receipts[1].accepted);
    }

    #[test]
    fn queued_close_applies_after_resolve() {
        // The component closed by a queued command still participates in
        // the tick that applies the command.
        let (mut ws, probe, _) = wired_pair(9.0);
        ws.submit(vec![WorkspaceCommand::CloseComponent {
            component: "Source".into(),
        }]);
        let report = ws.tick();
        assert!(report.receipts[0].accepted);
        assert_eq!(probe_received(&ws, probe), vec![Value::Float(9.0)]);
        assert_eq!(ws.component_count(), 1);
        assert_eq!(ws.coupling_count(), 0);
    }

    // ── Events and metrics ───────────────────────────────────

    #[test]
    fn round_completed_event_fires_each_tick() {
        let (mut ws, _, _) = wired_pair(1.0);
        let rx = ws.subscribe();
        ws.tick();
        ws.tick();
        let ticks: Vec<TickId> = rx
            .try_iter()
            .filter_map(|e| match e {
                WorkspaceEvent::RoundCompleted { tick } => Some(tick),
                _ => None,
            })
            .collect();
        assert_eq!(ticks, vec![TickId(1), TickId(2)]);
    }

    #[test]
    fn close_events_cover_detached_couplings() {
        let (mut ws, _, coupling) = wired_pair(1.0);
        let source = ws.component_id("Source").unwrap();
        let rx = ws.subscribe();
        ws.close_component(source);
        assert_eq!(
            rx.try_recv().unwrap(),
            WorkspaceEvent::CouplingRemoved {
                id: coupling,
                reason: DetachReason::ComponentClosed,
            }
        );
        assert!(matches!(
            rx.try_recv().unwrap(),
            WorkspaceEvent::ComponentClosed { .. }
        ));
    }

    #[test]
    fn metrics_cover_all_components_and_couplings() {
        let (mut ws, _, _) = wired_pair(1.0);
        let report = ws.tick();
        assert_eq!(report.metrics.update_us.len(), 2);
        assert_eq!(report.metrics.update_us[0].0, "Source");
        assert_eq!(report.metrics.couplings_resolved, 1);
        assert_eq!(report.metrics.couplings_skipped, 0);
        assert_eq!(ws.last_metrics(), &report.metrics);
    }

    // ── proptest ─────────────────────────────────────────────

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Any sequence of couple calls leaves each consumer
            /// attribute with at most one coupling.
            #[test]
            fn consumer_holds_at_most_one_coupling(
                ops in proptest::collection::vec((0..3usize, 0..3usize), 1..40),
            ) {
                let mut ws = Workspace::new();
                for i in 0..3 {
                    ws.add_component(Box::new(ConstSource::new(
                        format!("S{i}"),
                        Value::Float(i as f64),
                    )))
                    .unwrap();
                    ws.add_component(Box::new(Probe::new(format!("P{i}"), ValueType::Float)))
                        .unwrap();
                }
                for (s, p) in ops {
                    ws.couple(
                        &AttributeRef::new(format!("S{s}"), "value"),
                        &AttributeRef::new(format!("P{p}"), "input"),
                    )
                    .unwrap();
                }

                let mut seen = std::collections::HashSet::new();
                for coupling in ws.couplings() {
                    prop_assert!(
                        seen.insert((coupling.consumer.component, coupling.consumer.name.clone()))
                    );
                }
                prop_assert!(ws.coupling_count() <= 3);
            }
        }
    }
}
