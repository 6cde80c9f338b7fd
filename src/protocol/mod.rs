//! Transition validation and replication.
//!
//! One code path serves both roles. A node built as [`Role::Authority`]
//! validates requests and broadcasts confirmed transitions; a node built
//! as [`Role::Mirror`] forwards requests upstream and applies whatever
//! comes back, trusting the authority completely. Which role a node plays
//! is an explicit construction-time choice, never inferred from the host.

pub mod message;

use crate::core::{ObserverId, StateRegistry, StateTag};
use crate::diagnostics::{DebugConfig, DiagnosticRecord, DiagnosticsSink, NoopSink};
use crate::runtime::StateRuntime;
use crate::transport::Transport;
use chrono::Utc;
use message::{ConfirmedTransition, InstanceId, MirrorBound, RequestTransition, SyncState};
use std::sync::Arc;

/// Which side of the replication protocol a node plays.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Role {
    /// The single replica whose validation decision is final.
    Authority,
    /// A follower that applies confirmed transitions without re-validating.
    Mirror,
}

/// One replica of a replicated state machine instance.
///
/// Composes the instance's registry, its local runtime, and the protocol
/// role. All replicas of an instance share an [`InstanceId`] and an
/// identical registry; only the authority's registry is ever consulted.
///
/// Requests are fire and forget: rejection produces no error, no return
/// value, and no notification. From the caller's side a rejected request
/// is indistinguishable from one still in flight: the state simply has
/// not changed. The only trace of a rejection is a diagnostic line, and
/// only when debugging is enabled.
pub struct StateMachineNode<S: StateTag> {
    instance: InstanceId,
    role: Role,
    entity_name: String,
    registry: StateRegistry<S>,
    runtime: StateRuntime<S>,
    debug: DebugConfig,
    sink: Arc<dyn DiagnosticsSink>,
    /// Last seq this replica applied; doubles as the authority's counter.
    last_applied_seq: u64,
}

impl<S: StateTag> StateMachineNode<S> {
    /// Assemble a node from its parts. Prefer [`crate::builder::NodeBuilder`].
    pub fn new(
        instance: InstanceId,
        role: Role,
        entity_name: String,
        registry: StateRegistry<S>,
        debug: DebugConfig,
        sink: Arc<dyn DiagnosticsSink>,
    ) -> Self {
        let runtime = StateRuntime::new(registry.initial().clone());
        Self {
            instance,
            role,
            entity_name,
            registry,
            runtime,
            debug,
            sink,
            last_applied_seq: 0,
        }
    }

    /// Assemble a node with a discarding diagnostics sink.
    pub fn with_noop_sink(
        instance: InstanceId,
        role: Role,
        entity_name: String,
        registry: StateRegistry<S>,
    ) -> Self {
        Self::new(
            instance,
            role,
            entity_name,
            registry,
            DebugConfig::default(),
            Arc::new(NoopSink),
        )
    }

    /// The instance this node replicates.
    pub fn instance(&self) -> InstanceId {
        self.instance
    }

    /// This node's protocol role.
    pub fn role(&self) -> Role {
        self.role
    }

    /// This replica's copy of the current state.
    pub fn current_state(&self) -> &S {
        self.runtime.current()
    }

    /// The configured initial state.
    pub fn initial_state(&self) -> &S {
        self.registry.initial()
    }

    /// The configured accepted states.
    pub fn accepted_states(&self) -> &[S] {
        self.registry.accepted()
    }

    /// Seq of the last confirmed transition applied here.
    pub fn last_applied_seq(&self) -> u64 {
        self.last_applied_seq
    }

    /// Subscribe to `Enter` notifications on this replica.
    pub fn on_enter<F>(&mut self, callback: F) -> ObserverId
    where
        F: Fn(&S) + Send + Sync + 'static,
    {
        self.runtime.on_enter(callback)
    }

    /// Subscribe to `Exit` notifications on this replica.
    pub fn on_exit<F>(&mut self, callback: F) -> ObserverId
    where
        F: Fn(&S) + Send + Sync + 'static,
    {
        self.runtime.on_exit(callback)
    }

    /// Subscribe to `Tick` notifications on this replica.
    pub fn on_tick<F>(&mut self, callback: F) -> ObserverId
    where
        F: Fn(f32, &S) + Send + Sync + 'static,
    {
        self.runtime.on_tick(callback)
    }

    /// Direct access to the local runtime.
    pub fn runtime(&self) -> &StateRuntime<S> {
        &self.runtime
    }

    /// Mutable access to the local runtime, for unsubscribing.
    pub fn runtime_mut(&mut self) -> &mut StateRuntime<S> {
        &mut self.runtime
    }

    /// Request a transition to `target`.
    ///
    /// On the authority this validates immediately; on a mirror it sends
    /// the request upstream and returns. Either way there is no result to
    /// wait on: the caller must not assume the transition has happened
    /// when this returns.
    pub fn request_transition(&mut self, target: S, transport: &mut dyn Transport<S>) {
        match self.role {
            Role::Authority => self.validate_and_broadcast(target, transport),
            Role::Mirror => transport.push_request(RequestTransition {
                instance: self.instance,
                target,
            }),
        }
    }

    /// Authority-side validation and fan-out.
    ///
    /// Rejects silently if `target` is not accepted or equals the current
    /// state; otherwise assigns the next seq, broadcasts to every mirror,
    /// and applies the transition to the local runtime through the same
    /// confirmed path. Called on a mirror, the request is dropped with a
    /// diagnostic: mirrors have no authority to confirm anything.
    pub fn validate_and_broadcast(&mut self, target: S, transport: &mut dyn Transport<S>) {
        if self.role != Role::Authority {
            self.diag(format!(
                "dropping transition request for {}: node is not the authority",
                self.entity_name
            ));
            return;
        }

        if !self.registry.is_accepted(&target) {
            self.diag(format!(
                "could not switch state for {}: {} is not an accepted state",
                self.entity_name,
                target.name()
            ));
            return;
        }

        if *self.runtime.current() == target {
            self.diag(format!(
                "could not switch state for {}: already in {}",
                self.entity_name,
                target.name()
            ));
            return;
        }

        let message = ConfirmedTransition {
            instance: self.instance,
            seq: self.last_applied_seq + 1,
            target,
            issued_at: Utc::now(),
        };
        transport.broadcast_confirmed(message.clone());
        self.apply_confirmed(message);
    }

    /// Apply one confirmed transition to this replica.
    ///
    /// No re-validation happens here: confirmation is the authority's
    /// word and mirrors take it. Envelopes for a different instance are
    /// dropped, as are duplicates (seq at or below the last applied one),
    /// which gives duplicate delivery at-most-once effect.
    pub fn apply_confirmed(&mut self, message: ConfirmedTransition<S>) {
        if message.instance != self.instance {
            return;
        }
        if message.seq <= self.last_applied_seq {
            self.diag(format!(
                "dropping duplicate transition for {}: seq {} already applied",
                self.entity_name, message.seq
            ));
            return;
        }
        self.last_applied_seq = message.seq;
        self.runtime.execute_confirmed(message.target);
    }

    /// Converge on a join-time snapshot without running exit/enter.
    pub fn apply_sync(&mut self, message: SyncState<S>) {
        if message.instance != self.instance {
            return;
        }
        self.last_applied_seq = message.seq;
        self.runtime.sync_to(message.current);
    }

    /// Dispatch one downstream message.
    pub fn receive(&mut self, message: MirrorBound<S>) {
        match message {
            MirrorBound::Confirmed(confirmed) => self.apply_confirmed(confirmed),
            MirrorBound::Sync(sync) => self.apply_sync(sync),
        }
    }

    /// Snapshot the authority's state for a late-joining mirror.
    pub fn make_sync(&self) -> SyncState<S> {
        SyncState {
            instance: self.instance,
            seq: self.last_applied_seq,
            current: self.runtime.current().clone(),
            issued_at: Utc::now(),
        }
    }

    /// Run one scheduling tick on this replica.
    ///
    /// Emits `Tick(dt, current)` unless a transition is mid-flight, then
    /// a current-state debug line when debugging is enabled.
    pub fn tick(&mut self, delta_time: f32) {
        self.runtime.tick(delta_time);
        if self.debug.enabled {
            self.sink.emit(DiagnosticRecord::now(
                self.debug.channel_key,
                format!(
                    "current state for {}: {}",
                    self.entity_name,
                    self.runtime.current().name()
                ),
            ));
        }
    }

    fn diag(&self, message: String) {
        if self.debug.enabled {
            self.sink
                .emit(DiagnosticRecord::now(self.debug.channel_key, message));
        }
    }
}
