//! Local execution of confirmed transitions.
//!
//! Every replica, authority included, holds one `StateRuntime`. It owns the
//! replica's copy of the current state, the tick gate, and the three
//! notification channels. It never validates: by the time a transition
//! reaches the runtime it has already been confirmed by the authority.

use crate::core::{ObserverId, ObserverList, StateTag, TickObserverList};

/// Per-replica state holder and notification emitter.
///
/// A confirmed transition executes as a strict, uninterruptible sequence:
/// emit `Exit(old)`, assign the new state, emit `Enter(new)`. The tick
/// gate is lowered for the whole sequence so per-tick logic can never
/// observe a half-applied transition.
///
/// # Example
///
/// ```rust
/// use replistate::core::Label;
/// use replistate::runtime::StateRuntime;
/// use std::sync::{Arc, Mutex};
///
/// let mut runtime = StateRuntime::new(Label::new("Idle"));
/// let log = Arc::new(Mutex::new(Vec::new()));
///
/// let enters = Arc::clone(&log);
/// runtime.on_enter(move |tag| enters.lock().unwrap().push(format!("enter {tag}")));
/// let exits = Arc::clone(&log);
/// runtime.on_exit(move |tag| exits.lock().unwrap().push(format!("exit {tag}")));
///
/// runtime.execute_confirmed(Label::new("Attacking"));
///
/// assert_eq!(runtime.current(), &Label::new("Attacking"));
/// assert_eq!(
///     log.lock().unwrap().as_slice(),
///     &["exit Idle".to_string(), "enter Attacking".to_string()],
/// );
/// ```
pub struct StateRuntime<S: StateTag> {
    current: S,
    tick_gate: bool,
    enter: ObserverList<S>,
    exit: ObserverList<S>,
    tick: TickObserverList<S>,
}

impl<S: StateTag> StateRuntime<S> {
    /// Create a runtime holding `initial`, gate open.
    pub fn new(initial: S) -> Self {
        Self {
            current: initial,
            tick_gate: true,
            enter: ObserverList::new(),
            exit: ObserverList::new(),
            tick: TickObserverList::new(),
        }
    }

    /// The replica's copy of the current state.
    pub fn current(&self) -> &S {
        &self.current
    }

    /// Whether per-tick state logic may run right now.
    ///
    /// False only while an exit/assign/enter sequence is executing, which
    /// is observable from inside enter/exit handlers and nowhere else.
    pub fn tick_gate(&self) -> bool {
        self.tick_gate
    }

    /// Subscribe to `Enter` notifications.
    pub fn on_enter<F>(&mut self, callback: F) -> ObserverId
    where
        F: Fn(&S) + Send + Sync + 'static,
    {
        self.enter.subscribe(callback)
    }

    /// Subscribe to `Exit` notifications.
    pub fn on_exit<F>(&mut self, callback: F) -> ObserverId
    where
        F: Fn(&S) + Send + Sync + 'static,
    {
        self.exit.subscribe(callback)
    }

    /// Subscribe to `Tick` notifications.
    pub fn on_tick<F>(&mut self, callback: F) -> ObserverId
    where
        F: Fn(f32, &S) + Send + Sync + 'static,
    {
        self.tick.subscribe(callback)
    }

    /// Remove an `Enter` subscriber.
    pub fn remove_enter(&mut self, id: ObserverId) -> bool {
        self.enter.unsubscribe(id)
    }

    /// Remove an `Exit` subscriber.
    pub fn remove_exit(&mut self, id: ObserverId) -> bool {
        self.exit.unsubscribe(id)
    }

    /// Remove a `Tick` subscriber.
    pub fn remove_tick(&mut self, id: ObserverId) -> bool {
        self.tick.unsubscribe(id)
    }

    /// Execute one confirmed transition: `Exit(old)`, assign, `Enter(new)`.
    ///
    /// The tick gate is false for the whole sequence and restored in the
    /// same call; there is no suspension point between the steps. The
    /// caller has already decided the transition is legal.
    pub fn execute_confirmed(&mut self, target: S) {
        self.tick_gate = false;
        self.exit.emit(&self.current);
        self.current = target;
        self.enter.emit(&self.current);
        self.tick_gate = true;
    }

    /// Overwrite the current state without running exit/enter.
    ///
    /// Used for join-time sync of a late mirror, which converges on the
    /// authority's current state without replaying the transitions that
    /// led there.
    pub fn sync_to(&mut self, current: S) {
        self.current = current;
    }

    /// Run one scheduling tick, emitting `Tick(dt, current)` if the gate
    /// is open.
    pub fn tick(&mut self, delta_time: f32) {
        if self.tick_gate {
            self.tick.emit(delta_time, &self.current);
        }
    }
}
