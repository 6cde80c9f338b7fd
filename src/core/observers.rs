//! Observer lists for state lifecycle notifications.
//!
//! Each notification channel (enter, exit, tick) is an explicit ordered
//! list of callbacks, invoked synchronously in registration order.
//! Emitting on an empty list is a no-op.

use super::tag::StateTag;

/// Handle identifying one subscribed callback, usable to unsubscribe.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct ObserverId(u64);

/// Ordered list of callbacks receiving a state tag.
///
/// Used for the enter and exit channels. Callbacks must be thread-safe
/// (`Send + Sync`); subscribers that record observations do so through
/// interior mutability.
///
/// # Example
///
/// ```rust
/// use replistate::core::{Label, ObserverList};
/// use std::sync::{Arc, Mutex};
///
/// let mut observers: ObserverList<Label> = ObserverList::new();
/// let seen = Arc::new(Mutex::new(Vec::new()));
///
/// let sink = Arc::clone(&seen);
/// observers.subscribe(move |tag| sink.lock().unwrap().push(tag.clone()));
///
/// observers.emit(&Label::new("Attacking"));
/// assert_eq!(seen.lock().unwrap().as_slice(), &[Label::new("Attacking")]);
/// ```
pub struct ObserverList<S: StateTag> {
    callbacks: Vec<(ObserverId, Box<dyn Fn(&S) + Send + Sync>)>,
    next_id: u64,
}

impl<S: StateTag> ObserverList<S> {
    /// Create an empty list.
    pub fn new() -> Self {
        Self {
            callbacks: Vec::new(),
            next_id: 0,
        }
    }

    /// Register a callback, appended after all existing subscribers.
    pub fn subscribe<F>(&mut self, callback: F) -> ObserverId
    where
        F: Fn(&S) + Send + Sync + 'static,
    {
        let id = ObserverId(self.next_id);
        self.next_id += 1;
        self.callbacks.push((id, Box::new(callback)));
        id
    }

    /// Remove a previously registered callback.
    ///
    /// Returns false if the handle was already removed or never issued.
    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        let before = self.callbacks.len();
        self.callbacks.retain(|(existing, _)| *existing != id);
        self.callbacks.len() != before
    }

    /// Invoke every callback in registration order. No-op when empty.
    pub fn emit(&self, tag: &S) {
        for (_, callback) in &self.callbacks {
            callback(tag);
        }
    }

    /// Number of registered callbacks.
    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    /// Whether no callbacks are registered.
    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }
}

impl<S: StateTag> Default for ObserverList<S> {
    fn default() -> Self {
        Self::new()
    }
}

/// Ordered list of callbacks receiving a delta time and the current tag.
///
/// Used for the tick channel only; otherwise identical to [`ObserverList`].
pub struct TickObserverList<S: StateTag> {
    callbacks: Vec<(ObserverId, Box<dyn Fn(f32, &S) + Send + Sync>)>,
    next_id: u64,
}

impl<S: StateTag> TickObserverList<S> {
    /// Create an empty list.
    pub fn new() -> Self {
        Self {
            callbacks: Vec::new(),
            next_id: 0,
        }
    }

    /// Register a callback, appended after all existing subscribers.
    pub fn subscribe<F>(&mut self, callback: F) -> ObserverId
    where
        F: Fn(f32, &S) + Send + Sync + 'static,
    {
        let id = ObserverId(self.next_id);
        self.next_id += 1;
        self.callbacks.push((id, Box::new(callback)));
        id
    }

    /// Remove a previously registered callback.
    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        let before = self.callbacks.len();
        self.callbacks.retain(|(existing, _)| *existing != id);
        self.callbacks.len() != before
    }

    /// Invoke every callback in registration order. No-op when empty.
    pub fn emit(&self, delta_time: f32, tag: &S) {
        for (_, callback) in &self.callbacks {
            callback(delta_time, tag);
        }
    }

    /// Whether no callbacks are registered.
    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }
}

impl<S: StateTag> Default for TickObserverList<S> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Label;
    use std::sync::{Arc, Mutex};

    #[test]
    fn emit_on_empty_list_is_noop() {
        let observers: ObserverList<Label> = ObserverList::new();
        observers.emit(&Label::new("Idle"));
        assert!(observers.is_empty());
    }

    #[test]
    fn callbacks_run_in_registration_order() {
        let mut observers: ObserverList<Label> = ObserverList::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        let first = Arc::clone(&order);
        observers.subscribe(move |_| first.lock().unwrap().push("first"));
        let second = Arc::clone(&order);
        observers.subscribe(move |_| second.lock().unwrap().push("second"));

        observers.emit(&Label::new("Idle"));
        assert_eq!(order.lock().unwrap().as_slice(), &["first", "second"]);
    }

    #[test]
    fn unsubscribe_removes_only_target() {
        let mut observers: ObserverList<Label> = ObserverList::new();
        let count = Arc::new(Mutex::new(0u32));

        let keep = Arc::clone(&count);
        observers.subscribe(move |_| *keep.lock().unwrap() += 1);
        let drop_sink = Arc::clone(&count);
        let id = observers.subscribe(move |_| *drop_sink.lock().unwrap() += 10);

        assert!(observers.unsubscribe(id));
        assert!(!observers.unsubscribe(id));

        observers.emit(&Label::new("Idle"));
        assert_eq!(*count.lock().unwrap(), 1);
        assert_eq!(observers.len(), 1);
    }

    #[test]
    fn tick_list_passes_delta_and_tag() {
        let mut observers: TickObserverList<Label> = TickObserverList::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let sink = Arc::clone(&seen);
        observers.subscribe(move |dt, tag| sink.lock().unwrap().push((dt, tag.clone())));

        observers.emit(0.016, &Label::new("Attacking"));
        let recorded = seen.lock().unwrap();
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].0, 0.016);
        assert_eq!(recorded[0].1, Label::new("Attacking"));
    }

    #[test]
    fn each_subscriber_sees_every_emission() {
        let mut observers: ObserverList<Label> = ObserverList::new();
        let count = Arc::new(Mutex::new(0u32));

        for _ in 0..3 {
            let sink = Arc::clone(&count);
            observers.subscribe(move |_| *sink.lock().unwrap() += 1);
        }

        observers.emit(&Label::new("Idle"));
        observers.emit(&Label::new("Dead"));
        assert_eq!(*count.lock().unwrap(), 6);
    }
}
