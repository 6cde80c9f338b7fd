//! Transport seam between the authority and its mirrors.
//!
//! The crate does not ship real networking. It defines the queue contract
//! the protocol relies on and one in-memory implementation used by tests,
//! demos, and single-process hosts. Integrators bridge the same trait onto
//! their reliable-ordered channel of choice.

use crate::core::StateTag;
use crate::protocol::message::{ConfirmedTransition, MirrorBound, ReplicaId, RequestTransition};
use std::collections::{HashMap, VecDeque};

/// Typed channels between one authority and any number of mirrors.
///
/// Two directions, both FIFO:
/// - requests flow up from any replica into a single authority inbox,
///   which serializes them (concurrent requests queue, they never overlap)
/// - confirmed transitions and sync snapshots flow down, one ordered
///   queue per mirror
///
/// Delivery must be reliable and ordered per link; the protocol's
/// convergence guarantee stands on that and nothing else.
pub trait Transport<S: StateTag> {
    /// Enqueue a request into the authority's inbox.
    fn push_request(&mut self, message: RequestTransition<S>);

    /// Dequeue the oldest pending request, if any.
    fn pop_request(&mut self) -> Option<RequestTransition<S>>;

    /// Register a mirror endpoint, creating its downstream queue.
    fn attach_mirror(&mut self, mirror: ReplicaId);

    /// Remove a mirror endpoint and drop anything still queued for it.
    fn detach_mirror(&mut self, mirror: ReplicaId);

    /// Currently attached mirrors, in attach order.
    fn mirrors(&self) -> Vec<ReplicaId>;

    /// Enqueue a message on one mirror's downstream queue.
    fn push_to_mirror(&mut self, mirror: ReplicaId, message: MirrorBound<S>);

    /// Dequeue the oldest message bound for one mirror, if any.
    fn pop_for_mirror(&mut self, mirror: ReplicaId) -> Option<MirrorBound<S>>;

    /// Fan one confirmed transition out to every attached mirror.
    ///
    /// The authority applies its own copy locally; only mirrors receive
    /// the broadcast through the transport.
    fn broadcast_confirmed(&mut self, message: ConfirmedTransition<S>) {
        for mirror in self.mirrors() {
            self.push_to_mirror(mirror, MirrorBound::Confirmed(message.clone()));
        }
    }
}

/// In-process transport backed by plain FIFO queues.
///
/// # Example
///
/// ```rust
/// use replistate::core::Label;
/// use replistate::protocol::message::{InstanceId, RequestTransition};
/// use replistate::transport::{InMemoryTransport, Transport};
///
/// let mut transport: InMemoryTransport<Label> = InMemoryTransport::new();
/// let request = RequestTransition {
///     instance: InstanceId::new(),
///     target: Label::new("Attacking"),
/// };
///
/// transport.push_request(request.clone());
/// assert_eq!(transport.pop_request(), Some(request));
/// assert_eq!(transport.pop_request(), None);
/// ```
pub struct InMemoryTransport<S: StateTag> {
    requests: VecDeque<RequestTransition<S>>,
    mirror_order: Vec<ReplicaId>,
    downstream: HashMap<ReplicaId, VecDeque<MirrorBound<S>>>,
}

impl<S: StateTag> InMemoryTransport<S> {
    /// Create a transport with no mirrors attached.
    pub fn new() -> Self {
        Self {
            requests: VecDeque::new(),
            mirror_order: Vec::new(),
            downstream: HashMap::new(),
        }
    }

    /// Number of requests waiting in the authority inbox.
    pub fn pending_requests(&self) -> usize {
        self.requests.len()
    }

    /// Number of messages waiting for one mirror.
    pub fn pending_for(&self, mirror: ReplicaId) -> usize {
        self.downstream.get(&mirror).map_or(0, VecDeque::len)
    }
}

impl<S: StateTag> Default for InMemoryTransport<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: StateTag> Transport<S> for InMemoryTransport<S> {
    fn push_request(&mut self, message: RequestTransition<S>) {
        self.requests.push_back(message);
    }

    fn pop_request(&mut self) -> Option<RequestTransition<S>> {
        self.requests.pop_front()
    }

    fn attach_mirror(&mut self, mirror: ReplicaId) {
        if !self.downstream.contains_key(&mirror) {
            self.mirror_order.push(mirror);
            self.downstream.insert(mirror, VecDeque::new());
        }
    }

    fn detach_mirror(&mut self, mirror: ReplicaId) {
        self.mirror_order.retain(|m| *m != mirror);
        self.downstream.remove(&mirror);
    }

    fn mirrors(&self) -> Vec<ReplicaId> {
        self.mirror_order.clone()
    }

    fn push_to_mirror(&mut self, mirror: ReplicaId, message: MirrorBound<S>) {
        // Messages for unattached mirrors are dropped, matching a link
        // that no longer exists.
        if let Some(queue) = self.downstream.get_mut(&mirror) {
            queue.push_back(message);
        }
    }

    fn pop_for_mirror(&mut self, mirror: ReplicaId) -> Option<MirrorBound<S>> {
        self.downstream.get_mut(&mirror)?.pop_front()
    }
}
