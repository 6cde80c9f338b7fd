//! Single-process wiring of one authority and its mirrors.
//!
//! `Session` owns the whole replica set over an in-memory transport and
//! pumps messages between them in FIFO order. It is the reference
//! integration: distributed hosts keep the same node code and swap the
//! transport and pump for their networking layer.

use crate::core::StateTag;
use crate::protocol::message::{MirrorBound, ReplicaId};
use crate::protocol::{Role, StateMachineNode};
use crate::transport::{InMemoryTransport, Transport};

/// One authority plus any number of mirrors of the same instance.
///
/// Requests queue until [`Session::pump`] runs; the authority drains them
/// one at a time, so concurrent requests serialize rather than overlap.
/// Confirmed transitions reach mirrors on the pump after the one that
/// produced them, modelling the network hop.
///
/// # Example
///
/// ```rust
/// use replistate::builder::NodeBuilder;
/// use replistate::core::Label;
/// use replistate::protocol::Role;
/// use replistate::session::Session;
///
/// let authority = NodeBuilder::new()
///     .initial(Label::new("Idle"))
///     .accept(Label::new("Attacking"))
///     .role(Role::Authority)
///     .build()
///     .unwrap();
///
/// let mut session = Session::new(authority);
/// let mirror = session.join_mirror("player-view");
///
/// session.request_from_mirror(mirror, Label::new("Attacking"));
/// session.pump();
///
/// assert_eq!(session.authority().current_state(), &Label::new("Attacking"));
/// assert_eq!(
///     session.mirror(mirror).unwrap().current_state(),
///     &Label::new("Attacking"),
/// );
/// ```
pub struct Session<S: StateTag> {
    authority: StateMachineNode<S>,
    mirrors: Vec<(ReplicaId, StateMachineNode<S>)>,
    transport: InMemoryTransport<S>,
}

impl<S: StateTag> Session<S> {
    /// Create a session around an authority node.
    ///
    /// # Panics
    ///
    /// Panics if the node was built as a mirror; a session has exactly
    /// one authority and it is this one.
    pub fn new(authority: StateMachineNode<S>) -> Self {
        assert_eq!(
            authority.role(),
            Role::Authority,
            "session root must be the authority"
        );
        Self {
            authority,
            mirrors: Vec::new(),
            transport: InMemoryTransport::new(),
        }
    }

    /// Attach a new mirror replica of the instance.
    ///
    /// The mirror starts from the same registry as the authority and is
    /// synced to the authority's current state immediately, through its
    /// own queue so ordering against later broadcasts holds.
    pub fn join_mirror(&mut self, entity_name: impl Into<String>) -> ReplicaId {
        let node = StateMachineNode::with_noop_sink(
            self.authority.instance(),
            Role::Mirror,
            entity_name.into(),
            crate::core::StateRegistry::new(
                self.authority.initial_state().clone(),
                self.authority.accepted_states().to_vec(),
            ),
        );
        self.join_mirror_node(node)
    }

    /// Attach a pre-built mirror node (custom sink, subscribers already
    /// registered). The node must replicate this session's instance.
    pub fn join_mirror_node(&mut self, node: StateMachineNode<S>) -> ReplicaId {
        assert_eq!(node.role(), Role::Mirror, "joined nodes must be mirrors");
        assert_eq!(
            node.instance(),
            self.authority.instance(),
            "joined nodes must replicate the session instance"
        );
        let id = ReplicaId::new();
        self.transport.attach_mirror(id);
        self.transport
            .push_to_mirror(id, MirrorBound::Sync(self.authority.make_sync()));
        self.mirrors.push((id, node));
        id
    }

    /// Detach a mirror, dropping anything still queued for it.
    pub fn leave_mirror(&mut self, id: ReplicaId) -> Option<StateMachineNode<S>> {
        self.transport.detach_mirror(id);
        let index = self.mirrors.iter().position(|(m, _)| *m == id)?;
        Some(self.mirrors.remove(index).1)
    }

    /// The authority node.
    pub fn authority(&self) -> &StateMachineNode<S> {
        &self.authority
    }

    /// Mutable authority node, for subscribing to its notifications.
    pub fn authority_mut(&mut self) -> &mut StateMachineNode<S> {
        &mut self.authority
    }

    /// A mirror node by id.
    pub fn mirror(&self, id: ReplicaId) -> Option<&StateMachineNode<S>> {
        self.mirrors
            .iter()
            .find(|(m, _)| *m == id)
            .map(|(_, node)| node)
    }

    /// Mutable mirror node by id.
    pub fn mirror_mut(&mut self, id: ReplicaId) -> Option<&mut StateMachineNode<S>> {
        self.mirrors
            .iter_mut()
            .find(|(m, _)| *m == id)
            .map(|(_, node)| node)
    }

    /// Ids of all attached mirrors, in join order.
    pub fn mirror_ids(&self) -> Vec<ReplicaId> {
        self.mirrors.iter().map(|(id, _)| *id).collect()
    }

    /// Request a transition from the authority's own site.
    ///
    /// Validates immediately; the broadcast still waits for [`pump`] to
    /// reach the mirrors.
    ///
    /// [`pump`]: Session::pump
    pub fn request(&mut self, target: S) {
        self.authority.request_transition(target, &mut self.transport);
    }

    /// Request a transition from a mirror's site, fire and forget.
    ///
    /// Queued until the next [`Session::pump`]; unknown mirror ids are a
    /// no-op, like a request from a link that no longer exists.
    pub fn request_from_mirror(&mut self, id: ReplicaId, target: S) {
        let instance = self.authority.instance();
        if self.mirror(id).is_some() {
            self.transport
                .push_request(crate::protocol::message::RequestTransition {
                    instance,
                    target,
                });
        }
    }

    /// Deliver everything in flight: pending requests through authority
    /// validation, then every mirror's queue in FIFO order. Runs until no
    /// messages remain, so a request's broadcast lands in the same call.
    pub fn pump(&mut self) {
        loop {
            let mut moved = false;

            while let Some(request) = self.transport.pop_request() {
                moved = true;
                if request.instance == self.authority.instance() {
                    self.authority
                        .validate_and_broadcast(request.target, &mut self.transport);
                }
            }

            for (id, node) in &mut self.mirrors {
                while let Some(message) = self.transport.pop_for_mirror(*id) {
                    moved = true;
                    node.receive(message);
                }
            }

            if !moved {
                break;
            }
        }
    }

    /// Run one scheduling tick on every replica, authority first.
    pub fn tick_all(&mut self, delta_time: f32) {
        self.authority.tick(delta_time);
        for (_, node) in &mut self.mirrors {
            node.tick(delta_time);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::NodeBuilder;
    use crate::core::Label;

    fn combat_authority() -> StateMachineNode<Label> {
        NodeBuilder::new()
            .initial(Label::new("Idle"))
            .accept(Label::new("Attacking"))
            .accept(Label::new("Dead"))
            .entity_name("orc")
            .role(Role::Authority)
            .build()
            .unwrap()
    }

    #[test]
    #[should_panic(expected = "session root must be the authority")]
    fn session_rejects_mirror_root() {
        let node = NodeBuilder::new()
            .initial(Label::new("Idle"))
            .accept(Label::new("Attacking"))
            .role(Role::Mirror)
            .build()
            .unwrap();
        let _ = Session::new(node);
    }

    #[test]
    fn mirrors_converge_on_authority_requests() {
        let mut session = Session::new(combat_authority());
        let a = session.join_mirror("view-a");
        let b = session.join_mirror("view-b");

        session.request(Label::new("Attacking"));
        session.request(Label::new("Dead"));
        session.pump();

        for id in [a, b] {
            assert_eq!(
                session.mirror(id).unwrap().current_state(),
                &Label::new("Dead")
            );
            assert_eq!(session.mirror(id).unwrap().last_applied_seq(), 2);
        }
    }

    #[test]
    fn mirror_request_round_trips_through_authority() {
        let mut session = Session::new(combat_authority());
        let mirror = session.join_mirror("view");

        session.request_from_mirror(mirror, Label::new("Attacking"));
        // Nothing happens until the pump delivers the request.
        assert_eq!(session.authority().current_state(), &Label::new("Idle"));

        session.pump();
        assert_eq!(session.authority().current_state(), &Label::new("Attacking"));
        assert_eq!(
            session.mirror(mirror).unwrap().current_state(),
            &Label::new("Attacking")
        );
    }

    #[test]
    fn rejected_mirror_request_changes_nothing_anywhere() {
        let mut session = Session::new(combat_authority());
        let mirror = session.join_mirror("view");

        session.request_from_mirror(mirror, Label::new("Flying"));
        session.pump();

        assert_eq!(session.authority().current_state(), &Label::new("Idle"));
        assert_eq!(
            session.mirror(mirror).unwrap().current_state(),
            &Label::new("Idle")
        );
    }

    #[test]
    fn late_joiner_syncs_to_current_state() {
        let mut session = Session::new(combat_authority());
        session.request(Label::new("Attacking"));
        session.request(Label::new("Dead"));
        session.pump();

        let late = session.join_mirror("late-view");
        session.pump();

        let node = session.mirror(late).unwrap();
        assert_eq!(node.current_state(), &Label::new("Dead"));
        assert_eq!(node.last_applied_seq(), 2);
    }

    #[test]
    fn left_mirror_stops_receiving() {
        let mut session = Session::new(combat_authority());
        let mirror = session.join_mirror("view");
        session.pump();

        let node = session.leave_mirror(mirror).unwrap();
        session.request(Label::new("Attacking"));
        session.pump();

        assert_eq!(node.current_state(), &Label::new("Idle"));
        assert!(session.mirror(mirror).is_none());
    }

    #[test]
    fn requests_serialize_in_arrival_order() {
        let mut session = Session::new(combat_authority());
        let mirror = session.join_mirror("view");

        // Both requests are valid when sent; the second is validated
        // against the state left by the first.
        session.request_from_mirror(mirror, Label::new("Attacking"));
        session.request_from_mirror(mirror, Label::new("Attacking"));
        session.request_from_mirror(mirror, Label::new("Dead"));
        session.pump();

        let node = session.mirror(mirror).unwrap();
        assert_eq!(node.current_state(), &Label::new("Dead"));
        // The duplicate "Attacking" was rejected as redundant: two
        // confirmations total, not three.
        assert_eq!(node.last_applied_seq(), 2);
    }
}

#[cfg(test)]
mod integration_tests {
    use super::*;
    use crate::builder::NodeBuilder;
    use crate::core::Label;
    use std::sync::{Arc, Mutex};

    /// The canonical combat scenario: accepted = {Attacking, Dead},
    /// initial = Idle, observed from a subscribed mirror.
    #[test]
    fn combat_scenario_notification_sequence() {
        let authority = NodeBuilder::new()
            .initial(Label::new("Idle"))
            .accept(Label::new("Attacking"))
            .accept(Label::new("Dead"))
            .entity_name("orc")
            .role(Role::Authority)
            .build()
            .unwrap();

        let mut session = Session::new(authority);
        let log = Arc::new(Mutex::new(Vec::new()));

        let exits = Arc::clone(&log);
        session
            .authority_mut()
            .on_exit(move |tag| exits.lock().unwrap().push(format!("Exit({})", tag.name())));
        let enters = Arc::clone(&log);
        session
            .authority_mut()
            .on_enter(move |tag| enters.lock().unwrap().push(format!("Enter({})", tag.name())));

        session.request(Label::new("Attacking"));
        session.pump();
        assert_eq!(session.authority().current_state(), &Label::new("Attacking"));

        // Redundant request: no notifications, state unchanged.
        session.request(Label::new("Attacking"));
        session.pump();
        assert_eq!(session.authority().current_state(), &Label::new("Attacking"));

        // Unaccepted request: no notifications, state unchanged.
        session.request(Label::new("Flying"));
        session.pump();
        assert_eq!(session.authority().current_state(), &Label::new("Attacking"));

        session.request(Label::new("Dead"));
        session.pump();
        assert_eq!(session.authority().current_state(), &Label::new("Dead"));

        assert_eq!(
            log.lock().unwrap().as_slice(),
            &[
                "Exit(Idle)".to_string(),
                "Enter(Attacking)".to_string(),
                "Exit(Attacking)".to_string(),
                "Enter(Dead)".to_string(),
            ]
        );
    }

    #[test]
    fn ticks_between_transitions_carry_the_active_state() {
        let authority = NodeBuilder::new()
            .initial(Label::new("Idle"))
            .accept(Label::new("Attacking"))
            .role(Role::Authority)
            .build()
            .unwrap();

        let mut session = Session::new(authority);
        let ticked = Arc::new(Mutex::new(Vec::new()));

        let sink = Arc::clone(&ticked);
        session
            .authority_mut()
            .on_tick(move |_, tag| sink.lock().unwrap().push(tag.clone()));

        session.tick_all(0.016);
        session.request(Label::new("Attacking"));
        session.pump();
        session.tick_all(0.016);

        assert_eq!(
            ticked.lock().unwrap().as_slice(),
            &[Label::new("Idle"), Label::new("Attacking")]
        );
    }
}
