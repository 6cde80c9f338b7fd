//! Builder API for ergonomic node construction.
//!
//! This module provides a fluent builder and a tag-defining macro for
//! creating replicated nodes with minimal boilerplate while keeping the
//! required configuration explicit.

pub mod error;
pub mod macros;
pub mod node;

pub use error::BuildError;
pub use node::NodeBuilder;

use crate::core::{StateRegistry, StateTag};
use crate::protocol::{Role, StateMachineNode};

/// Create an authority node with defaults for everything optional.
///
/// # Example
///
/// ```
/// use replistate::builder::authority_node;
/// use replistate::core::Label;
///
/// let node = authority_node(Label::new("Idle"), vec![Label::new("Attacking")]);
/// assert_eq!(node.current_state(), &Label::new("Idle"));
/// ```
pub fn authority_node<S: StateTag>(initial: S, accepted: Vec<S>) -> StateMachineNode<S> {
    StateMachineNode::with_noop_sink(
        crate::protocol::message::InstanceId::new(),
        Role::Authority,
        "entity".to_string(),
        StateRegistry::new(initial, accepted),
    )
}

/// Create a mirror of an existing node, sharing its instance id and
/// registry.
///
/// # Example
///
/// ```
/// use replistate::builder::{authority_node, mirror_of};
/// use replistate::core::Label;
///
/// let authority = authority_node(Label::new("Idle"), vec![Label::new("Attacking")]);
/// let mirror = mirror_of(&authority, "player-view");
/// assert_eq!(mirror.instance(), authority.instance());
/// ```
pub fn mirror_of<S: StateTag>(
    node: &StateMachineNode<S>,
    entity_name: impl Into<String>,
) -> StateMachineNode<S> {
    StateMachineNode::with_noop_sink(
        node.instance(),
        Role::Mirror,
        entity_name.into(),
        StateRegistry::new(node.initial_state().clone(), node.accepted_states().to_vec()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Label;

    #[test]
    fn authority_node_starts_in_initial_state() {
        let node = authority_node(Label::new("Idle"), vec![Label::new("Attacking")]);
        assert_eq!(node.role(), Role::Authority);
        assert_eq!(node.current_state(), &Label::new("Idle"));
    }

    #[test]
    fn mirror_of_shares_instance_and_registry() {
        let authority = authority_node(
            Label::new("Idle"),
            vec![Label::new("Attacking"), Label::new("Dead")],
        );
        let mirror = mirror_of(&authority, "view");

        assert_eq!(mirror.role(), Role::Mirror);
        assert_eq!(mirror.instance(), authority.instance());
        assert_eq!(mirror.initial_state(), authority.initial_state());
        assert_eq!(mirror.accepted_states(), authority.accepted_states());
    }
}
