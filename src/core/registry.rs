//! Static configuration of one state machine instance.
//!
//! A registry is pure data: the initial state and the set of accepted
//! states, fixed at construction and read-only for the life of the
//! instance. All acceptance decisions anywhere in the crate reduce to
//! [`StateRegistry::is_accepted`].

use super::tag::StateTag;
use serde::{Deserialize, Serialize};

/// Immutable configuration of a state machine instance.
///
/// The initial state is implicitly always a legal destination, whether or
/// not it appears in the accepted list. Every replica of an instance holds
/// an identical registry; only the authority consults it for validation.
///
/// # Example
///
/// ```rust
/// use replistate::core::{Label, StateRegistry};
///
/// let registry = StateRegistry::new(
///     Label::new("Idle"),
///     vec![Label::new("Attacking"), Label::new("Dead")],
/// );
///
/// assert!(registry.is_accepted(&Label::new("Attacking")));
/// // Initial state is accepted even though it is not listed.
/// assert!(registry.is_accepted(&Label::new("Idle")));
/// assert!(!registry.is_accepted(&Label::new("Flying")));
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StateRegistry<S: StateTag> {
    initial: S,
    accepted: Vec<S>,
}

impl<S: StateTag> StateRegistry<S> {
    /// Create a registry from an initial state and the accepted states.
    ///
    /// The accepted list is taken as given: order is preserved and
    /// duplicates are harmless (acceptance is a membership test).
    pub fn new(initial: S, accepted: Vec<S>) -> Self {
        Self { initial, accepted }
    }

    /// The state every replica starts in.
    pub fn initial(&self) -> &S {
        &self.initial
    }

    /// Read-only view of the accepted states.
    ///
    /// Does not include the initial state unless it was listed explicitly.
    pub fn accepted(&self) -> &[S] {
        &self.accepted
    }

    /// Whether `tag` is a legal transition destination.
    ///
    /// True if `tag` is in the accepted list or equals the initial state.
    pub fn is_accepted(&self, tag: &S) -> bool {
        self.accepted.contains(tag) || *tag == self.initial
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Label;

    fn combat_registry() -> StateRegistry<Label> {
        StateRegistry::new(
            Label::new("Idle"),
            vec![Label::new("Attacking"), Label::new("Dead")],
        )
    }

    #[test]
    fn listed_states_are_accepted() {
        let registry = combat_registry();
        assert!(registry.is_accepted(&Label::new("Attacking")));
        assert!(registry.is_accepted(&Label::new("Dead")));
    }

    #[test]
    fn unlisted_states_are_rejected() {
        let registry = combat_registry();
        assert!(!registry.is_accepted(&Label::new("Flying")));
        assert!(!registry.is_accepted(&Label::new("")));
    }

    #[test]
    fn initial_state_is_implicitly_accepted() {
        let registry = combat_registry();
        assert!(!registry.accepted().contains(&Label::new("Idle")));
        assert!(registry.is_accepted(&Label::new("Idle")));
    }

    #[test]
    fn accessors_expose_configuration() {
        let registry = combat_registry();
        assert_eq!(registry.initial(), &Label::new("Idle"));
        assert_eq!(
            registry.accepted(),
            &[Label::new("Attacking"), Label::new("Dead")]
        );
    }

    #[test]
    fn registry_roundtrips_through_json() {
        let registry = combat_registry();
        let json = serde_json::to_string(&registry).unwrap();
        let back: StateRegistry<Label> = serde_json::from_str(&json).unwrap();
        assert_eq!(back.initial(), registry.initial());
        assert_eq!(back.accepted(), registry.accepted());
    }
}
