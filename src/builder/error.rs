//! Build errors for node construction.

use thiserror::Error;

/// Errors that can occur when building a state machine node.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Initial state not specified. Call .initial(state) before .build()")]
    MissingInitialState,

    #[error("No accepted states defined. Add at least one with .accept(state)")]
    NoAcceptedStates,

    #[error("Role not specified. Call .role(Role::Authority) or .role(Role::Mirror)")]
    MissingRole,
}
