//! Builder for constructing state machine nodes.

use crate::builder::error::BuildError;
use crate::core::{StateRegistry, StateTag};
use crate::diagnostics::{DebugConfig, DiagnosticsSink, NoopSink};
use crate::protocol::message::InstanceId;
use crate::protocol::{Role, StateMachineNode};
use std::sync::Arc;

/// Builder for constructing nodes with a fluent API.
///
/// Initial state, at least one accepted state, and the role are required;
/// everything else has defaults (fresh instance id, "entity" as the
/// entity name, debugging off, discarding sink).
pub struct NodeBuilder<S: StateTag> {
    initial: Option<S>,
    accepted: Vec<S>,
    role: Option<Role>,
    entity_name: String,
    instance: Option<InstanceId>,
    debug: DebugConfig,
    sink: Option<Arc<dyn DiagnosticsSink>>,
}

impl<S: StateTag> NodeBuilder<S> {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            initial: None,
            accepted: Vec::new(),
            role: None,
            entity_name: "entity".to_string(),
            instance: None,
            debug: DebugConfig::default(),
            sink: None,
        }
    }

    /// Set the initial state (required).
    pub fn initial(mut self, state: S) -> Self {
        self.initial = Some(state);
        self
    }

    /// Add one accepted state.
    pub fn accept(mut self, state: S) -> Self {
        self.accepted.push(state);
        self
    }

    /// Add multiple accepted states at once.
    pub fn accept_all(mut self, states: impl IntoIterator<Item = S>) -> Self {
        self.accepted.extend(states);
        self
    }

    /// Set the protocol role (required).
    pub fn role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    /// Name of the hosting entity, used in diagnostic lines.
    pub fn entity_name(mut self, name: impl Into<String>) -> Self {
        self.entity_name = name.into();
        self
    }

    /// Share an existing instance id instead of generating one.
    ///
    /// Mirrors must carry the same instance id as their authority or
    /// every broadcast will be dropped as foreign.
    pub fn instance(mut self, instance: InstanceId) -> Self {
        self.instance = Some(instance);
        self
    }

    /// Enable diagnostic output on the given channel key.
    pub fn debug(mut self, channel_key: i8) -> Self {
        self.debug = DebugConfig {
            enabled: true,
            channel_key,
        };
        self
    }

    /// Inject a diagnostics sink. Defaults to a discarding sink.
    pub fn sink(mut self, sink: Arc<dyn DiagnosticsSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Build the node.
    /// Returns an error if required fields are missing.
    pub fn build(self) -> Result<StateMachineNode<S>, BuildError> {
        let initial = self.initial.ok_or(BuildError::MissingInitialState)?;
        let role = self.role.ok_or(BuildError::MissingRole)?;

        if self.accepted.is_empty() {
            return Err(BuildError::NoAcceptedStates);
        }

        Ok(StateMachineNode::new(
            self.instance.unwrap_or_default(),
            role,
            self.entity_name,
            StateRegistry::new(initial, self.accepted),
            self.debug,
            self.sink.unwrap_or_else(|| Arc::new(NoopSink)),
        ))
    }
}

impl<S: StateTag> Default for NodeBuilder<S> {
    fn default() -> Self {
        Self::new()
    }
}
