//! Core StateTag trait for replicated state machine states.
//!
//! Every state a machine can occupy is named by a tag. Tags are opaque to
//! the core: the only structure it relies on is exact equality. The
//! taxonomy that gives tags hierarchical meaning ("Combat.Attacking" being
//! a child of "Combat") lives with the integrator.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fmt::Debug;

/// Trait for state machine tags.
///
/// Tags are immutable values naming a position in a state machine. The
/// core compares them only for exact equality; it never inspects their
/// internal structure.
///
/// # Required Traits
///
/// - `Clone`: tags travel in wire messages and notifications
/// - `PartialEq`: exact-match comparison drives transition validation
/// - `Debug`: tags must be debuggable for diagnostics
/// - `Serialize` + `DeserializeOwned`: tags cross the replication channel
///
/// # Example
///
/// ```rust
/// use replistate::core::StateTag;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
/// enum CombatState {
///     Idle,
///     Attacking,
///     Dead,
/// }
///
/// impl StateTag for CombatState {
///     fn name(&self) -> &str {
///         match self {
///             Self::Idle => "Idle",
///             Self::Attacking => "Combat.Attacking",
///             Self::Dead => "Combat.Dead",
///         }
///     }
/// }
/// ```
pub trait StateTag: Clone + PartialEq + Debug + Serialize + DeserializeOwned + Send + Sync {
    /// Get the tag's name for display/logging.
    ///
    /// Returns a string reference for zero-cost naming. Dotted names are
    /// conventional for hierarchical taxonomies but carry no meaning here.
    fn name(&self) -> &str;
}

/// A ready-made tag backed by a dotted string path.
///
/// For integrations that source their taxonomy from data (config files,
/// editor assets) rather than a Rust enum.
///
/// # Example
///
/// ```rust
/// use replistate::core::{Label, StateTag};
///
/// let tag = Label::new("Combat.Attacking");
/// assert_eq!(tag.name(), "Combat.Attacking");
/// assert_eq!(tag, Label::new("Combat.Attacking"));
/// assert_ne!(tag, Label::new("Combat"));
/// ```
#[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct Label(String);

impl Label {
    /// Create a label from a dotted path.
    pub fn new(path: impl Into<String>) -> Self {
        Label(path.into())
    }

    /// The full dotted path.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl StateTag for Label {
    fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
