//! Replistate: a replicated finite-state-machine primitive
//!
//! Replistate attaches one state machine to a networked game entity and
//! keeps every copy of it in agreement. One replica is the authority: it
//! alone validates transition requests. Everyone else is a mirror,
//! applying whatever the authority confirms, in the order it confirms it.
//! Rejection is silent by design; the only observable outcome of a bad
//! request is a state that does not change.
//!
//! # Core Concepts
//!
//! - **StateTag**: opaque, equality-compared name of a state, via the
//!   `StateTag` trait
//! - **Authority / Mirror**: explicit roles; validation happens exactly
//!   once, on the authority
//! - **Confirmed transition**: a validated transition broadcast to every
//!   replica, executed as an atomic exit → assign → enter sequence
//! - **Tick gate**: per-tick state logic is suppressed while a transition
//!   is mid-flight
//!
//! # Example
//!
//! ```rust
//! use replistate::builder::NodeBuilder;
//! use replistate::core::Label;
//! use replistate::protocol::Role;
//! use replistate::session::Session;
//!
//! let authority = NodeBuilder::new()
//!     .initial(Label::new("Idle"))
//!     .accept(Label::new("Attacking"))
//!     .accept(Label::new("Dead"))
//!     .role(Role::Authority)
//!     .build()
//!     .unwrap();
//!
//! let mut session = Session::new(authority);
//! let mirror = session.join_mirror("player-view");
//!
//! session.request(Label::new("Attacking"));
//! session.pump();
//!
//! assert_eq!(session.authority().current_state(), &Label::new("Attacking"));
//! assert_eq!(
//!     session.mirror(mirror).unwrap().current_state(),
//!     &Label::new("Attacking"),
//! );
//! ```

pub mod builder;
pub mod core;
pub mod diagnostics;
pub mod protocol;
pub mod runtime;
pub mod session;
pub mod transport;

// Re-export commonly used types
pub use builder::NodeBuilder;
pub use core::{Label, StateRegistry, StateTag};
pub use protocol::message::{InstanceId, ReplicaId};
pub use protocol::{Role, StateMachineNode};
pub use runtime::StateRuntime;
pub use session::Session;
pub use transport::{InMemoryTransport, Transport};
