//! Core state machine types.
//!
//! This module contains the pure data layer of the replicated machine:
//! - Tag definitions via the `StateTag` trait
//! - Static per-instance configuration in `StateRegistry`
//! - Ordered observer lists backing the notification channels
//!
//! Nothing here touches the network or mutates outside its own value;
//! replication and execution live in `protocol` and `runtime`.

mod observers;
mod registry;
mod tag;

pub use observers::{ObserverId, ObserverList, TickObserverList};
pub use registry::StateRegistry;
pub use tag::{Label, StateTag};
