//! Wire messages exchanged between replicas.
//!
//! Two calls make up the whole protocol: a request travelling up to the
//! authority and a confirmed transition travelling down to every replica.
//! A third message, join-time sync, brings a late mirror up to date.
//! Messages are plain serde values; both a compact binary codec and a
//! human-readable JSON codec are provided for transports to use.

use crate::core::StateTag;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Identity of one machine instance, shared by all of its replicas.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct InstanceId(Uuid);

impl InstanceId {
    /// Generate a fresh id.
    pub fn new() -> Self {
        InstanceId(Uuid::new_v4())
    }
}

impl Default for InstanceId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Identity of one replica endpoint on the transport.
///
/// Distinct from [`InstanceId`]: every replica of the same instance shares
/// the instance id but has its own replica id for message addressing.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct ReplicaId(Uuid);

impl ReplicaId {
    /// Generate a fresh id.
    pub fn new() -> Self {
        ReplicaId(Uuid::new_v4())
    }
}

impl Default for ReplicaId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ReplicaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Replica → authority: ask for a transition.
///
/// Fire and forget. The sender learns the outcome, if any, from the
/// confirmed transition that follows; a rejected request produces nothing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct RequestTransition<S: StateTag> {
    /// Which instance the request targets.
    pub instance: InstanceId,
    /// The desired state.
    pub target: S,
}

/// Authority → every replica: apply a validated transition.
///
/// Carries a per-instance sequence number assigned by the authority.
/// Replicas apply envelopes in seq order and drop any whose seq is not
/// beyond the last applied one, making duplicate delivery harmless.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct ConfirmedTransition<S: StateTag> {
    /// Which instance the transition applies to.
    pub instance: InstanceId,
    /// Position in the authority's total order, starting at 1.
    pub seq: u64,
    /// The confirmed destination state.
    pub target: S,
    /// When the authority issued the confirmation.
    pub issued_at: DateTime<Utc>,
}

/// Authority → one late-joining mirror: converge without replay.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct SyncState<S: StateTag> {
    /// Which instance the snapshot describes.
    pub instance: InstanceId,
    /// Seq of the last confirmed transition folded into `current`.
    pub seq: u64,
    /// The authority's current state.
    pub current: S,
    /// When the authority issued the snapshot.
    pub issued_at: DateTime<Utc>,
}

/// Union of everything a mirror can receive, preserving per-link FIFO
/// order between sync and confirmed transitions.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub enum MirrorBound<S: StateTag> {
    /// A confirmed transition to apply.
    Confirmed(ConfirmedTransition<S>),
    /// A join-time snapshot to converge on.
    Sync(SyncState<S>),
}

/// Errors from the wire codecs.
#[derive(Debug, Error)]
pub enum CodecError {
    /// Serialization to JSON or binary format failed
    #[error("encoding failed: {0}")]
    Encode(String),

    /// Deserialization from JSON or binary format failed
    #[error("decoding failed: {0}")]
    Decode(String),
}

/// Encode a message with the compact binary codec.
pub fn to_binary<T: Serialize>(message: &T) -> Result<Vec<u8>, CodecError> {
    bincode::serialize(message).map_err(|e| CodecError::Encode(e.to_string()))
}

/// Decode a message from the compact binary codec.
pub fn from_binary<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, CodecError> {
    bincode::deserialize(bytes).map_err(|e| CodecError::Decode(e.to_string()))
}

/// Encode a message as JSON, for logs and debug tooling.
pub fn to_json<T: Serialize>(message: &T) -> Result<String, CodecError> {
    serde_json::to_string(message).map_err(|e| CodecError::Encode(e.to_string()))
}

/// Decode a message from JSON.
pub fn from_json<T: DeserializeOwned>(json: &str) -> Result<T, CodecError> {
    serde_json::from_str(json).map_err(|e| CodecError::Decode(e.to_string()))
}
