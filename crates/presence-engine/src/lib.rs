// File: `crates/presence-engine/src/lib.rs`
//! Assembled replica state and merge engine for the presence CRDT tracker.
//!
//! This crate ties the four leaf crates together into the single mutable
//! structure a host owns one of per presence shard:
//!
//! - `presence-clock` for the causal clock algebra (`Tag`, `Context`, the
//!   `in?` predicate);
//! - `presence-store` for the indexed multimap of live elements;
//! - `presence-compaction` for folding the cloud into the context after
//!   every merge;
//! - `presence-delta` for the delta buffer and delta<->delta merging.
//!
//! [`ReplicaState`] is the full state: `join`/`leave` mutate it directly,
//! `merge`/`merge_delta` reconcile it against a peer, and `extract` hands a
//! causal snapshot plus flattened value map to the surrounding transport.
//! Replica up/down transitions and hard eviction live here too, since they
//! only make sense once a value store exists to replay or purge from.

pub mod error;
pub mod membership;
mod merge;
pub mod snapshot;
pub mod state;

pub use error::EngineError;
pub use membership::Membership;
pub use presence_clock::{Clock, Cloud, Context, Replica, Tag};
pub use presence_delta::{merge_deltas, DeltaState};
pub use presence_store::Element;
pub use snapshot::Snapshot;
pub use state::ReplicaState;
