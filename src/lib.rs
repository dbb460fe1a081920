// File: `src/lib.rs`
//! Presence CRDT: an Observed-Remove Set Without Tombstones (ORSWOT) over
//! `(owner, topic, key, meta)` membership tuples, extended with per-replica
//! delta summaries for anti-entropy gossip.
//!
//! This root crate is a thin re-export of [`presence_engine`], the way the
//! root crate aggregates its workspace members behind one surface. The
//! actual algebra lives in the workspace members:
//!
//! - [`presence_clock`] — causal clocks, contexts, the tag cloud.
//! - [`presence_store`] — the indexed value store.
//! - [`presence_compaction`] — folding the cloud into the context.
//! - [`presence_delta`] — the delta buffer and delta<->delta merging.
//! - [`presence_engine`] — the assembled [`ReplicaState`] and its merge
//!   engine.
//!
//! Transport, persistence, and CLI/configuration are deliberately not part
//! of this crate family; a host owns one [`ReplicaState`] per presence
//! shard, serialises what [`ReplicaState::extract`] hands back (or a
//! [`DeltaState`]) for gossip, and feeds inbound payloads back through
//! [`ReplicaState::merge`]/[`ReplicaState::merge_delta`].

pub use presence_clock::{self, Clock, Cloud, Context, Replica, Tag};
pub use presence_compaction;
pub use presence_delta::{self, merge_deltas, DeltaState, MergeDeltasError};
pub use presence_engine::{self, EngineError, Membership, ReplicaState, Snapshot};
pub use presence_store::{self, Element, ValueStore};
