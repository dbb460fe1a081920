// File: `crates/presence-delta/src/lib.rs`
//! Delta buffer: the reduced per-replica state exchanged between gossip
//! rounds, and the delta<->delta merge discipline that lets several rounds
//! be batched into one envelope before a peer applies them.
//!
//! A `DeltaState` is structurally a cut-down `ReplicaState` (see
//! `presence-engine`): it carries pending adds (`values`), pending adds and
//! observed-removes (`cloud`), and a `range` bracketing which replica clocks
//! it summarises. It has no value store and no membership map — those stay
//! with the full state.

pub mod error;
pub mod merge;
pub mod state;

pub use error::MergeDeltasError;
pub use merge::merge_deltas;
pub use state::DeltaState;
