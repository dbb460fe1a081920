//! The one declared failure mode of this engine.
//!
//! `ReplicaState` (this crate) and `DeltaState` (`presence-delta`) are
//! distinct types rather than one type with a mode flag, so both contract
//! violations a mode-flagged design would have to reject at runtime —
//! calling a mutating operation on a delta-mode state, or `merge_deltas` on
//! a normal-mode one — are ruled out by the type system instead:
//! `ReplicaState` has no `merge_deltas` method and `DeltaState` has no
//! `join`. There is nothing left for a `WrongMode` variant to report, so
//! `EngineError` is just this crate's name for `presence-delta`'s own
//! error, re-exported under this path so a caller depending only on
//! `presence-engine` doesn't need a second crate for the one error this
//! family of crates can return.

pub use presence_delta::MergeDeltasError as EngineError;
