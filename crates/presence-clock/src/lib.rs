// File: `crates/presence-clock/src/lib.rs`
//! Causal clock algebra: replica-scoped logical clocks, the tag they stamp
//! onto each add event, and the context/cloud pair that together summarise
//! what a replica has observed.
//!
//! This crate has no notion of owners, topics, keys or values — it only
//! knows about `(Replica, Clock)` pairs and how to compare, bound and fold
//! sets of them. The value store and merge engine build on top of it.

pub mod context;
pub mod tag;

pub use context::Context;
pub use tag::{Clock, Cloud, Replica, Tag};
