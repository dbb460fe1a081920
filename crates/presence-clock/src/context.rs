//! `Context`: per-replica "largest contiguous clock observed" summary.
//!
//! A context is a compact causal history: if `context[r] == c`, every tag
//! `(r, 1..=c)` is known to this replica to be either still present or
//! explicitly removed. Tags that don't fit that contiguous picture yet —
//! because of reordering, loss, or a removal leaving a gap — live in the
//! `Cloud` alongside the context (see `presence-compaction` for how the
//! two are reconciled).

use crate::tag::{Clock, Cloud, Replica, Tag};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Mapping from replica to the highest contiguous clock observed from it.
///
/// Uses a `BTreeMap` (matching this codebase's `VersionVector`) so two
/// contexts with the same entries compare and serialise identically
/// regardless of insertion order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Context {
    entries: BTreeMap<Replica, Clock>,
}

impl Context {
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// A context that knows only about `replica` at clock `0`.
    pub fn for_replica(replica: impl Into<Replica>) -> Self {
        let mut ctx = Self::new();
        ctx.entries.insert(replica.into(), 0);
        ctx
    }

    pub fn get(&self, replica: &str) -> Clock {
        self.entries.get(replica).copied().unwrap_or(0)
    }

    pub fn set(&mut self, replica: impl Into<Replica>, clock: Clock) {
        self.entries.insert(replica.into(), clock);
    }

    /// Bump `replica`'s clock by one and return the new value. Used by
    /// `join`/`leave` to advance the local replica's own clock.
    pub fn bump(&mut self, replica: &str) -> Clock {
        let next = self.get(replica) + 1;
        self.set(replica.to_string(), next);
        next
    }

    /// Drop a replica from the context entirely (used by `remove_down_replicas`).
    pub fn remove(&mut self, replica: &str) {
        self.entries.remove(replica);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Replica, &Clock)> {
        self.entries.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `upperbound(a, b)[r] = max(a[r], b[r])` over the union of replicas.
    pub fn upperbound(a: &Context, b: &Context) -> Context {
        let mut result = a.clone();
        for (replica, &clock) in b.entries.iter() {
            let entry = result.entries.entry(replica.clone()).or_insert(0);
            *entry = (*entry).max(clock);
        }
        result
    }

    /// `lowerbound(a, b)[r] = min(a[r], b[r])` over the *intersection* of
    /// replicas — a replica absent from either side is absent from the
    /// result, not treated as clock `0`.
    pub fn lowerbound(a: &Context, b: &Context) -> Context {
        let mut result = Context::new();
        for (replica, &a_clock) in a.entries.iter() {
            if let Some(&b_clock) = b.entries.get(replica) {
                result.entries.insert(replica.clone(), a_clock.min(b_clock));
            }
        }
        result
    }

    /// `a` dominates-or-equals `b` iff for every replica present in `b`,
    /// `a[r] >= b[r]`. Replicas absent from `b` are vacuously satisfied.
    pub fn dominates_or_equal(a: &Context, b: &Context) -> bool {
        b.entries
            .iter()
            .all(|(replica, &b_clock)| a.get(replica) >= b_clock)
    }
}

/// A tag `(r, c)` is "in" a state iff `context[r] >= c` or the tag is
/// explicitly carried in the cloud.
pub fn is_in(context: &Context, cloud: &Cloud, tag: &Tag) -> bool {
    context.get(&tag.replica) >= tag.clock || cloud.contains(tag)
}
