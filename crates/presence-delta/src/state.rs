//! `DeltaState`: the reduced, delta-mode replica state.

use presence_clock::{Clock, Cloud, Context, Replica, Tag};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Pending-additions map: every tag in here is guaranteed (by invariant) to
/// also appear in `cloud`.
pub type Values<O, T, K, M> = HashMap<Tag, (O, T, K, M)>;

/// A reduced replica-state accumulated between gossip rounds.
///
/// `range` brackets the clocks this delta covers per replica: `range.0` is
/// the context as of the delta's creation, `range.1` is the context as of
/// its most recent local mutation (or merge, for a delta produced by
/// `merge_deltas`).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DeltaState<O, T, K, M> {
    pub replica: Replica,
    pub values: Values<O, T, K, M>,
    pub cloud: Cloud,
    pub range: (Context, Context),
}

impl<O, T, K, M> DeltaState<O, T, K, M> {
    /// A fresh delta for `replica`, covering nothing beyond the replica's
    /// current clock. This is both the constructor used when a
    /// `ReplicaState` is first created and the result of `reset_delta`.
    pub fn fresh(replica: impl Into<Replica>, self_clock: Clock) -> Self {
        let replica = replica.into();
        let mut ctx = Context::new();
        ctx.set(replica.clone(), self_clock);
        Self {
            replica,
            values: HashMap::new(),
            cloud: Cloud::new(),
            range: (ctx.clone(), ctx),
        }
    }

    /// True iff this delta carries any pending add or observed-remove.
    pub fn has_delta(&self) -> bool {
        !self.cloud.is_empty()
    }

    /// `|cloud| + |values|` — adds plus observed-removes.
    pub fn size(&self) -> usize {
        self.cloud.len() + self.values.len()
    }

    /// Record a local add: bump `range.1[self]`, and insert the tag into
    /// both `cloud` and `values`. Called by `presence-engine::join`.
    pub fn record_add(&mut self, tag: Tag, payload: (O, T, K, M)) {
        self.range.1.set(tag.replica.clone(), tag.clock);
        self.cloud.insert(tag.clone());
        self.values.insert(tag, payload);
    }

    /// Record a local observed-remove: bump `range.1[self]`, drop the tag
    /// from `values` (it never lived there for a remote removal, but might
    /// for a local add-then-remove within the same delta window), and
    /// ensure it is present in `cloud`. Called by `presence-engine::leave`.
    pub fn record_remove(&mut self, tag: Tag, self_clock: Clock) {
        self.range.1.set(self.replica.clone(), self_clock);
        self.values.remove(&tag);
        self.cloud.insert(tag);
    }
}
