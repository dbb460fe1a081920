// File: `crates/presence-engine/src/state.rs`
//! `ReplicaState`: the assembled full replica state.
//!
//! Holds the causal context/cloud, the indexed value store, the replica
//! membership map, and the embedded delta buffer that accumulates local
//! changes between gossip rounds. Merge lives in `crate::merge` — this
//! module is local mutation, queries, membership, and `extract`.

use presence_clock::{Cloud, Context, Replica, Tag};
use presence_delta::DeltaState;
use presence_store::{Element, ValueStore};
use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use crate::membership::Membership;
use crate::snapshot::Snapshot;

/// A full (non-delta) replica state. `O`/`T`/`K`/`M` are the owner, topic,
/// key and metadata types — opaque to this engine beyond the
/// equality/hashing it needs to index and compare them.
#[derive(Clone, Debug)]
pub struct ReplicaState<O, T, K, M>
where
    O: Clone + Eq + Hash,
    T: Clone + Eq + Hash,
{
    pub replica: Replica,
    pub context: Context,
    pub cloud: Cloud,
    pub store: ValueStore<O, T, K, M>,
    pub replicas: HashMap<Replica, Membership>,
    pub delta: DeltaState<O, T, K, M>,
}

impl<O, T, K, M> ReplicaState<O, T, K, M>
where
    O: Clone + Eq + Hash,
    T: Clone + Eq + Hash,
    K: Clone + PartialEq,
    M: Clone,
{
    /// A fresh state for `replica`: empty store, empty context/cloud, and
    /// `replica` marked `Up` in its own membership map.
    pub fn new(replica: impl Into<Replica>) -> Self {
        let replica = replica.into();
        let mut replicas = HashMap::new();
        replicas.insert(replica.clone(), Membership::Up);
        Self {
            delta: DeltaState::fresh(replica.clone(), 0),
            replica,
            context: Context::new(),
            cloud: Cloud::new(),
            store: ValueStore::new(),
            replicas,
        }
    }

    /// `(self, context)` — the causal summary exposed for anti-entropy.
    pub fn clocks(&self) -> (Replica, Context) {
        (self.replica.clone(), self.context.clone())
    }

    /// `join`: bump the local clock, stamp a new tag, insert the element
    /// into the store, and record the add in the delta buffer.
    pub fn join(&mut self, owner: O, topic: T, key: K, meta: M) -> Element<O, T, K, M> {
        let clock = self.context.bump(&self.replica);
        let tag = Tag::new(self.replica.clone(), clock);
        self.cloud.insert(tag.clone());
        self.store
            .insert(owner.clone(), topic.clone(), key.clone(), meta.clone(), tag.clone());
        self.delta
            .record_add(tag.clone(), (owner.clone(), topic.clone(), key.clone(), meta.clone()));

        tracing::trace!(replica = %self.replica, clock, "join");
        ((owner, topic), ((key, meta), tag))
    }

    /// `leave(owner, topic, key)`: drop every element matching the triple
    /// and observed-remove their tags.
    pub fn leave_by_key(&mut self, owner: &O, topic: &T, key: &K) -> Vec<Element<O, T, K, M>> {
        let removed = self.store.remove_by_owner_topic_key(owner, topic, key);
        self.record_leaves(&removed);
        removed
    }

    /// `leave(owner)`: drop every element for `owner`, across all topics
    /// and keys.
    pub fn leave_by_owner(&mut self, owner: &O) -> Vec<Element<O, T, K, M>> {
        let removed = self.store.remove_by_owner(owner);
        self.record_leaves(&removed);
        removed
    }

    /// Strip the removed tags out of `cloud`, mark them as observed-removes
    /// in the delta buffer, and bump the local clock once for the whole
    /// call — a batch removal is one causal event, not one per element.
    fn record_leaves(&mut self, removed: &[Element<O, T, K, M>]) {
        if removed.is_empty() {
            return;
        }
        for (_, (_, tag)) in removed {
            self.cloud.remove(tag);
        }
        let clock = self.context.bump(&self.replica);
        for (_, (_, tag)) in removed {
            self.delta.record_remove(tag.clone(), clock);
        }
        tracing::trace!(replica = %self.replica, removed = removed.len(), clock, "leave");
    }

    fn up_replicas(&self) -> HashSet<Replica> {
        self.replicas
            .iter()
            .filter(|(_, membership)| membership.is_up())
            .map(|(replica, _)| replica.clone())
            .collect()
    }

    /// `online_list`: every element whose tag's replica is currently `Up`,
    /// evaluated against membership at call time.
    pub fn online_list(&self) -> Vec<Element<O, T, K, M>> {
        self.store.online_list(&self.up_replicas())
    }

    /// `get_by_topic`, restricted to currently-`Up` replicas.
    pub fn get_by_topic(&self, topic: &T) -> Vec<Element<O, T, K, M>> {
        self.store.get_by_topic(topic, &self.up_replicas())
    }

    /// `get_by_owner`: ignores up/down membership entirely.
    pub fn get_by_owner(
        &self,
        owner: &O,
        topic: Option<&T>,
        key: Option<&K>,
    ) -> Vec<Element<O, T, K, M>> {
        self.store.get_by_owner(owner, topic, key)
    }

    /// True iff the delta buffer carries any pending add or observed-remove.
    pub fn has_delta(&self) -> bool {
        self.delta.has_delta()
    }

    /// `reset_delta`: replace the delta buffer with a fresh one covering
    /// nothing beyond the current local clock.
    pub fn reset_delta(&mut self) {
        let self_clock = self.context.get(&self.replica);
        self.delta = DeltaState::fresh(self.replica.clone(), self_clock);
    }

    /// `replica_up`: mark `replica` up and return every element it
    /// contributed as a joins list. The store is never mutated by a
    /// membership transition.
    pub fn replica_up(&mut self, replica: &str) -> Vec<Element<O, T, K, M>> {
        self.replicas.insert(replica.to_string(), Membership::Up);
        let only: HashSet<Replica> = std::iter::once(replica.to_string()).collect();
        let elements = self.store.online_list(&only);
        tracing::debug!(replica, elements = elements.len(), "replica up");
        elements
    }

    /// `replica_down`: mark `replica` down and return its elements as a
    /// leaves list.
    pub fn replica_down(&mut self, replica: &str) -> Vec<Element<O, T, K, M>> {
        self.replicas.insert(replica.to_string(), Membership::Down);
        let only: HashSet<Replica> = std::iter::once(replica.to_string()).collect();
        let elements = self.store.online_list(&only);
        tracing::debug!(replica, elements = elements.len(), "replica down");
        elements
    }

    /// `remove_down_replicas`: hard eviction. Deletes every element of
    /// `replica` and purges every trace of it from context, cloud, delta,
    /// and membership (Open Question 1 — see `DESIGN.md`).
    pub fn remove_down_replicas(&mut self, replica: &str) {
        let removed = self.store.remove_by_replica(replica);
        self.context.remove(replica);
        self.cloud.retain(|tag| tag.replica != replica);
        self.delta.cloud.retain(|tag| tag.replica != replica);
        self.delta.values.retain(|tag, _| tag.replica != replica);
        self.delta.range.0.remove(replica);
        self.delta.range.1.remove(replica);
        self.replicas.remove(replica);
        tracing::debug!(replica, evicted = removed.len(), "remove_down_replicas");
    }

    /// `extract`: flatten the store into a tag->payload map and hand back a
    /// delta-free causal snapshot. Callers serialise `(snapshot, map)` for
    /// full-state gossip; the delta buffer never travels this way.
    pub fn extract(&self) -> (Snapshot, HashMap<Tag, (O, T, K, M)>) {
        let snapshot = Snapshot {
            replica: self.replica.clone(),
            context: self.context.clone(),
            cloud: self.cloud.clone(),
        };
        let values = self
            .store
            .all_elements()
            .into_iter()
            .map(|((owner, topic), ((key, meta), tag))| (tag, (owner, topic, key, meta)))
            .collect();
        (snapshot, values)
    }
}
