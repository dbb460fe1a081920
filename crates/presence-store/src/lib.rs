// File: `crates/presence-store/src/lib.rs`
//! Indexed value store: the multimap from `(Owner, Topic)` to
//! `((Key, Meta), Tag)` elements, plus the secondary indices the engine's
//! query and membership operations need to stay O(result size) instead of
//! O(store size).
//!
//! This crate has no notion of merging, clocks, or the cloud — it is pure
//! storage and lookup. `presence-engine` owns the causal semantics; this
//! crate owns getting to the right rows fast.

use presence_clock::{Replica, Tag};
use std::collections::{HashMap, HashSet};
use std::hash::Hash;

/// A full element record: the owner/topic it was joined under, and the
/// key/meta/tag of the add event.
pub type Element<O, T, K, M> = ((O, T), ((K, M), Tag));

/// The indexed multimap described in this engine's design notes: a hash
/// map keyed by `(Owner, Topic)` whose values are small vectors of
/// `((Key, Meta), Tag)`, with secondary indices by replica and by owner to
/// accelerate `online_list`, topic-filtered queries, and hard eviction of a
/// departed replica's elements.
#[derive(Clone, Debug)]
pub struct ValueStore<O, T, K, M>
where
    O: Clone + Eq + Hash,
    T: Clone + Eq + Hash,
{
    by_owner_topic: HashMap<(O, T), Vec<((K, M), Tag)>>,
    by_replica: HashMap<Replica, HashSet<(O, T, Tag)>>,
    by_owner: HashMap<O, HashSet<T>>,
}

impl<O, T, K, M> Default for ValueStore<O, T, K, M>
where
    O: Clone + Eq + Hash,
    T: Clone + Eq + Hash,
{
    fn default() -> Self {
        Self {
            by_owner_topic: HashMap::new(),
            by_replica: HashMap::new(),
            by_owner: HashMap::new(),
        }
    }
}

impl<O, T, K, M> ValueStore<O, T, K, M>
where
    O: Clone + Eq + Hash,
    T: Clone + Eq + Hash,
    K: Clone + PartialEq,
    M: Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.by_owner_topic.values().all(Vec::is_empty)
    }

    pub fn len(&self) -> usize {
        self.by_owner_topic.values().map(Vec::len).sum()
    }

    /// Insert one element, updating every index.
    pub fn insert(&mut self, owner: O, topic: T, key: K, meta: M, tag: Tag) {
        self.by_replica
            .entry(tag.replica.clone())
            .or_default()
            .insert((owner.clone(), topic.clone(), tag.clone()));
        self.by_owner
            .entry(owner.clone())
            .or_default()
            .insert(topic.clone());
        self.by_owner_topic
            .entry((owner, topic))
            .or_default()
            .push(((key, meta), tag));
    }

    /// Remove every element whose `(owner, topic, key)` matches, returning
    /// the removed elements. Used by `leave(owner, topic, key)`.
    pub fn remove_by_owner_topic_key(
        &mut self,
        owner: &O,
        topic: &T,
        key: &K,
    ) -> Vec<Element<O, T, K, M>> {
        self.drain_matching(|o, t| o == owner && t == topic, |k| k == key)
    }

    /// Remove every element for `owner`, across all topics and keys. Used
    /// by `leave(owner)`.
    pub fn remove_by_owner(&mut self, owner: &O) -> Vec<Element<O, T, K, M>> {
        self.drain_matching(|o, _t| o == owner, |_k| true)
    }

    /// Remove every element whose tag belongs to `replica`. Used by
    /// `remove_down_replicas`.
    pub fn remove_by_replica(&mut self, replica: &str) -> Vec<Element<O, T, K, M>> {
        let locations = self.by_replica.remove(replica).unwrap_or_default();
        let mut removed = Vec::with_capacity(locations.len());
        for (owner, topic, tag) in locations {
            if let Some(element) = self.remove_exact(&owner, &topic, &tag) {
                removed.push(element);
            }
        }
        removed
    }

    /// Every element currently in the store, regardless of membership.
    /// Used by the merge engine to find local elements the remote side has
    /// observed-removed.
    pub fn all_elements(&self) -> Vec<Element<O, T, K, M>> {
        self.by_owner_topic
            .iter()
            .flat_map(|((owner, topic), entries)| {
                entries.iter().map(move |((key, meta), tag)| {
                    ((owner.clone(), topic.clone()), ((key.clone(), meta.clone()), tag.clone()))
                })
            })
            .collect()
    }

    /// Remove one exact element by `(owner, topic, tag)`. Public so the
    /// merge engine can drop a carried-over-turned-leave element without
    /// re-deriving its indices.
    pub fn remove_tag(&mut self, owner: &O, topic: &T, tag: &Tag) -> Option<Element<O, T, K, M>> {
        self.remove_exact(owner, topic, tag)
    }

    /// Every element whose tag's replica is in `up_replicas`.
    pub fn online_list(&self, up_replicas: &HashSet<Replica>) -> Vec<Element<O, T, K, M>> {
        up_replicas
            .iter()
            .flat_map(|replica| self.by_replica.get(replica).into_iter().flatten())
            .map(|(owner, topic, tag)| self.rehydrate(owner, topic, tag))
            .collect()
    }

    /// As `online_list`, restricted to one topic.
    pub fn get_by_topic(&self, topic: &T, up_replicas: &HashSet<Replica>) -> Vec<Element<O, T, K, M>> {
        up_replicas
            .iter()
            .flat_map(|replica| self.by_replica.get(replica).into_iter().flatten())
            .filter(|(_owner, t, _tag)| t == topic)
            .map(|(owner, t, tag)| self.rehydrate(owner, t, tag))
            .collect()
    }

    /// Every element for `owner`, ignoring up/down membership, optionally
    /// narrowed to one topic and one key.
    pub fn get_by_owner(
        &self,
        owner: &O,
        topic: Option<&T>,
        key: Option<&K>,
    ) -> Vec<Element<O, T, K, M>> {
        let topics: Vec<T> = match topic {
            Some(t) => vec![t.clone()],
            None => self
                .by_owner
                .get(owner)
                .map(|set| set.iter().cloned().collect())
                .unwrap_or_default(),
        };

        let mut results = Vec::new();
        for t in topics {
            if let Some(entries) = self.by_owner_topic.get(&(owner.clone(), t.clone())) {
                for ((k, m), tag) in entries {
                    if key.map_or(true, |want| want == k) {
                        results.push(((owner.clone(), t.clone()), ((k.clone(), m.clone()), tag.clone())));
                    }
                }
            }
        }
        results
    }

    fn rehydrate(&self, owner: &O, topic: &T, tag: &Tag) -> Element<O, T, K, M> {
        let (key, meta) = self
            .by_owner_topic
            .get(&(owner.clone(), topic.clone()))
            .and_then(|entries| entries.iter().find(|(_, t)| t == tag))
            .map(|(km, _)| km.clone())
            .expect("replica index and primary store must stay in sync");
        ((owner.clone(), topic.clone()), ((key, meta), tag.clone()))
    }

    fn remove_exact(&mut self, owner: &O, topic: &T, tag: &Tag) -> Option<Element<O, T, K, M>> {
        let bucket_key = (owner.clone(), topic.clone());
        let entries = self.by_owner_topic.get_mut(&bucket_key)?;
        let position = entries.iter().position(|(_, t)| t == tag)?;
        let (key_meta, removed_tag) = entries.remove(position);

        if entries.is_empty() {
            self.by_owner_topic.remove(&bucket_key);
            if let Some(topics) = self.by_owner.get_mut(owner) {
                topics.remove(topic);
                if topics.is_empty() {
                    self.by_owner.remove(owner);
                }
            }
        }

        if let Some(locations) = self.by_replica.get_mut(&removed_tag.replica) {
            locations.remove(&(owner.clone(), topic.clone(), removed_tag.clone()));
            if locations.is_empty() {
                self.by_replica.remove(&removed_tag.replica);
            }
        }

        Some(((owner.clone(), topic.clone()), (key_meta, removed_tag)))
    }

    fn drain_matching(
        &mut self,
        owner_topic: impl Fn(&O, &T) -> bool,
        key_matches: impl Fn(&K) -> bool,
    ) -> Vec<Element<O, T, K, M>> {
        let targets: Vec<(O, T, Tag)> = self
            .by_owner_topic
            .iter()
            .filter(|((o, t), _)| owner_topic(o, t))
            .flat_map(|((o, t), entries)| {
                entries
                    .iter()
                    .filter(|((k, _), _)| key_matches(k))
                    .map(move |(_, tag)| (o.clone(), t.clone(), tag.clone()))
            })
            .collect();

        targets
            .into_iter()
            .filter_map(|(owner, topic, tag)| self.remove_exact(&owner, &topic, &tag))
            .collect()
    }
}
