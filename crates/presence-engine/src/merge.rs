// File: `crates/presence-engine/src/merge.rs`
//! Merge engine: full<->full and delta->full merge both funnel through one
//! reconciliation routine, since the only difference between them is what
//! stands in for "the remote's causal context" (an explicit `Context` for a
//! full snapshot, `range.1` for a delta — exactly the convention
//! `presence_delta::merge_deltas` already uses).

use presence_clock::{context::is_in, Cloud, Context, Tag};
use presence_delta::DeltaState;
use presence_store::Element;
use std::collections::HashMap;
use std::hash::Hash;

use crate::snapshot::Snapshot;
use crate::state::ReplicaState;

impl<O, T, K, M> ReplicaState<O, T, K, M>
where
    O: Clone + Eq + Hash,
    T: Clone + Eq + Hash,
    K: Clone + PartialEq,
    M: Clone,
{
    /// Full merge against a remote's extracted `(snapshot, values)` pair.
    /// Returns the elements that joined and left as a result.
    pub fn merge(
        &mut self,
        remote: &Snapshot,
        remote_values: &HashMap<Tag, (O, T, K, M)>,
    ) -> (Vec<Element<O, T, K, M>>, Vec<Element<O, T, K, M>>) {
        self.reconcile(&remote.context, &remote.cloud, remote_values)
    }

    /// Delta -> full merge: identical reconciliation, treating the delta's
    /// `range.1` as the remote's causal upper bound. A `DeltaState` has no
    /// standalone `context` field; `range.1` is what it has instead, and
    /// `is_in` doesn't care which one it's handed.
    pub fn merge_delta(
        &mut self,
        delta: &DeltaState<O, T, K, M>,
    ) -> (Vec<Element<O, T, K, M>>, Vec<Element<O, T, K, M>>) {
        self.reconcile(&delta.range.1, &delta.cloud, &delta.values)
    }

    fn reconcile(
        &mut self,
        remote_context: &Context,
        remote_cloud: &Cloud,
        remote_values: &HashMap<Tag, (O, T, K, M)>,
    ) -> (Vec<Element<O, T, K, M>>, Vec<Element<O, T, K, M>>) {
        // Step 2: leaves and carry-overs. An element survives unless the
        // remote has causally observed its tag but no longer lists it.
        let mut leaves = Vec::new();
        let mut dropped = Cloud::new();
        for element in self.store.all_elements() {
            let ((owner, topic), ((_key, _meta), tag)) = element.clone();
            let observed_removed =
                is_in(remote_context, remote_cloud, &tag) && !remote_values.contains_key(&tag);
            if observed_removed {
                self.store.remove_tag(&owner, &topic, &tag);
                self.delta.cloud.insert(tag.clone());
                self.delta.values.remove(&tag);
                dropped.insert(tag);
                leaves.push(element);
            }
        }

        // Step 1: joins. Anything the remote has that we didn't already
        // know about (by context or cloud) is new.
        let mut joins = Vec::new();
        for (tag, (owner, topic, key, meta)) in remote_values.iter() {
            if !is_in(&self.context, &self.cloud, tag) {
                self.store.insert(
                    owner.clone(),
                    topic.clone(),
                    key.clone(),
                    meta.clone(),
                    tag.clone(),
                );
                joins.push((
                    (owner.clone(), topic.clone()),
                    ((key.clone(), meta.clone()), tag.clone()),
                ));
            }
        }

        // Steps 4-6: merge clouds (minus what just left), advance the
        // context, compact.
        let mut merged_cloud: Cloud = self.cloud.union(remote_cloud).cloned().collect();
        for tag in &dropped {
            merged_cloud.remove(tag);
        }
        let merged_context = Context::upperbound(&self.context, remote_context);
        let (context, cloud) = presence_compaction::compact(&merged_context, &merged_cloud);

        tracing::debug!(
            replica = %self.replica,
            joins = joins.len(),
            leaves = leaves.len(),
            cloud_before = merged_cloud.len(),
            cloud_after = cloud.len(),
            "merge"
        );

        self.context = context;
        self.cloud = cloud;

        (joins, leaves)
    }
}
