//! Delta <-> delta merging: batches several gossip rounds into one envelope
//! without touching any authoritative value store.

use crate::error::MergeDeltasError;
use crate::state::DeltaState;
use presence_clock::{context::is_in, Context};
use std::collections::HashMap;

/// Stitch two deltas together, or reject if they leave an observable gap.
///
/// Requires `local.range.1` (local's end context) to dominate-or-equal
/// `remote.range.0` (remote's start context) — otherwise there is a clock
/// this replica family has not seen between the two deltas, and the merge
/// is refused rather than silently skipping it.
pub fn merge_deltas<O, T, K, M>(
    local: &DeltaState<O, T, K, M>,
    remote: &DeltaState<O, T, K, M>,
) -> Result<DeltaState<O, T, K, M>, MergeDeltasError>
where
    O: Clone,
    T: Clone,
    K: Clone,
    M: Clone,
{
    let local_end = &local.range.1;
    let remote_start = &remote.range.0;

    if !Context::dominates_or_equal(local_end, remote_start) {
        let offending = remote_start
            .iter()
            .find(|(replica, &clock)| local_end.get(replica) < clock)
            .map(|(replica, _)| replica.clone())
            .unwrap_or_else(|| remote.replica.clone());
        return Err(MergeDeltasError::NotContiguous { replica: offending });
    }

    let new_start = Context::lowerbound(&local.range.0, &remote.range.0);
    let new_end = Context::upperbound(&local.range.1, &remote.range.1);
    let new_cloud = local.cloud.union(&remote.cloud).cloned().collect();

    let mut new_values = HashMap::new();
    for (tag, payload) in local.values.iter() {
        let observed_removed_by_remote =
            !remote.values.contains_key(tag) && is_in(&remote.range.1, &remote.cloud, tag);
        if !observed_removed_by_remote {
            new_values.insert(tag.clone(), payload.clone());
        }
    }
    for (tag, payload) in remote.values.iter() {
        let present_locally = local.values.contains_key(tag);
        let known_to_local_delta = is_in(&local.range.1, &local.cloud, tag);
        if !present_locally && !known_to_local_delta {
            new_values.insert(tag.clone(), payload.clone());
        }
    }

    Ok(DeltaState {
        replica: local.replica.clone(),
        values: new_values,
        cloud: new_cloud,
        range: (new_start, new_end),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use presence_clock::Tag;

    type TestDelta = DeltaState<String, String, String, ()>;

    fn payload() -> (String, String, String, ()) {
        ("owner".into(), "topic".into(), "key".into(), ())
    }

    #[test]
    fn contiguous_deltas_merge_and_union_their_clouds() {
        let mut d1: TestDelta = DeltaState::fresh("r1", 0);
        d1.record_add(Tag::new("r1", 1), payload());
        d1.record_add(Tag::new("r1", 2), payload());

        let mut d2: TestDelta = DeltaState::fresh("r1", 2);
        d2.record_add(Tag::new("r1", 3), payload());

        let merged = merge_deltas(&d1, &d2).expect("contiguous ranges must merge");
        assert_eq!(merged.range.0.get("r1"), 0);
        assert_eq!(merged.range.1.get("r1"), 3);
        assert_eq!(merged.values.len(), 3);
        assert_eq!(merged.cloud.len(), 3);
    }

    #[test]
    fn non_contiguous_deltas_are_rejected() {
        let mut d1: TestDelta = DeltaState::fresh("r1", 0);
        d1.record_add(Tag::new("r1", 1), payload());
        d1.record_add(Tag::new("r1", 2), payload());
        d1.record_add(Tag::new("r1", 3), payload());
        // d1 covers clocks 1..=3, range end is {r1: 3}

        let mut d2: TestDelta = DeltaState::fresh("r1", 4);
        d2.range.0.set("r1", 5);
        d2.record_add(Tag::new("r1", 6), payload());
        d2.record_add(Tag::new("r1", 7), payload());
        // d2 starts at {r1: 5}, a gap at clock 4

        let result = merge_deltas(&d1, &d2);
        assert_eq!(
            result,
            Err(MergeDeltasError::NotContiguous {
                replica: "r1".to_string()
            })
        );
    }

    #[test]
    fn remote_observed_remove_drops_local_value() {
        let mut d1: TestDelta = DeltaState::fresh("r1", 0);
        let tag = Tag::new("r1", 1);
        d1.record_add(tag.clone(), payload());

        let mut d2: TestDelta = DeltaState::fresh("r1", 1);
        // remote has observed the removal of (r1,1): it's in cloud, not in values.
        d2.cloud.insert(tag.clone());
        d2.range.1.set("r1", 1);

        let merged = merge_deltas(&d1, &d2).unwrap();
        assert!(!merged.values.contains_key(&tag));
        assert!(merged.cloud.contains(&tag));
    }
}
