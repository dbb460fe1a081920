//! Integration coverage for the concrete delta-merging scenario seeded by
//! this engine's test suite: two deltas separated by a clock gap must be
//! rejected rather than silently stitched.

use presence_clock::Tag;
use presence_delta::{merge_deltas, DeltaState, MergeDeltasError};

type Delta = DeltaState<String, String, String, ()>;

fn payload() -> (String, String, String, ()) {
    ("proc-1".into(), "lobby".into(), "cursor".into(), ())
}

#[test]
fn gap_in_the_same_replicas_clock_is_rejected() {
    let mut d1: Delta = DeltaState::fresh("r1", 0);
    for c in 1..=3 {
        d1.record_add(Tag::new("r1", c), payload());
    }
    assert_eq!(d1.range.1.get("r1"), 3);

    let mut d2: Delta = DeltaState::fresh("r1", 4);
    d2.range.0.set("r1", 5);
    for c in 5..=7 {
        d2.record_add(Tag::new("r1", c), payload());
    }

    match merge_deltas(&d1, &d2) {
        Err(MergeDeltasError::NotContiguous { replica }) => assert_eq!(replica, "r1"),
        other => panic!("expected NotContiguous, got {other:?}"),
    }
}

#[test]
fn back_to_back_deltas_with_no_gap_merge_cleanly() {
    let mut d1: Delta = DeltaState::fresh("r1", 0);
    for c in 1..=3 {
        d1.record_add(Tag::new("r1", c), payload());
    }

    let mut d2: Delta = DeltaState::fresh("r1", 3);
    for c in 4..=5 {
        d2.record_add(Tag::new("r1", c), payload());
    }

    let merged = merge_deltas(&d1, &d2).expect("back-to-back ranges must be contiguous");
    assert_eq!(merged.range.0.get("r1"), 0);
    assert_eq!(merged.range.1.get("r1"), 5);
    assert_eq!(merged.values.len(), 5);
}
