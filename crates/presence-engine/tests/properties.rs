//! Property-based coverage of convergence (P1), idempotence (P2), monotone
//! joins (P3), local clock monotonicity (P6), and delta range tracking
//! (P7). Observed-remove (P4) and compactness (P5) are covered by the
//! concrete-scenario and compaction-crate property suites respectively;
//! `merge_deltas` contiguity (P8) is exercised in `presence-delta`'s own
//! test suite.

use presence_engine::ReplicaState;
use proptest::prelude::*;

type State = ReplicaState<String, String, String, ()>;

#[derive(Clone, Debug)]
enum Op {
    Join(String),
    Leave(String),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        "[a-c]".prop_map(Op::Join),
        "[a-c]".prop_map(Op::Leave),
    ]
}

fn apply(state: &mut State, owner: &str, op: &Op) {
    match op {
        Op::Join(key) => {
            state.join(owner.to_string(), "lobby".to_string(), key.clone(), ());
        }
        Op::Leave(key) => {
            state.leave_by_key(&owner.to_string(), &"lobby".to_string(), key);
        }
    }
}

fn sorted_keys(state: &State) -> Vec<(String, String, String)> {
    let mut elements: Vec<_> = state
        .online_list()
        .into_iter()
        .map(|((owner, topic), ((key, _), _))| (owner, topic, key))
        .collect();
    elements.sort();
    elements
}

proptest! {
    /// P6: a replica's own clock never decreases across any local
    /// operation, join or leave alike.
    #[test]
    fn local_clock_never_decreases(ops in prop::collection::vec(op_strategy(), 0..30)) {
        let mut s: State = ReplicaState::new("r1");
        let mut last = 0u64;
        for op in &ops {
            apply(&mut s, "proc-1", op);
            let now = s.context.get("r1");
            prop_assert!(now >= last);
            last = now;
        }
    }

    /// P7: `reset_delta` yields range.start == range.end == context|self,
    /// and every following local op keeps range.end[self] in lockstep with
    /// the context.
    #[test]
    fn delta_range_end_tracks_local_clock(ops in prop::collection::vec(op_strategy(), 0..20)) {
        let mut s: State = ReplicaState::new("r1");
        for op in &ops {
            apply(&mut s, "proc-1", op);
        }
        s.reset_delta();
        prop_assert_eq!(s.delta.range.0.get("r1"), s.context.get("r1"));
        prop_assert_eq!(s.delta.range.1.get("r1"), s.context.get("r1"));

        for op in &ops {
            apply(&mut s, "proc-1", op);
            prop_assert_eq!(s.delta.range.1.get("r1"), s.context.get("r1"));
        }
    }

    /// P2: merging a replica's own extraction back into itself changes
    /// nothing observable — no joins, no leaves, same live elements.
    #[test]
    fn self_merge_is_idempotent(ops in prop::collection::vec(op_strategy(), 0..20)) {
        let mut s: State = ReplicaState::new("r1");
        for op in &ops {
            apply(&mut s, "proc-1", op);
        }
        let before = sorted_keys(&s);
        let (snapshot, values) = s.extract();
        let (joins, leaves) = s.merge(&snapshot, &values);

        prop_assert!(joins.is_empty());
        prop_assert!(leaves.is_empty());
        prop_assert_eq!(sorted_keys(&s), before);
    }

    /// P3: once a tag is known locally, re-presenting it in a later merge
    /// never reports it as a join again.
    #[test]
    fn known_tags_never_rejoin(ops in prop::collection::vec(op_strategy(), 1..15)) {
        let mut a: State = ReplicaState::new("r1");
        for op in &ops {
            apply(&mut a, "proc-1", op);
        }
        let mut b: State = ReplicaState::new("r2");
        let (snapshot, values) = a.extract();
        let (first_joins, _) = b.merge(&snapshot, &values);

        // Merging the exact same snapshot again must not re-report any of
        // the tags it already learned the first time.
        let (second_joins, _) = b.merge(&snapshot, &values);
        prop_assert!(second_joins.is_empty());
        // `b` started empty, so its first merge must have learned every
        // live tag `a` had to offer.
        prop_assert_eq!(first_joins.len(), values.len());
    }

    /// P1 (convergence): independent join/leave histories on two replicas,
    /// exchanged once in both directions, leave both sides with the same
    /// live set regardless of which side's extraction is computed first.
    #[test]
    fn mutual_merge_converges(
        ops_a in prop::collection::vec(op_strategy(), 0..15),
        ops_b in prop::collection::vec(op_strategy(), 0..15),
    ) {
        let mut a: State = ReplicaState::new("r1");
        for op in &ops_a {
            apply(&mut a, "proc-a", op);
        }
        let mut b: State = ReplicaState::new("r2");
        for op in &ops_b {
            apply(&mut b, "proc-b", op);
        }

        let (snap_a, values_a) = a.extract();
        let (snap_b, values_b) = b.extract();

        a.merge(&snap_b, &values_b);
        b.merge(&snap_a, &values_a);

        prop_assert_eq!(sorted_keys(&a), sorted_keys(&b));
    }
}
