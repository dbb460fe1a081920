//! `Tag`: the unique `(Replica, Clock)` label stamped onto every add event.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Opaque identifier for a peer replica. Equality and hashing are all the
/// causal algebra needs; we use `String` the way the rest of this codebase
/// identifies replicas (see `mdcs-delta::ReplicaId`).
pub type Replica = String;

/// A replica-scoped monotonically increasing logical clock. Clocks start
/// at 1; `0` means "nothing observed yet" and is never assigned to a tag.
pub type Clock = u64;

/// A set of tags known but not yet folded into a `Context` (see `Context`'s
/// docs for why a cloud exists at all).
pub type Cloud = HashSet<Tag>;

/// Uniquely identifies one add event: the replica that produced it and the
/// clock value it bumped to.
///
/// `Ord` is derived lexicographically on `(replica, clock)`; compaction
/// relies on iterating tags in this order.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Tag {
    pub replica: Replica,
    pub clock: Clock,
}

impl Tag {
    pub fn new(replica: impl Into<Replica>, clock: Clock) -> Self {
        Self {
            replica: replica.into(),
            clock,
        }
    }
}
