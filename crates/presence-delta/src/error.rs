//! The one declared failure mode of delta merging.

use presence_clock::Replica;
use thiserror::Error;

/// Returned by `merge_deltas` when the two delta ranges cannot be safely
/// stitched together — merging would leave an observable gap in the
/// replica's history.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MergeDeltasError {
    #[error("delta ranges are not contiguous: local range end does not dominate remote range start for replica {replica}")]
    NotContiguous { replica: Replica },
}
