//! The causal half of `extract`'s output.

use presence_clock::{Cloud, Context, Replica};
use serde::{Deserialize, Serialize};

/// A replica's causal metadata with the indexed value store and delta
/// buffer stripped out — just enough for a peer's merge to compute leaves
/// against. Paired with the separately-extracted tag -> payload map, this
/// is what `extract` hands to callers for full-state gossip.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Snapshot {
    pub replica: Replica,
    pub context: Context,
    pub cloud: Cloud,
}
