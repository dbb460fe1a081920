use presence_clock::{Cloud, Context, Tag};

/// Fold contiguous runs of `cloud` into `context`, producing a smaller
/// cloud that holds only the tags still non-contiguous with the result.
///
/// Tags are processed in ascending `(replica, clock)` order so that a run
/// like `(r, 1), (r, 2), (r, 3)` absorbs in one pass even though each step
/// only ever looks one clock ahead of the (continually updated) context.
/// This never changes which tags are "in" the state — see
/// `presence_clock::context::is_in` — only how compactly that membership
/// is represented.
pub fn compact(context: &Context, cloud: &Cloud) -> (Context, Cloud) {
    let span = tracing::debug_span!("compact", cloud_before = cloud.len());
    let _enter = span.enter();

    let mut new_context = context.clone();
    let mut sorted: Vec<&Tag> = cloud.iter().collect();
    sorted.sort();

    let mut new_cloud = Cloud::new();
    for tag in sorted {
        let current = new_context.get(&tag.replica);
        if tag.clock <= current {
            // Redundant: already covered by the contiguous context.
            continue;
        } else if tag.clock == current + 1 {
            new_context.set(tag.replica.clone(), tag.clock);
        } else {
            new_cloud.insert(tag.clone());
        }
    }

    tracing::debug!(cloud_after = new_cloud.len(), "compaction complete");
    (new_context, new_cloud)
}
