//! Region cycling

use fos_dom::{Document, NodeId, ShadowTraversal};

/// Index of the region containing `active`, across shadow boundaries
pub fn region_index(doc: &Document, regions: &[NodeId], active: Option<NodeId>) -> Option<usize> {
    let active = active?;
    regions
        .iter()
        .position(|&region| doc.contains_composed(region, active))
}

/// Next region index with wraparound; `None` when there are no regions
///
/// Without a current region, forward starts at the first region and
/// reverse at the last.
pub fn adjacent_index(current: Option<usize>, count: usize, reverse: bool) -> Option<usize> {
    let last = count.checked_sub(1)?;
    let next = match (current, reverse) {
        (None, false) => 0,
        (Some(index), false) if index >= last => 0,
        (Some(index), false) => index + 1,
        (None | Some(0), true) => last,
        (Some(index), true) => (index - 1).min(last),
    };
    Some(next)
}
