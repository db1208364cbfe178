//! Domain invariants for ordered collections

use super::entities::{OrderIndex, OrderedRecord};
use std::collections::HashSet;

/// INVARIANT-1: Contiguous Order
/// For N records the order_index values are exactly {0..N-1}.
pub fn invariant_contiguous<P>(records: &[OrderedRecord<P>]) -> bool {
    let mut indices: Vec<OrderIndex> = records.iter().map(|r| r.order_index).collect();
    indices.sort_unstable();
    indices
        .iter()
        .enumerate()
        .all(|(pos, idx)| *idx as usize == pos)
}

/// INVARIANT-2: Unique Identity
/// No id appears twice in a collection.
pub fn invariant_unique_ids<P>(records: &[OrderedRecord<P>]) -> bool {
    let mut seen = HashSet::with_capacity(records.len());
    records.iter().all(|r| seen.insert(r.id))
}

/// Check all invariants
pub fn check_all_invariants<P>(records: &[OrderedRecord<P>]) -> bool {
    invariant_contiguous(records) && invariant_unique_ids(records)
}
