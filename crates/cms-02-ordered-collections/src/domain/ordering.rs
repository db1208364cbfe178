//! Ordering arithmetic.
//!
//! Pure functions that compute positions. They never touch a store; the
//! service reads current state, asks these functions for a plan and writes
//! the plan back in one atomic store call.

use shared_types::RecordId;
use std::collections::HashSet;

use super::entities::{OrderAssignment, OrderIndex};
use super::errors::ReorderMismatch;

/// Position for a record appended after `current_max` (0 for an empty collection).
pub fn next_order_index(current_max: Option<OrderIndex>) -> OrderIndex {
    current_max.map(|max| max.saturating_add(1)).unwrap_or(0)
}

/// Assign each requested id its 0-based position.
///
/// `current` is the collection's id set. The request must be an exact
/// permutation of it: a repeated id, an id from elsewhere or a missing id
/// rejects the whole plan.
pub fn plan_reorder(
    current: &[RecordId],
    requested: &[RecordId],
) -> Result<Vec<OrderAssignment>, ReorderMismatch> {
    let known: HashSet<RecordId> = current.iter().copied().collect();
    let mut seen: HashSet<RecordId> = HashSet::with_capacity(requested.len());

    for id in requested {
        if !known.contains(id) {
            return Err(ReorderMismatch::UnknownId(*id));
        }
        if !seen.insert(*id) {
            return Err(ReorderMismatch::DuplicateId(*id));
        }
    }

    if seen.len() != known.len() {
        let missing = current.iter().filter(|id| !seen.contains(id)).count();
        return Err(ReorderMismatch::MissingIds { count: missing });
    }

    Ok(positions(requested))
}

/// Renumber survivors `0, 1, 2…` keeping their relative order.
///
/// `survivors` may arrive in any order; they are sorted by their existing
/// index first.
pub fn plan_compaction(survivors: &[(RecordId, OrderIndex)]) -> Vec<OrderAssignment> {
    let mut sorted: Vec<(RecordId, OrderIndex)> = survivors.to_vec();
    sorted.sort_by_key(|(_, index)| *index);
    let ids: Vec<RecordId> = sorted.into_iter().map(|(id, _)| id).collect();
    positions(&ids)
}

/// Assignments from `plan` that actually move a record.
pub fn moved_assignments(
    current: &[(RecordId, OrderIndex)],
    plan: Vec<OrderAssignment>,
) -> Vec<OrderAssignment> {
    plan.into_iter()
        .filter(|a| {
            !current
                .iter()
                .any(|(id, idx)| *id == a.id && *idx == a.order_index)
        })
        .collect()
}

/// Number of assignments that differ from the current positions.
pub fn changed_count(
    current: &[(RecordId, OrderIndex)],
    plan: &[OrderAssignment],
) -> usize {
    moved_assignments(current, plan.to_vec()).len()
}

fn positions(ids: &[RecordId]) -> Vec<OrderAssignment> {
    ids.iter()
        .enumerate()
        .map(|(i, id)| OrderAssignment::new(*id, i as OrderIndex))
        .collect()
}
