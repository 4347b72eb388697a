//! Broad phase pair enumeration

use super::Aabb;
use crate::physics::components::BodyHandle;

/// Entry for broad phase collision detection
#[derive(Debug, Clone, Copy)]
pub struct BroadPhaseEntry {
    pub handle: BodyHandle,
    pub aabb: Aabb,
}

/// Candidate pairs plus the number of pair tests spent finding them
#[derive(Debug, Default)]
pub struct BroadPhaseResult {
    /// Index pairs `(i, j)` with `i < j`, in entry order
    pub pairs: Vec<(usize, usize)>,
    pub pairs_tested: usize,
}

/// O(n²) broad phase over every unordered pair
///
/// Pairs come out ordered by `(i, j)`, which keeps contact resolution
/// deterministic for a given insertion order.
pub fn brute_force_pairs(entries: &[BroadPhaseEntry]) -> BroadPhaseResult {
    let mut result = BroadPhaseResult::default();

    for i in 0..entries.len() {
        for j in (i + 1)..entries.len() {
            result.pairs_tested += 1;
            if entries[i].aabb.overlaps(&entries[j].aabb) {
                result.pairs.push((i, j));
            }
        }
    }

    result
}
