//! Adjacency mask builder — per-node connectivity from a membrane
//! membership predicate.

use super::lattice::{Direction, LatticeLayout};

/// Fill `mask` with one six-bit adjacency value per slot.
///
/// A node whose own position the predicate rejects gets mask zero and is
/// skipped entirely during processing. Otherwise bit `d` is set iff the
/// neighbor in direction `d` exists inside the lattice and the predicate
/// accepts its position. Built this way the mask is always symmetric: a
/// branch is either open at both ends or closed at both.
pub fn build_mask<F>(layout: &LatticeLayout, membrane: F, mask: &mut [u32])
where
    F: Fn(f32, f32) -> bool,
{
    mask.fill(0);
    for node in layout.nodes() {
        let (x, y) = layout.node_position(node);
        if !membrane(x, y) {
            continue;
        }
        let mut bits = 0u32;
        for dir in Direction::ALL {
            if let Some(other) = layout.neighbor(node, dir) {
                let (nx, ny) = layout.node_position(other);
                if membrane(nx, ny) {
                    bits |= dir.bit();
                }
            }
        }
        mask[layout.slot(node)] = bits;
    }
}
