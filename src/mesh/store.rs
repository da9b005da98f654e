//! Mesh state store — caller-allocated wave planes with role-flagged
//! double buffering.
//!
//! All per-node state lives in flat planes indexed by lattice slot:
//! two six-plane traveling-wave buffers that alternate the current/next
//! roles every sample, one junction-velocity plane, and one `u32`
//! adjacency-mask plane. Sizing is settled once, up front; the sample
//! path never allocates or re-validates.

use crate::error::MeshError;

use super::lattice::{LatticeLayout, MeshProperties};

/// Wave planes per buffer: one per branch direction.
pub const WAVE_PLANES: usize = 6;

/// Planes accounted per slot: two wave buffers, junction velocity, mask.
pub const PLANES_PER_SLOT: usize = 2 * WAVE_PLANES + 2;

/// Bytes of state a mesh with the given properties needs.
///
/// Pure sizing query for the caller-side allocation; the engine itself
/// never allocates after construction.
pub fn required_bytes(props: &MeshProperties) -> Result<usize, MeshError> {
    let layout = LatticeLayout::new(props)?;
    Ok(layout.total_slots() * PLANES_PER_SLOT * std::mem::size_of::<f32>())
}

/// Caller-allocated backing store for one mesh: thirteen `f32` planes
/// (two six-plane wave buffers plus junction velocity) and one `u32`
/// mask plane.
#[derive(Debug, Clone)]
pub struct MeshMemory {
    cells: Vec<f32>,
    mask: Vec<u32>,
}

impl MeshMemory {
    /// Allocate zeroed storage sized for the given properties.
    pub fn allocate(props: &MeshProperties) -> Result<Self, MeshError> {
        let layout = LatticeLayout::new(props)?;
        Ok(Self::with_slots(layout.total_slots()))
    }

    /// Allocate zeroed storage for an explicit slot count.
    pub fn with_slots(slots: usize) -> Self {
        Self {
            cells: vec![0.0; (PLANES_PER_SLOT - 1) * slots],
            mask: vec![0; slots],
        }
    }

    /// Total bytes held, as accounted by `required_bytes`.
    pub fn bytes(&self) -> usize {
        self.cells.len() * std::mem::size_of::<f32>()
            + self.mask.len() * std::mem::size_of::<u32>()
    }
}

/// Mutable plane views for one processing sweep.
pub struct Planes<'a> {
    pub current: &'a mut [f32],
    pub next: &'a mut [f32],
    pub junction: &'a mut [f32],
    pub mask: &'a [u32],
}

/// Runtime partition of the store: typed plane regions plus the flag
/// assigning the current/next roles to the two wave buffers.
#[derive(Debug, Clone)]
pub struct MeshState {
    cells: Vec<f32>,
    mask: Vec<u32>,
    slots: usize,
    current_is_b: bool,
}

impl MeshState {
    /// Adopt a memory region for a mesh with the given layout.
    ///
    /// The region may be larger than required; only the accounted planes
    /// are used. Undersized regions are rejected here, once; the sample
    /// path never re-checks.
    pub fn adopt(layout: &LatticeLayout, memory: MeshMemory) -> Result<Self, MeshError> {
        let slots = layout.total_slots();
        let float_len = (PLANES_PER_SLOT - 1) * slots;
        if memory.cells.len() < float_len || memory.mask.len() < slots {
            return Err(MeshError::MemoryTooSmall {
                required: slots * PLANES_PER_SLOT * std::mem::size_of::<f32>(),
                provided: memory.bytes(),
            });
        }
        let MeshMemory { mut cells, mut mask } = memory;
        cells.truncate(float_len);
        mask.truncate(slots);
        Ok(Self { cells, mask, slots, current_is_b: false })
    }

    #[inline]
    pub fn slots(&self) -> usize {
        self.slots
    }

    /// Zero every wave and velocity value and return the buffer roles to
    /// their initial assignment. The mask plane is left untouched.
    pub fn reset(&mut self) {
        self.cells.fill(0.0);
        self.current_is_b = false;
    }

    /// Junction velocity plane.
    #[inline]
    pub fn junction(&self) -> &[f32] {
        &self.cells[2 * WAVE_PLANES * self.slots..]
    }

    /// Adjacency mask plane.
    #[inline]
    pub fn mask(&self) -> &[u32] {
        &self.mask
    }

    #[inline]
    pub fn mask_mut(&mut self) -> &mut [u32] {
        &mut self.mask
    }

    /// Split the store into disjoint plane views for one sample sweep.
    #[inline]
    pub fn planes(&mut self) -> Planes<'_> {
        let wave_len = WAVE_PLANES * self.slots;
        let (waves, junction) = self.cells.split_at_mut(2 * wave_len);
        let (a, b) = waves.split_at_mut(wave_len);
        let (current, next) = if self.current_is_b { (b, a) } else { (a, b) };
        Planes { current, next, junction, mask: &self.mask }
    }

    /// Swap the current/next roles; call exactly once after a full sweep.
    #[inline]
    pub fn swap(&mut self) {
        self.current_is_b = !self.current_is_b;
    }
}
