//! Waveguide mesh engine — per-sample scattering over the triangular
//! lattice.
//!
//! Each junction carries one traveling-wave value per connected branch.
//! A sample sweep computes every junction velocity from its incoming
//! waves, derives the outgoing wave per branch, and delays it one sample
//! into the reciprocal branch of the neighbor. The excitation enters the
//! source junction as an extra branch with no return path, and the
//! output is the pickup junction's velocity. Construction settles all
//! sizing and validation; the sample path allocates nothing.

use crate::error::MeshError;
use crate::geometry;

use super::lattice::{Direction, LatticeLayout, MeshProperties, Node};
use super::mask::build_mask;
use super::store::{MeshMemory, MeshState, Planes};

/// A rectangular-lattice waveguide mesh with a masked membrane region,
/// one source tap, and one pickup tap.
#[derive(Debug, Clone)]
pub struct TriangularMesh {
    props: MeshProperties,
    layout: LatticeLayout,
    state: MeshState,
    source: Node,
    pickup: Node,
    source_slot: usize,
    pickup_slot: usize,
    alpha: f32,
}

impl TriangularMesh {
    /// Build a mesh over the given membrane properties, adopting the
    /// provided backing store.
    ///
    /// The membrane starts rectangular and lossless, with the source at
    /// the center and the pickup at the origin corner. Properties too
    /// coarse to yield any connected junction are rejected here.
    pub fn new(props: MeshProperties, memory: MeshMemory) -> Result<Self, MeshError> {
        let layout = LatticeLayout::new(&props)?;
        let state = MeshState::adopt(&layout, memory)?;
        let mut mesh = Self {
            props,
            layout,
            state,
            source: Node { row: 0, col: 0 },
            pickup: Node { row: 0, col: 0 },
            source_slot: 0,
            pickup_slot: 0,
            alpha: 1.0,
        };
        mesh.apply_mask(geometry::rectangular_membrane(props.width, props.height));
        mesh.set_source(props.width * 0.5, props.height * 0.5)?;
        mesh.set_pickup(0.0, 0.0)?;
        Ok(mesh)
    }

    /// Rebuild the adjacency mask from a membrane predicate and clear
    /// all wave state.
    ///
    /// Taps are left where they were; if the new membrane no longer
    /// covers them, excitation and output go inert until they are moved
    /// onto active junctions again.
    pub fn apply_mask<F: Fn(f32, f32) -> bool>(&mut self, membrane: F) {
        let layout = self.layout;
        build_mask(&layout, membrane, self.state.mask_mut());
        self.state.reset();
    }

    /// Move the excitation tap to the active junction nearest (x, y).
    pub fn set_source(&mut self, x: f32, y: f32) -> Result<(), MeshError> {
        let node = self.active_node_at(x, y)?;
        self.source = node;
        self.source_slot = self.layout.slot(node);
        Ok(())
    }

    /// Move the output tap to the active junction nearest (x, y).
    pub fn set_pickup(&mut self, x: f32, y: f32) -> Result<(), MeshError> {
        let node = self.active_node_at(x, y)?;
        self.pickup = node;
        self.pickup_slot = self.layout.slot(node);
        Ok(())
    }

    /// Set the per-sample loss, where `mu` is the fraction of junction
    /// velocity removed each sweep. Zero keeps the mesh lossless.
    pub fn set_attenuation(&mut self, mu: f32) -> Result<(), MeshError> {
        if !(0.0..1.0).contains(&mu) {
            return Err(MeshError::AttenuationOutOfRange { mu });
        }
        self.alpha = 1.0 - mu;
        Ok(())
    }

    /// Check that both taps still sit on active junctions of the current
    /// membrane.
    pub fn validate_taps(&self) -> Result<(), MeshError> {
        for node in [self.source, self.pickup] {
            if self.state.mask()[self.layout.slot(node)] == 0 {
                let (x, y) = self.layout.node_position(node);
                return Err(MeshError::OutsideMembrane { x, y });
            }
        }
        Ok(())
    }

    /// Zero all wave state, leaving membrane, taps, and loss in place.
    pub fn reset(&mut self) {
        self.state.reset();
    }

    /// Advance the mesh one sample and return the pickup velocity.
    ///
    /// `Some(value)` drives the source junction through its excitation
    /// branch for this sample; `None` lets the mesh ring freely.
    pub fn process_sample(&mut self, excitation: Option<f32>) -> f32 {
        let layout = self.layout;
        let slots = self.state.slots();
        let alpha = self.alpha;
        let source_slot = self.source_slot;
        let pickup_slot = self.pickup_slot;
        let input = excitation.unwrap_or(0.0);
        let drive = excitation.is_some();
        let mut output = 0.0;
        {
            let Planes { current, next, junction, mask } = self.state.planes();
            for row in 0..layout.rows() {
                for col in 0..layout.cols_in_row(row) {
                    let slot = layout.slot(Node { row, col });
                    let bits = mask[slot];
                    if bits == 0 {
                        continue;
                    }
                    let mut sum = 0.0;
                    for dir in Direction::ALL {
                        if bits & dir.bit() != 0 {
                            sum += current[dir.plane() * slots + slot];
                        }
                    }
                    let mut ports = bits.count_ones() as f32;
                    if drive && slot == source_slot {
                        sum += input;
                        ports += 1.0;
                    }
                    let velocity = sum * (2.0 / ports) * alpha;
                    junction[slot] = velocity;
                    for dir in Direction::ALL {
                        if bits & dir.bit() == 0 {
                            continue;
                        }
                        let idx = dir.plane() * slots + slot;
                        let outgoing = velocity - current[idx];
                        current[idx] = outgoing;
                        // Mask construction guarantees the neighbor slot
                        // exists whenever the bit is set.
                        let neighbor = (slot as isize + layout.slot_delta(dir)) as usize;
                        next[dir.reciprocal().plane() * slots + neighbor] = outgoing;
                    }
                    if slot == pickup_slot {
                        output = velocity;
                    }
                }
            }
        }
        self.state.swap();
        output
    }

    /// Fill `out` with consecutive samples, driving the source from
    /// `excitation` while it lasts.
    pub fn process_block(&mut self, excitation: Option<&[f32]>, out: &mut [f32]) {
        match excitation {
            Some(input) => {
                for (i, sample) in out.iter_mut().enumerate() {
                    *sample = self.process_sample(input.get(i).copied());
                }
            }
            None => {
                for sample in out.iter_mut() {
                    *sample = self.process_sample(None);
                }
            }
        }
    }

    pub fn properties(&self) -> &MeshProperties {
        &self.props
    }

    pub fn layout(&self) -> &LatticeLayout {
        &self.layout
    }

    pub fn source(&self) -> Node {
        self.source
    }

    pub fn pickup(&self) -> Node {
        self.pickup
    }

    /// Current loss factor applied to every junction velocity.
    pub fn attenuation(&self) -> f32 {
        self.alpha
    }

    /// Junction velocity of a node as of the last processed sample.
    pub fn junction_velocity(&self, node: Node) -> f32 {
        self.state.junction()[self.layout.slot(node)]
    }

    /// Adjacency bits of a node; zero means outside the membrane.
    pub fn mask_bits(&self, node: Node) -> u32 {
        self.state.mask()[self.layout.slot(node)]
    }

    pub fn node_position(&self, node: Node) -> (f32, f32) {
        self.layout.node_position(node)
    }

    pub fn node_at_position(&self, x: f32, y: f32) -> Option<Node> {
        self.layout.node_at_position(x, y)
    }

    pub fn nodes(&self) -> impl Iterator<Item = Node> + '_ {
        self.layout.nodes()
    }

    fn active_node_at(&self, x: f32, y: f32) -> Result<Node, MeshError> {
        let node = self
            .layout
            .node_at_position(x, y)
            .ok_or(MeshError::OutsideLattice { x, y })?;
        if self.state.mask()[self.layout.slot(node)] == 0 {
            return Err(MeshError::OutsideMembrane { x, y });
        }
        Ok(node)
    }
}
