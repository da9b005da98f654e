//! Lattice geometry — triangular node layout, slot addressing, and the
//! mapping between lattice coordinates and physical positions.
//!
//! Nodes sit on a staggered triangular lattice: odd rows are shifted half
//! a cell to the right, giving every interior node six equidistant
//! neighbors. Rows are packed into a flat plane of `columns` slots each;
//! a row only uses the slots matching its own parity, so addressing stays
//! uniform-stride without variable-length rows.

use serde::{Deserialize, Serialize};

use crate::error::MeshError;

/// √3 to f32 precision; the lattice row pitch is (√3/2) · resolution.
const SQRT_3: f32 = 1.732_050_8;

/// Physical description of a membrane patch. The three lengths share one
/// unit; the simulation itself is unit-agnostic.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MeshProperties {
    /// Membrane width.
    pub width: f32,
    /// Membrane height.
    pub height: f32,
    /// Distance between neighboring junctions.
    pub resolution: f32,
}

impl MeshProperties {
    pub fn new(width: f32, height: f32, resolution: f32) -> Self {
        Self { width, height, resolution }
    }

    fn is_valid(&self) -> bool {
        self.width > 0.0
            && self.width.is_finite()
            && self.height > 0.0
            && self.height.is_finite()
            && self.resolution > 0.0
            && self.resolution.is_finite()
    }
}

/// Lattice coordinate of one junction: row index plus the column index
/// within that row's own parity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Node {
    pub row: usize,
    pub col: usize,
}

/// One of the six branch directions at a junction, in bit order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    NorthEast = 0,
    East = 1,
    SouthEast = 2,
    SouthWest = 3,
    West = 4,
    NorthWest = 5,
}

impl Direction {
    /// All six directions in bit order.
    pub const ALL: [Direction; 6] = [
        Direction::NorthEast,
        Direction::East,
        Direction::SouthEast,
        Direction::SouthWest,
        Direction::West,
        Direction::NorthWest,
    ];

    /// Mask bit for this direction in an adjacency mask.
    #[inline]
    pub const fn bit(self) -> u32 {
        1 << self as u32
    }

    /// Plane index of this direction within a wave buffer.
    #[inline]
    pub const fn plane(self) -> usize {
        self as usize
    }

    /// The direction a wave sent from here arrives from at the neighbor.
    /// Opposite pairs sit three places apart in bit order.
    #[inline]
    pub const fn reciprocal(self) -> Direction {
        match self {
            Direction::NorthEast => Direction::SouthWest,
            Direction::East => Direction::West,
            Direction::SouthEast => Direction::NorthWest,
            Direction::SouthWest => Direction::NorthEast,
            Direction::West => Direction::East,
            Direction::NorthWest => Direction::SouthEast,
        }
    }

    /// Row step toward the neighbor. North is the +y side.
    #[inline]
    pub const fn row_step(self) -> isize {
        match self {
            Direction::NorthEast | Direction::NorthWest => 1,
            Direction::East | Direction::West => 0,
            Direction::SouthEast | Direction::SouthWest => -1,
        }
    }

    /// Step toward the neighbor in half-resolution slot units.
    #[inline]
    pub const fn slot_step(self) -> isize {
        match self {
            Direction::NorthEast | Direction::SouthEast => 1,
            Direction::East => 2,
            Direction::SouthWest | Direction::NorthWest => -1,
            Direction::West => -2,
        }
    }

    /// Physical (dx, dy) offset to the neighbor at the given resolution.
    pub fn offset(self, resolution: f32) -> (f32, f32) {
        let dx = self.slot_step() as f32 * resolution * 0.5;
        let dy = self.row_step() as f32 * resolution * SQRT_3 * 0.5;
        (dx, dy)
    }
}

/// Derived lattice geometry for one set of membrane properties: dimension
/// counts, slot addressing, and the node/position mapping.
#[derive(Debug, Clone, Copy)]
pub struct LatticeLayout {
    columns: usize,
    rows: usize,
    resolution: f32,
}

impl LatticeLayout {
    /// Derive the lattice for the given properties.
    ///
    /// The column count is forced odd and the row count even so the
    /// staggered rows close consistently at both mesh edges.
    pub fn new(props: &MeshProperties) -> Result<Self, MeshError> {
        if !props.is_valid() {
            return Err(MeshError::InvalidProperties {
                width: props.width,
                height: props.height,
                resolution: props.resolution,
            });
        }
        let mut columns = (2.0 * props.width / props.resolution).ceil() as usize;
        if columns % 2 == 0 {
            columns += 1;
        }
        let mut rows = (2.0 * props.height / (SQRT_3 * props.resolution)).ceil() as usize;
        if rows % 2 == 1 {
            rows += 1;
        }
        Ok(Self { columns, rows, resolution: props.resolution })
    }

    #[inline]
    pub fn columns(&self) -> usize {
        self.columns
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn resolution(&self) -> f32 {
        self.resolution
    }

    /// Total slot count, padding slots of the opposite parity included.
    #[inline]
    pub fn total_slots(&self) -> usize {
        self.columns * self.rows
    }

    /// Vertical distance between adjacent rows.
    #[inline]
    pub fn row_height(&self) -> f32 {
        self.resolution * SQRT_3 * 0.5
    }

    /// Number of valid nodes in the given row. Odd rows hold one fewer.
    #[inline]
    pub fn cols_in_row(&self, row: usize) -> usize {
        if row % 2 == 0 { self.columns / 2 + 1 } else { self.columns / 2 }
    }

    /// Flat slot index of a node. Each row reserves two slots per column
    /// and uses the one matching its own parity.
    #[inline]
    pub fn slot(&self, node: Node) -> usize {
        node.row * self.columns + 2 * node.col + (node.row & 1)
    }

    /// Physical position of a node. Odd rows sit half a cell to the right.
    pub fn node_position(&self, node: Node) -> (f32, f32) {
        let x = node.col as f32 * self.resolution
            + (node.row & 1) as f32 * self.resolution * 0.5;
        let y = node.row as f32 * self.row_height();
        (x, y)
    }

    /// Nearest node to a physical position, or `None` outside the lattice.
    ///
    /// Quantizes in half-resolution slot units; the final shift truncates
    /// the slot to the column of the row's own parity, the exact inverse
    /// of the slot addressing above.
    pub fn node_at_position(&self, x: f32, y: f32) -> Option<Node> {
        let row = (y / self.row_height()).round();
        let slot = (2.0 * x / self.resolution).round();
        if !row.is_finite() || !slot.is_finite() || row < 0.0 || slot < 0.0 {
            return None;
        }
        let (row, slot) = (row as usize, slot as usize);
        if row >= self.rows || slot >= self.columns {
            return None;
        }
        let node = Node { row, col: slot >> 1 };
        if node.col >= self.cols_in_row(row) {
            return None;
        }
        Some(node)
    }

    /// Neighbor of `node` in the given direction, or `None` when the step
    /// leaves the lattice.
    pub fn neighbor(&self, node: Node, dir: Direction) -> Option<Node> {
        let row = node.row as isize + dir.row_step();
        let slot = (2 * node.col + (node.row & 1)) as isize + dir.slot_step();
        if row < 0 || row >= self.rows as isize || slot < 0 || slot >= self.columns as isize {
            return None;
        }
        Some(Node { row: row as usize, col: (slot >> 1) as usize })
    }

    /// Signed flat-slot offset of a step in the given direction.
    #[inline]
    pub fn slot_delta(&self, dir: Direction) -> isize {
        dir.row_step() * self.columns as isize + dir.slot_step()
    }

    /// All valid nodes in processing order (row-major).
    pub fn nodes(&self) -> impl Iterator<Item = Node> + '_ {
        (0..self.rows)
            .flat_map(move |row| (0..self.cols_in_row(row)).map(move |col| Node { row, col }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn anchor_layout() -> LatticeLayout {
        LatticeLayout::new(&MeshProperties::new(54.9, 27.5, 5.0)).unwrap()
    }

    #[test]
    fn derived_dimensions_for_reference_membrane() {
        let layout = anchor_layout();
        assert_eq!(layout.columns(), 23);
        assert_eq!(layout.rows(), 8);
        assert_eq!(layout.total_slots(), 184);
        assert_eq!(layout.cols_in_row(0), 12);
        assert_eq!(layout.cols_in_row(1), 11);
    }

    #[test]
    fn dimension_parity_is_forced() {
        for (w, h, r) in [(10.0, 10.0, 5.0), (25.0, 13.0, 1.0), (100.0, 3.0, 7.0), (1.0, 1.0, 0.4)] {
            let layout = LatticeLayout::new(&MeshProperties::new(w, h, r)).unwrap();
            assert_eq!(layout.columns() % 2, 1, "columns must be odd for {w}x{h}@{r}");
            assert_eq!(layout.rows() % 2, 0, "rows must be even for {w}x{h}@{r}");
        }
    }

    #[test]
    fn degenerate_properties_are_rejected() {
        for props in [
            MeshProperties::new(0.0, 10.0, 1.0),
            MeshProperties::new(10.0, -1.0, 1.0),
            MeshProperties::new(10.0, 10.0, 0.0),
            MeshProperties::new(f32::NAN, 10.0, 1.0),
            MeshProperties::new(10.0, f32::INFINITY, 1.0),
        ] {
            assert!(matches!(
                LatticeLayout::new(&props),
                Err(MeshError::InvalidProperties { .. })
            ));
        }
    }

    #[test]
    fn position_quantizes_to_reference_node() {
        let layout = anchor_layout();
        assert_eq!(layout.node_at_position(23.5, 19.1), Some(Node { row: 4, col: 4 }));
        assert_eq!(layout.node_at_position(0.0, 0.0), Some(Node { row: 0, col: 0 }));
        // Membrane center lands mid-row on an odd row.
        assert_eq!(layout.node_at_position(27.45, 13.75), Some(Node { row: 3, col: 5 }));
    }

    #[test]
    fn positions_outside_the_lattice_resolve_to_none() {
        let layout = anchor_layout();
        assert_eq!(layout.node_at_position(-40.0, 0.0), None);
        assert_eq!(layout.node_at_position(0.0, -10.0), None);
        assert_eq!(layout.node_at_position(500.0, 0.0), None);
        assert_eq!(layout.node_at_position(0.0, 500.0), None);
        assert_eq!(layout.node_at_position(f32::NAN, 0.0), None);
    }

    #[test]
    fn node_positions_round_trip() {
        let layout = anchor_layout();
        for node in layout.nodes() {
            let (x, y) = layout.node_position(node);
            assert_eq!(
                layout.node_at_position(x, y),
                Some(node),
                "round trip failed for {node:?} at ({x}, {y})"
            );
        }
    }

    #[test]
    fn odd_rows_are_offset_by_half_a_cell() {
        let layout = anchor_layout();
        let (x0, y0) = layout.node_position(Node { row: 0, col: 1 });
        let (x1, y1) = layout.node_position(Node { row: 1, col: 1 });
        assert!((x0 - 5.0).abs() < 1e-6);
        assert!((x1 - 7.5).abs() < 1e-6);
        assert!((y0 - 0.0).abs() < 1e-6);
        assert!((y1 - layout.row_height()).abs() < 1e-6);
    }

    #[test]
    fn slots_are_unique_and_in_range() {
        let layout = anchor_layout();
        let mut seen = vec![false; layout.total_slots()];
        for node in layout.nodes() {
            let slot = layout.slot(node);
            assert!(slot < layout.total_slots());
            assert!(!seen[slot], "slot {slot} assigned twice");
            seen[slot] = true;
        }
    }

    #[test]
    fn neighbor_steps_match_slot_deltas() {
        let layout = anchor_layout();
        for node in layout.nodes() {
            for dir in Direction::ALL {
                if let Some(other) = layout.neighbor(node, dir) {
                    let expected = layout.slot(node) as isize + layout.slot_delta(dir);
                    assert_eq!(layout.slot(other) as isize, expected);
                }
            }
        }
    }

    #[test]
    fn neighbor_relation_is_reciprocal() {
        let layout = anchor_layout();
        for node in layout.nodes() {
            for dir in Direction::ALL {
                if let Some(other) = layout.neighbor(node, dir) {
                    assert_eq!(
                        layout.neighbor(other, dir.reciprocal()),
                        Some(node),
                        "stepping {dir:?} from {node:?} then back must return"
                    );
                }
            }
        }
    }

    #[test]
    fn neighbor_offsets_are_equidistant() {
        let resolution = 5.0;
        for dir in Direction::ALL {
            let (dx, dy) = dir.offset(resolution);
            let dist = (dx * dx + dy * dy).sqrt();
            assert!(
                (dist - resolution).abs() < 1e-4,
                "{dir:?} neighbor should sit one resolution away, got {dist}"
            );
        }
    }

    #[test]
    fn reciprocal_pairs_oppose() {
        for dir in Direction::ALL {
            assert_eq!(dir.reciprocal().reciprocal(), dir);
            let (dx, dy) = dir.offset(1.0);
            let (rx, ry) = dir.reciprocal().offset(1.0);
            assert!((dx + rx).abs() < 1e-7 && (dy + ry).abs() < 1e-7);
        }
    }
}
