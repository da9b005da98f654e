//! Triangular waveguide mesh — lattice geometry, membrane masking,
//! state storage, and the scattering engine.

pub mod engine;
pub mod lattice;
pub mod mask;
pub mod store;

pub use engine::TriangularMesh;
pub use lattice::{Direction, LatticeLayout, MeshProperties, Node};
pub use mask::build_mask;
pub use store::{MeshMemory, MeshState, Planes, required_bytes};
