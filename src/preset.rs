//! Drum preset types for the JSON drum description format.
//!
//! A preset captures everything needed to rebuild a playable drum:
//! membrane size and shape, lattice resolution, damping, and the two
//! tap positions. `DrumPreset::build` turns one into a running
//! `TriangularMesh`.

use serde::{Deserialize, Serialize};

use crate::error::PresetError;
use crate::geometry;
use crate::mesh::{MeshMemory, MeshProperties, TriangularMesh};

// ── Preset Descriptor (top-level) ───────────────────────────

/// Top-level drum descriptor. Each preset file contains one of these.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrumPreset {
    /// Unique identifier (e.g., "snare-13").
    pub id: String,
    /// Human-readable name (e.g., "13-inch Snare").
    pub name: String,
    /// Membrane geometry and lattice resolution.
    pub membrane: MembraneConfig,
    /// Per-sample damping in [0, 1); 0 keeps the drum ringing forever.
    #[serde(default)]
    pub damping: f32,
    /// Strike position; defaults to a shape-dependent spot when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strike: Option<TapPoint>,
    /// Pickup position; defaults to a shape-dependent spot when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pickup: Option<TapPoint>,
}

/// Membrane geometry of a drum.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MembraneConfig {
    /// Membrane width.
    pub width: f32,
    /// Membrane height.
    pub height: f32,
    /// Distance between neighboring junctions.
    pub resolution: f32,
    /// Outline of the playing surface.
    #[serde(default)]
    pub shape: MembraneShape,
}

/// Membrane outlines. A circle is inscribed in the width/height box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MembraneShape {
    #[default]
    Rectangle,
    Circle,
}

/// A physical position on the membrane.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TapPoint {
    pub x: f32,
    pub y: f32,
}

// ── Building ────────────────────────────────────────────────

impl DrumPreset {
    /// Parse a preset from its JSON form.
    pub fn from_json(json: &str) -> Result<Self, PresetError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize this preset to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, PresetError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Build a playable mesh from this preset, allocating its state.
    pub fn build(&self) -> Result<TriangularMesh, PresetError> {
        let props = MeshProperties::new(
            self.membrane.width,
            self.membrane.height,
            self.membrane.resolution,
        );
        let memory = MeshMemory::allocate(&props)?;
        let mut mesh = TriangularMesh::new(props, memory)?;

        let (default_strike, default_pickup) = match self.membrane.shape {
            MembraneShape::Rectangle => {
                ((self.membrane.width * 0.5, self.membrane.height * 0.5), (0.0, 0.0))
            }
            MembraneShape::Circle => {
                let radius = self.membrane.width.min(self.membrane.height) * 0.5;
                mesh.apply_mask(geometry::circular_membrane(radius));
                ((radius, radius), (radius * 0.5, radius * 0.5))
            }
        };
        mesh.set_attenuation(self.damping)?;

        let (x, y) = self.strike.map_or(default_strike, |tap| (tap.x, tap.y));
        mesh.set_source(x, y)?;
        let (x, y) = self.pickup.map_or(default_pickup, |tap| (tap.x, tap.y));
        mesh.set_pickup(x, y)?;
        Ok(mesh)
    }
}

impl Default for DrumPreset {
    fn default() -> Self {
        Self {
            id: "practice-pad".to_string(),
            name: "Practice Pad".to_string(),
            membrane: MembraneConfig {
                width: 250.0,
                height: 180.0,
                resolution: 8.0,
                shape: MembraneShape::Rectangle,
            },
            damping: 0.02,
            strike: None,
            pickup: None,
        }
    }
}

// ── Tests ───────────────────────────────────────────────────
