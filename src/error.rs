use std::fmt;

#[derive(Debug)]
pub enum MeshError {
    InvalidProperties { width: f32, height: f32, resolution: f32 },
    MemoryTooSmall { required: usize, provided: usize },
    OutsideLattice { x: f32, y: f32 },
    OutsideMembrane { x: f32, y: f32 },
    AttenuationOutOfRange { mu: f32 },
}

#[derive(Debug)]
pub enum PresetError {
    Json(serde_json::Error),
    Mesh(MeshError),
}

impl fmt::Display for MeshError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeshError::InvalidProperties { width, height, resolution } => write!(
                f,
                "Invalid mesh properties: width {width}, height {height}, resolution {resolution} (all must be positive and finite)"
            ),
            MeshError::MemoryTooSmall { required, provided } => write!(
                f,
                "Mesh memory too small: {required} bytes required, {provided} provided"
            ),
            MeshError::OutsideLattice { x, y } => {
                write!(f, "Point ({x}, {y}) falls outside the lattice")
            }
            MeshError::OutsideMembrane { x, y } => {
                write!(f, "Point ({x}, {y}) resolves to a node outside the membrane")
            }
            MeshError::AttenuationOutOfRange { mu } => {
                write!(f, "Attenuation {mu} out of range (must satisfy 0 <= mu < 1)")
            }
        }
    }
}

impl std::error::Error for MeshError {}

impl fmt::Display for PresetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PresetError::Json(e) => write!(f, "Preset JSON error: {e}"),
            PresetError::Mesh(e) => write!(f, "Preset mesh error: {e}"),
        }
    }
}

impl std::error::Error for PresetError {}

impl From<serde_json::Error> for PresetError {
    fn from(e: serde_json::Error) -> Self {
        PresetError::Json(e)
    }
}

impl From<MeshError> for PresetError {
    fn from(e: MeshError) -> Self {
        PresetError::Mesh(e)
    }
}
