pub mod error;
pub mod geometry;
pub mod mesh;
pub mod preset;
pub mod renderer;

pub use error::{MeshError, PresetError};
pub use mesh::{MeshMemory, MeshProperties, TriangularMesh};
pub use preset::DrumPreset;

/// The crate version, read from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build a playable drum from a JSON preset string.
pub fn drum_from_json(json: &str) -> Result<TriangularMesh, PresetError> {
    DrumPreset::from_json(json)?.build()
}

/// Build a drum from a JSON preset, strike it once, and render the hit
/// to a WAV byte buffer.
pub fn render_preset_wav(
    json: &str,
    num_samples: usize,
    sample_rate: u32,
) -> Result<Vec<u8>, PresetError> {
    let mut mesh = drum_from_json(json)?;
    Ok(renderer::render_hit_wav(
        &mut mesh,
        renderer::Strike::impulse(1.0),
        num_samples,
        sample_rate,
    ))
}
