//! Offline renderer — strikes a mesh and captures the output as raw
//! samples or a WAV byte buffer.
//!
//! Unlike the sample path this layer allocates freely; it exists for
//! bouncing drum hits to disk, not for running inside an audio callback.

use crate::mesh::TriangularMesh;

/// A drum strike: a raised-cosine excitation burst for the source
/// junction.
#[derive(Debug, Clone, Copy)]
pub struct Strike {
    /// Peak excitation value.
    pub amplitude: f32,
    /// Burst length in samples.
    pub duration: usize,
}

impl Strike {
    /// Hard single-sample impulse.
    pub fn impulse(amplitude: f32) -> Self {
        Self { amplitude, duration: 1 }
    }

    /// Soft strike spread over `duration` samples.
    pub fn mallet(amplitude: f32, duration: usize) -> Self {
        Self { amplitude, duration: duration.max(1) }
    }

    /// Excitation for sample `index`, or `None` once the burst is over.
    pub fn sample(&self, index: usize) -> Option<f32> {
        if index >= self.duration {
            return None;
        }
        let phase = (index + 1) as f32 / (self.duration + 1) as f32;
        Some(self.amplitude * 0.5 * (1.0 - (2.0 * std::f32::consts::PI * phase).cos()))
    }
}

/// Strike the mesh and record `num_samples` of pickup output.
pub fn render_hit(mesh: &mut TriangularMesh, strike: Strike, num_samples: usize) -> Vec<f32> {
    let mut out = vec![0.0; num_samples];
    for (i, sample) in out.iter_mut().enumerate() {
        *sample = mesh.process_sample(strike.sample(i));
    }
    out
}

/// Strike the mesh and render the result as a WAV file (16-bit mono PCM).
pub fn render_hit_wav(
    mesh: &mut TriangularMesh,
    strike: Strike,
    num_samples: usize,
    sample_rate: u32,
) -> Vec<u8> {
    let samples = render_hit(mesh, strike, num_samples);
    let pcm: Vec<i16> = samples
        .iter()
        .map(|&s| (s * 32767.0).round().clamp(-32768.0, 32767.0) as i16)
        .collect();

    encode_wav(&pcm, sample_rate, 1)
}

/// Encode i16 PCM samples to a WAV byte buffer.
fn encode_wav(samples: &[i16], sample_rate: u32, channels: u16) -> Vec<u8> {
    let bits_per_sample: u16 = 16;
    let byte_rate = sample_rate * channels as u32 * (bits_per_sample as u32 / 8);
    let block_align = channels * (bits_per_sample / 8);
    let data_size = (samples.len() * 2) as u32;
    let file_size = 36 + data_size;

    let mut buf = Vec::with_capacity(44 + data_size as usize);

    // RIFF header
    buf.extend_from_slice(b"RIFF");
    buf.extend_from_slice(&file_size.to_le_bytes());
    buf.extend_from_slice(b"WAVE");

    // fmt chunk
    buf.extend_from_slice(b"fmt ");
    buf.extend_from_slice(&16u32.to_le_bytes()); // chunk size
    buf.extend_from_slice(&1u16.to_le_bytes()); // PCM format
    buf.extend_from_slice(&channels.to_le_bytes());
    buf.extend_from_slice(&sample_rate.to_le_bytes());
    buf.extend_from_slice(&byte_rate.to_le_bytes());
    buf.extend_from_slice(&block_align.to_le_bytes());
    buf.extend_from_slice(&bits_per_sample.to_le_bytes());

    // data chunk
    buf.extend_from_slice(b"data");
    buf.extend_from_slice(&data_size.to_le_bytes());
    for &sample in samples {
        buf.extend_from_slice(&sample.to_le_bytes());
    }

    buf
}
