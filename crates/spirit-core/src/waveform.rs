use crate::constants::*;

/// Instantaneous spectrum drawn as a single line strip.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WaveformLine {
    pub vertices: Vec<[f32; 3]>,
}

impl WaveformLine {
    /// Build a fresh polyline, one vertex per sample.
    pub fn rebuild(samples: &[u8]) -> Self {
        let len = samples.len().max(1) as f32;
        let half = WAVEFORM_WIDTH * 0.5;
        let vertices = samples
            .iter()
            .enumerate()
            .map(|(i, &s)| {
                let x = (i as f32 / len) * WAVEFORM_WIDTH - half;
                let y = (s as f32 / SAMPLE_NORM - 1.0) * WAVEFORM_HEIGHT + WAVEFORM_Y_OFFSET;
                [x, y, 0.0]
            })
            .collect();
        Self { vertices }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}
