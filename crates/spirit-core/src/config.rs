//! Runtime knobs for a visualizer session.
//!
//! Defaults mirror the tuning constants in [`crate::constants`]; tests and
//! alternative front-ends override individual fields.

use crate::constants::*;

/// Encoder and capture settings used when a recording session starts.
#[derive(Clone, Debug, PartialEq)]
pub struct RecordingOptions {
    pub frame_rate: f64,
    pub bits_per_second: u32,
    pub time_slice_ms: i32,
    pub surface_scale: u32,
    pub preferred_mime: &'static str,
    pub fallback_mime: &'static str,
    pub container_mime: &'static str,
    pub file_name: &'static str,
}

impl Default for RecordingOptions {
    fn default() -> Self {
        Self {
            frame_rate: CAPTURE_FRAME_RATE,
            bits_per_second: VIDEO_BITS_PER_SECOND,
            time_slice_ms: RECORD_TIME_SLICE_MS,
            surface_scale: RECORD_SURFACE_SCALE,
            preferred_mime: PREFERRED_MIME,
            fallback_mime: FALLBACK_MIME,
            container_mime: CONTAINER_MIME,
            file_name: RECORDING_FILE_NAME,
        }
    }
}

#[derive(Clone, Debug)]
pub struct VisualizerConfig {
    pub shape_count: usize,
    pub particle_count: usize,
    pub fft_size: u32,
    pub seed: u64,
    pub recording: RecordingOptions,
}

impl VisualizerConfig {
    /// Number of frequency bins the analyser produces per frame.
    #[inline]
    pub fn bin_count(&self) -> usize {
        (self.fft_size / 2) as usize
    }
}

impl Default for VisualizerConfig {
    fn default() -> Self {
        Self {
            shape_count: SHAPE_COUNT,
            particle_count: PARTICLE_COUNT,
            fft_size: FFT_SIZE,
            seed: 42,
            recording: RecordingOptions::default(),
        }
    }
}
