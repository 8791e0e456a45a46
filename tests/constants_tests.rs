// Host-side tests for constants and their mathematical relationships.
// The main crate is wasm-only, so we include the frontend constants directly.

#![allow(dead_code)]
mod constants {
    include!("../src/constants.rs");
}

use constants::*;
use spirit_core::*;

#[test]
#[allow(clippy::assertions_on_constants)]
fn constants_are_within_reasonable_bounds() {
    // Scale blend must not invert
    assert!(MIN_SCALE < MAX_SCALE);
    assert!(BASE_SCALE_SPAN < BASE_SCALE_MAX);

    // Opacities and bloom parameters are fractions
    assert!(PARTICLE_OPACITY > 0.0 && PARTICLE_OPACITY <= 1.0);
    assert!(WATER_OPACITY > 0.0 && WATER_OPACITY <= 1.0);
    assert!(BLOOM_THRESHOLD > 0.0 && BLOOM_THRESHOLD < 1.0);
    assert!(BLOOM_STRENGTH > 0.0 && BLOOM_STRENGTH < 1.0);

    // Camera clip planes
    assert!(CAMERA_ZNEAR > 0.0 && CAMERA_ZNEAR < CAMERA_ZFAR);
    assert!((CAMERA_PRIMARY_WEIGHT + CAMERA_SECONDARY_WEIGHT - 1.0).abs() < 1e-6);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn fov_stays_below_180_at_full_bass() {
    // bass is at most 255/128
    let max = field_of_view(255.0 / SAMPLE_NORM);
    assert!(max < 180.0);
    assert!(CAMERA_BASE_FOV_DEG > 0.0);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn camera_never_reaches_look_target_region() {
    // closest the camera path can get to the origin vs the look-at radius
    assert!(CAMERA_BASE_RADIUS > CAMERA_LOOK_RADIUS * 2.0);
}

#[test]
fn analyser_bins_fit_a_line() {
    let config = VisualizerConfig::default();
    assert_eq!(config.bin_count(), 128);
    assert_eq!(config.fft_size, FFT_SIZE);
    assert!(FFT_SIZE.is_power_of_two());
}

#[test]
fn recording_defaults() {
    let opts = RecordingOptions::default();
    assert_eq!(opts.frame_rate, 60.0);
    assert_eq!(opts.bits_per_second, 50_000_000);
    assert_eq!(opts.time_slice_ms, 100);
    assert_eq!(opts.surface_scale, 2);
    assert!(opts.preferred_mime.starts_with(opts.container_mime));
    assert!(opts.fallback_mime.starts_with(opts.container_mime));
    assert!(opts.file_name.ends_with(".webm"));
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn buttons_do_not_overlap() {
    assert!(RECORD_TOP_PX >= REPLAY_TOP_PX + 30);
}

#[test]
fn hex_colors_convert_to_linear() {
    assert!(hex_to_linear_rgb(0xFFFFFF)
        .iter()
        .all(|c| (c - 1.0).abs() < 1e-5));
    assert_eq!(hex_to_linear_rgb(0x000000), [0.0, 0.0, 0.0]);
    let grey = hex_to_linear_rgb(PARTICLE_GREY);
    assert!(grey[0] > 0.2 && grey[0] < 0.3);
    assert_eq!(grey[0], grey[1]);
    let water = hex_to_linear_rgb(WATER_COLOR);
    assert!(water[2] > water[1] && water[1] > water[0]);
}
