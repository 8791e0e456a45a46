use glam::Vec3;

// Shared visual/recording tuning constants used by the core and the web frontend.

// Audio analysis
pub const FFT_SIZE: u32 = 256; // analyser window; the sample buffer holds half of it
pub const SAMPLE_NORM: f32 = 128.0; // divides a u8 magnitude into a ~0..2 value

// Shape field layout
pub const SHAPE_COUNT: usize = 180;
pub const SHAPE_SIZE: f32 = 1.5; // cube edge length before scaling
pub const SPIRAL_SPREAD: f32 = 1.8; // radius = sqrt(i) * spread
pub const SHAPE_HEIGHT_RANGE: f32 = 20.0; // home heights drawn from [-10, 10)

// Shape animation
pub const BASE_SCALE_MAX: f32 = 0.8; // base scale of the first shape
pub const BASE_SCALE_SPAN: f32 = 0.4; // shrink across the whole field
pub const MIN_SCALE: f32 = 0.8;
pub const MAX_SCALE: f32 = 1.2;
pub const FLOAT_AMPLITUDE: f32 = 0.5;
pub const FLOAT_FREQUENCY: f32 = 2.0;
pub const FLOAT_PHASE_STEP: f32 = 0.2; // per-index phase offset, gives a travelling wave
pub const FLOAT_TIME_STEP: f32 = 0.005; // elapsed time advance per frame
pub const ROTATION_SPEED: f32 = 0.001;
pub const ROTATION_RATIOS: Vec3 = Vec3::new(1.0, 0.7, 0.5);

// Pastel palette cycled by shape index (sRGB hex)
pub const PASTEL_COLORS: [u32; 12] = [
    0xFFDADA, 0xFFF0DB, 0xFFFBDB, 0xE2FFDB, 0xDBFFF3, 0xDBEAFF, 0xE6DBFF, 0xFFDBF5, 0xFFE8D1,
    0xE8FFD1, 0xD1FFE8, 0xD1E8FF,
];

// Camera choreography
pub const CAMERA_BASE_RADIUS: f32 = 25.0;
pub const CAMERA_BASS_RADIUS: f32 = 5.0;
pub const CAMERA_PRIMARY_FREQ: Vec3 = Vec3::new(0.8, 0.5, 0.3);
pub const CAMERA_SECONDARY_FREQ: Vec3 = Vec3::new(0.2, 0.1, 0.05);
pub const CAMERA_LOOK_FREQ: Vec3 = Vec3::new(0.2, 0.15, 0.1);
pub const CAMERA_PRIMARY_WEIGHT: f32 = 0.6;
pub const CAMERA_SECONDARY_WEIGHT: f32 = 0.4;
pub const CAMERA_OFFSET: Vec3 = Vec3::new(3.0, 2.0, 2.0); // keeps the path off the field centre
pub const CAMERA_BASS_LIFT: f32 = 3.0; // extra Y offset per unit of bass
pub const CAMERA_LOOK_RADIUS: f32 = 3.0;
pub const CAMERA_BASE_FOV_DEG: f32 = 75.0;
pub const CAMERA_BASS_FOV_DEG: f32 = 10.0;
pub const CAMERA_ZNEAR: f32 = 0.1;
pub const CAMERA_ZFAR: f32 = 1000.0;

// Waveform line
pub const WAVEFORM_WIDTH: f32 = 16.0; // x spans [-8, 8)
pub const WAVEFORM_HEIGHT: f32 = 2.0;
pub const WAVEFORM_Y_OFFSET: f32 = -4.0;

// Particles
pub const PARTICLE_COUNT: usize = 2000;
pub const PARTICLE_EXTENT: f32 = 20.0; // half-width of the spawn cube
pub const PARTICLE_SPIN: Vec3 = Vec3::new(0.0005, 0.001, 0.0); // radians per frame

// Water
pub const WATER_RADIUS: f32 = 16.0;
pub const WATER_SEGMENTS: u32 = 32;
pub const WATER_LEVEL: f32 = -10.0;
pub const MIRROR_LEVEL: f32 = -10.1; // planar mirror just under the water surface
pub const WATER_TIME_STEP: f32 = 1.0 / 180.0; // slow ripples
pub const WATER_COLOR: u32 = 0x66CCFF;
pub const WATER_OPACITY: f32 = 0.6;

// Recording
pub const CAPTURE_FRAME_RATE: f64 = 60.0;
pub const VIDEO_BITS_PER_SECOND: u32 = 50_000_000;
pub const RECORD_TIME_SLICE_MS: i32 = 100;
pub const RECORD_SURFACE_SCALE: u32 = 2; // canvas enlargement while capturing
pub const PREFERRED_MIME: &str = "video/webm;codecs=vp9";
pub const FALLBACK_MIME: &str = "video/webm;codecs=vp8";
pub const CONTAINER_MIME: &str = "video/webm";
pub const RECORDING_FILE_NAME: &str = "visualization.webm";

/// Convert a `0xRRGGBB` sRGB colour into linear RGB floats.
#[inline]
pub fn hex_to_linear_rgb(hex: u32) -> [f32; 3] {
    let channel = |shift: u32| {
        let c = ((hex >> shift) & 0xFF) as f32 / 255.0;
        if c <= 0.04045 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    };
    [channel(16), channel(8), channel(0)]
}
