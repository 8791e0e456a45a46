// DOM wiring and renderer tuning constants for the web frontend.

// Element ids (see index.html)
pub const CANVAS_ID: &str = "app-canvas";
pub const AUDIO_INPUT_ID: &str = "audioFile";

// Overlay buttons, absolutely positioned from the top-left corner
pub const REPLAY_LABEL: &str = "Replay";
pub const REPLAY_TOP_PX: u32 = 50;
pub const RECORD_LABEL: &str = "Start Recording";
pub const RECORD_TOP_PX: u32 = 90;
pub const BUTTON_LEFT_PX: u32 = 10;

// Lighting
pub const AMBIENT_INTENSITY: f32 = 0.3;
pub const SUN_INTENSITY: f32 = 0.8;
pub const SUN_POSITION: [f32; 3] = [50.0, 100.0, 50.0]; // direction towards the light
pub const POINT_LIGHT_INTENSITY: f32 = 1.0;
pub const POINT_LIGHT_RANGE: f32 = 50.0;
pub const SHININESS: f32 = 50.0;
pub const SPECULAR_STRENGTH: f32 = 0.2;

// Scene colours (linear RGB)
pub const BACKGROUND: wgpu::Color = wgpu::Color::WHITE;
pub const PARTICLE_GREY: u32 = 0x888888;
pub const PARTICLE_OPACITY: f32 = 0.7;
pub const WATER_DISTORTION: f32 = 3.7;

// Post-processing
pub const BLOOM_STRENGTH: f32 = 0.3;
pub const BLOOM_THRESHOLD: f32 = 0.85;
pub const TONE_EXPOSURE: f32 = 0.8;
pub const COLOR_POW: [f32; 3] = [1.0, 1.0, 1.0];
pub const COLOR_MUL: [f32; 3] = [1.0, 1.0, 1.0];
