//! Host-testable core of the spiritfinder visualizer: audio-to-visual
//! mapping, scene state, recording state machine and scene geometry.

pub mod ambient;
pub mod camera;
pub mod config;
pub mod constants;
pub mod error;
pub mod frame;
pub mod geometry;
pub mod recorder;
pub mod samples;
pub mod shapes;
pub mod waveform;

pub use ambient::*;
pub use camera::*;
pub use config::*;
pub use constants::*;
pub use error::*;
pub use frame::*;
pub use geometry::*;
pub use recorder::*;
pub use samples::*;
pub use shapes::*;
pub use waveform::*;

// Shaders bundled as string constants
pub static SCENE_WGSL: &str = include_str!("../shaders/scene.wgsl");
pub static WATER_WGSL: &str = include_str!("../shaders/water.wgsl");
pub static POST_WGSL: &str = include_str!("../shaders/post.wgsl");
