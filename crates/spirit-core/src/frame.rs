//! Per-frame orchestration.
//!
//! [`FrameDriver`] owns every piece of mutable session state (sample buffer,
//! scene, recorder) and runs the update pipeline in a fixed order:
//! encoder events -> sample -> shapes -> camera -> particles -> waveform ->
//! water -> recorder flush -> render.

use crate::ambient::{ParticleField, WaterSurface};
use crate::camera::{choreograph, Camera, CameraPose};
use crate::config::VisualizerConfig;
use crate::constants::FLOAT_TIME_STEP;
use crate::recorder::{
    event_queue, EncoderBackend, EventQueue, RecordingController, RenderSurface,
};
use crate::samples::{FrequencySampler, FrequencySource, SampleBuffer};
use crate::shapes::ShapeField;
use crate::waveform::WaveformLine;

/// Everything the renderer needs to draw one frame.
pub struct Scene {
    pub shapes: ShapeField,
    pub particles: ParticleField,
    pub water: WaterSurface,
    pub waveform: WaveformLine,
    pub camera: Camera,
    pub camera_pose: CameraPose,
    /// Float/rotation phase, advanced by a fixed step per frame.
    pub elapsed: f32,
}

impl Scene {
    pub fn new(config: &VisualizerConfig) -> Self {
        let camera = Camera::default();
        let camera_pose = CameraPose {
            position: camera.eye,
            look_at: camera.target,
            fov_degrees: camera.fovy_radians.to_degrees(),
        };
        Self {
            shapes: ShapeField::new(config.shape_count, config.seed),
            particles: ParticleField::new(config.particle_count, config.seed ^ 0x9E37_79B9),
            water: WaterSurface::default(),
            waveform: WaveformLine::default(),
            camera,
            camera_pose,
            elapsed: 0.0,
        }
    }
}

pub trait SceneRenderer {
    type Error: std::fmt::Debug;

    fn render(&mut self, scene: &Scene) -> Result<(), Self::Error>;
}

pub struct FrameDriver<S, E: EncoderBackend, V> {
    sampler: FrequencySampler<S>,
    scene: Scene,
    recorder: RecordingController<E, V>,
    events: EventQueue<E::Chunk>,
    frames: u64,
}

impl<S, E, V> FrameDriver<S, E, V>
where
    S: FrequencySource,
    E: EncoderBackend,
    V: RenderSurface,
{
    pub fn new(config: &VisualizerConfig, source: S, backend: E, surface: V) -> Self {
        Self::with_events(config, source, backend, surface, event_queue())
    }

    /// Build a driver around a queue the encoder backend already pushes into.
    pub fn with_events(
        config: &VisualizerConfig,
        source: S,
        backend: E,
        surface: V,
        events: EventQueue<E::Chunk>,
    ) -> Self {
        Self {
            sampler: FrequencySampler::new(source, config.bin_count()),
            scene: Scene::new(config),
            recorder: RecordingController::new(backend, surface, config.recording.clone()),
            events,
            frames: 0,
        }
    }

    pub fn events(&self) -> EventQueue<E::Chunk> {
        self.events.clone()
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn samples(&self) -> &SampleBuffer {
        self.sampler.buffer()
    }

    pub fn sampler_mut(&mut self) -> &mut FrequencySampler<S> {
        &mut self.sampler
    }

    pub fn recorder(&self) -> &RecordingController<E, V> {
        &self.recorder
    }

    pub fn recorder_mut(&mut self) -> &mut RecordingController<E, V> {
        &mut self.recorder
    }

    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    /// Apply queued encoder notifications; failures are logged, never fatal.
    pub fn drain_events(&mut self) {
        loop {
            let next = self.events.borrow_mut().pop_front();
            let Some(event) = next else { break };
            if let Err(e) = self.recorder.handle_event(event) {
                log::error!("[recorder] {e}");
            }
        }
    }

    /// Advance one display frame. `wall_time_sec` drives the camera path.
    pub fn tick<R: SceneRenderer>(&mut self, wall_time_sec: f64, renderer: &mut R) {
        self.drain_events();

        let samples = self.sampler.sample();
        let scene = &mut self.scene;

        scene.elapsed += FLOAT_TIME_STEP;
        scene.shapes.update(samples.as_slice(), scene.elapsed);

        scene.camera_pose = choreograph(wall_time_sec as f32, samples.bass());
        scene.camera.apply(&scene.camera_pose);
        let size = self.recorder.surface().size();
        scene.camera.set_viewport(size.width, size.height);

        scene.particles.advance();
        scene.waveform = WaveformLine::rebuild(samples.as_slice());
        scene.water.advance();

        self.recorder.on_frame();

        if let Err(e) = renderer.render(&self.scene) {
            log::error!("render error: {:?}", e);
        }
        self.frames += 1;
    }
}
