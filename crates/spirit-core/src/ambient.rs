//! Audio-independent background motion: particle drift and water ripples.

use crate::constants::*;
use glam::{Mat4, Vec3};
use rand::prelude::*;

pub struct ParticleField {
    pub positions: Vec<[f32; 3]>,
    pub rotation: Vec3,
}

impl ParticleField {
    pub fn new(count: usize, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut coord = || rng.gen::<f32>() * PARTICLE_EXTENT * 2.0 - PARTICLE_EXTENT;
        let positions = (0..count).map(|_| [coord(), coord(), coord()]).collect();
        Self {
            positions,
            rotation: Vec3::ZERO,
        }
    }

    pub fn advance(&mut self) {
        self.rotation += PARTICLE_SPIN;
    }

    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_quat(crate::shapes::euler_xyz(self.rotation))
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct WaterSurface {
    /// Ripple phase fed to the water shader.
    pub time: f32,
}

impl WaterSurface {
    pub fn advance(&mut self) {
        self.time += WATER_TIME_STEP;
    }

    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_translation(Vec3::Y * WATER_LEVEL)
    }
}
