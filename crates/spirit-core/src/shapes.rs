//! Floating cube field: audio-driven scale and float, constant slow spin.

use crate::constants::*;
use glam::{Mat4, Quat, Vec3};
use rand::prelude::*;

#[derive(Clone, Debug)]
pub struct ShapeDescriptor {
    pub index: usize,
    /// Spawn position; `y` is what the first update captures.
    pub home: Vec3,
    pub base_scale: f32,
    /// Set exactly once, on the first call to [`ShapeField::update`].
    original_y: Option<f32>,
    pub position: Vec3,
    pub scale: f32,
    /// Scale of the outline relative to the shape (cancels the audio factor).
    pub outline_scale: f32,
    pub rotation: Vec3,
    pub color: [f32; 3],
}

impl ShapeDescriptor {
    #[inline]
    pub fn original_y(&self) -> Option<f32> {
        self.original_y
    }

    /// World transform of the cube (XYZ Euler rotation, uniform scale).
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            Vec3::splat(self.scale),
            euler_xyz(self.rotation),
            self.position,
        )
    }

    /// World transform of the edge overlay, attached as a child of the cube.
    pub fn outline_matrix(&self) -> Mat4 {
        self.model_matrix() * Mat4::from_scale(Vec3::splat(self.outline_scale))
    }
}

#[inline]
pub fn euler_xyz(r: Vec3) -> Quat {
    Quat::from_euler(glam::EulerRot::XYZ, r.x, r.y, r.z)
}

#[inline]
pub fn base_scale(index: usize, count: usize) -> f32 {
    BASE_SCALE_MAX - (index as f32 / count.max(1) as f32) * BASE_SCALE_SPAN
}

/// Which frequency bin drives shape `index`; bins repeat when shapes outnumber them.
#[inline]
pub fn sample_bin(index: usize, count: usize, bins: usize) -> usize {
    let bin = (index as f32 / count.max(1) as f32 * bins as f32).floor() as usize;
    bin.min(bins.saturating_sub(1))
}

/// Linear blend between the min and max scale, `value` clamped to [0, 1].
#[inline]
pub fn scale_factor(value: f32) -> f32 {
    MIN_SCALE + (MAX_SCALE - MIN_SCALE) * value.clamp(0.0, 1.0)
}

#[inline]
pub fn float_offset(elapsed: f32, index: usize, value: f32) -> f32 {
    ((elapsed + index as f32 * FLOAT_PHASE_STEP) * FLOAT_FREQUENCY).sin() * FLOAT_AMPLITUDE * value
}

pub struct ShapeField {
    pub shapes: Vec<ShapeDescriptor>,
}

impl ShapeField {
    /// Lay out `count` cubes on a golden-angle spiral with random heights.
    pub fn new(count: usize, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let golden_angle = std::f32::consts::PI * (3.0 - 5.0_f32.sqrt());
        let shapes = (0..count)
            .map(|i| {
                let radius = (i as f32).sqrt() * SPIRAL_SPREAD;
                let theta = i as f32 * golden_angle;
                let y = rng.gen::<f32>() * SHAPE_HEIGHT_RANGE - SHAPE_HEIGHT_RANGE * 0.5;
                let home = Vec3::new(radius * theta.cos(), y, radius * theta.sin());
                let base = base_scale(i, count);
                ShapeDescriptor {
                    index: i,
                    home,
                    base_scale: base,
                    original_y: None,
                    position: home,
                    scale: base,
                    outline_scale: 1.0,
                    rotation: Vec3::ZERO,
                    color: hex_to_linear_rgb(PASTEL_COLORS[i % PASTEL_COLORS.len()]),
                }
            })
            .collect();
        Self { shapes }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn update(&mut self, samples: &[u8], elapsed: f32) {
        let count = self.shapes.len();
        let spin = ROTATION_RATIOS * ROTATION_SPEED;
        for shape in &mut self.shapes {
            let i = shape.index;
            let value = if samples.is_empty() {
                0.0
            } else {
                samples[sample_bin(i, count, samples.len())] as f32 / SAMPLE_NORM
            };

            let factor = scale_factor(value);
            shape.scale = shape.base_scale * factor;
            shape.outline_scale = 1.0 / factor;

            let origin = *shape.original_y.get_or_insert(shape.position.y);
            shape.position.y = origin + float_offset(elapsed, i, value);

            shape.rotation += spin;
        }
    }
}
