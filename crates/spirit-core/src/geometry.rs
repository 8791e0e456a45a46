//! CPU-side meshes and GPU-layout vertex/instance types for the scene.

use crate::shapes::ShapeField;
use glam::Vec3;

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LineVertex {
    pub position: [f32; 3],
}

/// Per-shape data consumed by the instanced cube and outline pipelines.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ShapeInstance {
    pub model: [[f32; 4]; 4],
    pub color: [f32; 4],
}

// Cube faces as (normal, tangent u, tangent v)
const CUBE_FACES: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
    ([1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]),
    ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
    ([0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]),
    ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
    ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
    ([0.0, 0.0, -1.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
];

/// Axis-aligned cube of edge `size` as a counter-clockwise triangle list.
pub fn cube_mesh(size: f32) -> Vec<MeshVertex> {
    let h = size * 0.5;
    let mut out = Vec::with_capacity(36);
    for (n, u, v) in CUBE_FACES {
        let (n, u, v) = (Vec3::from(n), Vec3::from(u), Vec3::from(v));
        let corner = |su: f32, sv: f32| MeshVertex {
            position: ((n + u * su + v * sv) * h).to_array(),
            normal: n.to_array(),
        };
        let (a, b, c, d) = (
            corner(-1.0, -1.0),
            corner(1.0, -1.0),
            corner(1.0, 1.0),
            corner(-1.0, 1.0),
        );
        out.extend_from_slice(&[a, b, c, a, c, d]);
    }
    out
}

/// The 12 cube edges as a line list (24 vertices).
pub fn cube_edges(size: f32) -> Vec<LineVertex> {
    let h = size * 0.5;
    let corner = |i: u32| {
        LineVertex {
            position: [
                if i & 1 != 0 { h } else { -h },
                if i & 2 != 0 { h } else { -h },
                if i & 4 != 0 { h } else { -h },
            ],
        }
    };
    let mut out = Vec::with_capacity(24);
    for a in 0..8u32 {
        for bit in [1u32, 2, 4] {
            if a & bit == 0 {
                out.push(corner(a));
                out.push(corner(a | bit));
            }
        }
    }
    out
}

/// Flat disc in the XZ plane facing +Y, as a triangle fan unrolled to a list.
pub fn water_disc(radius: f32, segments: u32) -> Vec<MeshVertex> {
    let segments = segments.max(3);
    let up = [0.0, 1.0, 0.0];
    let rim = |k: u32| {
        let theta = k as f32 / segments as f32 * std::f32::consts::TAU;
        MeshVertex {
            position: [radius * theta.cos(), 0.0, -radius * theta.sin()],
            normal: up,
        }
    };
    let center = MeshVertex {
        position: [0.0; 3],
        normal: up,
    };
    (0..segments)
        .flat_map(|k| [center, rim(k), rim(k + 1)])
        .collect()
}

pub fn points(positions: &[[f32; 3]]) -> Vec<LineVertex> {
    positions
        .iter()
        .map(|&position| LineVertex { position })
        .collect()
}

pub fn shape_instances(field: &ShapeField) -> Vec<ShapeInstance> {
    field
        .shapes
        .iter()
        .map(|s| ShapeInstance {
            model: s.model_matrix().to_cols_array_2d(),
            color: [s.color[0], s.color[1], s.color[2], 1.0],
        })
        .collect()
}

pub fn outline_instances(field: &ShapeField) -> Vec<ShapeInstance> {
    field
        .shapes
        .iter()
        .map(|s| ShapeInstance {
            model: s.outline_matrix().to_cols_array_2d(),
            color: [0.0, 0.0, 0.0, 1.0],
        })
        .collect()
}
