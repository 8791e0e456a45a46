//! Translucent rippled disc over a planar mirror of the shape field.

use super::helpers::{self, DEPTH_FORMAT};
use super::targets::RenderTargets;
use crate::constants::*;
use glam::Vec3;
use spirit_core::{MeshVertex, Scene};
use wgpu::util::DeviceExt;

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct WaterUniforms {
    view_proj: [[f32; 4]; 4],
    model: [[f32; 4]; 4],
    camera_pos: [f32; 4],
    color: [f32; 4],
    sun_dir: [f32; 4],
    params: [f32; 4],
}

impl WaterUniforms {
    pub(crate) fn from_scene(scene: &Scene, viewport: [f32; 2]) -> Self {
        let rgb = spirit_core::hex_to_linear_rgb(spirit_core::WATER_COLOR);
        let sun = Vec3::from(SUN_POSITION).normalize();
        Self {
            view_proj: scene.camera.view_proj().to_cols_array_2d(),
            model: scene.water.model_matrix().to_cols_array_2d(),
            camera_pos: scene.camera.eye.extend(1.0).to_array(),
            color: [rgb[0], rgb[1], rgb[2], spirit_core::WATER_OPACITY],
            sun_dir: sun.extend(0.0).to_array(),
            params: [scene.water.time, WATER_DISTORTION, viewport[0], viewport[1]],
        }
    }
}

const WATER_ATTRS: [wgpu::VertexAttribute; 2] =
    wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];

pub(crate) struct WaterPass {
    uniforms: wgpu::Buffer,
    bgl: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    bind_group: wgpu::BindGroup,
    pipeline: wgpu::RenderPipeline,
    vb: wgpu::Buffer,
    vertex_count: u32,
}

impl WaterPass {
    pub(crate) fn new(
        device: &wgpu::Device,
        color_format: wgpu::TextureFormat,
        targets: &RenderTargets,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("water_shader"),
            source: wgpu::ShaderSource::Wgsl(spirit_core::WATER_WGSL.into()),
        });
        let bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("water_bgl"),
            entries: &[
                helpers::uniform_bgl_entry(0, wgpu::ShaderStages::VERTEX_FRAGMENT),
                helpers::texture_bgl_entry(1),
                helpers::sampler_bgl_entry(2),
            ],
        });
        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("water_pl"),
            bind_group_layouts: &[&bgl],
            push_constant_ranges: &[],
        });
        let uniforms = helpers::uniform_buffer::<WaterUniforms>(device, "water_uniforms");
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("mirror_sampler"),
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });
        let bind_group = Self::make_bind_group(device, &bgl, &uniforms, &sampler, targets);
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("water_pipeline"),
            layout: Some(&layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_water"),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<MeshVertex>() as u64,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &WATER_ATTRS,
                }],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState::default(),
            // Tested against the shapes; the particles behind still blend over it.
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: false,
                depth_compare: wgpu::CompareFunction::LessEqual,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_water"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: color_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            cache: None,
            multiview: None,
        });

        let disc = spirit_core::water_disc(spirit_core::WATER_RADIUS, spirit_core::WATER_SEGMENTS);
        let vb = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("water_vb"),
            contents: bytemuck::cast_slice(&disc),
            usage: wgpu::BufferUsages::VERTEX,
        });

        Self {
            uniforms,
            bgl,
            sampler,
            bind_group,
            pipeline,
            vb,
            vertex_count: disc.len() as u32,
        }
    }

    fn make_bind_group(
        device: &wgpu::Device,
        bgl: &wgpu::BindGroupLayout,
        uniforms: &wgpu::Buffer,
        sampler: &wgpu::Sampler,
        targets: &RenderTargets,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("water_bg"),
            layout: bgl,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniforms.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&targets.mirror_view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        })
    }

    /// Point at the mirror target again after [`RenderTargets::recreate`].
    pub(crate) fn rebind(&mut self, device: &wgpu::Device, targets: &RenderTargets) {
        self.bind_group =
            Self::make_bind_group(device, &self.bgl, &self.uniforms, &self.sampler, targets);
    }

    pub(crate) fn prepare(&self, queue: &wgpu::Queue, scene: &Scene, viewport: [f32; 2]) {
        let u = WaterUniforms::from_scene(scene, viewport);
        queue.write_buffer(&self.uniforms, 0, bytemuck::bytes_of(&u));
    }

    pub(crate) fn draw(&self, rpass: &mut wgpu::RenderPass<'_>) {
        rpass.set_pipeline(&self.pipeline);
        rpass.set_bind_group(0, &self.bind_group, &[]);
        rpass.set_vertex_buffer(0, self.vb.slice(..));
        rpass.draw(0..self.vertex_count, 0..1);
    }
}
