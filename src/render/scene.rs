//! 3D pass: lit cubes, edge outlines, particles and the waveform line.

use super::helpers::{self, DEPTH_FORMAT};
use crate::constants::*;
use glam::{Mat4, Vec3};
use spirit_core::{LineVertex, MeshVertex, Scene, ShapeInstance};
use wgpu::util::DeviceExt;

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct SceneUniforms {
    view_proj: [[f32; 4]; 4],
    camera_pos: [f32; 4],
    light_dir: [f32; 4],
    ambient: [f32; 4],
    point_light: [f32; 4],
    params: [f32; 4],
    clip_plane: [f32; 4],
}

impl SceneUniforms {
    pub(crate) fn from_scene(scene: &Scene) -> Self {
        Self::build(scene.camera.view_proj(), scene.camera.eye, [0.0; 4])
    }

    /// Same lighting, drawn mirrored in the plane under the water.
    pub(crate) fn mirrored(scene: &Scene) -> Self {
        let plane = spirit_core::MIRROR_LEVEL;
        Self::build(
            scene.camera.mirrored_view_proj(plane),
            scene.camera.mirrored_eye(plane),
            [1.0, plane, 0.0, 0.0],
        )
    }

    fn build(view_proj: Mat4, eye: Vec3, clip_plane: [f32; 4]) -> Self {
        let sun = Vec3::from(SUN_POSITION).normalize();
        Self {
            view_proj: view_proj.to_cols_array_2d(),
            camera_pos: eye.extend(1.0).to_array(),
            light_dir: [sun.x, sun.y, sun.z, SUN_INTENSITY],
            ambient: [AMBIENT_INTENSITY, AMBIENT_INTENSITY, AMBIENT_INTENSITY, 1.0],
            point_light: [0.0, 0.0, 0.0, POINT_LIGHT_INTENSITY],
            params: [POINT_LIGHT_RANGE, SHININESS, SPECULAR_STRENGTH, 0.0],
            clip_plane,
        }
    }
}

const MESH_ATTRS: [wgpu::VertexAttribute; 2] =
    wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];
const LINE_ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x3];
const INSTANCE_ATTRS: [wgpu::VertexAttribute; 5] = wgpu::vertex_attr_array![
    2 => Float32x4, 3 => Float32x4, 4 => Float32x4, 5 => Float32x4, 6 => Float32x4
];

fn instance_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<ShapeInstance>() as u64,
        step_mode: wgpu::VertexStepMode::Instance,
        attributes: &INSTANCE_ATTRS,
    }
}

struct PipelineSpec<'a> {
    label: &'a str,
    vs: &'a str,
    fs: &'a str,
    vertex: wgpu::VertexBufferLayout<'a>,
    topology: wgpu::PrimitiveTopology,
    blend: Option<wgpu::BlendState>,
    depth_write: bool,
}

fn make_scene_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    color_format: wgpu::TextureFormat,
    spec: PipelineSpec<'_>,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(spec.label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some(spec.vs),
            buffers: &[spec.vertex, instance_layout()],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        primitive: wgpu::PrimitiveState {
            topology: spec.topology,
            ..Default::default()
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: spec.depth_write,
            depth_compare: wgpu::CompareFunction::LessEqual,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState::default(),
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some(spec.fs),
            targets: &[Some(wgpu::ColorTargetState {
                format: color_format,
                blend: spec.blend,
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        cache: None,
        multiview: None,
    })
}

/// Growable vertex buffer rewritten every frame.
struct DynamicBuffer {
    label: &'static str,
    buffer: wgpu::Buffer,
    capacity: u64,
}

impl DynamicBuffer {
    fn new(device: &wgpu::Device, label: &'static str, capacity: u64) -> Self {
        let capacity = capacity.max(wgpu::COPY_BUFFER_ALIGNMENT);
        Self {
            label,
            buffer: Self::alloc(device, label, capacity),
            capacity,
        }
    }

    fn alloc(device: &wgpu::Device, label: &str, size: u64) -> wgpu::Buffer {
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    fn write(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, bytes: &[u8]) {
        let len = bytes.len() as u64;
        if len > self.capacity {
            self.capacity = len.next_power_of_two();
            self.buffer.destroy();
            self.buffer = Self::alloc(device, self.label, self.capacity);
        }
        if len > 0 {
            queue.write_buffer(&self.buffer, 0, bytes);
        }
    }
}

pub(crate) struct ScenePass {
    uniforms: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    // Separate buffer: both passes run in one submit.
    mirror_uniforms: wgpu::Buffer,
    mirror_bind_group: wgpu::BindGroup,
    mesh_pipeline: wgpu::RenderPipeline,
    outline_pipeline: wgpu::RenderPipeline,
    points_pipeline: wgpu::RenderPipeline,
    strip_pipeline: wgpu::RenderPipeline,
    cube_vb: wgpu::Buffer,
    cube_vertex_count: u32,
    edges_vb: wgpu::Buffer,
    edges_vertex_count: u32,
    particles_vb: wgpu::Buffer,
    particle_count: u32,
    waveform_vb: DynamicBuffer,
    waveform_count: u32,
    shape_instances: DynamicBuffer,
    outline_instances: DynamicBuffer,
    shape_count: u32,
    // [particles, waveform]
    single_instances: wgpu::Buffer,
}

impl ScenePass {
    pub(crate) fn new(
        device: &wgpu::Device,
        color_format: wgpu::TextureFormat,
        particle_positions: &[[f32; 3]],
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("scene_shader"),
            source: wgpu::ShaderSource::Wgsl(spirit_core::SCENE_WGSL.into()),
        });
        let bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("scene_bgl"),
            entries: &[helpers::uniform_bgl_entry(
                0,
                wgpu::ShaderStages::VERTEX_FRAGMENT,
            )],
        });
        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("scene_pl"),
            bind_group_layouts: &[&bgl],
            push_constant_ranges: &[],
        });
        let globals_bg = |label: &str, buffer: &wgpu::Buffer| {
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(label),
                layout: &bgl,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: buffer.as_entire_binding(),
                }],
            })
        };
        let uniforms = helpers::uniform_buffer::<SceneUniforms>(device, "scene_uniforms");
        let bind_group = globals_bg("scene_bg", &uniforms);
        let mirror_uniforms = helpers::uniform_buffer::<SceneUniforms>(device, "mirror_uniforms");
        let mirror_bind_group = globals_bg("mirror_bg", &mirror_uniforms);

        let mesh_layout = wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<MeshVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &MESH_ATTRS,
        };
        let line_layout = wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<LineVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &LINE_ATTRS,
        };
        let pipeline = |spec| make_scene_pipeline(device, &layout, &shader, color_format, spec);
        let mesh_pipeline = pipeline(PipelineSpec {
            label: "mesh_pipeline",
            vs: "vs_mesh",
            fs: "fs_mesh",
            vertex: mesh_layout,
            topology: wgpu::PrimitiveTopology::TriangleList,
            blend: None,
            depth_write: true,
        });
        let outline_pipeline = pipeline(PipelineSpec {
            label: "outline_pipeline",
            vs: "vs_line",
            fs: "fs_line",
            vertex: line_layout.clone(),
            topology: wgpu::PrimitiveTopology::LineList,
            blend: None,
            depth_write: true,
        });
        let strip_pipeline = pipeline(PipelineSpec {
            label: "waveform_pipeline",
            vs: "vs_line",
            fs: "fs_line",
            vertex: line_layout.clone(),
            topology: wgpu::PrimitiveTopology::LineStrip,
            blend: None,
            depth_write: true,
        });
        let points_pipeline = pipeline(PipelineSpec {
            label: "particles_pipeline",
            vs: "vs_line",
            fs: "fs_line",
            vertex: line_layout,
            topology: wgpu::PrimitiveTopology::PointList,
            blend: Some(wgpu::BlendState::ALPHA_BLENDING),
            depth_write: false,
        });

        let cube = spirit_core::cube_mesh(spirit_core::SHAPE_SIZE);
        let edges = spirit_core::cube_edges(spirit_core::SHAPE_SIZE);
        let particles = spirit_core::points(particle_positions);
        let vertex_init = |label: &str, contents: &[u8]| {
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents,
                usage: wgpu::BufferUsages::VERTEX,
            })
        };
        let cube_vb = vertex_init("cube_vb", bytemuck::cast_slice(&cube));
        let edges_vb = vertex_init("edges_vb", bytemuck::cast_slice(&edges));
        let particles_vb = vertex_init("particles_vb", bytemuck::cast_slice(&particles));

        let instance_size = std::mem::size_of::<ShapeInstance>() as u64;
        let shapes = spirit_core::SHAPE_COUNT as u64;
        let single_instances = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("single_instances"),
            size: instance_size * 2,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Self {
            uniforms,
            bind_group,
            mirror_uniforms,
            mirror_bind_group,
            mesh_pipeline,
            outline_pipeline,
            points_pipeline,
            strip_pipeline,
            cube_vb,
            cube_vertex_count: cube.len() as u32,
            edges_vb,
            edges_vertex_count: edges.len() as u32,
            particles_vb,
            particle_count: particles.len() as u32,
            waveform_vb: DynamicBuffer::new(device, "waveform_vb", 256 * 12),
            waveform_count: 0,
            shape_instances: DynamicBuffer::new(device, "shape_instances", shapes * instance_size),
            outline_instances: DynamicBuffer::new(
                device,
                "outline_instances",
                shapes * instance_size,
            ),
            shape_count: 0,
            single_instances,
        }
    }

    /// Upload this frame's uniforms, instances and waveform vertices.
    pub(crate) fn prepare(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, scene: &Scene) {
        let u = SceneUniforms::from_scene(scene);
        queue.write_buffer(&self.uniforms, 0, bytemuck::bytes_of(&u));
        let m = SceneUniforms::mirrored(scene);
        queue.write_buffer(&self.mirror_uniforms, 0, bytemuck::bytes_of(&m));

        let shapes = spirit_core::shape_instances(&scene.shapes);
        let outlines = spirit_core::outline_instances(&scene.shapes);
        self.shape_instances
            .write(device, queue, bytemuck::cast_slice(&shapes));
        self.outline_instances
            .write(device, queue, bytemuck::cast_slice(&outlines));
        self.shape_count = shapes.len() as u32;

        let grey = spirit_core::hex_to_linear_rgb(PARTICLE_GREY);
        let singles = [
            ShapeInstance {
                model: scene.particles.model_matrix().to_cols_array_2d(),
                color: [grey[0], grey[1], grey[2], PARTICLE_OPACITY],
            },
            ShapeInstance {
                model: Mat4::IDENTITY.to_cols_array_2d(),
                color: [0.0, 0.0, 0.0, 1.0],
            },
        ];
        queue.write_buffer(&self.single_instances, 0, bytemuck::cast_slice(&singles));

        let line: Vec<LineVertex> = spirit_core::points(&scene.waveform.vertices);
        self.waveform_vb
            .write(device, queue, bytemuck::cast_slice(&line));
        self.waveform_count = line.len() as u32;
    }

    pub(crate) fn draw(&self, rpass: &mut wgpu::RenderPass<'_>) {
        self.draw_with(rpass, &self.bind_group);
    }

    /// Everything above the mirror plane, reflected; the target is sampled by the water.
    pub(crate) fn draw_mirrored(&self, rpass: &mut wgpu::RenderPass<'_>) {
        self.draw_with(rpass, &self.mirror_bind_group);
    }

    /// Opaque geometry first, then the blended particle cloud.
    fn draw_with(&self, rpass: &mut wgpu::RenderPass<'_>, globals: &wgpu::BindGroup) {
        let instance_size = std::mem::size_of::<ShapeInstance>() as u64;
        rpass.set_bind_group(0, globals, &[]);

        rpass.set_pipeline(&self.mesh_pipeline);
        rpass.set_vertex_buffer(0, self.cube_vb.slice(..));
        rpass.set_vertex_buffer(1, self.shape_instances.buffer.slice(..));
        rpass.draw(0..self.cube_vertex_count, 0..self.shape_count);

        rpass.set_pipeline(&self.outline_pipeline);
        rpass.set_vertex_buffer(0, self.edges_vb.slice(..));
        rpass.set_vertex_buffer(1, self.outline_instances.buffer.slice(..));
        rpass.draw(0..self.edges_vertex_count, 0..self.shape_count);

        if self.waveform_count > 1 {
            rpass.set_pipeline(&self.strip_pipeline);
            rpass.set_vertex_buffer(0, self.waveform_vb.buffer.slice(..));
            rpass.set_vertex_buffer(1, self.single_instances.slice(instance_size..));
            rpass.draw(0..self.waveform_count, 0..1);
        }

        rpass.set_pipeline(&self.points_pipeline);
        rpass.set_vertex_buffer(0, self.particles_vb.slice(..));
        rpass.set_vertex_buffer(1, self.single_instances.slice(..instance_size));
        rpass.draw(0..self.particle_count, 0..1);
    }
}
