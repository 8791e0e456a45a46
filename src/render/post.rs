use super::helpers;
use super::targets::RenderTargets;
use crate::constants::*;

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct PostUniforms {
    resolution: [f32; 2],
    exposure: f32,
    bloom_strength: f32,
    blur_dir: [f32; 2],
    threshold: f32,
    _pad: f32,
    pow_rgb: [f32; 4],
    mul_rgb: [f32; 4],
}

impl PostUniforms {
    pub(crate) fn new(resolution: [f32; 2], blur_dir: [f32; 2]) -> Self {
        Self {
            resolution,
            exposure: TONE_EXPOSURE,
            bloom_strength: BLOOM_STRENGTH,
            blur_dir,
            threshold: BLOOM_THRESHOLD,
            _pad: 0.0,
            pow_rgb: [COLOR_POW[0], COLOR_POW[1], COLOR_POW[2], 1.0],
            mul_rgb: [COLOR_MUL[0], COLOR_MUL[1], COLOR_MUL[2], 1.0],
        }
    }
}

pub(crate) struct PostResources {
    pub(crate) bgl0: wgpu::BindGroupLayout, // tex+sampler+uniform
    pub(crate) bgl1: wgpu::BindGroupLayout, // tex+sampler
    // One uniform buffer per pass: queue writes land before the whole submit.
    pub(crate) main_uniforms: wgpu::Buffer,
    pub(crate) blur_h_uniforms: wgpu::Buffer,
    pub(crate) blur_v_uniforms: wgpu::Buffer,
    pub(crate) sampler: wgpu::Sampler,
    pub(crate) bright_pipeline: wgpu::RenderPipeline,
    pub(crate) blur_pipeline: wgpu::RenderPipeline,
    pub(crate) composite_pipeline: wgpu::RenderPipeline,
}

pub(crate) struct PostBindGroups {
    pub(crate) hdr: wgpu::BindGroup,
    pub(crate) from_bloom_a: wgpu::BindGroup,
    pub(crate) from_bloom_b: wgpu::BindGroup,
    pub(crate) bloom_a_only: wgpu::BindGroup,
}

pub(crate) fn create_post_resources(
    device: &wgpu::Device,
    bloom_format: wgpu::TextureFormat,
    swap_format: wgpu::TextureFormat,
) -> PostResources {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("post_shader"),
        source: wgpu::ShaderSource::Wgsl(spirit_core::POST_WGSL.into()),
    });
    let bgl0 = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("post_bgl0"),
        entries: &[
            helpers::texture_bgl_entry(0),
            helpers::sampler_bgl_entry(1),
            helpers::uniform_bgl_entry(2, wgpu::ShaderStages::FRAGMENT),
        ],
    });
    let bgl1 = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("post_bgl1"),
        entries: &[helpers::texture_bgl_entry(0), helpers::sampler_bgl_entry(1)],
    });
    let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some("linear_sampler"),
        address_mode_u: wgpu::AddressMode::ClampToEdge,
        address_mode_v: wgpu::AddressMode::ClampToEdge,
        address_mode_w: wgpu::AddressMode::ClampToEdge,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        mipmap_filter: wgpu::FilterMode::Linear,
        ..Default::default()
    });
    let pl_bright_blur = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("pl_post_0"),
        bind_group_layouts: &[&bgl0],
        push_constant_ranges: &[],
    });
    let pl_composite = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("pl_post_comp"),
        bind_group_layouts: &[&bgl0, &bgl1],
        push_constant_ranges: &[],
    });
    let bright_pipeline = helpers::make_post_pipeline(
        device,
        &pl_bright_blur,
        &shader,
        "fs_bright",
        bloom_format,
        None,
    );
    let blur_pipeline =
        helpers::make_post_pipeline(device, &pl_bright_blur, &shader, "fs_blur", bloom_format, None);
    let composite_pipeline = helpers::make_post_pipeline(
        device,
        &pl_composite,
        &shader,
        "fs_composite",
        swap_format,
        Some(wgpu::BlendState::REPLACE),
    );

    PostResources {
        bgl0,
        bgl1,
        main_uniforms: helpers::uniform_buffer::<PostUniforms>(device, "post_uniforms"),
        blur_h_uniforms: helpers::uniform_buffer::<PostUniforms>(device, "post_blur_h"),
        blur_v_uniforms: helpers::uniform_buffer::<PostUniforms>(device, "post_blur_v"),
        sampler,
        bright_pipeline,
        blur_pipeline,
        composite_pipeline,
    }
}

impl PostResources {
    pub(crate) fn bind_groups(&self, device: &wgpu::Device, targets: &RenderTargets) -> PostBindGroups {
        let with_uniform = |label: &str, view: &wgpu::TextureView, uniforms: &wgpu::Buffer| {
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(label),
                layout: &self.bgl0,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::TextureView(view),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::Sampler(&self.sampler),
                    },
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: uniforms.as_entire_binding(),
                    },
                ],
            })
        };
        let bloom_a_only = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("bg_bloom_a_only"),
            layout: &self.bgl1,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&targets.bloom_a_view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
        });
        PostBindGroups {
            hdr: with_uniform("bg_hdr", &targets.hdr_view, &self.main_uniforms),
            from_bloom_a: with_uniform("bg_from_bloom_a", &targets.bloom_a_view, &self.blur_h_uniforms),
            from_bloom_b: with_uniform("bg_from_bloom_b", &targets.bloom_b_view, &self.blur_v_uniforms),
            bloom_a_only,
        }
    }

    pub(crate) fn write_uniforms(&self, queue: &wgpu::Queue, bloom_resolution: [f32; 2]) {
        let main = PostUniforms::new(bloom_resolution, [0.0, 0.0]);
        let blur_h = PostUniforms::new(bloom_resolution, [1.0, 0.0]);
        let blur_v = PostUniforms::new(bloom_resolution, [0.0, 1.0]);
        queue.write_buffer(&self.main_uniforms, 0, bytemuck::bytes_of(&main));
        queue.write_buffer(&self.blur_h_uniforms, 0, bytemuck::bytes_of(&blur_h));
        queue.write_buffer(&self.blur_v_uniforms, 0, bytemuck::bytes_of(&blur_v));
    }
}

pub(crate) fn blit(
    encoder: &mut wgpu::CommandEncoder,
    label: &str,
    target: &wgpu::TextureView,
    pipeline: &wgpu::RenderPipeline,
    bg0: &wgpu::BindGroup,
    bg1: Option<&wgpu::BindGroup>,
) {
    let mut r = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some(label),
        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
            view: target,
            resolve_target: None,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                store: wgpu::StoreOp::Store,
            },
        })],
        depth_stencil_attachment: None,
        timestamp_writes: None,
        occlusion_query_set: None,
    });
    r.set_pipeline(pipeline);
    r.set_bind_group(0, bg0, &[]);
    if let Some(g1) = bg1 {
        r.set_bind_group(1, g1, &[]);
    }
    r.draw(0..3, 0..1);
}
