use super::helpers;

pub(crate) const HDR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba16Float;

/// Offscreen targets for the render pipeline.
///
/// - `hdr_*` hold the main scene color in Rgba16Float for post-processing,
///   with a matching depth buffer for the 3D pass.
/// - `bloom_*` are half-res ping-pong buffers used for bright-pass and blur.
/// - `mirror_*` hold the half-res scene reflected in the water plane.
pub(crate) struct RenderTargets {
    pub(crate) hdr_tex: wgpu::Texture,
    pub(crate) hdr_view: wgpu::TextureView,
    pub(crate) depth_tex: wgpu::Texture,
    pub(crate) depth_view: wgpu::TextureView,
    pub(crate) bloom_a: wgpu::Texture,
    pub(crate) bloom_a_view: wgpu::TextureView,
    pub(crate) bloom_b: wgpu::Texture,
    pub(crate) bloom_b_view: wgpu::TextureView,
    pub(crate) mirror_tex: wgpu::Texture,
    pub(crate) mirror_view: wgpu::TextureView,
    pub(crate) mirror_depth_tex: wgpu::Texture,
    pub(crate) mirror_depth_view: wgpu::TextureView,
}

#[inline]
pub(crate) fn bloom_size(width: u32, height: u32) -> (u32, u32) {
    ((width.max(1) / 2).max(1), (height.max(1) / 2).max(1))
}

impl RenderTargets {
    pub(crate) fn new(device: &wgpu::Device, width: u32, height: u32) -> Self {
        let usage = wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING;
        let (hdr_tex, hdr_view) =
            helpers::create_color_texture(device, "hdr_tex", width, height, HDR_FORMAT, usage);
        let (depth_tex, depth_view) = helpers::create_depth_texture(device, width, height);
        let (bw, bh) = bloom_size(width, height);
        let (bloom_a, bloom_a_view) =
            helpers::create_color_texture(device, "bloom_a", bw, bh, HDR_FORMAT, usage);
        let (bloom_b, bloom_b_view) =
            helpers::create_color_texture(device, "bloom_b", bw, bh, HDR_FORMAT, usage);
        let (mirror_tex, mirror_view) =
            helpers::create_color_texture(device, "mirror_tex", bw, bh, HDR_FORMAT, usage);
        let (mirror_depth_tex, mirror_depth_view) = helpers::create_depth_texture(device, bw, bh);
        Self {
            hdr_tex,
            hdr_view,
            depth_tex,
            depth_view,
            bloom_a,
            bloom_a_view,
            bloom_b,
            bloom_b_view,
            mirror_tex,
            mirror_view,
            mirror_depth_tex,
            mirror_depth_view,
        }
    }

    pub(crate) fn recreate(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        for tex in [
            &self.hdr_tex,
            &self.depth_tex,
            &self.bloom_a,
            &self.bloom_b,
            &self.mirror_tex,
            &self.mirror_depth_tex,
        ] {
            tex.destroy();
        }
        *self = Self::new(device, width, height);
    }
}
