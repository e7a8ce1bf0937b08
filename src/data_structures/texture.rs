//! Depth targets: the per-frame depth buffer and the directional light's
//! shadow map. Both share [`DepthTexture::DEPTH_FORMAT`] so the mesh and shadow
//! pipelines can be built against the same format.

#[derive(Clone, Debug)]
pub struct DepthTexture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    /// Only the shadow map is sampled, with a comparison sampler.
    pub sampler: Option<wgpu::Sampler>,
}

impl DepthTexture {
    pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

    /// Edge length of the square shadow map.
    pub const SHADOW_MAP_SIZE: u32 = 2048;

    /// Depth buffer matching a `[width, height]` surface.
    pub fn create_depth_texture(device: &wgpu::Device, size: [u32; 2], label: &str) -> Self {
        let texture = create_depth_target(device, size, label);
        Self {
            view: texture.create_view(&wgpu::TextureViewDescriptor::default()),
            texture,
            sampler: None,
        }
    }

    /// Shadow map plus comparison sampler. Lookups outside the map clamp to
    /// the edge texel.
    pub fn create_shadow_map(device: &wgpu::Device) -> Self {
        let texture = create_depth_target(
            device,
            [Self::SHADOW_MAP_SIZE, Self::SHADOW_MAP_SIZE],
            "shadow_map",
        );
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("shadow_sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            compare: Some(wgpu::CompareFunction::LessEqual),
            ..Default::default()
        });
        Self {
            view: texture.create_view(&wgpu::TextureViewDescriptor::default()),
            texture,
            sampler: Some(sampler),
        }
    }
}

fn create_depth_target(device: &wgpu::Device, [width, height]: [u32; 2], label: &str) -> wgpu::Texture {
    device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size: wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DepthTexture::DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
        view_formats: &[],
    })
}
