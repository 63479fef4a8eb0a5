//! Render targets and texture uploads.

use half::f16;

use crate::scene::{EnvironmentMap, Rgba8Image};

/// Format of every lit (pre tone-mapping) color target.
pub const HDR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba16Float;
/// Depth format of the model pass.
pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// A render-target texture and its default view.
///
/// Created with `RENDER_ATTACHMENT | TEXTURE_BINDING` so a later screen
/// pass can sample what an earlier pass drew.
pub struct RenderTarget {
    /// The underlying GPU texture.
    pub texture: wgpu::Texture,
    /// A default full-texture view.
    pub view: wgpu::TextureView,
}

impl RenderTarget {
    /// Create a render target with the given dimensions and format.
    /// Zero dimensions are raised to 1.
    #[must_use]
    pub fn new(
        device: &wgpu::Device,
        label: &str,
        width: u32,
        height: u32,
        format: wgpu::TextureFormat,
    ) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT
                | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self { texture, view }
    }

    /// Depth attachment for the model pass.
    #[must_use]
    pub fn depth(device: &wgpu::Device, width: u32, height: u32) -> Self {
        Self::new(device, "Depth Target", width, height, DEPTH_FORMAT)
    }
}

/// Upload an sRGB-encoded RGBA8 image as a sampled texture.
#[must_use]
pub fn upload_rgba8(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    label: &str,
    image: &Rgba8Image,
) -> wgpu::Texture {
    let size = wgpu::Extent3d {
        width: image.width.max(1),
        height: image.height.max(1),
        depth_or_array_layers: 1,
    };
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8UnormSrgb,
        usage: wgpu::TextureUsages::TEXTURE_BINDING
            | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });
    let expected = 4 * size.width as usize * size.height as usize;
    if image.pixels.len() == expected {
        queue.write_texture(
            texture.as_image_copy(),
            &image.pixels,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * size.width),
                rows_per_image: Some(size.height),
            },
            size,
        );
    } else {
        log::warn!(
            "{label}: {} bytes for {}x{} image, leaving texture blank",
            image.pixels.len(),
            size.width,
            size.height,
        );
    }
    texture
}

/// Upload an environment map with its full mip chain as `Rgba16Float`.
///
/// Maps wider or taller than the device allows are halved until they fit.
#[must_use]
pub fn upload_environment(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    map: &EnvironmentMap,
) -> wgpu::Texture {
    let max_dim = device.limits().max_texture_dimension_2d;
    let mut chain = map.mip_chain();
    let skip = chain
        .iter()
        .take_while(|m| m.width() > max_dim || m.height() > max_dim)
        .count()
        .min(chain.len().saturating_sub(1));
    if skip > 0 {
        log::warn!(
            "environment {}x{} exceeds device limit {max_dim}, dropping {skip} \
             mip level(s)",
            map.width(),
            map.height(),
        );
        let _ = chain.drain(..skip);
    }

    let (width, height) =
        chain.first().map_or((1, 1), |base| (base.width(), base.height()));
    let size = wgpu::Extent3d {
        width,
        height,
        depth_or_array_layers: 1,
    };
    let mip_level_count = u32::try_from(chain.len()).unwrap_or(1).max(1);
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Environment Map"),
        size,
        mip_level_count,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: HDR_FORMAT,
        usage: wgpu::TextureUsages::TEXTURE_BINDING
            | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });

    for (level, mip) in (0_u32..).zip(&chain) {
        let data = pack_rgba16f(mip.texels());
        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: level,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &data,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(8 * mip.width()),
                rows_per_image: Some(mip.height()),
            },
            wgpu::Extent3d {
                width: mip.width(),
                height: mip.height(),
                depth_or_array_layers: 1,
            },
        );
    }
    texture
}

/// Convert linear RGBA texels to half floats, saturating at the largest
/// finite `f16`.
fn pack_rgba16f(texels: &[[f32; 4]]) -> Vec<u8> {
    let max = f16::MAX.to_f32();
    let halves: Vec<f16> = texels
        .iter()
        .flatten()
        .map(|&c| {
            let c = if c.is_finite() { c.clamp(0.0, max) } else { 0.0 };
            f16::from_f32(c)
        })
        .collect();
    bytemuck::cast_slice(&halves).to_vec()
}
