//! Depth attachment and sampled textures for the scene pass.

use crate::error::TriviewError;

/// Depth buffer shared by all three viewports.
pub struct DepthTarget {
    /// The underlying GPU texture.
    pub texture: wgpu::Texture,
    /// A default full-texture view.
    pub view: wgpu::TextureView,
}

impl DepthTarget {
    /// Depth format used by every pipeline.
    pub const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

    /// Depth texture covering the whole surface.
    #[must_use]
    pub fn new(device: &wgpu::Device, width: u32, height: u32) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Depth Target"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self { texture, view }
    }
}

/// Decoded RGBA8 pixels ready for GPU upload.
#[derive(Debug, Clone)]
pub struct ImageData {
    /// Tightly packed RGBA8 texels, row-major from the top-left.
    pub pixels: Vec<u8>,
    /// Width in texels.
    pub width: u32,
    /// Height in texels.
    pub height: u32,
}

impl ImageData {
    /// Decode an encoded image (PNG) held in memory.
    ///
    /// # Errors
    ///
    /// Returns [`TriviewError::Texture`] if the bytes cannot be decoded.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TriviewError> {
        let rgba = image::load_from_memory(bytes)
            .map_err(|e| TriviewError::Texture(e.to_string()))?
            .to_rgba8();
        let (width, height) = rgba.dimensions();
        log::debug!("decoded {width}x{height} texture");
        Ok(Self {
            pixels: rgba.into_raw(),
            width,
            height,
        })
    }
}

/// A sampled RGBA8 (sRGB) texture and its view.
pub struct SampledTexture {
    /// The underlying GPU texture.
    pub texture: wgpu::Texture,
    /// A default full-texture view.
    pub view: wgpu::TextureView,
}

impl SampledTexture {
    /// Upload tightly packed RGBA8 sRGB pixels.
    #[must_use]
    pub fn from_rgba(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        label: &str,
        image: &ImageData,
    ) -> Self {
        let extent = wgpu::Extent3d {
            width: image.width,
            height: image.height,
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: extent,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING
                | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &image.pixels,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(image.width * 4),
                rows_per_image: Some(image.height),
            },
            extent,
        );
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self { texture, view }
    }

    /// 1×1 white texture for untextured materials.
    #[must_use]
    pub fn white(device: &wgpu::Device, queue: &wgpu::Queue) -> Self {
        let image = ImageData {
            pixels: vec![255; 4],
            width: 1,
            height: 1,
        };
        Self::from_rgba(device, queue, "White Texture", &image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GROUND_PNG: &[u8] = include_bytes!("../../assets/textures/ground.png");

    #[test]
    fn ground_texture_decodes_to_rgba() {
        let image = ImageData::from_bytes(GROUND_PNG).unwrap();
        assert_eq!((image.width, image.height), (64, 64));
        assert_eq!(image.pixels.len(), 64 * 64 * 4);
        assert!(image.pixels.chunks(4).all(|p| p[3] == 255));
        // Darker rim around lighter tiles.
        assert_eq!(&image.pixels[..4], &[150, 150, 150, 255]);
        let centre = (32 * 64 + 32) * 4;
        assert!(image.pixels[centre] > 150);
    }

    #[test]
    fn garbage_bytes_are_a_texture_error() {
        let err = ImageData::from_bytes(b"not a png").unwrap_err();
        assert!(matches!(err, TriviewError::Texture(_)));
    }
}
