use glam::Vec3;
use wgpu::util::DeviceExt;

use super::pipeline_helpers::{uniform_bind_group, uniform_layout};
use crate::options::LightingOptions;
use crate::util::color::hex_to_linear;

/// Hemisphere light uniform.
/// NOTE: Must match `triview::hemisphere::HemisphereLight` (48 bytes).
///
/// WGSL layout:
///   sky: vec4<f32>        (offset 0)
///   ground: vec4<f32>     (offset 16)
///   direction: vec4<f32>  (offset 32)
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct HemisphereUniform {
    /// Linear sky colour scaled by intensity, a = 1.
    pub sky: [f32; 4],
    /// Linear ground colour scaled by intensity, a = 1.
    pub ground: [f32; 4],
    /// Unit direction receiving the full sky colour, w = 0.
    pub direction: [f32; 4],
}

impl HemisphereUniform {
    /// Uniform for the given lighting options. A zero direction falls back
    /// to +Y.
    #[must_use]
    pub fn from_options(options: &LightingOptions) -> Self {
        let scaled = |hex: u32| {
            let [r, g, b] = hex_to_linear(hex);
            let i = options.intensity;
            [r * i, g * i, b * i, 1.0]
        };
        let direction = Vec3::from(options.direction).normalize_or(Vec3::Y);
        Self {
            sky: scaled(options.sky_color),
            ground: scaled(options.ground_color),
            direction: direction.extend(0.0).to_array(),
        }
    }
}

/// GPU-side hemisphere light: uniform buffer plus bind group (group 3 of
/// the scene pipeline).
pub struct HemisphereLight {
    /// CPU copy of the last uniform written.
    pub uniform: HemisphereUniform,
    /// Uniform buffer.
    pub buffer: wgpu::Buffer,
    /// Bind group layout (single uniform at binding 0).
    pub layout: wgpu::BindGroupLayout,
    /// Bind group over `buffer`.
    pub bind_group: wgpu::BindGroup,
}

impl HemisphereLight {
    /// Create the light from options.
    #[must_use]
    pub fn new(device: &wgpu::Device, options: &LightingOptions) -> Self {
        let uniform = HemisphereUniform::from_options(options);
        let buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Hemisphere Light Buffer"),
                contents: bytemuck::cast_slice(&[uniform]),
                usage: wgpu::BufferUsages::UNIFORM
                    | wgpu::BufferUsages::COPY_DST,
            });
        let layout = uniform_layout(device, "Hemisphere Light Layout");
        let bind_group = uniform_bind_group(
            device,
            "Hemisphere Light Bind Group",
            &layout,
            &buffer,
        );
        Self {
            uniform,
            buffer,
            layout,
            bind_group,
        }
    }

    /// Re-upload the uniform if the options changed it.
    pub fn apply(&mut self, queue: &wgpu::Queue, options: &LightingOptions) {
        let uniform = HemisphereUniform::from_options(options);
        if uniform != self.uniform {
            self.uniform = uniform;
            queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&[uniform]));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_is_48_bytes() {
        assert_eq!(size_of::<HemisphereUniform>(), 48);
    }

    #[test]
    fn default_light_is_white_sky_over_near_black_ground() {
        let u = HemisphereUniform::from_options(&LightingOptions::default());
        assert!(u.sky[..3].iter().all(|&c| (c - 1.0).abs() < 1e-5));
        assert_eq!(u.sky[3], 1.0);
        assert!(u.ground[..3].iter().all(|&c| c < 0.01));
        assert_eq!(u.direction, [0.0, 0.0, 1.0, 0.0]);
    }

    #[test]
    fn intensity_scales_both_colours() {
        let opts = LightingOptions {
            intensity: 0.5,
            ..LightingOptions::default()
        };
        let u = HemisphereUniform::from_options(&opts);
        assert!(u.sky[..3].iter().all(|&c| (c - 0.5).abs() < 1e-5));
        assert_eq!(u.sky[3], 1.0);
    }

    #[test]
    fn direction_is_normalised() {
        let opts = LightingOptions {
            direction: [0.0, 3.0, 4.0],
            ..LightingOptions::default()
        };
        let u = HemisphereUniform::from_options(&opts);
        assert!((u.direction[1] - 0.6).abs() < 1e-6);
        assert!((u.direction[2] - 0.8).abs() < 1e-6);

        let degenerate = LightingOptions {
            direction: [0.0; 3],
            ..LightingOptions::default()
        };
        let u = HemisphereUniform::from_options(&degenerate);
        assert_eq!(u.direction, [0.0, 1.0, 0.0, 0.0]);
    }
}
