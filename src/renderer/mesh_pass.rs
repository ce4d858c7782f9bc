//! Indexed scene meshes and their per-object uniforms.
//!
//! Every object in the scene draws through one pipeline. What differs per
//! object (transform, colour, lit or unlit, textured or not) lives in a
//! [`ModelUniform`] bound at group 1.

use glam::Mat4;
use wgpu::util::DeviceExt;

use crate::gpu::pipeline_helpers::uniform_bind_group;
use crate::renderer::pipeline_util;
use crate::scene::mesh_gen::MeshData;
use crate::util::color::hex_to_linear;

/// How a surface responds to the hemisphere light.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shading {
    /// Base colour times hemisphere irradiance.
    Lit,
    /// Base colour only.
    Unlit,
}

/// Per-object uniform.
/// NOTE: Must match `ModelUniform` in `scene.wgsl` (160 bytes).
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ModelUniform {
    /// Object-to-world matrix.
    pub model: [[f32; 4]; 4],
    /// Inverse-transpose of `model` for normals.
    pub normal_matrix: [[f32; 4]; 4],
    /// Linear base colour, a = 1.
    pub color: [f32; 4],
    /// x: 1 when unlit. y: 1 when the albedo texture applies.
    pub flags: [f32; 4],
}

impl ModelUniform {
    /// Uniform for an object with the given transform and sRGB hex colour.
    #[must_use]
    pub fn new(model: Mat4, color: u32, shading: Shading, textured: bool) -> Self {
        let [r, g, b] = hex_to_linear(color);
        let unlit = if shading == Shading::Unlit { 1.0 } else { 0.0 };
        let textured = if textured { 1.0 } else { 0.0 };
        Self {
            model: model.to_cols_array_2d(),
            normal_matrix: model.inverse().transpose().to_cols_array_2d(),
            color: [r, g, b, 1.0],
            flags: [unlit, textured, 0.0, 0.0],
        }
    }
}

/// A model uniform buffer plus its group-1 bind group.
pub struct ModelBinding {
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl ModelBinding {
    /// Upload `uniform` into a new buffer bound through `layout`.
    #[must_use]
    pub fn new(
        device: &wgpu::Device,
        label: &str,
        layout: &wgpu::BindGroupLayout,
        uniform: &ModelUniform,
    ) -> Self {
        let buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents: bytemuck::bytes_of(uniform),
                usage: wgpu::BufferUsages::UNIFORM
                    | wgpu::BufferUsages::COPY_DST,
            });
        let bind_group = uniform_bind_group(device, label, layout, &buffer);
        Self { buffer, bind_group }
    }

    /// Overwrite the uniform.
    pub fn write(&self, queue: &wgpu::Queue, uniform: &ModelUniform) {
        queue.write_buffer(&self.buffer, 0, bytemuck::bytes_of(uniform));
    }

    /// Group-1 bind group.
    #[must_use]
    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}

/// Immutable vertex + index buffers for one mesh.
pub struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

impl GpuMesh {
    /// Upload `mesh`.
    #[must_use]
    pub fn new(device: &wgpu::Device, label: &str, mesh: &MeshData) -> Self {
        let vertex_buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{label} Vertices")),
                contents: bytemuck::cast_slice(&mesh.vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });
        let index_buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{label} Indices")),
                contents: bytemuck::cast_slice(&mesh.indices),
                usage: wgpu::BufferUsages::INDEX,
            });
        Self {
            vertex_buffer,
            index_buffer,
            index_count: mesh.indices.len() as u32,
        }
    }

    /// Bind buffers and draw. Caller sets pipeline and bind groups.
    pub fn draw(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.set_index_buffer(
            self.index_buffer.slice(..),
            wgpu::IndexFormat::Uint32,
        );
        render_pass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}

/// Everything that varies between the scene's mesh-style pipelines.
pub(crate) struct MeshPipelineDesc<'a> {
    pub label: &'a str,
    pub shader: &'a wgpu::ShaderModule,
    pub format: wgpu::TextureFormat,
    pub primitive: wgpu::PrimitiveState,
    pub depth: wgpu::DepthStencilState,
    pub bind_group_layouts: &'a [&'a wgpu::BindGroupLayout],
    pub vertex_layout: wgpu::VertexBufferLayout<'static>,
}

/// Create an indexed-mesh or line render pipeline.
pub(crate) fn create_mesh_pipeline(
    device: &wgpu::Device,
    desc: MeshPipelineDesc<'_>,
) -> wgpu::RenderPipeline {
    let label = desc.label;
    let pipeline_layout =
        device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some(&format!("{label} Layout")),
            bind_group_layouts: desc.bind_group_layouts,
            push_constant_ranges: &[],
        });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(&pipeline_layout),
        vertex: wgpu::VertexState {
            module: desc.shader,
            entry_point: Some("vs_main"),
            buffers: &[desc.vertex_layout],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: desc.shader,
            entry_point: Some("fs_main"),
            targets: &pipeline_util::color_target(desc.format),
            compilation_options: Default::default(),
        }),
        primitive: desc.primitive,
        depth_stencil: Some(desc.depth),
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}

#[cfg(test)]
mod tests {
    use glam::{Quat, Vec3};

    use super::*;

    #[test]
    fn model_uniform_is_160_bytes() {
        assert_eq!(size_of::<ModelUniform>(), 160);
    }

    #[test]
    fn flags_encode_shading_and_texture() {
        let lit = ModelUniform::new(Mat4::IDENTITY, 0x004f_709c, Shading::Lit, false);
        assert_eq!(lit.flags, [0.0, 0.0, 0.0, 0.0]);
        let ground =
            ModelUniform::new(Mat4::IDENTITY, 0x007d_7c7c, Shading::Unlit, true);
        assert_eq!(ground.flags, [1.0, 1.0, 0.0, 0.0]);
        assert_eq!(ground.color[3], 1.0);
    }

    #[test]
    fn rigid_normal_matrix_is_the_rotation() {
        let rotation = Quat::from_rotation_y(0.7);
        let model =
            Mat4::from_rotation_translation(rotation, Vec3::new(3.0, -1.0, 2.0));
        let u = ModelUniform::new(model, 0x00ff_ffff, Shading::Lit, false);
        let n = Mat4::from_cols_array_2d(&u.normal_matrix);
        let mapped = n.transform_vector3(Vec3::X);
        assert!((mapped - rotation * Vec3::X).length() < 1e-5);
    }
}
