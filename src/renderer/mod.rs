//! Scene renderer.
//!
//! Draws the ground slab, the centre box, and both cone markers once per
//! visible view into a single render pass. Each view gets its own
//! viewport, scissor, background fill, and view uniform. The translate
//! gizmo is drawn on top of the overview only.

mod mesh_pass;
pub(crate) mod pipeline_util;

pub use mesh_pass::{GpuMesh, ModelBinding, ModelUniform, Shading};
use mesh_pass::{create_mesh_pipeline, MeshPipelineDesc};
use bytemuck::Zeroable;
use glam::Mat4;
use wgpu::util::DeviceExt;

use crate::camera::ViewUniform;
use crate::error::TriviewError;
use crate::gizmo::GizmoVertex;
use crate::gpu::dynamic_buffer::DynamicBuffer;
use crate::gpu::lighting::HemisphereLight;
use crate::gpu::pipeline_helpers::{
    create_screen_space_pipeline, filtering_sampler, repeat_sampler,
    texture_2d, uniform_bind_group, uniform_layout,
};
use crate::gpu::render_context::RenderContext;
use crate::gpu::shader_composer::{Shader, ShaderComposer};
use crate::gpu::texture::{ImageData, SampledTexture};
use crate::options::LightingOptions;
use crate::scene::mesh_gen::{box_mesh, cone_mesh, MeshVertex};
use crate::scene::{
    ground_transform, SceneState, TrackedCamera, BOX_COLOR, GROUND_COLOR,
};
use crate::util::color::hex_to_linear;
use crate::viewport::{ViewId, ViewLayout};

/// Tiled texture modulating the ground colour.
const GROUND_PNG: &[u8] = include_bytes!("../../assets/textures/ground.png");
/// Cone tessellation.
const CONE_SEGMENTS: u32 = 16;

/// View uniform buffer and its group-0 bind group.
struct ViewBinding {
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

/// One drawable: a mesh, its model uniform, and its material bind group.
struct SceneObject {
    mesh: Mesh,
    model: ModelBinding,
    material: Material,
}

#[derive(Clone, Copy)]
enum Mesh {
    Ground,
    Box,
    Cone,
}

#[derive(Clone, Copy)]
enum Material {
    Ground,
    White,
}

struct Layouts {
    view: wgpu::BindGroupLayout,
    model: wgpu::BindGroupLayout,
    material: wgpu::BindGroupLayout,
}

impl Layouts {
    fn new(device: &wgpu::Device) -> Self {
        Self {
            view: uniform_layout(device, "View Layout"),
            model: uniform_layout(device, "Model Layout"),
            material: device.create_bind_group_layout(
                &wgpu::BindGroupLayoutDescriptor {
                    label: Some("Material Layout"),
                    entries: &[texture_2d(0), filtering_sampler(1)],
                },
            ),
        }
    }
}

struct Pipelines {
    background: wgpu::RenderPipeline,
    scene: wgpu::RenderPipeline,
    gizmo: wgpu::RenderPipeline,
}

impl Pipelines {
    fn new(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        layouts: &Layouts,
        light_layout: &wgpu::BindGroupLayout,
    ) -> Result<Self, TriviewError> {
        let mut composer = ShaderComposer::new()?;

        let background_shader =
            composer.compose(device, "Background Shader", Shader::Background)?;
        let background = create_screen_space_pipeline(
            device,
            "Background",
            &background_shader,
            format,
            Some(pipeline_util::overlay_depth_state()),
            &[&layouts.view],
        );

        let scene_shader =
            composer.compose(device, "Scene Shader", Shader::Scene)?;
        let scene = create_mesh_pipeline(
            device,
            MeshPipelineDesc {
                label: "Scene Pipeline",
                shader: &scene_shader,
                format,
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    cull_mode: Some(wgpu::Face::Back),
                    ..Default::default()
                },
                depth: pipeline_util::depth_stencil_state(),
                bind_group_layouts: &[
                    &layouts.view,
                    &layouts.model,
                    &layouts.material,
                    light_layout,
                ],
                vertex_layout: MeshVertex::layout(),
            },
        );

        let gizmo_shader =
            composer.compose(device, "Gizmo Shader", Shader::Gizmo)?;
        let gizmo = create_mesh_pipeline(
            device,
            MeshPipelineDesc {
                label: "Gizmo Pipeline",
                shader: &gizmo_shader,
                format,
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::LineList,
                    ..Default::default()
                },
                depth: pipeline_util::overlay_depth_state(),
                bind_group_layouts: &[&layouts.view],
                vertex_layout: GizmoVertex::layout(),
            },
        );

        Ok(Self {
            background,
            scene,
            gizmo,
        })
    }
}

struct Materials {
    ground: wgpu::BindGroup,
    white: wgpu::BindGroup,
}

impl Materials {
    fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
    ) -> Result<Self, TriviewError> {
        let sampler = repeat_sampler(device, "Material Sampler");
        let bind = |label: &str, texture: &SampledTexture| {
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(label),
                layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::TextureView(
                            &texture.view,
                        ),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::Sampler(&sampler),
                    },
                ],
            })
        };
        let ground = SampledTexture::from_rgba(
            device,
            queue,
            "Ground Texture",
            &ImageData::from_bytes(GROUND_PNG)?,
        );
        Ok(Self {
            ground: bind("Ground Material", &ground),
            white: bind(
                "White Material",
                &SampledTexture::white(device, queue),
            ),
        })
    }
}

/// Owns every GPU resource needed to draw the three views.
pub struct SceneRenderer {
    pipelines: Pipelines,
    views: [ViewBinding; 3],
    light: HemisphereLight,
    materials: Materials,

    ground_mesh: GpuMesh,
    box_mesh: GpuMesh,
    cone_mesh: GpuMesh,

    ground: SceneObject,
    centre_box: SceneObject,
    green_cone: SceneObject,
    red_cone: SceneObject,

    gizmo_vertices: DynamicBuffer,
    gizmo_vertex_count: u32,
}

impl SceneRenderer {
    /// Compose shaders and build pipelines, meshes, and uniforms.
    ///
    /// # Errors
    ///
    /// Returns [`TriviewError::ShaderCompose`] if a shader fails to compose
    /// and [`TriviewError::Texture`] if the ground texture fails to decode.
    pub fn new(
        context: &RenderContext,
        lighting: &LightingOptions,
    ) -> Result<Self, TriviewError> {
        let device = &context.device;
        let layouts = Layouts::new(device);
        let light = HemisphereLight::new(device, lighting);
        let pipelines =
            Pipelines::new(device, context.format(), &layouts, &light.layout)?;

        let views = ViewId::ALL.map(|view| {
            let label = format!("{view:?} View");
            let buffer =
                device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(&label),
                    contents: bytemuck::bytes_of(&ViewUniform::zeroed()),
                    usage: wgpu::BufferUsages::UNIFORM
                        | wgpu::BufferUsages::COPY_DST,
                });
            let bind_group =
                uniform_bind_group(device, &label, &layouts.view, &buffer);
            ViewBinding { buffer, bind_group }
        });

        let object = |label: &str, mesh, material, uniform: ModelUniform| {
            SceneObject {
                mesh,
                model: ModelBinding::new(device, label, &layouts.model, &uniform),
                material,
            }
        };
        let cone = |camera: TrackedCamera| {
            object(
                &format!("{camera:?} Cone Model"),
                Mesh::Cone,
                Material::White,
                ModelUniform::new(Mat4::IDENTITY, camera.color(), Shading::Lit, false),
            )
        };

        Ok(Self {
            materials: Materials::new(device, &context.queue, &layouts.material)?,
            ground: object(
                "Ground Model",
                Mesh::Ground,
                Material::Ground,
                ModelUniform::new(
                    ground_transform(),
                    GROUND_COLOR,
                    Shading::Unlit,
                    true,
                ),
            ),
            centre_box: object(
                "Box Model",
                Mesh::Box,
                Material::White,
                ModelUniform::new(Mat4::IDENTITY, BOX_COLOR, Shading::Lit, false),
            ),
            green_cone: cone(TrackedCamera::Green),
            red_cone: cone(TrackedCamera::Red),
            ground_mesh: GpuMesh::new(device, "Ground", &box_mesh(10.0, 0.1, 10.0)),
            box_mesh: GpuMesh::new(device, "Box", &box_mesh(1.0, 1.0, 1.0)),
            cone_mesh: GpuMesh::new(
                device,
                "Cone",
                &cone_mesh(0.5, 1.0, CONE_SEGMENTS),
            ),
            gizmo_vertices: DynamicBuffer::new(
                device,
                "Gizmo Vertices",
                size_of::<GizmoVertex>() * 6,
                wgpu::BufferUsages::VERTEX,
            ),
            gizmo_vertex_count: 0,
            pipelines,
            views,
            light,
        })
    }

    /// Upload this frame's view uniforms, cone transforms, light, and gizmo
    /// lines.
    pub fn prepare(
        &mut self,
        context: &RenderContext,
        scene: &SceneState,
        lighting: &LightingOptions,
        gizmo: &[GizmoVertex],
    ) {
        let queue = &context.queue;
        for (view, binding) in ViewId::ALL.into_iter().zip(&self.views) {
            let uniform = ViewUniform::new(
                scene.camera(view),
                hex_to_linear(view.spec().background),
            );
            queue.write_buffer(&binding.buffer, 0, bytemuck::bytes_of(&uniform));
        }

        for camera in TrackedCamera::ALL {
            let object = match camera {
                TrackedCamera::Green => &self.green_cone,
                TrackedCamera::Red => &self.red_cone,
            };
            object.model.write(
                queue,
                &ModelUniform::new(
                    scene.cone(camera).model_matrix(),
                    camera.color(),
                    Shading::Lit,
                    false,
                ),
            );
        }

        self.light.apply(queue, lighting);

        let _ = self.gizmo_vertices.write(&context.device, queue, gizmo);
        self.gizmo_vertex_count = gizmo.len() as u32;
    }

    /// Record the frame's single render pass into `encoder`.
    pub fn encode(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        target: &wgpu::TextureView,
        depth: &wgpu::TextureView,
        layout: &ViewLayout,
    ) {
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Scene Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(
                wgpu::RenderPassDepthStencilAttachment {
                    view: depth,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Discard,
                    }),
                    stencil_ops: None,
                },
            ),
            ..Default::default()
        });

        for (view, rect) in layout.visible() {
            pass.set_viewport(
                rect.x as f32,
                rect.y as f32,
                rect.width as f32,
                rect.height as f32,
                0.0,
                1.0,
            );
            pass.set_scissor_rect(rect.x, rect.y, rect.width, rect.height);
            pass.set_bind_group(0, &self.view_binding(view).bind_group, &[]);

            pass.set_pipeline(&self.pipelines.background);
            pass.draw(0..3, 0..1);

            pass.set_pipeline(&self.pipelines.scene);
            pass.set_bind_group(3, &self.light.bind_group, &[]);
            for object in [
                &self.ground,
                &self.centre_box,
                &self.green_cone,
                &self.red_cone,
            ] {
                self.draw_object(&mut pass, object);
            }

            if view == ViewId::Overview && self.gizmo_vertex_count > 0 {
                pass.set_pipeline(&self.pipelines.gizmo);
                pass.set_vertex_buffer(0, self.gizmo_vertices.buffer().slice(..));
                pass.draw(0..self.gizmo_vertex_count, 0..1);
            }
        }
    }

    fn view_binding(&self, view: ViewId) -> &ViewBinding {
        match view {
            ViewId::Overview => &self.views[0],
            ViewId::Green => &self.views[1],
            ViewId::Red => &self.views[2],
        }
    }

    fn draw_object(&self, pass: &mut wgpu::RenderPass<'_>, object: &SceneObject) {
        let material = match object.material {
            Material::Ground => &self.materials.ground,
            Material::White => &self.materials.white,
        };
        let mesh = match object.mesh {
            Mesh::Ground => &self.ground_mesh,
            Mesh::Box => &self.box_mesh,
            Mesh::Cone => &self.cone_mesh,
        };
        pass.set_bind_group(1, object.model.bind_group(), &[]);
        pass.set_bind_group(2, material, &[]);
        mesh.draw(pass);
    }
}
