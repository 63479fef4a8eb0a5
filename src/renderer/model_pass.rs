//! Lit model pass.
//!
//! Draws the loaded model as one indexed triangle list into the HDR color
//! target. Lighting comes entirely from the environment map: a blurred mip
//! for diffuse, a roughness-selected mip along the reflection vector for
//! specular. Until the real assets arrive the pass binds stand-ins (a flat
//! grey environment, a white base-color texture) so it never waits on
//! loading.

use glam::Mat4;
use wgpu::util::DeviceExt;

use crate::camera::{Camera, CameraUniform};
use crate::gpu::pipeline_helpers::{
    equirect_sampler, filtering_sampler, material_sampler, texture_2d,
    uniform_buffer,
};
use crate::gpu::render_context::RenderContext;
use crate::gpu::shader_composer::{ShaderComposer, ShaderError, MODEL_SHADER};
use crate::gpu::texture::{upload_environment, upload_rgba8};
use crate::renderer::pipeline_util;
use crate::scene::{
    normal_matrix, EnvironmentMap, MeshVertex, ModelMesh, Rgba8Image,
};

/// Per-model uniform (group 0, binding 1).
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshUniform {
    /// Object to world.
    pub model: [[f32; 4]; 4],
    /// Inverse-transpose of `model` for normals.
    pub normal_matrix: [[f32; 4]; 4],
    /// Linear RGBA multiplier on the base-color texture.
    pub base_color_factor: [f32; 4],
    /// Multiplier on all environment lighting.
    pub env_intensity: f32,
    /// Highest environment mip level.
    pub env_max_lod: f32,
    _pad: [f32; 2],
}

impl MeshUniform {
    /// Uniform for a model placed by `model`.
    ///
    /// A singular `model` (zero scale) gets an identity normal matrix.
    #[must_use]
    pub fn new(
        model: Mat4,
        base_color_factor: [f32; 4],
        env_intensity: f32,
        env_max_lod: f32,
    ) -> Self {
        let normal_matrix = Mat4::from_mat3(normal_matrix(model));
        Self {
            model: model.to_cols_array_2d(),
            normal_matrix: normal_matrix.to_cols_array_2d(),
            base_color_factor,
            env_intensity,
            env_max_lod,
            _pad: [0.0; 2],
        }
    }
}

/// Vertex and index buffers of the uploaded model.
struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

/// Pipeline, uniforms, and bound textures for drawing the model.
pub struct ModelPass {
    pipeline: wgpu::RenderPipeline,
    camera_buffer: wgpu::Buffer,
    mesh_buffer: wgpu::Buffer,
    frame_bind_group: wgpu::BindGroup,
    texture_layout: wgpu::BindGroupLayout,
    material_sampler: wgpu::Sampler,
    material_bind_group: wgpu::BindGroup,
    environment_sampler: wgpu::Sampler,
    environment_bind_group: wgpu::BindGroup,
    env_max_lod: f32,
    base_color_factor: [f32; 4],
    mesh: Option<GpuMesh>,
}

impl ModelPass {
    /// Build the pipeline with stand-in material and environment bindings.
    ///
    /// # Errors
    ///
    /// Returns [`ShaderError`] if the model shader fails to compose.
    pub fn new(
        context: &RenderContext,
        shader_composer: &mut ShaderComposer,
        fallback_environment: [f32; 3],
    ) -> Result<Self, ShaderError> {
        let device = &context.device;

        let camera_buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Camera Buffer"),
                contents: bytemuck::bytes_of(&CameraUniform::new()),
                usage: wgpu::BufferUsages::UNIFORM
                    | wgpu::BufferUsages::COPY_DST,
            });
        let mesh_buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Mesh Uniform Buffer"),
                contents: bytemuck::bytes_of(&MeshUniform::new(
                    Mat4::IDENTITY,
                    [1.0; 4],
                    1.0,
                    0.0,
                )),
                usage: wgpu::BufferUsages::UNIFORM
                    | wgpu::BufferUsages::COPY_DST,
            });

        let stages = wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT;
        let frame_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Model Frame Bind Group Layout"),
                entries: &[uniform_buffer(0, stages), uniform_buffer(1, stages)],
            });
        let frame_bind_group =
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("Model Frame Bind Group"),
                layout: &frame_layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: camera_buffer.as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: mesh_buffer.as_entire_binding(),
                    },
                ],
            });

        // Material (group 1) and environment (group 2) share one shape.
        let texture_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Model Texture Bind Group Layout"),
                entries: &[texture_2d(0), filtering_sampler(1)],
            });

        let material_sampler = material_sampler(device, "Base Color Sampler");
        let white = upload_rgba8(
            device,
            &context.queue,
            "Fallback Base Color",
            &Rgba8Image {
                width: 1,
                height: 1,
                pixels: vec![u8::MAX; 4],
            },
        );
        let material_bind_group = texture_bind_group(
            device,
            &texture_layout,
            "Base Color Bind Group",
            &white,
            &material_sampler,
        );

        let environment_sampler = equirect_sampler(device, "Environment Sampler");
        let grey = upload_environment(
            device,
            &context.queue,
            &EnvironmentMap::uniform(fallback_environment),
        );
        let environment_bind_group = texture_bind_group(
            device,
            &texture_layout,
            "Environment Bind Group",
            &grey,
            &environment_sampler,
        );

        let shader =
            shader_composer.compose(device, "Model Shader", MODEL_SHADER)?;
        let pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Model Pipeline Layout"),
                bind_group_layouts: &[
                    &frame_layout,
                    &texture_layout,
                    &texture_layout,
                ],
                push_constant_ranges: &[],
            });
        let pipeline =
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("Model Pipeline"),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs_main"),
                    buffers: &[MeshVertex::LAYOUT],
                    compilation_options: Default::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some("fs_main"),
                    targets: &[pipeline_util::hdr_fragment_target()],
                    compilation_options: Default::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    // glTF materials may be double-sided; the shader flips
                    // back-facing normals.
                    cull_mode: None,
                    ..Default::default()
                },
                depth_stencil: Some(pipeline_util::depth_stencil_state()),
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
                cache: None,
            });

        Ok(Self {
            pipeline,
            camera_buffer,
            mesh_buffer,
            frame_bind_group,
            texture_layout,
            material_sampler,
            material_bind_group,
            environment_sampler,
            environment_bind_group,
            env_max_lod: 0.0,
            base_color_factor: [1.0; 4],
            mesh: None,
        })
    }

    /// Upload `mesh` and its base-color texture, replacing any previous
    /// model. Empty meshes clear the model.
    pub fn set_model(&mut self, context: &RenderContext, mesh: &ModelMesh) {
        let Ok(index_count) = u32::try_from(mesh.indices.len()) else {
            log::error!("model has too many indices to draw");
            self.mesh = None;
            return;
        };
        if mesh.is_empty() {
            self.mesh = None;
            return;
        }
        let device = &context.device;
        let vertex_buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Model Vertex Buffer"),
                contents: bytemuck::cast_slice(&mesh.vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });
        let index_buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Model Index Buffer"),
                contents: bytemuck::cast_slice(&mesh.indices),
                usage: wgpu::BufferUsages::INDEX,
            });
        self.mesh = Some(GpuMesh {
            vertex_buffer,
            index_buffer,
            index_count,
        });

        self.base_color_factor = mesh.base_color_factor;
        let fallback = Rgba8Image {
            width: 1,
            height: 1,
            pixels: vec![u8::MAX; 4],
        };
        let image = mesh.base_color_texture.as_ref().unwrap_or(&fallback);
        let texture =
            upload_rgba8(device, &context.queue, "Base Color Texture", image);
        self.material_bind_group = texture_bind_group(
            device,
            &self.texture_layout,
            "Base Color Bind Group",
            &texture,
            &self.material_sampler,
        );
    }

    /// Upload `map` as the lighting environment.
    pub fn set_environment(
        &mut self,
        context: &RenderContext,
        map: &EnvironmentMap,
    ) {
        let texture = upload_environment(&context.device, &context.queue, map);
        self.env_max_lod = texture.mip_level_count().saturating_sub(1) as f32;
        self.environment_bind_group = texture_bind_group(
            &context.device,
            &self.texture_layout,
            "Environment Bind Group",
            &texture,
            &self.environment_sampler,
        );
    }

    /// `true` once a drawable model has been uploaded.
    #[must_use]
    pub fn has_model(&self) -> bool {
        self.mesh.is_some()
    }

    /// Write camera and model placement for this frame.
    pub fn update(
        &self,
        queue: &wgpu::Queue,
        camera: &Camera,
        model_matrix: Mat4,
        env_intensity: f32,
    ) {
        queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::bytes_of(&CameraUniform::from_camera(camera)),
        );
        let uniform = MeshUniform::new(
            model_matrix,
            self.base_color_factor,
            env_intensity,
            self.env_max_lod,
        );
        queue.write_buffer(&self.mesh_buffer, 0, bytemuck::bytes_of(&uniform));
    }

    /// Clear the targets to `clear_color` and draw the model if present.
    pub fn render(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        color_view: &wgpu::TextureView,
        depth_view: &wgpu::TextureView,
        clear_color: [f32; 4],
    ) {
        let [r, g, b, a] = clear_color.map(f64::from);
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Model Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color { r, g, b, a }),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(
                wgpu::RenderPassDepthStencilAttachment {
                    view: depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                },
            ),
            ..Default::default()
        });

        let Some(mesh) = &self.mesh else {
            return;
        };
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.frame_bind_group, &[]);
        pass.set_bind_group(1, &self.material_bind_group, &[]);
        pass.set_bind_group(2, &self.environment_bind_group, &[]);
        pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
        pass.set_index_buffer(
            mesh.index_buffer.slice(..),
            wgpu::IndexFormat::Uint32,
        );
        pass.draw_indexed(0..mesh.index_count, 0, 0..1);
    }
}

fn texture_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    label: &str,
    texture: &wgpu::Texture,
    sampler: &wgpu::Sampler,
) -> wgpu::BindGroup {
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(label),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
        ],
    })
}

#[cfg(test)]
mod tests {
    use glam::{Vec3, Vec4};

    use super::*;

    #[test]
    fn uniform_sizes_match_shader() {
        assert_eq!(size_of::<MeshUniform>(), 160);
        assert_eq!(size_of::<CameraUniform>(), 80);
    }

    #[test]
    fn normal_matrix_undoes_nonuniform_scale() {
        let model = Mat4::from_scale(Vec3::new(2.0, 1.0, 1.0));
        let u = MeshUniform::new(model, [1.0; 4], 1.0, 0.0);
        let normal = Mat4::from_cols_array_2d(&u.normal_matrix);
        let n = normal * Vec4::new(1.0, 1.0, 0.0, 0.0);
        assert!((n.x - 0.5).abs() < 1e-6);
        assert!((n.y - 1.0).abs() < 1e-6);
    }

    #[test]
    fn zero_scale_gets_identity_normals() {
        let u = MeshUniform::new(Mat4::from_scale(Vec3::ZERO), [1.0; 4], 1.0, 0.0);
        assert_eq!(u.normal_matrix, Mat4::IDENTITY.to_cols_array_2d());
    }

    #[test]
    fn small_fit_scale_keeps_rotated_normals() {
        let model = Mat4::from_scale_rotation_translation(
            Vec3::splat(0.004),
            glam::Quat::from_rotation_y(0.5),
            Vec3::ZERO,
        );
        let u = MeshUniform::new(model, [1.0; 4], 1.0, 0.0);
        let normal = Mat4::from_cols_array_2d(&u.normal_matrix);
        let n = (normal * Vec4::new(0.0, 0.0, 1.0, 0.0)).truncate().normalize();
        assert!((n - Vec3::new(0.479, 0.0, 0.878)).length() < 1e-3, "{n:?}");
    }
}
