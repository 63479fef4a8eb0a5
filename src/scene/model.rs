//! CPU-side model geometry and the loaded model instance.

use glam::Vec3;

use super::bounds::BoundingBox;
use super::transform::{Orientation, Renderable, Transform};

/// Interleaved mesh vertex uploaded as-is to the GPU.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshVertex {
    /// Object-space position.
    pub position: [f32; 3],
    /// Object-space unit normal.
    pub normal: [f32; 3],
    /// Base-color texture coordinate.
    pub uv: [f32; 2],
}

impl MeshVertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        0 => Float32x3,
        1 => Float32x3,
        2 => Float32x2
    ];

    /// Vertex buffer layout matching `model.wgsl` locations 0..=2.
    pub const LAYOUT: wgpu::VertexBufferLayout<'static> =
        wgpu::VertexBufferLayout {
            array_stride: size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        };
}

/// Tightly packed RGBA8 image (sRGB encoded).
#[derive(Debug, Clone, PartialEq)]
pub struct Rgba8Image {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// `width * height * 4` bytes, row-major.
    pub pixels: Vec<u8>,
}

/// Decoded model geometry with its base-color material.
#[derive(Debug, Clone, Default)]
pub struct ModelMesh {
    /// Vertices with node transforms already applied.
    pub vertices: Vec<MeshVertex>,
    /// Triangle-list indices into `vertices`.
    pub indices: Vec<u32>,
    /// Base-color texture, if the material has one.
    pub base_color_texture: Option<Rgba8Image>,
    /// Linear RGBA multiplier on the base color.
    pub base_color_factor: [f32; 4],
}

impl ModelMesh {
    /// Object-space bounds of every vertex.
    #[must_use]
    pub fn bounds(&self) -> BoundingBox {
        BoundingBox::from_points(
            self.vertices.iter().map(|v| Vec3::from(v.position)),
        )
    }

    /// Number of whole triangles in the index list.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// `true` when there is nothing to draw.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.indices.len() < 3
    }
}

/// A loaded model placed in the scene.
#[derive(Debug, Clone)]
pub struct Model {
    mesh: ModelMesh,
    local_bounds: BoundingBox,
    /// Current placement.
    pub transform: Transform,
}

impl Model {
    /// Wrap `mesh` with an identity transform.
    #[must_use]
    pub fn new(mesh: ModelMesh) -> Self {
        let local_bounds = mesh.bounds();
        Self {
            mesh,
            local_bounds,
            transform: Transform::IDENTITY,
        }
    }

    /// Geometry and material.
    #[must_use]
    pub fn mesh(&self) -> &ModelMesh {
        &self.mesh
    }

    /// Object-space bounds, computed once at construction.
    #[must_use]
    pub fn local_bounds(&self) -> BoundingBox {
        self.local_bounds
    }
}

impl Renderable for Model {
    fn bounding_box(&self) -> BoundingBox {
        self.local_bounds.transformed(&self.transform.matrix())
    }

    fn set_scale(&mut self, scale: f32) {
        self.transform.scale = scale;
    }

    fn set_position(&mut self, position: Vec3) {
        self.transform.position = position;
    }

    fn set_rotation(&mut self, yaw: f32, pitch: f32) {
        self.transform.rotation = Orientation::new(yaw, pitch);
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Mesh whose vertices span exactly `min..max`.
    pub(crate) fn box_mesh(min: Vec3, max: Vec3) -> ModelMesh {
        let vertices = [
            [min.x, min.y, min.z],
            [max.x, min.y, min.z],
            [max.x, max.y, min.z],
            [min.x, max.y, max.z],
            [max.x, max.y, max.z],
        ]
        .into_iter()
        .map(|position| MeshVertex {
            position,
            normal: [0.0, 0.0, 1.0],
            uv: [0.0, 0.0],
        })
        .collect();
        ModelMesh {
            vertices,
            indices: vec![0, 1, 2, 2, 3, 4],
            base_color_texture: None,
            base_color_factor: [1.0; 4],
        }
    }

    #[test]
    fn local_bounds_cover_vertices() {
        let mesh = box_mesh(Vec3::new(-1.0, -2.0, -1.0), Vec3::new(3.0, 2.0, 1.0));
        let model = Model::new(mesh);
        assert_eq!(model.local_bounds().size(), Vec3::new(4.0, 4.0, 2.0));
        assert_eq!(model.mesh().triangle_count(), 2);
    }

    #[test]
    fn world_bounds_follow_transform() {
        let mut model =
            Model::new(box_mesh(Vec3::splat(-1.0), Vec3::splat(1.0)));
        model.set_scale(0.5);
        model.set_position(Vec3::new(0.0, 1.0, 0.0));
        let b = model.bounding_box();
        assert!((b.center() - Vec3::new(0.0, 1.0, 0.0)).length() < 1e-6);
        assert!((b.max_dimension() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn set_rotation_stores_yaw_and_pitch() {
        let mut model = Model::new(box_mesh(Vec3::ZERO, Vec3::ONE));
        model.set_rotation(0.25, -0.1);
        assert_eq!(model.transform.rotation, Orientation::new(0.25, -0.1));
    }

    #[test]
    fn empty_mesh_reports_empty() {
        assert!(ModelMesh::default().is_empty());
    }
}
