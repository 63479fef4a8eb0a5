//! glTF 2.0 decoding into a single [`ModelMesh`].
//!
//! Every triangle primitive reachable from the default scene is merged into
//! one vertex/index list with its node's world transform baked in. The
//! base-color texture and factor of the first material that has a texture
//! are kept; everything else about materials is ignored.

use std::path::Path;

use glam::{Mat4, Vec3};
use gltf::mesh::Mode;

use super::AssetLoadError;
use crate::scene::{normal_matrix, MeshVertex, ModelMesh, Rgba8Image};

/// Raw attribute streams of one primitive.
#[derive(Debug, Default)]
pub(crate) struct PrimitiveGeometry {
    pub positions: Vec<[f32; 3]>,
    pub normals: Option<Vec<[f32; 3]>>,
    pub uvs: Option<Vec<[f32; 2]>>,
    pub indices: Option<Vec<u32>>,
}

/// Decode a `.gltf` (JSON) or `.glb` (binary) document.
///
/// External buffers and images resolve against `base_dir`; without one only
/// embedded (`data:` URI or GLB blob) resources can be read.
///
/// # Errors
///
/// [`AssetLoadError::Decode`] for malformed documents or unreadable
/// resources, [`AssetLoadError::EmptyModel`] when no triangles remain.
pub fn decode_gltf(
    bytes: &[u8],
    base_dir: Option<&Path>,
) -> Result<ModelMesh, AssetLoadError> {
    let gltf::Gltf { document, blob } =
        gltf::Gltf::from_slice(bytes).map_err(decode_error)?;
    let buffers = gltf::import_buffers(&document, base_dir, blob)
        .map_err(decode_error)?;
    let images = gltf::import_images(&document, base_dir, &buffers)
        .map_err(decode_error)?;

    let scene = document
        .default_scene()
        .or_else(|| document.scenes().next())
        .ok_or(AssetLoadError::EmptyModel)?;

    let mut mesh = ModelMesh {
        base_color_factor: [1.0; 4],
        ..ModelMesh::default()
    };
    let mut material_found = false;

    let mut stack: Vec<(gltf::Node<'_>, Mat4)> =
        scene.nodes().map(|node| (node, Mat4::IDENTITY)).collect();
    while let Some((node, parent)) = stack.pop() {
        let world =
            parent * Mat4::from_cols_array_2d(&node.transform().matrix());
        stack.extend(node.children().map(|child| (child, world)));

        let Some(node_mesh) = node.mesh() else {
            continue;
        };
        for primitive in node_mesh.primitives() {
            if primitive.mode() != Mode::Triangles {
                log::debug!(
                    "skipping {:?} primitive in mesh {}",
                    primitive.mode(),
                    node_mesh.index()
                );
                continue;
            }
            let reader = primitive.reader(|buffer| {
                buffers.get(buffer.index()).map(|data| data.0.as_slice())
            });
            let Some(positions) = reader.read_positions() else {
                continue;
            };
            let geometry = PrimitiveGeometry {
                positions: positions.collect(),
                normals: reader.read_normals().map(Iterator::collect),
                uvs: reader
                    .read_tex_coords(0)
                    .map(|coords| coords.into_f32().collect()),
                indices: reader
                    .read_indices()
                    .map(|indices| indices.into_u32().collect()),
            };
            append_primitive(&mut mesh, geometry, world)?;

            if !material_found {
                let pbr = primitive.material().pbr_metallic_roughness();
                if let Some(info) = pbr.base_color_texture() {
                    material_found = true;
                    mesh.base_color_factor = pbr.base_color_factor();
                    mesh.base_color_texture = images
                        .get(info.texture().source().index())
                        .and_then(to_rgba8);
                }
            }
        }
    }

    if mesh.is_empty() {
        return Err(AssetLoadError::EmptyModel);
    }
    Ok(mesh)
}

fn decode_error(e: gltf::Error) -> AssetLoadError {
    AssetLoadError::Decode(format!("glTF: {e}"))
}

/// Append one primitive to `mesh`, transformed by `world`.
///
/// Primitives without normals are expanded to unshared vertices carrying
/// their face normal.
pub(crate) fn append_primitive(
    mesh: &mut ModelMesh,
    geometry: PrimitiveGeometry,
    world: Mat4,
) -> Result<(), AssetLoadError> {
    let PrimitiveGeometry {
        positions,
        normals,
        uvs,
        indices,
    } = geometry;
    let vertex_count = u32::try_from(positions.len()).map_err(|_| {
        AssetLoadError::Decode("primitive has too many vertices".to_owned())
    })?;
    let mut indices =
        indices.unwrap_or_else(|| (0..vertex_count).collect());
    indices.truncate(indices.len() - indices.len() % 3);
    if let Some(bad) = indices.iter().find(|&&i| i >= vertex_count) {
        return Err(AssetLoadError::Decode(format!(
            "index {bad} out of range for {vertex_count} vertices"
        )));
    }

    let normal_matrix = normal_matrix(world);
    let uv_at = |i: usize| -> [f32; 2] {
        uvs.as_ref()
            .and_then(|uvs| uvs.get(i))
            .copied()
            .unwrap_or([0.0, 0.0])
    };
    let world_position =
        |i: usize| world.transform_point3(Vec3::from(positions[i]));

    let base = u32::try_from(mesh.vertices.len()).map_err(|_| {
        AssetLoadError::Decode("model has too many vertices".to_owned())
    })?;

    match normals.filter(|n| n.len() == positions.len()) {
        Some(normals) => {
            mesh.vertices.extend((0..positions.len()).map(|i| MeshVertex {
                position: world_position(i).to_array(),
                normal: (normal_matrix * Vec3::from(normals[i]))
                    .normalize_or(Vec3::Z)
                    .to_array(),
                uv: uv_at(i),
            }));
            mesh.indices.extend(indices.iter().map(|&i| base + i));
        }
        None => {
            for (corner, triangle) in indices.chunks_exact(3).enumerate() {
                let [a, b, c] = [triangle[0], triangle[1], triangle[2]]
                    .map(|i| i as usize);
                let (pa, pb, pc) =
                    (world_position(a), world_position(b), world_position(c));
                let normal =
                    (pb - pa).cross(pc - pa).normalize_or(Vec3::Z).to_array();
                mesh.vertices.extend([a, b, c].into_iter().zip([pa, pb, pc]).map(
                    |(i, p)| MeshVertex {
                        position: p.to_array(),
                        normal,
                        uv: uv_at(i),
                    },
                ));
                let first = base + 3 * corner as u32;
                mesh.indices.extend([first, first + 1, first + 2]);
            }
        }
    }
    Ok(())
}

/// Expand 8-bit glTF images to RGBA8. Other pixel formats are dropped and
/// the material falls back to its factor alone.
fn to_rgba8(image: &gltf::image::Data) -> Option<Rgba8Image> {
    use gltf::image::Format;

    let pixels: Vec<u8> = match image.format {
        Format::R8G8B8A8 => image.pixels.clone(),
        Format::R8G8B8 => image
            .pixels
            .chunks_exact(3)
            .flat_map(|p| [p[0], p[1], p[2], u8::MAX])
            .collect(),
        Format::R8G8 => image
            .pixels
            .chunks_exact(2)
            .flat_map(|p| [p[0], p[0], p[0], p[1]])
            .collect(),
        Format::R8 => image
            .pixels
            .iter()
            .flat_map(|&v| [v, v, v, u8::MAX])
            .collect(),
        other => {
            log::warn!(
                "unsupported base color texture format {other:?}, using \
                 factor only"
            );
            return None;
        }
    };
    Some(Rgba8Image {
        width: image.width,
        height: image.height,
        pixels,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// One triangle at z = 0, node translated to z = 5, no normals.
    const TRIANGLE_GLTF: &str = r#"{
        "asset": { "version": "2.0" },
        "scene": 0,
        "scenes": [{ "nodes": [0] }],
        "nodes": [{ "mesh": 0, "translation": [0.0, 0.0, 5.0] }],
        "meshes": [{
            "primitives": [{ "attributes": { "POSITION": 0 }, "indices": 1 }]
        }],
        "buffers": [{
            "byteLength": 44,
            "uri": "data:application/octet-stream;base64,AAAAAAAAAAAAAAAAAACAPwAAAAAAAAAAAAAAAAAAgD8AAAAAAAABAAIAAAA="
        }],
        "bufferViews": [
            { "buffer": 0, "byteOffset": 0, "byteLength": 36 },
            { "buffer": 0, "byteOffset": 36, "byteLength": 6 }
        ],
        "accessors": [
            {
                "bufferView": 0, "componentType": 5126, "count": 3,
                "type": "VEC3", "min": [0.0, 0.0, 0.0], "max": [1.0, 1.0, 0.0]
            },
            {
                "bufferView": 1, "componentType": 5123, "count": 3,
                "type": "SCALAR"
            }
        ]
    }"#;

    fn triangle() -> PrimitiveGeometry {
        PrimitiveGeometry {
            positions: vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            ..PrimitiveGeometry::default()
        }
    }

    #[test]
    fn embedded_triangle_decodes_with_node_transform() {
        let mesh = decode_gltf(TRIANGLE_GLTF.as_bytes(), None).unwrap();
        assert_eq!(mesh.triangle_count(), 1);
        assert!(mesh.vertices.iter().all(|v| v.position[2] == 5.0));
        assert!(mesh.vertices.iter().all(|v| v.normal == [0.0, 0.0, 1.0]));
        assert!(mesh.vertices.iter().all(|v| v.uv == [0.0, 0.0]));
        assert!(mesh.base_color_texture.is_none());
        assert_eq!(mesh.base_color_factor, [1.0; 4]);
    }

    #[test]
    fn garbage_is_decode_error() {
        let err = decode_gltf(b"not a gltf", None).unwrap_err();
        assert!(matches!(err, AssetLoadError::Decode(_)));
    }

    #[test]
    fn missing_normals_become_flat_face_normals() {
        let mut mesh = ModelMesh::default();
        let mut quad = triangle();
        quad.positions.push([1.0, 1.0, 0.0]);
        quad.indices = Some(vec![0, 1, 2, 1, 3, 2]);
        append_primitive(&mut mesh, quad, Mat4::IDENTITY).unwrap();

        // Unshared corners: two triangles, six vertices.
        assert_eq!(mesh.vertices.len(), 6);
        assert_eq!(mesh.indices, vec![0, 1, 2, 3, 4, 5]);
        for v in &mesh.vertices {
            assert!((Vec3::from(v.normal) - Vec3::Z).length() < 1e-6);
        }
    }

    #[test]
    fn provided_normals_follow_rotation() {
        let mut mesh = ModelMesh::default();
        let mut geometry = triangle();
        geometry.normals = Some(vec![[0.0, 0.0, 1.0]; 3]);
        let world = Mat4::from_rotation_y(std::f32::consts::FRAC_PI_2)
            * Mat4::from_scale(Vec3::new(2.0, 1.0, 1.0));
        append_primitive(&mut mesh, geometry, world).unwrap();

        assert_eq!(mesh.indices, vec![0, 1, 2]);
        let n = Vec3::from(mesh.vertices[0].normal);
        assert!((n - Vec3::X).length() < 1e-5, "{n:?}");
        assert!((n.length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn millimetre_node_normals_follow_rotation() {
        let mut mesh = ModelMesh::default();
        let mut geometry = triangle();
        geometry.normals = Some(vec![[0.0, 0.0, 1.0]; 3]);
        let world = Mat4::from_rotation_x(-std::f32::consts::FRAC_PI_2)
            * Mat4::from_scale(Vec3::splat(0.001));
        append_primitive(&mut mesh, geometry, world).unwrap();

        let n = Vec3::from(mesh.vertices[0].normal);
        assert!((n - Vec3::Y).length() < 1e-5, "{n:?}");
    }

    #[test]
    fn second_primitive_offsets_indices() {
        let mut mesh = ModelMesh::default();
        let mut first = triangle();
        first.normals = Some(vec![[0.0, 0.0, 1.0]; 3]);
        let mut second = triangle();
        second.normals = Some(vec![[0.0, 0.0, 1.0]; 3]);
        second.uvs = Some(vec![[0.5, 0.5]; 3]);
        append_primitive(&mut mesh, first, Mat4::IDENTITY).unwrap();
        append_primitive(&mut mesh, second, Mat4::IDENTITY).unwrap();
        assert_eq!(mesh.indices, vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(mesh.vertices[4].uv, [0.5, 0.5]);
        assert_eq!(mesh.vertices[0].uv, [0.0, 0.0]);
    }

    #[test]
    fn out_of_range_index_rejected() {
        let mut mesh = ModelMesh::default();
        let mut geometry = triangle();
        geometry.indices = Some(vec![0, 1, 7]);
        let err =
            append_primitive(&mut mesh, geometry, Mat4::IDENTITY).unwrap_err();
        assert!(matches!(err, AssetLoadError::Decode(_)));
    }

    #[test]
    fn trailing_partial_triangle_dropped() {
        let mut mesh = ModelMesh::default();
        let mut geometry = triangle();
        geometry.normals = Some(vec![[0.0, 0.0, 1.0]; 3]);
        geometry.indices = Some(vec![0, 1, 2, 0]);
        append_primitive(&mut mesh, geometry, Mat4::IDENTITY).unwrap();
        assert_eq!(mesh.indices.len(), 3);
    }
}
