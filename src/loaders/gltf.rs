use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};
use std::thread;

use anyhow::{Context, Result};
use glam::{Mat3, Mat4, Vec3};

/// One glTF primitive flattened into file space, ready for upload.
pub struct ModelPart {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub indices: Vec<u32>,
    pub base_color: [f32; 4],
    pub emissive: [f32; 3],
}

/// Geometry of the loaded model. Node transforms are baked in; the scene's
/// own placement (position, spin, scale) is applied per frame on top.
pub struct ModelMesh {
    pub parts: Vec<ModelPart>,
}

impl ModelMesh {
    pub fn vertex_count(&self) -> usize {
        self.parts.iter().map(|p| p.positions.len()).sum()
    }

    pub fn triangle_count(&self) -> usize {
        self.parts.iter().map(|p| p.indices.len() / 3).sum()
    }
}

/// Start loading on a background thread. Exactly one result ever arrives on
/// the returned channel; the frame loop polls it with `try_recv`.
pub fn spawn_load(path: PathBuf) -> Receiver<Result<ModelMesh>> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        // The receiver may already be gone if the window closed early.
        let _ = tx.send(load_model(&path));
    });
    rx
}

/// Load a glTF/glb file and flatten every mesh primitive.
pub fn load_model(path: impl AsRef<Path>) -> Result<ModelMesh> {
    let path = path.as_ref();
    let (gltf, buffers, _images) =
        gltf::import(path).with_context(|| format!("failed to load model file {:?}", path))?;

    let mut parts = Vec::new();
    for scene in gltf.scenes() {
        for node in scene.nodes() {
            collect_node(&node, &buffers, &Mat4::IDENTITY, &mut parts)?;
        }
    }

    if parts.is_empty() {
        anyhow::bail!("model file {:?} contains no mesh primitives", path);
    }

    let mesh = ModelMesh { parts };
    log::info!(
        "model loaded: {:?} ({} parts, {} vertices, {} triangles)",
        path,
        mesh.parts.len(),
        mesh.vertex_count(),
        mesh.triangle_count()
    );
    Ok(mesh)
}

fn collect_node(
    node: &gltf::Node,
    buffers: &[gltf::buffer::Data],
    parent_transform: &Mat4,
    parts: &mut Vec<ModelPart>,
) -> Result<()> {
    let local_transform = Mat4::from_cols_array_2d(&node.transform().matrix());
    let global_transform = *parent_transform * local_transform;

    if let Some(mesh) = node.mesh() {
        collect_mesh(&mesh, buffers, &global_transform, parts)?;
    }

    for child in node.children() {
        collect_node(&child, buffers, &global_transform, parts)?;
    }

    Ok(())
}

fn collect_mesh(
    mesh: &gltf::Mesh,
    buffers: &[gltf::buffer::Data],
    transform: &Mat4,
    parts: &mut Vec<ModelPart>,
) -> Result<()> {
    let normal_matrix = Mat3::from_mat4(*transform).inverse().transpose();

    for primitive in mesh.primitives() {
        let reader = primitive.reader(|buffer| Some(&buffers[buffer.index()]));

        let positions: Vec<Vec3> = reader
            .read_positions()
            .context("mesh primitive has no positions")?
            .map(|pos| transform.transform_point3(Vec3::from_array(pos)))
            .collect();

        if positions.is_empty() {
            continue;
        }

        let indices: Vec<u32> = match reader.read_indices() {
            Some(indices) => indices.into_u32().collect(),
            // Unindexed primitives are a plain triangle list.
            None => (0..positions.len() as u32).collect(),
        };

        let normals: Vec<Vec3> = match reader.read_normals() {
            Some(normals) => normals
                .map(|n| {
                    (normal_matrix * Vec3::from_array(n))
                        .try_normalize()
                        .unwrap_or(Vec3::Y)
                })
                .collect(),
            None => computed_normals(&positions, &indices),
        };

        let material = primitive.material();
        let base_color = material.pbr_metallic_roughness().base_color_factor();
        let emissive = material.emissive_factor();

        parts.push(ModelPart {
            positions,
            normals,
            indices,
            base_color,
            emissive,
        });
    }

    Ok(())
}

/// Area-weighted vertex normals for primitives that ship without them.
fn computed_normals(positions: &[Vec3], indices: &[u32]) -> Vec<Vec3> {
    let mut normals = vec![Vec3::ZERO; positions.len()];
    for tri in indices.chunks_exact(3) {
        let (i0, i1, i2) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
        let face = (positions[i1] - positions[i0]).cross(positions[i2] - positions[i0]);
        normals[i0] += face;
        normals[i1] += face;
        normals[i2] += face;
    }
    normals
        .into_iter()
        .map(|n| n.try_normalize().unwrap_or(Vec3::Y))
        .collect()
}
