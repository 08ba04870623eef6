use std::f32::consts::TAU;

use glam::Vec3;
use wgpu::util::DeviceExt;

use crate::loaders::ModelPart;

/// Interleaved vertex for every mesh pipeline.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl Vertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x2];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// CPU-side mesh, built procedurally or from a loaded model part.
#[derive(Clone, Debug, Default)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn from_model_part(part: &ModelPart) -> Self {
        let vertices = part
            .positions
            .iter()
            .zip(&part.normals)
            .map(|(p, n)| Vertex {
                position: p.to_array(),
                normal: n.to_array(),
                uv: [0.0, 0.0],
            })
            .collect();
        Self {
            vertices,
            indices: part.indices.clone(),
        }
    }
}

/// Uploaded mesh, ready to draw.
pub struct GpuMesh {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
}

impl GpuMesh {
    pub fn upload(device: &wgpu::Device, data: &MeshData, label: &str) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(&data.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(&data.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        Self {
            vertex_buffer,
            index_buffer,
            index_count: data.indices.len() as u32,
        }
    }
}

/// Latitude/longitude sphere with smooth normals.
pub fn sphere(radius: f32, segments: u32, rings: u32) -> MeshData {
    let mut vertices = Vec::new();
    let mut indices = Vec::new();

    for ring in 0..=rings {
        let theta = ring as f32 / rings as f32 * std::f32::consts::PI;
        let y = theta.cos();
        let ring_radius = theta.sin();
        for segment in 0..=segments {
            let phi = segment as f32 / segments as f32 * TAU;
            let normal = Vec3::new(ring_radius * phi.cos(), y, ring_radius * phi.sin());
            vertices.push(Vertex {
                position: (normal * radius).to_array(),
                normal: normal.to_array(),
                uv: [
                    segment as f32 / segments as f32,
                    ring as f32 / rings as f32,
                ],
            });
        }
    }

    let stride = segments + 1;
    for ring in 0..rings {
        for segment in 0..segments {
            let a = ring * stride + segment;
            let b = a + 1;
            let c = a + stride;
            let d = c + 1;
            indices.extend_from_slice(&[a, c, b, b, c, d]);
        }
    }

    MeshData { vertices, indices }
}

/// Regular tetrahedron inscribed in a sphere of the given radius, with flat
/// face normals.
pub fn tetrahedron(radius: f32) -> MeshData {
    let corners = [
        Vec3::new(1.0, 1.0, 1.0),
        Vec3::new(-1.0, -1.0, 1.0),
        Vec3::new(-1.0, 1.0, -1.0),
        Vec3::new(1.0, -1.0, -1.0),
    ]
    .map(|v| v.normalize() * radius);
    let faces = [[2, 1, 0], [0, 3, 2], [1, 3, 0], [2, 3, 1]];

    let mut vertices = Vec::new();
    let mut indices = Vec::new();
    for face in faces {
        let (a, b, c) = (corners[face[0]], corners[face[1]], corners[face[2]]);
        let normal = (b - a).cross(c - a).normalize();
        let base = vertices.len() as u32;
        for position in [a, b, c] {
            vertices.push(Vertex {
                position: position.to_array(),
                normal: normal.to_array(),
                uv: [0.0, 0.0],
            });
        }
        indices.extend_from_slice(&[base, base + 1, base + 2]);
    }

    MeshData { vertices, indices }
}

/// Flat disc in the XY plane, facing +Z.
pub fn circle(radius: f32, segments: u32) -> MeshData {
    let mut vertices = vec![Vertex {
        position: [0.0, 0.0, 0.0],
        normal: [0.0, 0.0, 1.0],
        uv: [0.5, 0.5],
    }];
    let mut indices = Vec::new();

    for segment in 0..=segments {
        let angle = segment as f32 / segments as f32 * TAU;
        let (sin, cos) = angle.sin_cos();
        vertices.push(Vertex {
            position: [cos * radius, sin * radius, 0.0],
            normal: [0.0, 0.0, 1.0],
            uv: [0.5 + cos * 0.5, 0.5 - sin * 0.5],
        });
    }
    for segment in 1..=segments {
        indices.extend_from_slice(&[0, segment, segment + 1]);
    }

    MeshData { vertices, indices }
}

/// Flat annulus in the XY plane, facing +Z.
pub fn annulus(inner_radius: f32, outer_radius: f32, segments: u32) -> MeshData {
    let mut vertices = Vec::new();
    let mut indices = Vec::new();

    for segment in 0..=segments {
        let angle = segment as f32 / segments as f32 * TAU;
        let (sin, cos) = angle.sin_cos();
        for radius in [inner_radius, outer_radius] {
            vertices.push(Vertex {
                position: [cos * radius, sin * radius, 0.0],
                normal: [0.0, 0.0, 1.0],
                uv: [0.5 + cos * 0.5, 0.5 - sin * 0.5],
            });
        }
    }
    for segment in 0..segments {
        let a = segment * 2;
        indices.extend_from_slice(&[a, a + 1, a + 2, a + 2, a + 1, a + 3]);
    }

    MeshData { vertices, indices }
}

/// Axis-aligned quad in the XY plane, facing +Z, with full texture coverage.
pub fn plane(width: f32, height: f32) -> MeshData {
    let (hw, hh) = (width * 0.5, height * 0.5);
    let vertices = vec![
        Vertex {
            position: [-hw, hh, 0.0],
            normal: [0.0, 0.0, 1.0],
            uv: [0.0, 0.0],
        },
        Vertex {
            position: [hw, hh, 0.0],
            normal: [0.0, 0.0, 1.0],
            uv: [1.0, 0.0],
        },
        Vertex {
            position: [-hw, -hh, 0.0],
            normal: [0.0, 0.0, 1.0],
            uv: [0.0, 1.0],
        },
        Vertex {
            position: [hw, -hh, 0.0],
            normal: [0.0, 0.0, 1.0],
            uv: [1.0, 1.0],
        },
    ];
    let indices = vec![0, 2, 1, 1, 2, 3];

    MeshData { vertices, indices }
}
