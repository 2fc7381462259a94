//! Tessellation of handle shapes into GPU-ready geometry

use std::f32::consts::{PI, TAU};

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};
use tc_controls::HandleShape;

use crate::constants::tessellation::*;

/// Gizmo vertex in the handle shape's own frame
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct GizmoVertex {
    /// Local position
    pub position: [f32; 3],
}

impl GizmoVertex {
    /// Vertex attribute descriptors for the shader.
    pub const ATTRIBUTES: &'static [wgpu::VertexAttribute] = &[wgpu::VertexAttribute {
        offset: 0,
        shader_location: 0,
        format: wgpu::VertexFormat::Float32x3,
    }];

    /// Vertex buffer layout for this vertex type.
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Self>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: Self::ATTRIBUTES,
        }
    }
}

/// Per-handle instance data
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct GizmoInstance {
    /// Handle world matrix (column-major)
    pub transform: [[f32; 4]; 4],
    /// Highlighted color (RGB) with opacity in alpha
    pub color: [f32; 4],
}

impl GizmoInstance {
    /// Instance attribute descriptors for the shader.
    pub const ATTRIBUTES: &'static [wgpu::VertexAttribute] = &[
        wgpu::VertexAttribute {
            offset: 0,
            shader_location: 1,
            format: wgpu::VertexFormat::Float32x4,
        },
        wgpu::VertexAttribute {
            offset: 16,
            shader_location: 2,
            format: wgpu::VertexFormat::Float32x4,
        },
        wgpu::VertexAttribute {
            offset: 32,
            shader_location: 3,
            format: wgpu::VertexFormat::Float32x4,
        },
        wgpu::VertexAttribute {
            offset: 48,
            shader_location: 4,
            format: wgpu::VertexFormat::Float32x4,
        },
        wgpu::VertexAttribute {
            offset: 64,
            shader_location: 5,
            format: wgpu::VertexFormat::Float32x4,
        },
    ];

    /// Instance buffer layout for this type.
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Self>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: Self::ATTRIBUTES,
        }
    }

    /// Instance for a handle world matrix and color
    pub fn new(transform: Mat4, color: [f32; 3], opacity: f32) -> Self {
        let [r, g, b] = color;
        Self {
            transform: transform.to_cols_array_2d(),
            color: [r, g, b, opacity],
        }
    }
}

/// How a mesh's indices are assembled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    /// Index triples form triangles
    Triangles,
    /// Index pairs form line segments
    Lines,
}

/// Indexed geometry of one shape in its own frame
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeMesh {
    /// Assembly of `indices`
    pub primitive: Primitive,
    /// Vertex positions
    pub positions: Vec<Vec3>,
    /// Indices into `positions`
    pub indices: Vec<u32>,
}

impl ShapeMesh {
    fn triangles(positions: Vec<Vec3>, indices: Vec<u32>) -> Self {
        Self {
            primitive: Primitive::Triangles,
            positions,
            indices,
        }
    }

    fn lines(positions: Vec<Vec3>, indices: Vec<u32>) -> Self {
        Self {
            primitive: Primitive::Lines,
            positions,
            indices,
        }
    }

    /// Vertices for upload
    pub fn vertices(&self) -> Vec<GizmoVertex> {
        self.positions
            .iter()
            .map(|p| GizmoVertex {
                position: p.to_array(),
            })
            .collect()
    }
}

/// Build the mesh of a handle shape
pub fn tessellate(shape: &HandleShape) -> ShapeMesh {
    match *shape {
        HandleShape::Cylinder {
            radius_top,
            radius_bottom,
            height,
        } => cylinder(radius_top, radius_bottom, height),
        HandleShape::Box { size } => cube(size),
        HandleShape::Octahedron { radius } => octahedron(radius),
        HandleShape::Plane { width, height } => plane(width, height),
        HandleShape::Torus { radius, tube, arc } => torus(radius, tube, arc),
        HandleShape::Sphere { radius } => sphere(radius),
        HandleShape::Line { start, end } => ShapeMesh::lines(vec![start, end], vec![0, 1]),
        HandleShape::Arc { radius, arc } => arc_line(radius, arc),
    }
}

/// Number of segments covering `arc` radians at `per_turn` segments per turn
fn segments_for(arc: f32, per_turn: u32) -> u32 {
    ((per_turn as f32 * arc.abs() / TAU).ceil() as u32).max(1)
}

fn cylinder(radius_top: f32, radius_bottom: f32, height: f32) -> ShapeMesh {
    let n = CYLINDER_SEGMENTS;
    let half = height * 0.5;
    let ring = |radius: f32, y: f32| {
        (0..n).map(move |i| {
            let angle = TAU * i as f32 / n as f32;
            Vec3::new(angle.sin() * radius, y, angle.cos() * radius)
        })
    };

    let mut positions: Vec<Vec3> = ring(radius_top, half).collect();
    positions.extend(ring(radius_bottom, -half));
    positions.push(Vec3::new(0.0, half, 0.0));
    positions.push(Vec3::new(0.0, -half, 0.0));
    let top_center = 2 * n;
    let bottom_center = 2 * n + 1;

    let mut indices = Vec::with_capacity(12 * n as usize);
    for i in 0..n {
        let j = (i + 1) % n;
        let (top_i, top_j) = (i, j);
        let (bottom_i, bottom_j) = (n + i, n + j);
        indices.extend([top_i, bottom_i, bottom_j, top_i, bottom_j, top_j]);
        indices.extend([top_center, top_i, top_j]);
        indices.extend([bottom_center, bottom_j, bottom_i]);
    }
    ShapeMesh::triangles(positions, indices)
}

fn cube(size: f32) -> ShapeMesh {
    let h = size * 0.5;
    let positions = vec![
        Vec3::new(-h, -h, -h),
        Vec3::new(h, -h, -h),
        Vec3::new(h, h, -h),
        Vec3::new(-h, h, -h),
        Vec3::new(-h, -h, h),
        Vec3::new(h, -h, h),
        Vec3::new(h, h, h),
        Vec3::new(-h, h, h),
    ];
    #[rustfmt::skip]
    let indices = vec![
        0, 2, 1, 0, 3, 2, // -Z
        4, 5, 6, 4, 6, 7, // +Z
        0, 1, 5, 0, 5, 4, // -Y
        3, 7, 6, 3, 6, 2, // +Y
        0, 4, 7, 0, 7, 3, // -X
        1, 2, 6, 1, 6, 5, // +X
    ];
    ShapeMesh::triangles(positions, indices)
}

fn octahedron(radius: f32) -> ShapeMesh {
    let positions = vec![
        Vec3::X * radius,
        Vec3::NEG_X * radius,
        Vec3::Y * radius,
        Vec3::NEG_Y * radius,
        Vec3::Z * radius,
        Vec3::NEG_Z * radius,
    ];
    #[rustfmt::skip]
    let indices = vec![
        0, 2, 4, 0, 4, 3, 0, 3, 5, 0, 5, 2,
        1, 2, 5, 1, 5, 3, 1, 3, 4, 1, 4, 2,
    ];
    ShapeMesh::triangles(positions, indices)
}

fn plane(width: f32, height: f32) -> ShapeMesh {
    let (w, h) = (width * 0.5, height * 0.5);
    let positions = vec![
        Vec3::new(-w, -h, 0.0),
        Vec3::new(w, -h, 0.0),
        Vec3::new(w, h, 0.0),
        Vec3::new(-w, h, 0.0),
    ];
    ShapeMesh::triangles(positions, vec![0, 1, 2, 0, 2, 3])
}

fn torus(radius: f32, tube: f32, arc: f32) -> ShapeMesh {
    let m = segments_for(arc, TORUS_SEGMENTS);
    let k = TORUS_TUBE_SEGMENTS;

    let mut positions = Vec::with_capacity(((m + 1) * k) as usize);
    for u in 0..=m {
        let around = arc * u as f32 / m as f32;
        for v in 0..k {
            let across = TAU * v as f32 / k as f32;
            let r = radius + tube * across.cos();
            positions.push(Vec3::new(
                r * around.cos(),
                r * around.sin(),
                tube * across.sin(),
            ));
        }
    }

    let mut indices = Vec::with_capacity((6 * m * k) as usize);
    for u in 0..m {
        for v in 0..k {
            let v2 = (v + 1) % k;
            let a = u * k + v;
            let b = (u + 1) * k + v;
            let c = (u + 1) * k + v2;
            let d = u * k + v2;
            indices.extend([a, b, d, b, c, d]);
        }
    }
    ShapeMesh::triangles(positions, indices)
}

fn sphere(radius: f32) -> ShapeMesh {
    let (rings, segments) = (SPHERE_RINGS, SPHERE_SEGMENTS);

    let mut positions = Vec::with_capacity(((rings + 1) * (segments + 1)) as usize);
    for i in 0..=rings {
        let theta = PI * i as f32 / rings as f32;
        for j in 0..=segments {
            let phi = TAU * j as f32 / segments as f32;
            positions.push(
                Vec3::new(theta.sin() * phi.cos(), theta.cos(), theta.sin() * phi.sin()) * radius,
            );
        }
    }

    let mut indices = Vec::with_capacity((6 * rings * segments) as usize);
    for i in 0..rings {
        for j in 0..segments {
            let a = i * (segments + 1) + j;
            let b = a + segments + 1;
            indices.extend([a, b, a + 1, b, b + 1, a + 1]);
        }
    }
    ShapeMesh::triangles(positions, indices)
}

fn arc_line(radius: f32, arc: f32) -> ShapeMesh {
    let m = segments_for(arc, ARC_SEGMENTS);
    let positions = (0..=m)
        .map(|i| {
            let t = arc * i as f32 / m as f32;
            Vec3::new(0.0, t.cos() * radius, t.sin() * radius)
        })
        .collect();
    let indices = (0..m).flat_map(|i| [i, i + 1]).collect();
    ShapeMesh::lines(positions, indices)
}
