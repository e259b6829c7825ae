//! Tube extrusion around a centerline.
//!
//! Each sample gets a ring of `radial_segments + 1` vertices (the seam vertex
//! is duplicated so UVs wrap cleanly). Rings are stitched with two triangles
//! per quad, wound counter-clockwise when seen from outside the tube.

use std::f32::consts::TAU;
use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};
use crate::error::{ensure_positive, ConfigError};

/// Below this squared length the side vector is considered degenerate.
const MIN_SIDE_SQ: f32 = 1e-3;

/// Interleaved vertex for upload by an external renderer.
/// 8 floats = 32 bytes stride: position, normal, uv.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct TubeVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl TubeVertex {
    pub const FLOATS: usize = 8;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;
}

/// Triangle mesh of a tube. Attribute arrays are parallel.
#[derive(Debug, Clone, Default)]
pub struct TubeMesh {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub uvs: Vec<Vec2>,
    pub indices: Vec<u32>,
}

impl TubeMesh {
    pub fn clear(&mut self) {
        self.positions.clear();
        self.normals.clear();
        self.uvs.clear();
        self.indices.clear();
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Pack attributes into one buffer.
    pub fn interleaved(&self) -> Vec<TubeVertex> {
        self.positions
            .iter()
            .zip(&self.normals)
            .zip(&self.uvs)
            .map(|((p, n), uv)| TubeVertex {
                position: p.to_array(),
                normal: n.to_array(),
                uv: uv.to_array(),
            })
            .collect()
    }
}

/// Rebuilds a [`TubeMesh`] from scratch every call.
#[derive(Debug, Clone)]
pub struct TubeMeshBuilder {
    radius: f32,
    radial_segments: usize,
    /// Reference axis for the ring frame.
    up_axis: Vec3,
    mesh: TubeMesh,
}

impl TubeMeshBuilder {
    pub fn new(radius: f32, radial_segments: usize) -> Result<Self, ConfigError> {
        ensure_positive("radius", radius)?;
        if radial_segments < 3 {
            return Err(ConfigError::TooFewRadialSegments(radial_segments));
        }
        Ok(Self {
            radius,
            radial_segments,
            up_axis: Vec3::Y,
            mesh: TubeMesh::default(),
        })
    }

    pub fn with_up_axis(mut self, up_axis: Vec3) -> Self {
        self.up_axis = up_axis.normalize_or(Vec3::Y);
        self
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn radial_segments(&self) -> usize {
        self.radial_segments
    }

    pub fn mesh(&self) -> &TubeMesh {
        &self.mesh
    }

    pub fn clear(&mut self) {
        self.mesh.clear();
    }

    /// Replace the mesh with a tube around `samples`. Fewer than two samples
    /// leave it empty.
    pub fn build(&mut self, samples: &[Vec3]) -> &TubeMesh {
        self.mesh.clear();
        let count = samples.len();
        if count < 2 {
            return &self.mesh;
        }

        let ring = self.radial_segments + 1;
        let mesh = &mut self.mesh;
        mesh.positions.reserve(count * ring);
        mesh.normals.reserve(count * ring);
        mesh.uvs.reserve(count * ring);
        mesh.indices.reserve((count - 1) * self.radial_segments * 6);

        let v_step = 1.0 / (count - 1) as f32;
        let mut last_forward = Vec3::Z;

        for (i, &center) in samples.iter().enumerate() {
            let toward = if i + 1 < count {
                samples[i + 1] - center
            } else {
                center - samples[i - 1]
            };
            let forward = toward.try_normalize().unwrap_or(last_forward);
            last_forward = forward;

            let mut side = forward.cross(self.up_axis);
            if side.length_squared() < MIN_SIDE_SQ {
                side = forward.cross(Vec3::X);
            }
            let side = side.normalize_or(Vec3::X);
            let up = side.cross(forward);

            for j in 0..ring {
                let u = j as f32 / self.radial_segments as f32;
                let (sin, cos) = (u * TAU).sin_cos();
                let dir = side * cos + up * sin;
                mesh.positions.push(center + dir * self.radius);
                mesh.normals.push(dir);
                mesh.uvs.push(Vec2::new(u, i as f32 * v_step));
            }
        }

        let ring = ring as u32;
        for i in 0..(count as u32 - 1) {
            for j in 0..self.radial_segments as u32 {
                let a = i * ring + j;
                let b = a + 1;
                let c = a + ring;
                let d = c + 1;
                mesh.indices.extend_from_slice(&[a, c, b, b, c, d]);
            }
        }

        &self.mesh
    }
}

impl Default for TubeMeshBuilder {
    fn default() -> Self {
        Self {
            radius: 0.025,
            radial_segments: 12,
            up_axis: Vec3::Y,
            mesh: TubeMesh::default(),
        }
    }
}
