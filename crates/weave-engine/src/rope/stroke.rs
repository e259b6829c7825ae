//! Flat 2D rendering of a thread centerline.
//!
//! Tessellates the XY projection of the centerline into a colored triangle
//! list with lyon, for hosts that draw the thread as a line rather than a
//! tube.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use lyon::math::point;
use lyon::path::Path;
use lyon::tessellation::{
    BuffersBuilder, LineCap, LineJoin, StrokeOptions, StrokeTessellator,
    StrokeVertex as LyonStrokeVertex, StrokeVertexConstructor, VertexBuffers,
};
use crate::api::types::Rgba;

/// Position and color of one stroke vertex.
/// 6 floats = 24 bytes per vertex.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, Pod, Zeroable)]
pub struct StrokeVertex {
    pub x: f32,
    pub y: f32,
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl StrokeVertex {
    pub const FLOATS: usize = 6;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4; // 24
}

struct StrokeVertexCtor {
    color: Rgba,
}

impl StrokeVertexConstructor<StrokeVertex> for StrokeVertexCtor {
    fn new_vertex(&mut self, vertex: LyonStrokeVertex) -> StrokeVertex {
        StrokeVertex {
            x: vertex.position().x,
            y: vertex.position().y,
            r: self.color.r,
            g: self.color.g,
            b: self.color.b,
            a: self.color.a,
        }
    }
}

/// Reusable tessellator plus a flat, de-indexed triangle list.
pub struct ThreadStroke {
    tess: StrokeTessellator,
    geometry: VertexBuffers<StrokeVertex, u32>,
    buffer: Vec<f32>,
    tolerance: f32,
}

impl ThreadStroke {
    pub fn new() -> Self {
        Self {
            tess: StrokeTessellator::new(),
            geometry: VertexBuffers::new(),
            buffer: Vec::with_capacity(4096 * StrokeVertex::FLOATS),
            tolerance: 0.01,
        }
    }

    /// Flattening tolerance in world units.
    pub fn with_tolerance(mut self, tolerance: f32) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    pub fn vertex_count(&self) -> usize {
        self.buffer.len() / StrokeVertex::FLOATS
    }

    pub fn buffer(&self) -> &[f32] {
        &self.buffer
    }

    /// Raw pointer to the flat float buffer.
    pub fn buffer_ptr(&self) -> *const f32 {
        self.buffer.as_ptr()
    }

    /// Replace the buffer with a stroke along `centerline` (z dropped).
    /// Fewer than two points, or a non-positive width, produce nothing.
    pub fn rebuild(&mut self, centerline: &[Vec3], width: f32, color: Rgba) {
        self.buffer.clear();
        if centerline.len() < 2 || !(width > 0.0) {
            return;
        }

        let mut builder = Path::builder();
        builder.begin(point(centerline[0].x, centerline[0].y));
        for p in &centerline[1..] {
            builder.line_to(point(p.x, p.y));
        }
        builder.end(false);
        let path = builder.build();

        let options = StrokeOptions::tolerance(self.tolerance)
            .with_line_width(width)
            .with_line_join(LineJoin::Round)
            .with_line_cap(LineCap::Round);

        let result = self.tess.tessellate_path(
            &path,
            &options,
            &mut BuffersBuilder::new(&mut self.geometry, StrokeVertexCtor { color }),
        );

        match result {
            Ok(()) => self.flush_geometry(),
            Err(e) => {
                log::warn!("thread stroke tessellation failed: {:?}", e);
                self.geometry.vertices.clear();
                self.geometry.indices.clear();
            }
        }
    }

    fn flush_geometry(&mut self) {
        for idx in &self.geometry.indices {
            let v = &self.geometry.vertices[*idx as usize];
            self.buffer.extend_from_slice(&[v.x, v.y, v.r, v.g, v.b, v.a]);
        }
        self.geometry.vertices.clear();
        self.geometry.indices.clear();
    }
}

impl Default for ThreadStroke {
    fn default() -> Self {
        Self::new()
    }
}
