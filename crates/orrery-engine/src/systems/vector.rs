//! Lyon-based vector rendering for orbit rings and other outlines.
//!
//! Shapes are tessellated on the CPU into a flat triangle-list vertex
//! buffer that the host renders as-is.
//!
//! # Usage
//!
//! ```ignore
//! // In your Game::update():
//! ctx.vectors.stroke_circle(center, orbit_radius, 1.0, VectorColor::DARK_GRAY);
//! ```

use bytemuck::{Pod, Zeroable};
use glam::Vec2;
use lyon::math::point;
use lyon::path::{Path, Winding};
use lyon::tessellation::{
    BuffersBuilder, StrokeOptions, StrokeTessellator, StrokeVertex, StrokeVertexConstructor,
    VertexBuffers,
};

/// Curve flattening tolerance in world units.
const TOLERANCE: f32 = 0.5;

/// Per-vertex data for vector rendering.
/// 6 floats = 24 bytes per vertex.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, Pod, Zeroable)]
pub struct VectorVertex {
    pub x: f32,
    pub y: f32,
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl VectorVertex {
    /// Number of floats per vertex.
    pub const FLOATS: usize = 6;
    /// Stride in bytes.
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;

    fn at(x: f32, y: f32, color: VectorColor) -> Self {
        Self { x, y, r: color.r, g: color.g, b: color.b, a: color.a }
    }
}

/// RGBA color for vector drawing operations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VectorColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl VectorColor {
    /// Create a color from RGBA components (0.0 - 1.0).
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Create a fully opaque color from RGB components.
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    pub const DARK_GRAY: Self = Self::rgb(0.66, 0.66, 0.66);
}

impl Default for VectorColor {
    fn default() -> Self {
        Self::WHITE
    }
}

struct StrokeVertexCtor {
    color: VectorColor,
}

impl StrokeVertexConstructor<VectorVertex> for StrokeVertexCtor {
    fn new_vertex(&mut self, vertex: StrokeVertex) -> VectorVertex {
        VectorVertex::at(vertex.position().x, vertex.position().y, self.color)
    }
}

/// State for vector rendering.
///
/// Holds the lyon tessellator and the output vertex buffer.
/// Cleared each frame and populated by drawing commands.
pub struct VectorState {
    stroke_tess: StrokeTessellator,
    geometry: VertexBuffers<VectorVertex, u32>,
    vertices: Vec<VectorVertex>,
    max_vertices: usize,
}

impl VectorState {
    pub fn new() -> Self {
        Self::with_capacity(16384)
    }

    /// Create a state whose buffer never grows past `max_vertices`.
    pub fn with_capacity(max_vertices: usize) -> Self {
        Self {
            stroke_tess: StrokeTessellator::new(),
            geometry: VertexBuffers::new(),
            vertices: Vec::with_capacity(max_vertices),
            max_vertices,
        }
    }

    /// Clear the vertex buffer. Called at the start of each frame.
    pub fn clear(&mut self) {
        self.vertices.clear();
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn vertices(&self) -> &[VectorVertex] {
        &self.vertices
    }

    pub fn max_vertices(&self) -> usize {
        self.max_vertices
    }

    /// Raw pointer to the flat float buffer (for shared-buffer copy).
    pub fn buffer_ptr(&self) -> *const f32 {
        self.vertices.as_ptr() as *const f32
    }

    /// Flush indexed geometry to the flat buffer as a triangle list.
    /// A shape that would overflow the buffer is dropped whole.
    fn flush_geometry(&mut self) {
        let needed = self.geometry.indices.len();
        if self.vertices.len() + needed > self.max_vertices {
            log::warn!(
                "vector buffer full: dropping shape of {} vertices ({}/{})",
                needed,
                self.vertices.len(),
                self.max_vertices
            );
        } else {
            for idx in &self.geometry.indices {
                self.vertices.push(self.geometry.vertices[*idx as usize]);
            }
        }
        self.geometry.vertices.clear();
        self.geometry.indices.clear();
    }

    /// Tessellate a stroked circle outline.
    pub fn stroke_circle(&mut self, center: Vec2, radius: f32, width: f32, color: VectorColor) {
        if !(radius > 0.0) || !(width > 0.0) {
            return;
        }

        let mut builder = Path::builder();
        builder.add_circle(point(center.x, center.y), radius, Winding::Positive);
        let path = builder.build();

        self.stroke_path(&path, width, color);
    }

    /// Tessellate an arbitrary stroked lyon Path.
    pub fn stroke_path(&mut self, path: &Path, width: f32, color: VectorColor) {
        let result = self.stroke_tess.tessellate_path(
            path,
            &StrokeOptions::tolerance(TOLERANCE).with_line_width(width),
            &mut BuffersBuilder::new(&mut self.geometry, StrokeVertexCtor { color }),
        );

        match result {
            Ok(()) => self.flush_geometry(),
            Err(err) => {
                log::debug!("stroke tessellation failed: {:?}", err);
                self.geometry.vertices.clear();
                self.geometry.indices.clear();
            }
        }
    }
}

impl Default for VectorState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::size_of;

    #[test]
    fn vector_vertex_is_24_bytes() {
        assert_eq!(size_of::<VectorVertex>(), VectorVertex::STRIDE_BYTES);
        assert_eq!(VectorVertex::FLOATS, 6);
    }

    #[test]
    fn stroke_circle_stays_near_radius() {
        let mut state = VectorState::new();
        let center = Vec2::new(400.0, 300.0);
        state.stroke_circle(center, 100.0, 1.0, VectorColor::DARK_GRAY);

        assert!(state.vertex_count() > 0);
        assert_eq!(state.vertex_count() % 3, 0);
        for v in state.vertices() {
            let d = Vec2::new(v.x, v.y).distance(center);
            assert!((d - 100.0).abs() <= 1.0, "vertex at distance {d}");
            assert_eq!(v.r, VectorColor::DARK_GRAY.r);
        }
    }

    #[test]
    fn degenerate_circles_produce_nothing() {
        let mut state = VectorState::new();
        state.stroke_circle(Vec2::ZERO, 0.0, 1.0, VectorColor::WHITE);
        state.stroke_circle(Vec2::ZERO, -5.0, 1.0, VectorColor::WHITE);
        state.stroke_circle(Vec2::ZERO, f32::NAN, 1.0, VectorColor::WHITE);
        state.stroke_circle(Vec2::ZERO, 10.0, 0.0, VectorColor::WHITE);
        assert_eq!(state.vertex_count(), 0);
    }

    #[test]
    fn overflowing_shape_is_dropped_whole() {
        let mut state = VectorState::with_capacity(12);
        state.stroke_circle(Vec2::ZERO, 200.0, 1.0, VectorColor::WHITE);
        assert_eq!(state.vertex_count(), 0);
    }

    #[test]
    fn clear_resets_buffer() {
        let mut state = VectorState::new();
        state.stroke_circle(Vec2::ZERO, 10.0, 1.0, VectorColor::WHITE);
        assert!(state.vertex_count() > 0);

        state.clear();
        assert_eq!(state.vertex_count(), 0);
    }
}
