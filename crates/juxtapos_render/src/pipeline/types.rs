//! GPU-compatible data types for the depth peeling pipeline
//!
//! These types are designed to match the shader layouts exactly.
//! All types derive Pod and Zeroable for safe GPU buffer operations.

use bytemuck::{Pod, Zeroable};
use juxtapos_math::{Mat4, WProjection, IDENTITY};

use crate::vertex_schema::{Vertex, VertexField, VertexSchema};

/// A hypercube vertex: 4D position with color
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct HyperVertex {
    /// Position in 4D space (x, y, z, w)
    pub position: [f32; 4],
    /// RGBA color
    pub color: [f32; 4],
}

impl HyperVertex {
    pub fn new(position: [f32; 4], color: [f32; 4]) -> Self {
        Self { position, color }
    }
}

impl Vertex for HyperVertex {
    const SCHEMA: VertexSchema = VertexSchema::new(&[
        VertexField::float("position", 4),
        VertexField::float("color", 4),
    ]);
}

/// A vertex of the full-viewport composite quad
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct QuadVertex {
    /// Position in normalized device coordinates
    pub position: [f32; 2],
}

impl Vertex for QuadVertex {
    const SCHEMA: VertexSchema = VertexSchema::new(&[VertexField::float("position", 2)]);
}

/// Color a vertex by its position: x -> red, y -> green, z -> blue
pub fn position_gradient_color(position: &[f32; 4]) -> [f32; 4] {
    [
        (position[0] + 1.0) / 2.0,
        (position[1] + 1.0) / 2.0,
        (position[2] + 1.0) / 2.0,
        1.0,
    ]
}

/// Uniforms shared by the peel and edge passes
/// Layout: 160 bytes total (must match peel.wgsl PeelUniforms)
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct PeelUniforms {
    /// 4D model transform (64 bytes)
    pub model: Mat4,
    /// 3D view-projection transform (64 bytes)
    pub view_proj: Mat4,
    /// W scale, W offset, face opacity, unused (16 bytes)
    pub projection: [f32; 4],
    /// Edge overlay color (16 bytes)
    pub edge_color: [f32; 4],
}

impl PeelUniforms {
    pub fn new(
        model: Mat4,
        view_proj: Mat4,
        w_projection: WProjection,
        face_opacity: f32,
        edge_color: [f32; 4],
    ) -> Self {
        Self {
            model,
            view_proj,
            projection: [w_projection.scale, w_projection.offset, face_opacity, 0.0],
            edge_color,
        }
    }
}

impl Default for PeelUniforms {
    fn default() -> Self {
        Self::new(IDENTITY, IDENTITY, WProjection::default(), 1.0, [0.0, 0.0, 0.0, 1.0])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::{offset_of, size_of};

    #[test]
    fn test_hyper_vertex_schema_matches_struct() {
        let schema = HyperVertex::SCHEMA;
        assert_eq!(schema.stride(), size_of::<HyperVertex>() as u64);
        assert_eq!(schema.offset_of("position"), Some(offset_of!(HyperVertex, position) as u64));
        assert_eq!(schema.offset_of("color"), Some(offset_of!(HyperVertex, color) as u64));
    }

    #[test]
    fn test_quad_vertex_schema_matches_struct() {
        assert_eq!(QuadVertex::SCHEMA.stride(), size_of::<QuadVertex>() as u64);
        assert_eq!(QuadVertex::SCHEMA.offset_of("position"), Some(0));
    }

    #[test]
    fn test_peel_uniforms_size() {
        // 2 matrices (128) + projection (16) + edge color (16)
        assert_eq!(size_of::<PeelUniforms>(), 160);
    }

    #[test]
    fn test_peel_uniforms_packing() {
        let u = PeelUniforms::new(IDENTITY, IDENTITY, WProjection::new(0.25, 2.0), 0.4, [1.0; 4]);
        assert_eq!(u.projection, [0.25, 2.0, 0.4, 0.0]);
    }

    #[test]
    fn test_gradient_corners() {
        assert_eq!(position_gradient_color(&[-1.0; 4]), [0.0, 0.0, 0.0, 1.0]);
        assert_eq!(position_gradient_color(&[1.0; 4]), [1.0, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_alignment() {
        assert_eq!(std::mem::align_of::<HyperVertex>(), 4);
        assert_eq!(std::mem::align_of::<QuadVertex>(), 4);
        assert_eq!(std::mem::align_of::<PeelUniforms>(), 4);
    }
}
