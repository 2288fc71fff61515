//! Geometry fallbacks derived from triangle topology.

use cgmath::{InnerSpace, Vector3};

use crate::data_structures::primitive::IndexData;

/// Computes smooth per-vertex normals from positions and triangle indices.
///
/// Face normals are accumulated per vertex over all triangles that share
/// it, then normalized, so lighting stays plausible when the source omits
/// normals. Unindexed geometry is treated as a flat triangle list. Vertices
/// touched by no triangle, or only by degenerate ones, fall back to +Y.
pub fn compute_smooth_normals(positions: &[f32], indices: Option<&IndexData>) -> Vec<f32> {
    let vertex_count = positions.len() / 3;
    let position = |i: usize| {
        Vector3::new(
            positions[i * 3],
            positions[i * 3 + 1],
            positions[i * 3 + 2],
        )
    };
    let mut accumulated = vec![Vector3::new(0.0f32, 0.0, 0.0); vertex_count];

    let triangle_indices: Vec<u32> = match indices {
        Some(indices) => indices.iter().collect(),
        None => (0..vertex_count as u32).collect(),
    };
    for triangle in triangle_indices.chunks_exact(3) {
        let (a, b, c) = (
            triangle[0] as usize,
            triangle[1] as usize,
            triangle[2] as usize,
        );
        if a >= vertex_count || b >= vertex_count || c >= vertex_count {
            log::warn!("triangle ({a}, {b}, {c}) indexes past {vertex_count} vertices, skipping");
            continue;
        }
        // Area-weighted by the unnormalized cross product, same accumulate-
        // then-normalize scheme as tangent generation.
        let face = (position(b) - position(a)).cross(position(c) - position(a));
        accumulated[a] += face;
        accumulated[b] += face;
        accumulated[c] += face;
    }

    accumulated
        .into_iter()
        .flat_map(|n| {
            let n = if n.magnitude2() > 0.0 {
                n.normalize()
            } else {
                Vector3::unit_y()
            };
            [n.x, n.y, n.z]
        })
        .collect()
}
