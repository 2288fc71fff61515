//! Placement-oriented normalization of a composed scene graph.

use cgmath::{Matrix4, Vector3};

use crate::data_structures::scene_graph::{NodeTransform, SceneNode};

/// Pre-normalization bounding-box size, reported for display purposes.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Dimensions {
    pub width: f32,
    pub height: f32,
    pub depth: f32,
}

impl Dimensions {
    pub fn zero() -> Self {
        Self::default()
    }
}

/// Below this maximum extent the geometry counts as degenerate.
const DEGENERATE_EXTENT: f32 = 1e-6;

/// Rescales and recenters the scene for stable placement.
///
/// The world-space bounding box is centered on the origin along both
/// horizontal axes and rested on zero along the vertical axis, then the
/// whole scene is scaled uniformly so its largest extent equals
/// `target_size`. Repositioning happens before scaling; reparenting after
/// the scale would reintroduce an off-center pivot.
///
/// Returns the bounding-box size measured before any of this, independent
/// of the applied scale. Degenerate or empty geometry reports all zeros
/// and leaves the graph untouched.
pub fn normalize_scene(root: &mut SceneNode, target_size: f32) -> Dimensions {
    let Some(bounds) = root.bounds() else {
        log::warn!("scene has no vertex positions, skipping normalization");
        return Dimensions::zero();
    };
    let max_dimension = bounds.max_dimension();
    if max_dimension <= DEGENERATE_EXTENT {
        log::warn!("scene geometry is degenerate (max extent {max_dimension}), skipping normalization");
        return Dimensions::zero();
    }
    let size = bounds.size();
    let center = bounds.center();
    let reposition = Vector3::new(-center.x, -bounds.min.y, -center.z);
    let scale = target_size / max_dimension;
    root.transform = NodeTransform::Matrix(
        Matrix4::from_scale(scale)
            * Matrix4::from_translation(reposition)
            * root.transform.to_matrix(),
    );
    Dimensions {
        width: size.x,
        height: size.y,
        depth: size.z,
    }
}
