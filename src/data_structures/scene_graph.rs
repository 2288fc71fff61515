//! Scene graph: a tree of transforms and drawable primitives.
//!
//! The graph is plain owned data with no renderer attached. Callers clone
//! subtrees when placing multiple instances of the same model.

use cgmath::{Matrix4, Vector3};

use crate::data_structures::{instance::Instance, primitive::Primitive};

/// A node-local transform: either an explicit matrix taken verbatim from
/// the source, or a decomposed translation/rotation/scale.
#[derive(Clone, Debug)]
pub enum NodeTransform {
    Matrix(Matrix4<f32>),
    Decomposed(Instance),
}

impl NodeTransform {
    pub fn identity() -> Self {
        Self::Decomposed(Instance::default())
    }

    pub fn to_matrix(&self) -> Matrix4<f32> {
        match self {
            Self::Matrix(m) => *m,
            Self::Decomposed(instance) => instance.to_matrix(),
        }
    }
}

impl Default for NodeTransform {
    fn default() -> Self {
        Self::identity()
    }
}

/// Axis-aligned bounding box in world space.
#[derive(Clone, Copy, Debug)]
pub struct Aabb {
    pub min: Vector3<f32>,
    pub max: Vector3<f32>,
}

impl Aabb {
    fn from_point(p: Vector3<f32>) -> Self {
        Self { min: p, max: p }
    }

    fn grow(&mut self, p: Vector3<f32>) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.min.z = self.min.z.min(p.z);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
        self.max.z = self.max.z.max(p.z);
    }

    pub fn size(&self) -> Vector3<f32> {
        self.max - self.min
    }

    pub fn center(&self) -> Vector3<f32> {
        (self.min + self.max) / 2.0
    }

    pub fn max_dimension(&self) -> f32 {
        let size = self.size();
        size.x.max(size.y).max(size.z)
    }
}

/// One node of the composed scene: a local transform, the primitives
/// attached at this level, and child nodes below it.
#[derive(Clone, Debug, Default)]
pub struct SceneNode {
    pub transform: NodeTransform,
    pub primitives: Vec<Primitive>,
    pub children: Vec<SceneNode>,
}

impl SceneNode {
    pub fn new(transform: NodeTransform) -> Self {
        Self {
            transform,
            primitives: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Total primitive count across this node and all descendants.
    pub fn primitive_count(&self) -> usize {
        self.primitives.len()
            + self
                .children
                .iter()
                .map(SceneNode::primitive_count)
                .sum::<usize>()
    }

    /// World-space bounding box over every vertex position in the subtree,
    /// with all node transforms applied. `None` when there are no vertices.
    pub fn bounds(&self) -> Option<Aabb> {
        let mut aabb = None;
        self.grow_bounds(Matrix4::from_scale(1.0), &mut aabb);
        aabb
    }

    fn grow_bounds(&self, parent: Matrix4<f32>, aabb: &mut Option<Aabb>) {
        let world = parent * self.transform.to_matrix();
        for primitive in &self.primitives {
            for position in primitive.positions.chunks_exact(3) {
                let p = world * cgmath::Vector4::new(position[0], position[1], position[2], 1.0);
                let p = Vector3::new(p.x, p.y, p.z);
                match aabb {
                    Some(aabb) => aabb.grow(p),
                    None => *aabb = Some(Aabb::from_point(p)),
                }
            }
        }
        for child in &self.children {
            child.grow_bounds(world, aabb);
        }
    }
}
