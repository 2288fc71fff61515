//! glb-scene
//!
//! A renderer-agnostic GLB (binary glTF 2.0) parser and scene builder.
//! This crate turns a fully in-memory container buffer into an owned scene
//! graph of typed vertex/index arrays, composed transforms and single-color
//! material approximations, then applies a placement-oriented normalization
//! so the result rests centered on the origin at a caller-chosen size. It
//! performs no I/O, touches no graphics API and decodes no texture images;
//! a renderer consumes the produced primitives however it sees fit.
//!
//! High-level modules
//! - `data_structures`: scene data (primitives, transforms, scene graph)
//! - `resources`: container splitting, document decoding, accessor
//!   resolution, scene composition and normalization
//! - `error`: the error taxonomy for everything above
//!

pub mod data_structures;
pub mod error;
pub mod resources;

// Re-exports commonly used types for convenience in downstream code.
pub use cgmath::*;
pub use data_structures::instance::Instance;
pub use data_structures::primitive::{AlphaMode, IndexData, MaterialDesc, Primitive};
pub use data_structures::scene_graph::{Aabb, NodeTransform, SceneNode};
pub use error::GlbError;
pub use resources::normalize::{Dimensions, normalize_scene};
pub use resources::{load_model_glb, load_model_glb_normalized};
