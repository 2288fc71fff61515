//! Scene data structures produced by the loader.
//!
//! - `instance` holds decomposed transform data
//! - `primitive` contains vertex/index bundles and material approximations
//! - `scene_graph` enables hierarchical scene organization

pub mod instance;
pub mod primitive;
pub mod scene_graph;
