//! Error taxonomy for container parsing and scene composition.
//!
//! Fatal conditions abort the current parse call; degraded conditions
//! (accessor bounds clamping, missing normals, missing materials) are
//! recovered locally with a `log::warn!` and never surface here.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GlbError {
    /// Bad magic constant or unsupported container version.
    #[error("invalid container format: {0}")]
    InvalidFormat(String),

    /// A chunk's declared bounds read past the end of the container.
    #[error("truncated container: chunk at offset {offset} with length {length} exceeds container end {end}")]
    TruncatedContainer {
        offset: usize,
        length: usize,
        end: usize,
    },

    /// The container holds no structured-document chunk.
    #[error("container has no document chunk")]
    MissingDocumentChunk,

    /// The document chunk is not valid UTF-8 JSON in the expected shape.
    #[error("malformed document: {0}")]
    MalformedDocument(String),

    /// Component type or element shape outside the supported set.
    #[error("unsupported accessor type: component type {component_type}, shape \"{shape}\"")]
    UnsupportedAccessorType { component_type: u32, shape: String },

    /// A document cross-reference points past the referenced array.
    #[error("document references missing {kind} index {index}")]
    IndexOutOfBounds { kind: &'static str, index: usize },

    /// A node was reached twice while composing the scene tree.
    #[error("node graph contains a cycle through node {0}")]
    CyclicNodeGraph(usize),

    /// Composition finished without a single drawable primitive.
    #[error("scene contains no drawable primitives")]
    EmptyScene,
}
