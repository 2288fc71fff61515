//! Typed model of the structured document chunk.
//!
//! These structs mirror the glTF 2.0 JSON naming, with every field the
//! builder does not consume left out. Unknown fields are ignored so that
//! documents from arbitrary exporters still deserialize.

use std::collections::HashMap;

use serde::Deserialize;

use crate::error::GlbError;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(default)]
    pub accessors: Vec<Accessor>,
    #[serde(default)]
    pub buffer_views: Vec<BufferView>,
    #[serde(default)]
    pub meshes: Vec<Mesh>,
    #[serde(default)]
    pub materials: Vec<Material>,
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub scenes: Vec<SceneDesc>,
    /// Default scene index.
    pub scene: Option<usize>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Accessor {
    pub buffer_view: Option<usize>,
    #[serde(default)]
    pub byte_offset: usize,
    pub component_type: u32,
    pub count: usize,
    #[serde(rename = "type")]
    pub element_type: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BufferView {
    #[serde(default)]
    pub byte_offset: usize,
    pub byte_length: usize,
    pub byte_stride: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct Mesh {
    #[serde(default)]
    pub primitives: Vec<PrimitiveDesc>,
}

/// One draw call's worth of attribute references.
///
/// `attributes` maps semantic names ("POSITION", "NORMAL", "TEXCOORD_0",
/// "COLOR_0", ...) to accessor indices.
#[derive(Debug, Deserialize)]
pub struct PrimitiveDesc {
    #[serde(default)]
    pub attributes: HashMap<String, usize>,
    pub indices: Option<usize>,
    pub material: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Material {
    pub pbr_metallic_roughness: Option<PbrMetallicRoughness>,
    pub alpha_mode: Option<String>,
    pub alpha_cutoff: Option<f32>,
    pub double_sided: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PbrMetallicRoughness {
    pub base_color_factor: Option<[f32; 4]>,
    pub metallic_factor: Option<f32>,
    pub roughness_factor: Option<f32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Node {
    pub mesh: Option<usize>,
    /// Column-major 4x4 matrix; wins over the decomposed fields when present.
    pub matrix: Option<[f32; 16]>,
    pub translation: Option<[f32; 3]>,
    /// Unit quaternion as [x, y, z, w].
    pub rotation: Option<[f32; 4]>,
    pub scale: Option<[f32; 3]>,
    #[serde(default)]
    pub children: Vec<usize>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SceneDesc {
    #[serde(default)]
    pub nodes: Vec<usize>,
}

/// Decodes the document chunk as UTF-8 JSON into the typed model.
pub fn parse_document(bytes: &[u8]) -> Result<Document, GlbError> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| GlbError::MalformedDocument(format!("document chunk is not UTF-8: {e}")))?;
    serde_json::from_str(text).map_err(|e| GlbError::MalformedDocument(e.to_string()))
}
