//! Helpers for assembling GLB containers in memory.
#![allow(dead_code)]

use serde_json::Value;

/// Installs the test logger so warn-and-continue paths are visible when
/// running with `RUST_LOG=warn`. Safe to call from every test.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub const GLB_MAGIC: u32 = 0x4654_6C67;
pub const GLB_VERSION: u32 = 2;
pub const CHUNK_JSON: u32 = 0x4E4F_534A;
pub const CHUNK_BIN: u32 = 0x004E_4942;

/// Encodes one chunk: LE length, LE tag, payload padded to 4 bytes.
///
/// JSON chunks pad with spaces, binary chunks with zeros; the declared
/// length includes the padding, as in a real exporter.
pub fn chunk(tag: u32, payload: &[u8], pad_byte: u8) -> Vec<u8> {
    let mut data = payload.to_vec();
    while data.len() % 4 != 0 {
        data.push(pad_byte);
    }
    let mut out = Vec::with_capacity(8 + data.len());
    out.extend_from_slice(&(data.len() as u32).to_le_bytes());
    out.extend_from_slice(&tag.to_le_bytes());
    out.extend_from_slice(&data);
    out
}

/// Wraps pre-encoded chunks in a container header.
pub fn glb_from_chunks(chunks: &[u8]) -> Vec<u8> {
    let total = 12 + chunks.len();
    let mut out = Vec::with_capacity(total);
    out.extend_from_slice(&GLB_MAGIC.to_le_bytes());
    out.extend_from_slice(&GLB_VERSION.to_le_bytes());
    out.extend_from_slice(&(total as u32).to_le_bytes());
    out.extend_from_slice(chunks);
    out
}

/// Builds a container from a JSON document and an optional binary payload.
pub fn glb(document: &Value, bin: Option<&[u8]>) -> Vec<u8> {
    let mut chunks = chunk(CHUNK_JSON, document.to_string().as_bytes(), b' ');
    if let Some(bin) = bin {
        chunks.extend(chunk(CHUNK_BIN, bin, 0));
    }
    glb_from_chunks(&chunks)
}

pub fn f32_bytes(values: &[f32]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}

pub fn u16_bytes(values: &[u16]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}

pub fn u32_bytes(values: &[u32]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}

/// A single counter-clockwise triangle in the XY plane.
pub fn triangle_positions() -> [f32; 9] {
    [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0]
}

/// A minimal one-triangle container: one mesh, one primitive, no indices,
/// no normals, identity node transform.
pub fn triangle_glb() -> Vec<u8> {
    points_glb(&triangle_positions())
}

/// A container with one primitive holding the given positions and nothing
/// else, attached to a single identity node.
pub fn points_glb(positions: &[f32]) -> Vec<u8> {
    let bin = f32_bytes(positions);
    let document = serde_json::json!({
        "asset": {"version": "2.0"},
        "buffers": [{"byteLength": bin.len()}],
        "bufferViews": [
            {"buffer": 0, "byteOffset": 0, "byteLength": bin.len()}
        ],
        "accessors": [
            {"bufferView": 0, "componentType": 5126, "count": positions.len() / 3, "type": "VEC3"}
        ],
        "meshes": [{"primitives": [{"attributes": {"POSITION": 0}}]}],
        "nodes": [{"mesh": 0}],
        "scenes": [{"nodes": [0]}],
        "scene": 0
    });
    glb(&document, Some(&bin))
}
