mod common;

use common::test_utils::{f32_bytes, glb, triangle_glb, triangle_positions, u16_bytes};
use glb_scene::{
    AlphaMode, GlbError, IndexData, NodeTransform, SceneNode, load_model_glb,
};

fn single_primitive(root: &SceneNode) -> &glb_scene::Primitive {
    fn walk(node: &SceneNode) -> Option<&glb_scene::Primitive> {
        node.primitives
            .first()
            .or_else(|| node.children.iter().find_map(walk))
    }
    walk(root).expect("scene should hold a primitive")
}

#[test]
fn triangle_round_trips_exactly() {
    let root = load_model_glb(&triangle_glb()).unwrap();
    assert_eq!(root.primitive_count(), 1);
    let primitive = single_primitive(&root);
    assert_eq!(primitive.positions, triangle_positions().to_vec());
    assert_eq!(primitive.vertex_count(), 3);
}

#[test]
fn missing_normals_are_computed_from_winding() {
    // Counter-clockwise in the XY plane faces +Z.
    let root = load_model_glb(&triangle_glb()).unwrap();
    let primitive = single_primitive(&root);
    assert_eq!(primitive.normals.len(), 9);
    for normal in primitive.normals.chunks_exact(3) {
        assert!((normal[0]).abs() < 1e-6);
        assert!((normal[1]).abs() < 1e-6);
        assert!((normal[2] - 1.0).abs() < 1e-6);
    }
}

#[test]
fn node_trs_is_composed() {
    let positions = triangle_positions();
    let bin = f32_bytes(&positions);
    let document = serde_json::json!({
        "asset": {"version": "2.0"},
        "buffers": [{"byteLength": bin.len()}],
        "bufferViews": [{"buffer": 0, "byteLength": bin.len()}],
        "accessors": [{"bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3"}],
        "meshes": [{"primitives": [{"attributes": {"POSITION": 0}}]}],
        "nodes": [
            {"children": [1], "translation": [10.0, 0.0, 0.0]},
            {"mesh": 0, "scale": [2.0, 2.0, 2.0]}
        ],
        "scenes": [{"nodes": [0]}]
    });
    let root = load_model_glb(&glb(&document, Some(&bin))).unwrap();

    let parent = &root.children[0];
    let NodeTransform::Decomposed(instance) = &parent.transform else {
        panic!("TRS node should stay decomposed");
    };
    assert_eq!(instance.position.x, 10.0);

    // World-space bounds reflect parent translation and child scale.
    let bounds = root.bounds().unwrap();
    assert!((bounds.min.x - 10.0).abs() < 1e-5);
    assert!((bounds.max.x - 12.0).abs() < 1e-5);
    assert!((bounds.max.y - 2.0).abs() < 1e-5);
}

#[test]
fn explicit_matrix_is_used_verbatim() {
    let positions = triangle_positions();
    let bin = f32_bytes(&positions);
    let document = serde_json::json!({
        "buffers": [{"byteLength": bin.len()}],
        "bufferViews": [{"buffer": 0, "byteLength": bin.len()}],
        "accessors": [{"bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3"}],
        "meshes": [{"primitives": [{"attributes": {"POSITION": 0}}]}],
        "nodes": [{
            "mesh": 0,
            // Column-major translation by (5, 0, 0), with TRS fields that
            // must lose against it.
            "matrix": [1.0,0.0,0.0,0.0, 0.0,1.0,0.0,0.0, 0.0,0.0,1.0,0.0, 5.0,0.0,0.0,1.0],
            "translation": [99.0, 99.0, 99.0]
        }],
        "scenes": [{"nodes": [0]}]
    });
    let root = load_model_glb(&glb(&document, Some(&bin))).unwrap();
    assert!(matches!(
        root.children[0].transform,
        NodeTransform::Matrix(_)
    ));
    let bounds = root.bounds().unwrap();
    assert!((bounds.min.x - 5.0).abs() < 1e-5);
    assert!((bounds.max.x - 6.0).abs() < 1e-5);
}

#[test]
fn document_without_scenes_falls_back_to_meshes() {
    let positions = triangle_positions();
    let bin = f32_bytes(&positions);
    let document = serde_json::json!({
        "buffers": [{"byteLength": bin.len()}],
        "bufferViews": [{"buffer": 0, "byteLength": bin.len()}],
        "accessors": [{"bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3"}],
        "meshes": [{"primitives": [{"attributes": {"POSITION": 0}}]}]
    });
    let root = load_model_glb(&glb(&document, Some(&bin))).unwrap();
    // Primitives land on the root itself, at the identity transform.
    assert_eq!(root.primitives.len(), 1);
    assert!(root.children.is_empty());
}

#[test]
fn unsupported_optional_attribute_is_omitted() {
    let positions = triangle_positions();
    let bin = f32_bytes(&positions);
    let document = serde_json::json!({
        "buffers": [{"byteLength": bin.len()}],
        "bufferViews": [{"buffer": 0, "byteLength": bin.len()}],
        "accessors": [
            {"bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3"},
            // 5124 (signed 32-bit) is outside the supported set.
            {"bufferView": 0, "componentType": 5124, "count": 3, "type": "VEC2"}
        ],
        "meshes": [{"primitives": [{"attributes": {"POSITION": 0, "TEXCOORD_0": 1}}]}],
        "nodes": [{"mesh": 0}],
        "scenes": [{"nodes": [0]}]
    });
    let root = load_model_glb(&glb(&document, Some(&bin))).unwrap();
    let primitive = single_primitive(&root);
    assert!(primitive.tex_coords.is_none());
    assert_eq!(primitive.positions.len(), 9);
}

#[test]
fn unsupported_position_skips_the_primitive() {
    let positions = triangle_positions();
    let bin = f32_bytes(&positions);
    let document = serde_json::json!({
        "buffers": [{"byteLength": bin.len()}],
        "bufferViews": [{"buffer": 0, "byteLength": bin.len()}],
        "accessors": [{"bufferView": 0, "componentType": 5124, "count": 3, "type": "VEC3"}],
        "meshes": [{"primitives": [{"attributes": {"POSITION": 0}}]}],
        "nodes": [{"mesh": 0}],
        "scenes": [{"nodes": [0]}]
    });
    // The only primitive is skipped, so the scene composes empty.
    let err = load_model_glb(&glb(&document, Some(&bin))).unwrap_err();
    assert!(matches!(err, GlbError::EmptyScene), "got {err:?}");
}

#[test]
fn vertex_colors_are_normalized_and_expanded() {
    let positions = triangle_positions();
    let mut bin = f32_bytes(&positions);
    bin.extend([255u8, 0, 0, 0, 255, 0, 0, 0, 255, 0, 0, 0]);
    let document = serde_json::json!({
        "buffers": [{"byteLength": bin.len()}],
        "bufferViews": [
            {"buffer": 0, "byteOffset": 0, "byteLength": 36},
            {"buffer": 0, "byteOffset": 36, "byteLength": 9}
        ],
        "accessors": [
            {"bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3"},
            {"bufferView": 1, "componentType": 5121, "count": 3, "type": "VEC3"}
        ],
        "meshes": [{"primitives": [{"attributes": {"POSITION": 0, "COLOR_0": 1}}]}],
        "nodes": [{"mesh": 0}],
        "scenes": [{"nodes": [0]}]
    });
    let root = load_model_glb(&glb(&document, Some(&bin))).unwrap();
    let colors = single_primitive(&root).colors.as_ref().unwrap();
    assert_eq!(
        colors.as_slice(),
        &[
            1.0, 0.0, 0.0, 1.0, //
            0.0, 1.0, 0.0, 1.0, //
            0.0, 0.0, 1.0, 1.0
        ]
    );
}

#[test]
fn index_buffer_is_preserved() {
    let positions = triangle_positions();
    let mut bin = f32_bytes(&positions);
    bin.extend(u16_bytes(&[2, 1, 0]));
    let document = serde_json::json!({
        "buffers": [{"byteLength": bin.len()}],
        "bufferViews": [
            {"buffer": 0, "byteOffset": 0, "byteLength": 36},
            {"buffer": 0, "byteOffset": 36, "byteLength": 6}
        ],
        "accessors": [
            {"bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3"},
            {"bufferView": 1, "componentType": 5123, "count": 3, "type": "SCALAR"}
        ],
        "meshes": [{"primitives": [{"attributes": {"POSITION": 0}, "indices": 1}]}],
        "nodes": [{"mesh": 0}],
        "scenes": [{"nodes": [0]}]
    });
    let root = load_model_glb(&glb(&document, Some(&bin))).unwrap();
    let primitive = single_primitive(&root);
    assert_eq!(primitive.indices, Some(IndexData::U16(vec![2, 1, 0])));
    // Reversed winding flips the computed normal to -Z.
    assert!((primitive.normals[2] + 1.0).abs() < 1e-6);
}

#[test]
fn material_approximation_is_resolved() {
    let positions = triangle_positions();
    let bin = f32_bytes(&positions);
    let document = serde_json::json!({
        "buffers": [{"byteLength": bin.len()}],
        "bufferViews": [{"buffer": 0, "byteLength": bin.len()}],
        "accessors": [{"bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3"}],
        "materials": [{
            "pbrMetallicRoughness": {
                "baseColorFactor": [0.2, 0.4, 0.6, 0.5],
                "metallicFactor": 0.1,
                "roughnessFactor": 0.3
            },
            "alphaMode": "BLEND",
            "doubleSided": false
        }],
        "meshes": [{"primitives": [{"attributes": {"POSITION": 0}, "material": 0}]}],
        "nodes": [{"mesh": 0}],
        "scenes": [{"nodes": [0]}]
    });
    let root = load_model_glb(&glb(&document, Some(&bin))).unwrap();
    let material = &single_primitive(&root).material;
    assert_eq!(material.base_color, [0.2, 0.4, 0.6, 0.5]);
    assert_eq!(material.metallic, 0.1);
    assert_eq!(material.roughness, 0.3);
    assert_eq!(material.alpha, AlphaMode::Blend { opacity: 0.5 });
    assert!(!material.double_sided);
}

#[test]
fn missing_material_defaults_to_neutral_gray() {
    let root = load_model_glb(&triangle_glb()).unwrap();
    let material = &single_primitive(&root).material;
    assert_eq!(material.base_color[0], material.base_color[1]);
    assert_eq!(material.base_color[1], material.base_color[2]);
    assert_eq!(material.alpha, AlphaMode::Opaque);
    assert!(material.double_sided);
}

#[test]
fn alpha_mask_records_cutoff_default() {
    let positions = triangle_positions();
    let bin = f32_bytes(&positions);
    let document = serde_json::json!({
        "buffers": [{"byteLength": bin.len()}],
        "bufferViews": [{"buffer": 0, "byteLength": bin.len()}],
        "accessors": [{"bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3"}],
        "materials": [{"alphaMode": "MASK"}],
        "meshes": [{"primitives": [{"attributes": {"POSITION": 0}, "material": 0}]}],
        "nodes": [{"mesh": 0}],
        "scenes": [{"nodes": [0]}]
    });
    let root = load_model_glb(&glb(&document, Some(&bin))).unwrap();
    assert_eq!(
        single_primitive(&root).material.alpha,
        AlphaMode::Mask { cutoff: 0.5 }
    );
}

#[test]
fn cyclic_node_graph_is_detected() {
    let positions = triangle_positions();
    let bin = f32_bytes(&positions);
    let document = serde_json::json!({
        "buffers": [{"byteLength": bin.len()}],
        "bufferViews": [{"buffer": 0, "byteLength": bin.len()}],
        "accessors": [{"bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3"}],
        "meshes": [{"primitives": [{"attributes": {"POSITION": 0}}]}],
        "nodes": [
            {"mesh": 0, "children": [1]},
            {"children": [0]}
        ],
        "scenes": [{"nodes": [0]}]
    });
    let err = load_model_glb(&glb(&document, Some(&bin))).unwrap_err();
    assert!(matches!(err, GlbError::CyclicNodeGraph(_)), "got {err:?}");
}

#[test]
fn primitive_without_position_is_skipped_not_fatal() {
    let positions = triangle_positions();
    let bin = f32_bytes(&positions);
    let document = serde_json::json!({
        "buffers": [{"byteLength": bin.len()}],
        "bufferViews": [{"buffer": 0, "byteLength": bin.len()}],
        "accessors": [{"bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3"}],
        "meshes": [{"primitives": [
            {"attributes": {}},
            {"attributes": {"POSITION": 0}}
        ]}],
        "nodes": [{"mesh": 0}],
        "scenes": [{"nodes": [0]}]
    });
    let root = load_model_glb(&glb(&document, Some(&bin))).unwrap();
    assert_eq!(root.primitive_count(), 1);
}
