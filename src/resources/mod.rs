use cgmath::{One, Quaternion, Vector3};

use crate::{
    data_structures::{
        instance::Instance,
        primitive::{AlphaMode, MaterialDesc, Primitive},
        scene_graph::{NodeTransform, SceneNode},
    },
    error::GlbError,
    resources::{
        accessor::ElementShape,
        document::{Document, Node, PrimitiveDesc},
    },
};

/**
 * This module contains all logic for turning container bytes into a scene graph.
 */
pub mod accessor;
pub mod container;
pub mod document;
pub mod mesh;
pub mod normalize;

/// Parses a GLB container and composes its scene graph.
///
/// The whole pipeline is synchronous and CPU-bound over the borrowed
/// buffer; the result is owned by the caller. A container that parses but
/// yields no drawable primitives fails with [`GlbError::EmptyScene`].
pub fn load_model_glb(bytes: &[u8]) -> Result<SceneNode, GlbError> {
    let container = container::split_container(bytes)?;
    let doc = document::parse_document(container.document)?;
    let bin = container.binary.unwrap_or(&[]);
    let root = compose_scene(&doc, bin)?;
    if root.primitive_count() == 0 {
        return Err(GlbError::EmptyScene);
    }
    Ok(root)
}

/// [`load_model_glb`] followed by [`normalize::normalize_scene`].
///
/// Returns the normalized scene graph together with the pre-normalization
/// dimension report.
pub fn load_model_glb_normalized(
    bytes: &[u8],
    target_size: f32,
) -> Result<(SceneNode, normalize::Dimensions), GlbError> {
    let mut root = load_model_glb(bytes)?;
    let dimensions = normalize::normalize_scene(&mut root, target_size);
    Ok((root, dimensions))
}

fn compose_scene(doc: &Document, bin: &[u8]) -> Result<SceneNode, GlbError> {
    let mut root = SceneNode::new(NodeTransform::identity());
    let scene = doc
        .scene
        .and_then(|index| doc.scenes.get(index))
        .or_else(|| doc.scenes.first())
        .filter(|scene| !scene.nodes.is_empty());
    match scene {
        Some(scene) => {
            let mut visited = vec![false; doc.nodes.len()];
            for &root_index in &scene.nodes {
                if let Some(node) = build_node(doc, bin, root_index, &mut visited)? {
                    root.children.push(node);
                }
            }
        }
        // No node hierarchy: emit every mesh primitive at the identity
        // transform so minimal documents still render.
        None => {
            for mesh in &doc.meshes {
                for desc in &mesh.primitives {
                    if let Some(primitive) = build_primitive(doc, bin, desc) {
                        root.primitives.push(primitive);
                    }
                }
            }
        }
    }
    Ok(root)
}

/// Recursively composes one document node and its subtree.
///
/// The node graph must be a tree; `visited` turns a revisit (cycle or
/// shared subtree) into [`GlbError::CyclicNodeGraph`] instead of infinite
/// recursion. Dangling node references are skipped with a warning.
fn build_node(
    doc: &Document,
    bin: &[u8],
    index: usize,
    visited: &mut [bool],
) -> Result<Option<SceneNode>, GlbError> {
    let Some(node) = doc.nodes.get(index) else {
        log::warn!("scene references missing node {index}, skipping");
        return Ok(None);
    };
    if visited[index] {
        return Err(GlbError::CyclicNodeGraph(index));
    }
    visited[index] = true;

    let mut scene_node = SceneNode::new(node_transform(node));
    if let Some(mesh_index) = node.mesh {
        match doc.meshes.get(mesh_index) {
            Some(mesh) => {
                for desc in &mesh.primitives {
                    if let Some(primitive) = build_primitive(doc, bin, desc) {
                        scene_node.primitives.push(primitive);
                    }
                }
            }
            None => log::warn!("node {index} references missing mesh {mesh_index}, skipping"),
        }
    }
    for &child_index in &node.children {
        if let Some(child) = build_node(doc, bin, child_index, visited)? {
            scene_node.children.push(child);
        }
    }
    Ok(Some(scene_node))
}

fn node_transform(node: &Node) -> NodeTransform {
    if let Some(m) = node.matrix {
        // Verbatim column-major matrix; wins over the decomposed fields.
        return NodeTransform::Matrix(cgmath::Matrix4::new(
            m[0], m[1], m[2], m[3], m[4], m[5], m[6], m[7], m[8], m[9], m[10], m[11], m[12], m[13],
            m[14], m[15],
        ));
    }
    NodeTransform::Decomposed(Instance {
        position: node
            .translation
            .map(Vector3::from)
            .unwrap_or_else(|| Vector3::new(0.0, 0.0, 0.0)),
        rotation: node
            .rotation
            .map(|[x, y, z, w]| Quaternion::new(w, x, y, z))
            .unwrap_or_else(Quaternion::one),
        scale: node
            .scale
            .map(Vector3::from)
            .unwrap_or_else(|| Vector3::new(1.0, 1.0, 1.0)),
    })
}

/// Assembles one drawable primitive, or `None` when it has to be skipped.
///
/// POSITION is mandatory; everything else degrades independently. One bad
/// primitive never aborts the rest of the scene.
fn build_primitive(doc: &Document, bin: &[u8], desc: &PrimitiveDesc) -> Option<Primitive> {
    let position_accessor = match desc.attributes.get("POSITION") {
        Some(&index) => index,
        None => {
            log::warn!("primitive has no POSITION attribute, skipping");
            return None;
        }
    };
    let positions = match accessor::read_f32(doc, bin, position_accessor, false) {
        Ok((values, ElementShape::Vec3)) => values,
        Ok((_, shape)) => {
            log::warn!(
                "POSITION accessor {position_accessor} has shape {shape:?} instead of Vec3, skipping primitive"
            );
            return None;
        }
        Err(e) => {
            log::warn!("could not resolve POSITION accessor {position_accessor}: {e}, skipping primitive");
            return None;
        }
    };

    let indices = desc.indices.and_then(|index| {
        match accessor::read_indices(doc, bin, index) {
            Ok(data) => Some(data),
            Err(e) => {
                log::warn!("could not resolve index accessor {index}: {e}, drawing unindexed");
                None
            }
        }
    });

    let normals = read_attribute(doc, bin, desc, "NORMAL", ElementShape::Vec3)
        .unwrap_or_else(|| mesh::compute_smooth_normals(&positions, indices.as_ref()));
    let tex_coords = read_attribute(doc, bin, desc, "TEXCOORD_0", ElementShape::Vec2);
    let colors = read_colors(doc, bin, desc);
    let material = resolve_material(doc, desc.material);

    Some(Primitive {
        positions,
        normals,
        tex_coords,
        colors,
        indices,
        material,
    })
}

/// Reads an optional attribute; failures omit the attribute with a warning.
fn read_attribute(
    doc: &Document,
    bin: &[u8],
    desc: &PrimitiveDesc,
    semantic: &str,
    expected: ElementShape,
) -> Option<Vec<f32>> {
    let &index = desc.attributes.get(semantic)?;
    match accessor::read_f32(doc, bin, index, false) {
        Ok((values, shape)) if shape == expected => Some(values),
        Ok((_, shape)) => {
            log::warn!(
                "{semantic} accessor {index} has shape {shape:?} instead of {expected:?}, omitting"
            );
            None
        }
        Err(e) => {
            log::warn!("could not resolve {semantic} accessor {index}: {e}, omitting");
            None
        }
    }
}

/// Reads vertex colors as RGBA, rescaling integer components to unit range
/// and expanding RGB with an opaque alpha.
fn read_colors(doc: &Document, bin: &[u8], desc: &PrimitiveDesc) -> Option<Vec<f32>> {
    let &index = desc.attributes.get("COLOR_0")?;
    match accessor::read_f32(doc, bin, index, true) {
        Ok((values, ElementShape::Vec4)) => Some(values),
        Ok((values, ElementShape::Vec3)) => Some(
            values
                .chunks_exact(3)
                .flat_map(|rgb| [rgb[0], rgb[1], rgb[2], 1.0])
                .collect(),
        ),
        Ok((_, shape)) => {
            log::warn!("COLOR_0 accessor {index} has shape {shape:?}, omitting");
            None
        }
        Err(e) => {
            log::warn!("could not resolve COLOR_0 accessor {index}: {e}, omitting");
            None
        }
    }
}

fn resolve_material(doc: &Document, index: Option<usize>) -> MaterialDesc {
    let Some(index) = index else {
        return MaterialDesc::default();
    };
    let Some(material) = doc.materials.get(index) else {
        log::warn!("primitive references missing material {index}, using default");
        return MaterialDesc::default();
    };
    let pbr = material.pbr_metallic_roughness.as_ref();
    let base_color = pbr
        .and_then(|p| p.base_color_factor)
        .unwrap_or([1.0, 1.0, 1.0, 1.0]);
    let alpha = match material.alpha_mode.as_deref() {
        Some("BLEND") => AlphaMode::Blend {
            opacity: base_color[3],
        },
        Some("MASK") => AlphaMode::Mask {
            cutoff: material.alpha_cutoff.unwrap_or(0.5),
        },
        _ => AlphaMode::Opaque,
    };
    MaterialDesc {
        base_color,
        metallic: pbr.and_then(|p| p.metallic_factor).unwrap_or(1.0),
        roughness: pbr.and_then(|p| p.roughness_factor).unwrap_or(1.0),
        alpha,
        double_sided: material.double_sided.unwrap_or(true),
    }
}
