//! Drawable primitive data: typed vertex arrays and material parameters.
//!
//! A `Primitive` is the renderer-facing unit of geometry. All arrays are
//! flat and tightly packed (three floats per position, two per texture
//! coordinate, four per color) so a renderer can upload them verbatim.

/// Index buffer data, preserving the source integer width.
///
/// Downstream draw calls key their index format on this split; 8-bit
/// source indices are widened to 16 bits, values unchanged.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IndexData {
    U16(Vec<u16>),
    U32(Vec<u32>),
}

impl IndexData {
    pub fn len(&self) -> usize {
        match self {
            Self::U16(v) => v.len(),
            Self::U32(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates indices widened to `u32`.
    pub fn iter(&self) -> Box<dyn Iterator<Item = u32> + '_> {
        match self {
            Self::U16(v) => Box::new(v.iter().map(|&i| u32::from(i))),
            Self::U32(v) => Box::new(v.iter().copied()),
        }
    }
}

/// How a material treats its base-color alpha channel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AlphaMode {
    /// Alpha is ignored.
    Opaque,
    /// The material is transparent with the given opacity.
    Blend { opacity: f32 },
    /// Fragments below the cutoff are discarded.
    Mask { cutoff: f32 },
}

/// Single-color material approximation: no texture sampling.
#[derive(Clone, Debug, PartialEq)]
pub struct MaterialDesc {
    pub base_color: [f32; 4],
    pub metallic: f32,
    pub roughness: f32,
    pub alpha: AlphaMode,
    /// Disables back-face culling when set.
    pub double_sided: bool,
}

impl Default for MaterialDesc {
    /// Neutral matte gray for primitives without a material reference.
    fn default() -> Self {
        Self {
            base_color: [0.6, 0.6, 0.6, 1.0],
            metallic: 0.0,
            roughness: 0.8,
            alpha: AlphaMode::Opaque,
            double_sided: true,
        }
    }
}

/// One drawable bundle of vertex data plus its resolved material.
#[derive(Clone, Debug)]
pub struct Primitive {
    /// Vertex positions, three components each.
    pub positions: Vec<f32>,
    /// Per-vertex normals, three components each. Always present: computed
    /// from the triangle topology when the source omits them.
    pub normals: Vec<f32>,
    /// Texture coordinates, two components each.
    pub tex_coords: Option<Vec<f32>>,
    /// Vertex colors as RGBA, four components each.
    pub colors: Option<Vec<f32>>,
    pub indices: Option<IndexData>,
    pub material: MaterialDesc,
}

impl Primitive {
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }
}
