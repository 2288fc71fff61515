//! Accessor resolution: typed numeric arrays out of the binary payload.
//!
//! Two read paths exist. Tightly packed regions are copied into a freshly
//! allocated, correctly aligned buffer and reinterpreted with `bytemuck`;
//! the source bytes are never cast in place, since the absolute offset
//! carries no alignment guarantee. Interleaved regions are walked element
//! by element with explicit little-endian reads.
//!
//! Reads that would run past the end of the payload clamp to the available
//! region and zero-fill the tail with a warning. Real-world exporters
//! produce slightly-malformed buffers often enough that failing hard here
//! would make the parser useless. Declared element counts are capped by
//! the owning buffer view before the output allocation is sized, so
//! metadata alone never drives memory use.

use bytemuck::Zeroable;

use crate::data_structures::primitive::IndexData;
use crate::error::GlbError;
use crate::resources::document::{Accessor, Document};

/// Numeric component types supported in accessor data.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ComponentType {
    I8,
    U8,
    I16,
    U16,
    U32,
    F32,
}

impl ComponentType {
    fn from_tag(tag: u32) -> Option<Self> {
        match tag {
            5120 => Some(Self::I8),
            5121 => Some(Self::U8),
            5122 => Some(Self::I16),
            5123 => Some(Self::U16),
            5125 => Some(Self::U32),
            5126 => Some(Self::F32),
            _ => None,
        }
    }

    pub fn byte_width(self) -> usize {
        match self {
            Self::I8 | Self::U8 => 1,
            Self::I16 | Self::U16 => 2,
            Self::U32 | Self::F32 => 4,
        }
    }
}

/// Components-per-element shape of an accessor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ElementShape {
    Scalar,
    Vec2,
    Vec3,
    Vec4,
}

impl ElementShape {
    fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "SCALAR" => Some(Self::Scalar),
            "VEC2" => Some(Self::Vec2),
            "VEC3" => Some(Self::Vec3),
            "VEC4" => Some(Self::Vec4),
            _ => None,
        }
    }

    pub fn components(self) -> usize {
        match self {
            Self::Scalar => 1,
            Self::Vec2 => 2,
            Self::Vec3 => 3,
            Self::Vec4 => 4,
        }
    }
}

/// Byte layout of one accessor's region inside the binary payload.
struct Layout {
    base: usize,
    count: usize,
    comps: usize,
    width: usize,
    stride: usize,
    /// The declared count exceeded what the buffer view holds and was
    /// capped before allocation.
    truncated: bool,
}

fn resolve(
    doc: &Document,
    index: usize,
) -> Result<(&Accessor, ComponentType, ElementShape), GlbError> {
    let accessor = doc
        .accessors
        .get(index)
        .ok_or(GlbError::IndexOutOfBounds {
            kind: "accessor",
            index,
        })?;
    let unsupported = || GlbError::UnsupportedAccessorType {
        component_type: accessor.component_type,
        shape: accessor.element_type.clone(),
    };
    let comp = ComponentType::from_tag(accessor.component_type).ok_or_else(unsupported)?;
    let shape = ElementShape::from_tag(&accessor.element_type).ok_or_else(unsupported)?;
    Ok((accessor, comp, shape))
}

fn layout(
    doc: &Document,
    accessor: &Accessor,
    view_index: usize,
    comp: ComponentType,
    shape: ElementShape,
    payload_len: usize,
) -> Result<Layout, GlbError> {
    let view = doc
        .buffer_views
        .get(view_index)
        .ok_or(GlbError::IndexOutOfBounds {
            kind: "bufferView",
            index: view_index,
        })?;
    let comps = shape.components();
    let width = comp.byte_width();
    let natural = comps * width;
    let stride = view.byte_stride.unwrap_or(natural);
    let base = view.byte_offset.saturating_add(accessor.byte_offset);
    // The declared count sizes the output allocation, so it cannot be
    // trusted as-is: a hostile or corrupt document can declare counts far
    // beyond any real buffer. Accept the count only while the last element
    // still ends inside the view's declared length; otherwise cap it by
    // what the payload itself could supply.
    let fits = accessor.count.checked_mul(comps).is_some()
        && match accessor.count.checked_sub(1) {
            None => true,
            Some(last) => stride
                .max(natural)
                .checked_mul(last)
                .and_then(|bytes| bytes.checked_add(natural))
                .is_some_and(|bytes| bytes <= view.byte_length),
        };
    let count = if fits {
        accessor.count
    } else {
        accessor
            .count
            .min(payload_len.saturating_sub(base) / natural)
    };
    Ok(Layout {
        base,
        count,
        comps,
        width,
        stride,
        truncated: !fits,
    })
}

/// Reads `count * comps` components of `T`, clamping to the payload.
///
/// Returns the components and whether any part of the read was clamped.
fn read_raw<T: bytemuck::Pod>(
    bin: &[u8],
    lay: &Layout,
    from_le: impl Fn(&[u8]) -> T,
) -> (Vec<T>, bool) {
    let total = lay.count * lay.comps;
    let natural = lay.comps * lay.width;
    if lay.stride == natural {
        // Tight packing: allocate the aligned destination first, then copy
        // whatever part of the region actually exists.
        let mut out: Vec<T> = vec![T::zeroed(); total];
        let dst = bytemuck::cast_slice_mut::<T, u8>(&mut out);
        let want = dst.len();
        let avail = bin.len().saturating_sub(lay.base).min(want);
        if avail > 0 {
            dst[..avail].copy_from_slice(&bin[lay.base..lay.base + avail]);
        }
        (out, avail < want)
    } else {
        let mut out = Vec::with_capacity(total);
        let mut clamped = false;
        for element in 0..lay.count {
            let elem_base = lay
                .stride
                .checked_mul(element)
                .and_then(|offset| lay.base.checked_add(offset));
            for component in 0..lay.comps {
                let off = elem_base.and_then(|base| base.checked_add(component * lay.width));
                let end = off.and_then(|off| off.checked_add(lay.width));
                match (off, end) {
                    (Some(off), Some(end)) if end <= bin.len() => {
                        out.push(from_le(&bin[off..end]));
                    }
                    _ => {
                        out.push(T::zeroed());
                        clamped = true;
                    }
                }
            }
        }
        (out, clamped)
    }
}

/// Resolves an accessor into `f32` components, `count * components` long.
///
/// `normalized` rescales unsigned 8- and 16-bit integers into the unit
/// range (the color-attribute convention); every other component type is
/// converted value-preserving.
pub fn read_f32(
    doc: &Document,
    bin: &[u8],
    index: usize,
    normalized: bool,
) -> Result<(Vec<f32>, ElementShape), GlbError> {
    let (accessor, comp, shape) = resolve(doc, index)?;
    let Some(view_index) = accessor.buffer_view else {
        log::warn!("accessor {index} has no buffer view, yielding no data");
        return Ok((Vec::new(), shape));
    };
    let lay = layout(doc, accessor, view_index, comp, shape, bin.len())?;
    if lay.truncated {
        log::warn!(
            "accessor {index} declares {} elements, more than its buffer view holds, clamping to {}",
            accessor.count,
            lay.count
        );
    }
    let (values, clamped) = match comp {
        ComponentType::F32 => read_raw::<f32>(bin, &lay, |b| {
            f32::from_le_bytes([b[0], b[1], b[2], b[3]])
        }),
        ComponentType::U8 => {
            let scale = if normalized { 255.0 } else { 1.0 };
            let (raw, clamped) = read_raw::<u8>(bin, &lay, |b| b[0]);
            (raw.into_iter().map(|v| v as f32 / scale).collect(), clamped)
        }
        ComponentType::I8 => {
            let (raw, clamped) = read_raw::<i8>(bin, &lay, |b| b[0] as i8);
            (raw.into_iter().map(|v| v as f32).collect(), clamped)
        }
        ComponentType::U16 => {
            let scale = if normalized { 65535.0 } else { 1.0 };
            let (raw, clamped) = read_raw::<u16>(bin, &lay, |b| u16::from_le_bytes([b[0], b[1]]));
            (raw.into_iter().map(|v| v as f32 / scale).collect(), clamped)
        }
        ComponentType::I16 => {
            let (raw, clamped) = read_raw::<i16>(bin, &lay, |b| i16::from_le_bytes([b[0], b[1]]));
            (raw.into_iter().map(|v| v as f32).collect(), clamped)
        }
        ComponentType::U32 => {
            let (raw, clamped) = read_raw::<u32>(bin, &lay, |b| {
                u32::from_le_bytes([b[0], b[1], b[2], b[3]])
            });
            (raw.into_iter().map(|v| v as f32).collect(), clamped)
        }
    };
    if clamped {
        log::warn!(
            "accessor {index} reads past the end of the binary payload ({} bytes), zero-filling the tail",
            bin.len()
        );
    }
    Ok((values, shape))
}

/// Resolves an index accessor, preserving values and integer width exactly.
///
/// 8-bit indices widen to 16 bits; the 16/32-bit split is what downstream
/// draw calls key their index format on.
pub fn read_indices(doc: &Document, bin: &[u8], index: usize) -> Result<IndexData, GlbError> {
    let (accessor, comp, shape) = resolve(doc, index)?;
    if shape != ElementShape::Scalar {
        return Err(GlbError::UnsupportedAccessorType {
            component_type: accessor.component_type,
            shape: accessor.element_type.clone(),
        });
    }
    let Some(view_index) = accessor.buffer_view else {
        log::warn!("index accessor {index} has no buffer view, yielding no data");
        return Ok(IndexData::U16(Vec::new()));
    };
    let lay = layout(doc, accessor, view_index, comp, shape, bin.len())?;
    if lay.truncated {
        log::warn!(
            "index accessor {index} declares {} elements, more than its buffer view holds, clamping to {}",
            accessor.count,
            lay.count
        );
    }
    let (data, clamped) = match comp {
        ComponentType::U8 => {
            let (raw, clamped) = read_raw::<u8>(bin, &lay, |b| b[0]);
            (
                IndexData::U16(raw.into_iter().map(u16::from).collect()),
                clamped,
            )
        }
        ComponentType::U16 => {
            let (raw, clamped) = read_raw::<u16>(bin, &lay, |b| u16::from_le_bytes([b[0], b[1]]));
            (IndexData::U16(raw), clamped)
        }
        ComponentType::U32 => {
            let (raw, clamped) = read_raw::<u32>(bin, &lay, |b| {
                u32::from_le_bytes([b[0], b[1], b[2], b[3]])
            });
            (IndexData::U32(raw), clamped)
        }
        _ => {
            return Err(GlbError::UnsupportedAccessorType {
                component_type: accessor.component_type,
                shape: accessor.element_type.clone(),
            });
        }
    };
    if clamped {
        log::warn!(
            "index accessor {index} reads past the end of the binary payload, zero-filling the tail"
        );
    }
    Ok(data)
}
