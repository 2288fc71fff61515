//! Binary container splitting: header validation and chunk iteration.
//!
//! A GLB container is a 12-byte header followed by length-prefixed chunks.
//! Exactly one JSON chunk is required, at most one BIN chunk is used, and
//! unknown chunk types are skipped over by their declared length.

use crate::error::GlbError;

/// ASCII "glTF", little-endian.
pub const GLB_MAGIC: u32 = 0x4654_6C67;
/// The only supported container version.
pub const GLB_VERSION: u32 = 2;

/// ASCII "JSON".
const CHUNK_JSON: u32 = 0x4E4F_534A;
/// ASCII "BIN\0".
const CHUNK_BIN: u32 = 0x004E_4942;

const HEADER_LEN: usize = 12;
const CHUNK_HEADER_LEN: usize = 8;

/// Borrowed views into the two recognized chunks of a container.
#[derive(Debug)]
pub struct Container<'a> {
    pub document: &'a [u8],
    pub binary: Option<&'a [u8]>,
}

fn read_u32_le(bytes: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ])
}

/// Validates the container header and splits the buffer into document bytes
/// and an optional binary payload.
///
/// The first chunk of each recognized type wins; later duplicates are
/// skipped like unknown chunks. Chunk payloads are 4-byte aligned, so the
/// cursor advances over padding without exposing it.
pub fn split_container(bytes: &[u8]) -> Result<Container<'_>, GlbError> {
    if bytes.len() < HEADER_LEN {
        return Err(GlbError::InvalidFormat(format!(
            "container is {} bytes, shorter than the {} byte header",
            bytes.len(),
            HEADER_LEN
        )));
    }
    let magic = read_u32_le(bytes, 0);
    if magic != GLB_MAGIC {
        return Err(GlbError::InvalidFormat(format!(
            "bad magic 0x{magic:08X}, expected 0x{GLB_MAGIC:08X}"
        )));
    }
    let version = read_u32_le(bytes, 4);
    if version != GLB_VERSION {
        return Err(GlbError::InvalidFormat(format!(
            "unsupported container version {version}"
        )));
    }
    let declared_len = read_u32_le(bytes, 8) as usize;
    // Chunks must stay inside both the buffer and the declared total length.
    let end = declared_len.min(bytes.len());

    let mut document = None;
    let mut binary = None;
    let mut offset = HEADER_LEN;

    while offset + CHUNK_HEADER_LEN <= end {
        let length = read_u32_le(bytes, offset) as usize;
        let tag = read_u32_le(bytes, offset + 4);
        let payload_start = offset + CHUNK_HEADER_LEN;
        let payload_end = payload_start
            .checked_add(length)
            .ok_or(GlbError::TruncatedContainer {
                offset,
                length,
                end,
            })?;
        if payload_end > end {
            return Err(GlbError::TruncatedContainer {
                offset,
                length,
                end,
            });
        }
        let payload = &bytes[payload_start..payload_end];
        match tag {
            CHUNK_JSON if document.is_none() => document = Some(payload),
            CHUNK_BIN if binary.is_none() => binary = Some(payload),
            _ => log::debug!("skipping chunk with tag 0x{tag:08X} ({length} bytes)"),
        }
        // Advance over the declared payload plus alignment padding.
        offset = payload_end + (payload_end.wrapping_neg() & 3);
    }

    match document {
        Some(document) => Ok(Container { document, binary }),
        None => Err(GlbError::MissingDocumentChunk),
    }
}
