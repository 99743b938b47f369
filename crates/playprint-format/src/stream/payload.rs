//! Payload layouts wrapping entity streams.
//!
//! Group and scene payloads:
//!
//! ```text
//! name_table_offset:u32  class_index:u32  count:index  stream…  names…
//! ```
//!
//! `name_table_offset` is the payload offset of the first NUL-terminated
//! asset name. Once relinked, the names are dropped and the offset equals
//! the payload length.
//!
//! Set source files carry a `size:u32` prefix counting the bytes after it,
//! followed by `class_index:u32` and a stream without asset references.

use playprint_core::ByteOrder;

use super::opcode::Opcode;
use super::reader::{Instr, StreamReader};
use super::varint::{decode_index, write_index};
use super::writer::encode_names;
use super::StreamError;

/// Fixed-width prefix of a group/scene payload.
pub const ENTITY_FIXED_LEN: usize = 8;

/// Width of a set file's size prefix.
pub const SET_PREFIX_LEN: usize = 4;

/// Fields preceding the stream of a group or scene.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EntityHeader {
    pub class_index: u32,
    /// Actors of a group, groups of a scene.
    pub count: u32,
}

/// Assemble a group/scene payload.
pub fn build_entity_payload<S: AsRef<str>>(
    header: EntityHeader,
    stream: &[u8],
    names: &[S],
    order: ByteOrder,
) -> Vec<u8> {
    let mut out = Vec::with_capacity(ENTITY_FIXED_LEN + 5 + stream.len());
    out.extend_from_slice(&[0; 4]);
    out.extend_from_slice(&order.u32_to_bytes(header.class_index));
    write_index(&mut out, header.count);
    out.extend_from_slice(stream);

    assert!(out.len() <= u32::MAX as usize, "payload exceeds 4 GiB");
    let name_table_offset = out.len() as u32;
    out[0..4].copy_from_slice(&order.u32_to_bytes(name_table_offset));
    out.extend_from_slice(&encode_names(names));
    out
}

/// A parsed group/scene payload borrowing from its bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntityPayload<'a> {
    pub header: EntityHeader,
    pub name_table_offset: u32,
    /// Payload offset of the stream's first byte.
    pub stream_offset: usize,
    pub stream: &'a [u8],
    /// Asset names in local sequence order.
    pub names: Vec<&'a str>,
}

impl<'a> EntityPayload<'a> {
    /// Decode the stream's instructions.
    pub fn instructions(&self, order: ByteOrder) -> Result<Vec<Instr<'a>>, StreamError> {
        decode_stream(self.stream, order)
    }
}

/// Split a group/scene payload into header, stream and names.
pub fn parse_entity_payload(bytes: &[u8], order: ByteOrder) -> Result<EntityPayload<'_>, StreamError> {
    let too_short = StreamError::PayloadTooShort { len: bytes.len() };
    let name_table_offset = order.read_u32(bytes, 0).ok_or(too_short.clone())?;
    let class_index = order.read_u32(bytes, 4).ok_or(too_short)?;

    let nto = name_table_offset as usize;
    if nto < ENTITY_FIXED_LEN || nto > bytes.len() {
        return Err(StreamError::BadNameTableOffset {
            offset: name_table_offset,
            len: bytes.len(),
        });
    }

    let (count, count_len) = decode_index(&bytes[ENTITY_FIXED_LEN..nto])
        .map_err(|_| StreamError::IndexOverflow {
            offset: ENTITY_FIXED_LEN,
        })?;
    let stream_offset = ENTITY_FIXED_LEN + count_len;

    Ok(EntityPayload {
        header: EntityHeader { class_index, count },
        name_table_offset,
        stream_offset,
        stream: &bytes[stream_offset..nto],
        names: parse_names(&bytes[nto..], nto)?,
    })
}

/// Split a flat run of NUL-terminated names.
///
/// A lone zero byte after the last name is chunk padding, not a name.
pub fn parse_names(bytes: &[u8], base_offset: usize) -> Result<Vec<&str>, StreamError> {
    let mut names = Vec::new();
    let mut pos = 0;
    while pos < bytes.len() {
        let rest = &bytes[pos..];
        if rest == [0] {
            break;
        }
        let Some(nul) = rest.iter().position(|&b| b == 0) else {
            return Err(StreamError::UnterminatedName {
                offset: base_offset + pos,
            });
        };
        let name = std::str::from_utf8(&rest[..nul]).map_err(|_| StreamError::InvalidName {
            offset: base_offset + pos,
        })?;
        names.push(name);
        pos += nul + 1;
    }
    Ok(names)
}

/// Decode a whole stream, requiring `End` and nothing after it but an
/// optional pad byte.
pub fn decode_stream(stream: &[u8], order: ByteOrder) -> Result<Vec<Instr<'_>>, StreamError> {
    let mut reader = StreamReader::new(stream, order);
    let mut instrs = Vec::new();
    for instr in reader.by_ref() {
        instrs.push(instr?);
    }
    let rest = reader.rest();
    if !rest.is_empty() && rest != [0] {
        return Err(StreamError::TrailingBytes {
            offset: reader.position(),
            count: rest.len(),
        });
    }
    Ok(instrs)
}

/// A set payload as stored in a `set ` chunk.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SetPayload<'a> {
    pub class_index: u32,
    pub stream: &'a [u8],
}

impl<'a> SetPayload<'a> {
    /// Decode the stream, rejecting asset references.
    pub fn instructions(&self, order: ByteOrder) -> Result<Vec<Instr<'a>>, StreamError> {
        let instrs = decode_stream(self.stream, order)?;
        if let Some(instr) = instrs.iter().find(|i| i.opcode == Opcode::CopyMediaRef) {
            return Err(StreamError::AssetInSet {
                offset: instr.offset,
            });
        }
        Ok(instrs)
    }
}

/// Assemble a set source file, size prefix included.
pub fn build_set_file(class_index: u32, stream: &[u8], order: ByteOrder) -> Vec<u8> {
    let body_len = 4 + stream.len();
    assert!(body_len <= u32::MAX as usize, "set exceeds 4 GiB");
    let mut out = Vec::with_capacity(SET_PREFIX_LEN + body_len);
    out.extend_from_slice(&order.u32_to_bytes(body_len as u32));
    out.extend_from_slice(&order.u32_to_bytes(class_index));
    out.extend_from_slice(stream);
    out
}

/// Drop a set file's size prefix after checking it.
pub fn strip_set_prefix(bytes: &[u8], order: ByteOrder) -> Result<&[u8], StreamError> {
    let declared = order
        .read_u32(bytes, 0)
        .ok_or(StreamError::PayloadTooShort { len: bytes.len() })?;
    let actual = bytes.len() - SET_PREFIX_LEN;
    if declared as usize != actual {
        return Err(StreamError::BadSetPrefix { declared, actual });
    }
    Ok(&bytes[SET_PREFIX_LEN..])
}

/// Split a set payload (prefix already stripped).
pub fn parse_set_payload(bytes: &[u8], order: ByteOrder) -> Result<SetPayload<'_>, StreamError> {
    let class_index = order
        .read_u32(bytes, 0)
        .ok_or(StreamError::PayloadTooShort { len: bytes.len() })?;
    Ok(SetPayload {
        class_index,
        stream: &bytes[4..],
    })
}
