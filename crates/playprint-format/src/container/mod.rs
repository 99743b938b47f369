//! Nested chunk container.
//!
//! A chunk is `tag:4, size:4, body`. A form is a chunk whose body starts with
//! a four-byte sub-type followed by nested chunks. `size` counts every byte
//! after the size field, including the pad byte appended to odd-length
//! bodies. Because bodies are written before their length is known, the
//! writer reserves the size field and patches it when the chunk is closed.
//!
//! The root form's sub-type declares the byte order of every multi-byte
//! field in the file.

mod error;
mod reader;
mod writer;


pub use error::ContainerError;
pub use reader::{ChunkInfo, ChunkReader};
pub use writer::{ChunkMark, ChunkWriter};

/// Bytes occupied by a chunk's tag and size fields.
pub const CHUNK_HEADER_LEN: u64 = 8;

/// Width of the size field.
pub const SIZE_FIELD_LEN: u64 = 4;

/// One table-of-contents slot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TocEntry {
    /// Reserved; always written as zero.
    pub label: i32,
    /// File offset of the chunk's tag, or zero for an absent chunk.
    pub offset: u32,
}

impl TocEntry {
    pub fn new(label: i32, offset: u32) -> Self {
        Self { label, offset }
    }
}

/// Bytes reserved by `begin_toc(count)`.
pub fn toc_body_len(count: u32) -> u64 {
    4 + u64::from(count) * 8
}
