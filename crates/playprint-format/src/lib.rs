//! Binary format of a compiled playprint.
//!
//! This crate contains:
//! - The nested chunk container (forms, tagged chunks, table of contents)
//! - The per-entity opcode stream grammar shared by emitter and relinker
//! - The variable-length index encoding used by stream operands
//! - Media reference lists and the file header
//! - A human-readable dump for debugging

#![allow(clippy::comparison_chain)]

pub mod asset;
pub mod container;
pub mod dump;
pub mod header;
pub mod media;
pub mod stream;
pub mod tag;


pub use asset::{AssetIndex, AssetRef};
pub use container::{ChunkInfo, ChunkMark, ChunkReader, ChunkWriter, ContainerError, TocEntry};
pub use dump::{DumpError, dump, dump_entity};
pub use header::{FileHeader, HEADER_LEN, VERSION};
pub use media::{MediaList, MediaReference};
pub use stream::{
    EncodedStream, EntityHeader, EntityPayload, Instr, Opcode, OpcodeInfo, Operand, OperandKind,
    OperandValue, SetPayload, StreamError, StreamReader, StreamWriter, build_entity_payload,
    build_set_file, decode_index, decode_stream, encode_index, parse_entity_payload,
    parse_set_payload, strip_set_prefix, write_index,
};
pub use tag::Tag;
