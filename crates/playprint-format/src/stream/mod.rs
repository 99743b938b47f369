//! Per-entity opcode streams.
//!
//! A stream is a sequence of one-byte opcodes, each followed by the operands
//! its [`OPCODES`] entry lists, and terminated by [`Opcode::End`]. The same
//! table drives [`StreamWriter`], [`StreamReader`] and the relinker, so an
//! operand shape is defined exactly once.

mod error;
mod opcode;
mod payload;
mod reader;
mod varint;
mod writer;

#[cfg(test)]
mod payload_tests;

pub use error::StreamError;
pub use opcode::{OPCODE_BASE, OPCODES, Opcode, OpcodeInfo, OperandKind};
pub use payload::{
    ENTITY_FIXED_LEN, EntityHeader, EntityPayload, SET_PREFIX_LEN, SetPayload,
    build_entity_payload, build_set_file, decode_stream, parse_entity_payload, parse_names,
    parse_set_payload, strip_set_prefix,
};
pub use reader::{Instr, Operand, OperandValue, StreamReader};
pub use varint::{MAX_INDEX_LEN, decode_index, encode_index, index_len, write_index};
pub use writer::{EncodedStream, StreamWriter, encode_names};
