//! Entity stream encoder.

use indexmap::IndexSet;
use playprint_core::ByteOrder;

use super::opcode::{Opcode, OperandKind};
use super::varint::write_index;
use crate::asset::AssetRef;

/// Initial buffer capacity; the buffer grows by doubling.
const INITIAL_CAPACITY: usize = 64;

/// A finished stream and the asset names its local references point at.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EncodedStream {
    /// Opcodes and operands, terminated by `End`.
    pub bytes: Vec<u8>,
    /// Distinct pending asset names in first-reference order. Local
    /// sequence number `n` names `names[n]`.
    pub names: Vec<String>,
}

impl EncodedStream {
    /// The names as a flat run of NUL-terminated strings.
    pub fn name_table(&self) -> Vec<u8> {
        encode_names(&self.names)
    }
}

/// Encode names as NUL-terminated strings.
pub fn encode_names<S: AsRef<str>>(names: &[S]) -> Vec<u8> {
    let len = names.iter().map(|n| n.as_ref().len() + 1).sum();
    let mut out = Vec::with_capacity(len);
    for name in names {
        out.extend_from_slice(name.as_ref().as_bytes());
        out.push(0);
    }
    out
}

/// Builds one entity stream.
///
/// `SetOffset` and `SetLength` are only written when the value differs from
/// the register's current value; registers persist for the whole stream.
#[derive(Debug)]
pub struct StreamWriter {
    buf: Vec<u8>,
    order: ByteOrder,
    offset_reg: Option<u32>,
    length_reg: Option<u32>,
    names: IndexSet<String>,
}

impl StreamWriter {
    pub fn new(order: ByteOrder) -> Self {
        Self {
            buf: Vec::with_capacity(INITIAL_CAPACITY),
            order,
            offset_reg: None,
            length_reg: None,
            names: IndexSet::new(),
        }
    }

    pub fn order(&self) -> ByteOrder {
        self.order
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Write an opcode that takes no operands.
    pub fn op(&mut self, opcode: Opcode) {
        assert!(
            opcode.operands().is_empty(),
            "{opcode} takes operands, use a typed writer"
        );
        self.buf.push(opcode.to_byte());
    }

    /// Write an opcode whose single operand is a symbol index.
    pub fn op_symbol(&mut self, opcode: Opcode, index: u32) {
        assert!(
            matches!(opcode.operands(), [OperandKind::Symbol(_)]),
            "{opcode} does not take a symbol operand"
        );
        self.buf.push(opcode.to_byte());
        write_index(&mut self.buf, index);
    }

    pub fn flags(&mut self, flags: u32) {
        self.buf.push(Opcode::Flags.to_byte());
        self.buf.extend_from_slice(&self.order.u32_to_bytes(flags));
    }

    /// Point the offset register at a qualified property.
    pub fn set_offset(&mut self, property: u32) {
        if self.offset_reg == Some(property) {
            return;
        }
        self.offset_reg = Some(property);
        self.buf.push(Opcode::SetOffset.to_byte());
        write_index(&mut self.buf, property);
    }

    pub fn set_length(&mut self, len: u32) {
        if self.length_reg == Some(len) {
            return;
        }
        self.length_reg = Some(len);
        self.buf.push(Opcode::SetLength.to_byte());
        write_index(&mut self.buf, len);
    }

    /// Write a property value through the offset/length/copy triad.
    pub fn property(&mut self, property: u32, value: &[u8]) {
        assert!(
            value.len() <= u32::MAX as usize,
            "property value exceeds 4 GiB"
        );
        self.set_offset(property);
        self.set_length(value.len() as u32);
        self.buf.push(Opcode::Copy.to_byte());
        self.buf.extend_from_slice(value);
    }

    /// Write an asset-valued property.
    ///
    /// A pending reference becomes the local sequence number of its name;
    /// a resolved one is written as its global index. Returns the operand.
    pub fn media_ref(&mut self, property: u32, asset: &AssetRef) -> u32 {
        self.set_offset(property);
        let operand = match asset {
            AssetRef::Pending(name) => self.local_asset(name),
            AssetRef::Resolved(index) => *index,
        };
        self.buf.push(Opcode::CopyMediaRef.to_byte());
        write_index(&mut self.buf, operand);
        operand
    }

    /// Local sequence number of `name`, allocating the next one if new.
    fn local_asset(&mut self, name: &str) -> u32 {
        if let Some(i) = self.names.get_index_of(name) {
            return i as u32;
        }
        let (i, _) = self.names.insert_full(name.to_owned());
        i as u32
    }

    /// Terminate the stream with `End`.
    pub fn finish(mut self) -> EncodedStream {
        self.buf.push(Opcode::End.to_byte());
        EncodedStream {
            bytes: self.buf,
            names: self.names.into_iter().collect(),
        }
    }
}
