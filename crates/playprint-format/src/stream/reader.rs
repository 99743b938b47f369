//! Table-driven entity stream decoder.

use std::ops::Range;

use playprint_core::ByteOrder;

use super::opcode::{OPCODE_BASE, Opcode, OperandKind};
use super::varint::decode_index;
use super::StreamError;

/// Decoded value of one operand.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OperandValue<'a> {
    /// Symbol index, byte count or asset reference.
    Index(u32),
    /// Fixed-width word.
    Word(u32),
    /// Raw bytes of a `Copy`.
    Bytes(&'a [u8]),
}

impl OperandValue<'_> {
    pub fn as_index(&self) -> Option<u32> {
        match self {
            Self::Index(i) => Some(*i),
            _ => None,
        }
    }
}

/// One operand with its location in the stream.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Operand<'a> {
    pub kind: OperandKind,
    pub value: OperandValue<'a>,
    /// Stream range of the encoded operand.
    pub range: Range<usize>,
}

/// One decoded instruction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Instr<'a> {
    /// Stream offset of the opcode byte.
    pub offset: usize,
    pub opcode: Opcode,
    pub operands: Vec<Operand<'a>>,
    /// Encoded bytes: opcode and operands.
    pub bytes: &'a [u8],
}

impl<'a> Instr<'a> {
    /// First operand's index value, for single-index opcodes.
    pub fn index(&self) -> Option<u32> {
        self.operands.first().and_then(|op| op.value.as_index())
    }
}

/// Iterates the instructions of a stream up to and including `End`.
///
/// The `SetOffset` and `SetLength` registers are tracked across the whole
/// stream, matching the writer.
pub struct StreamReader<'a> {
    bytes: &'a [u8],
    pos: usize,
    order: ByteOrder,
    offset_reg: Option<u32>,
    length_reg: Option<u32>,
    ended: bool,
    failed: bool,
}

impl<'a> StreamReader<'a> {
    pub fn new(bytes: &'a [u8], order: ByteOrder) -> Self {
        Self {
            bytes,
            pos: 0,
            order,
            offset_reg: None,
            length_reg: None,
            ended: false,
            failed: false,
        }
    }

    /// Offset of the next unread byte.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes not yet consumed. After `End`, this is what follows the stream.
    pub fn rest(&self) -> &'a [u8] {
        &self.bytes[self.pos..]
    }

    /// Whether `End` has been read.
    pub fn is_finished(&self) -> bool {
        self.ended
    }

    /// Current `SetOffset` register.
    pub fn offset_register(&self) -> Option<u32> {
        self.offset_reg
    }

    /// Current `SetLength` register.
    pub fn length_register(&self) -> Option<u32> {
        self.length_reg
    }

    /// Decode every remaining instruction and return them with the offset
    /// one past `End`.
    pub fn read_all(mut self) -> Result<(Vec<Instr<'a>>, usize), StreamError> {
        let mut instrs = Vec::new();
        for instr in self.by_ref() {
            instrs.push(instr?);
        }
        Ok((instrs, self.pos))
    }

    fn read_instr(&mut self) -> Result<Instr<'a>, StreamError> {
        let start = self.pos;
        let Some(&byte) = self.bytes.get(start) else {
            return Err(StreamError::MissingTerminator);
        };
        if byte < OPCODE_BASE {
            return Err(StreamError::ExpectedOpcode {
                byte,
                offset: start,
            });
        }
        let opcode = Opcode::from_byte(byte).ok_or(StreamError::UnknownOpcode {
            byte,
            offset: start,
        })?;
        self.pos += 1;

        let mut operands = Vec::with_capacity(opcode.operands().len());
        for &kind in opcode.operands() {
            let operand = self.read_operand(opcode, kind, start)?;
            operands.push(operand);
        }

        match opcode {
            Opcode::SetOffset => self.offset_reg = operands[0].value.as_index(),
            Opcode::SetLength => self.length_reg = operands[0].value.as_index(),
            Opcode::End => self.ended = true,
            _ => {}
        }

        Ok(Instr {
            offset: start,
            opcode,
            operands,
            bytes: &self.bytes[start..self.pos],
        })
    }

    fn read_operand(
        &mut self,
        opcode: Opcode,
        kind: OperandKind,
        instr_offset: usize,
    ) -> Result<Operand<'a>, StreamError> {
        let start = self.pos;
        let value = match kind {
            OperandKind::Symbol(_) | OperandKind::Count | OperandKind::Asset => {
                let (value, len) = decode_index(&self.bytes[start..])
                    .map_err(|_| StreamError::IndexOverflow { offset: start })?;
                self.pos += len;
                OperandValue::Index(value)
            }
            OperandKind::Word => {
                let word = self
                    .order
                    .read_u32(self.bytes, start)
                    .ok_or(StreamError::Truncated {
                        opcode: opcode.name(),
                        offset: instr_offset,
                    })?;
                self.pos += 4;
                OperandValue::Word(word)
            }
            OperandKind::Bytes => {
                let len = self
                    .length_reg
                    .ok_or(StreamError::MissingLength {
                        offset: instr_offset,
                    })? as usize;
                let end = start.checked_add(len).filter(|&e| e <= self.bytes.len());
                let Some(end) = end else {
                    return Err(StreamError::Truncated {
                        opcode: opcode.name(),
                        offset: instr_offset,
                    });
                };
                self.pos = end;
                OperandValue::Bytes(&self.bytes[start..end])
            }
        };
        Ok(Operand {
            kind,
            value,
            range: start..self.pos,
        })
    }
}

impl<'a> Iterator for StreamReader<'a> {
    type Item = Result<Instr<'a>, StreamError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.ended || self.failed {
            return None;
        }
        let result = self.read_instr();
        if result.is_err() {
            self.failed = true;
        }
        Some(result)
    }
}
