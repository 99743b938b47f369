//! Opcode table shared by every encoder and decoder of entity streams.
//!
//! All opcodes are `>= 0x80` and every variable-length index byte is
//! `<= 0x7F`, so a decoder can tell the next opcode from more index bytes
//! without a length prefix.

use playprint_core::Namespace;

/// First byte of the opcode space.
pub const OPCODE_BASE: u8 = 0x80;

/// Entity stream opcodes.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[repr(u8)]
pub enum Opcode {
    /// Terminates the stream. Asset names may follow.
    End = 0x80,
    BeginGroup = 0x81,
    EndGroup = 0x82,
    Actor = 0x83,
    EndActor = 0x84,
    Role = 0x85,
    EndRole = 0x86,
    /// Attach a named set instance to the current actor.
    BindSet = 0x87,
    /// Instance name of the innermost open entity.
    Name = 0x88,
    Flags = 0x89,
    /// Set the offset register to a qualified property index.
    SetOffset = 0x8A,
    /// Set the length register to a byte count.
    SetLength = 0x8B,
    /// Copy length-register bytes into the property at the offset register.
    Copy = 0x8C,
    /// Store an asset reference into the property at the offset register.
    CopyMediaRef = 0x8D,
}

/// Shape of one operand.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum OperandKind {
    /// Variable-length index into a symbol table namespace.
    Symbol(Namespace),
    /// Variable-length byte count.
    Count,
    /// Fixed-width `u32` in the container's byte order.
    Word,
    /// Raw bytes; the count is the current length register.
    Bytes,
    /// Variable-length asset reference: a local sequence number before
    /// relinking, a global asset index after.
    Asset,
}

impl OperandKind {
    /// Whether the operand uses the variable-length index encoding.
    pub fn is_index(self) -> bool {
        matches!(self, Self::Symbol(_) | Self::Count | Self::Asset)
    }
}

/// Static description of an opcode.
#[derive(Clone, Copy, Debug)]
pub struct OpcodeInfo {
    pub opcode: Opcode,
    pub name: &'static str,
    pub operands: &'static [OperandKind],
}

/// Every opcode, indexed by `byte - OPCODE_BASE`.
pub static OPCODES: [OpcodeInfo; 14] = [
    OpcodeInfo {
        opcode: Opcode::End,
        name: "End",
        operands: &[],
    },
    OpcodeInfo {
        opcode: Opcode::BeginGroup,
        name: "BeginGroup",
        operands: &[OperandKind::Symbol(Namespace::GroupClass)],
    },
    OpcodeInfo {
        opcode: Opcode::EndGroup,
        name: "EndGroup",
        operands: &[],
    },
    OpcodeInfo {
        opcode: Opcode::Actor,
        name: "Actor",
        operands: &[OperandKind::Symbol(Namespace::ActorClass)],
    },
    OpcodeInfo {
        opcode: Opcode::EndActor,
        name: "EndActor",
        operands: &[],
    },
    OpcodeInfo {
        opcode: Opcode::Role,
        name: "Role",
        operands: &[OperandKind::Symbol(Namespace::RoleClass)],
    },
    OpcodeInfo {
        opcode: Opcode::EndRole,
        name: "EndRole",
        operands: &[],
    },
    OpcodeInfo {
        opcode: Opcode::BindSet,
        name: "BindSet",
        operands: &[OperandKind::Symbol(Namespace::Instance)],
    },
    OpcodeInfo {
        opcode: Opcode::Name,
        name: "Name",
        operands: &[OperandKind::Symbol(Namespace::Instance)],
    },
    OpcodeInfo {
        opcode: Opcode::Flags,
        name: "Flags",
        operands: &[OperandKind::Word],
    },
    OpcodeInfo {
        opcode: Opcode::SetOffset,
        name: "SetOffset",
        operands: &[OperandKind::Symbol(Namespace::Property)],
    },
    OpcodeInfo {
        opcode: Opcode::SetLength,
        name: "SetLength",
        operands: &[OperandKind::Count],
    },
    OpcodeInfo {
        opcode: Opcode::Copy,
        name: "Copy",
        operands: &[OperandKind::Bytes],
    },
    OpcodeInfo {
        opcode: Opcode::CopyMediaRef,
        name: "CopyMediaRef",
        operands: &[OperandKind::Asset],
    },
];

impl Opcode {
    /// Decode an opcode byte. `None` for index bytes and unassigned opcodes.
    pub fn from_byte(b: u8) -> Option<Self> {
        let slot = b.checked_sub(OPCODE_BASE)?;
        OPCODES.get(slot as usize).map(|info| info.opcode)
    }

    pub fn to_byte(self) -> u8 {
        self as u8
    }

    pub fn info(self) -> &'static OpcodeInfo {
        &OPCODES[(self as u8 - OPCODE_BASE) as usize]
    }

    pub fn name(self) -> &'static str {
        self.info().name
    }

    pub fn operands(self) -> &'static [OperandKind] {
        self.info().operands
    }
}

impl std::fmt::Display for Opcode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
