//! Byte order of multi-byte container fields.
//!
//! A container declares its order once, through the sub-type of its root
//! form. Every size, header field, fixed-width operand and property value
//! written during a run follows that declaration.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ByteOrder {
    #[default]
    Big,
    Little,
}

impl ByteOrder {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "big" | "be" => Some(Self::Big),
            "little" | "le" => Some(Self::Little),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Big => "big",
            Self::Little => "little",
        }
    }

    #[inline]
    pub fn u32_to_bytes(self, value: u32) -> [u8; 4] {
        match self {
            Self::Big => value.to_be_bytes(),
            Self::Little => value.to_le_bytes(),
        }
    }

    #[inline]
    pub fn u32_from_bytes(self, bytes: [u8; 4]) -> u32 {
        match self {
            Self::Big => u32::from_be_bytes(bytes),
            Self::Little => u32::from_le_bytes(bytes),
        }
    }

    #[inline]
    pub fn i32_to_bytes(self, value: i32) -> [u8; 4] {
        self.u32_to_bytes(value as u32)
    }

    #[inline]
    pub fn i32_from_bytes(self, bytes: [u8; 4]) -> i32 {
        self.u32_from_bytes(bytes) as i32
    }

    /// Read a `u32` at `at`, or `None` if the slice is too short.
    pub fn read_u32(self, bytes: &[u8], at: usize) -> Option<u32> {
        let raw: [u8; 4] = bytes.get(at..at.checked_add(4)?)?.try_into().ok()?;
        Some(self.u32_from_bytes(raw))
    }
}

impl std::fmt::Display for ByteOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
