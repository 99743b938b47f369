//! Four-character chunk tags.
//!
//! Tags are stored as raw bytes and are never byte-swapped.

use playprint_core::ByteOrder;

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Tag(pub [u8; 4]);

impl Tag {
    /// Generic form container.
    pub const FORM: Tag = Tag(*b"FORM");
    /// Generic list form.
    pub const LIST: Tag = Tag(*b"LIST");
    /// Root sub-type: big-endian container.
    pub const ROOT_BE: Tag = Tag(*b"PPBE");
    /// Root sub-type: little-endian container.
    pub const ROOT_LE: Tag = Tag(*b"PPLE");
    /// List sub-type: media reference list.
    pub const MRFL: Tag = Tag(*b"MRFL");

    pub const HDR: Tag = Tag(*b"hdr ");
    pub const TOC: Tag = Tag(*b"toc ");
    pub const GROUP: Tag = Tag(*b"grp ");
    pub const SCENE: Tag = Tag(*b"scn ");
    pub const SET: Tag = Tag(*b"set ");
    pub const INFO: Tag = Tag(*b"info");
    pub const MREF: Tag = Tag(*b"mref");

    pub const fn new(bytes: &[u8; 4]) -> Self {
        Self(*bytes)
    }

    /// Parse a tag from text, padding short names with spaces.
    ///
    /// Returns `None` for names longer than four bytes or containing
    /// non-ASCII characters.
    pub fn from_name(name: &str) -> Option<Self> {
        if name.len() > 4 || !name.is_ascii() {
            return None;
        }
        let mut bytes = [b' '; 4];
        bytes[..name.len()].copy_from_slice(name.as_bytes());
        Some(Self(bytes))
    }

    /// Whether chunks with this tag carry a sub-type and nested chunks.
    pub fn is_form(self) -> bool {
        self == Self::FORM || self == Self::LIST
    }

    /// Root sub-type declaring `order`.
    pub fn root_subtype(order: ByteOrder) -> Self {
        match order {
            ByteOrder::Big => Self::ROOT_BE,
            ByteOrder::Little => Self::ROOT_LE,
        }
    }

    /// Byte order declared by a root sub-type, if this is one.
    pub fn root_order(self) -> Option<ByteOrder> {
        match self {
            Self::ROOT_BE => Some(ByteOrder::Big),
            Self::ROOT_LE => Some(ByteOrder::Little),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }
}

impl std::fmt::Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for &b in &self.0 {
            if b.is_ascii_graphic() || b == b' ' {
                write!(f, "{}", b as char)?;
            } else {
                write!(f, "\\x{b:02x}")?;
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Tag(\"{self}\")")
    }
}
