//! Container header (`hdr ` chunk, 8 bytes).

use playprint_core::ByteOrder;

use crate::container::ContainerError;
use crate::tag::Tag;

/// Current container format version.
pub const VERSION: u32 = 1;

/// Byte length of the `hdr ` body.
pub const HEADER_LEN: usize = 8;

/// Body of the `hdr ` chunk: `version:u32, timestamp:u32`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FileHeader {
    pub version: u32,
    /// Seconds since the Unix epoch at which the container was assembled.
    pub timestamp: u32,
}

impl Default for FileHeader {
    fn default() -> Self {
        Self::new(0)
    }
}

impl FileHeader {
    pub fn new(timestamp: u32) -> Self {
        Self {
            version: VERSION,
            timestamp,
        }
    }

    /// Decode the body of a `hdr ` chunk.
    pub fn from_bytes(bytes: &[u8], order: ByteOrder) -> Result<Self, ContainerError> {
        if bytes.len() < HEADER_LEN {
            return Err(ContainerError::Malformed {
                tag: Tag::HDR,
                reason: "header body shorter than 8 bytes",
            });
        }
        let version = order.u32_from_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        let timestamp = order.u32_from_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
        Ok(Self { version, timestamp })
    }

    /// Encode the body of a `hdr ` chunk.
    pub fn to_bytes(&self, order: ByteOrder) -> [u8; HEADER_LEN] {
        let mut bytes = [0u8; HEADER_LEN];
        bytes[0..4].copy_from_slice(&order.u32_to_bytes(self.version));
        bytes[4..8].copy_from_slice(&order.u32_to_bytes(self.timestamp));
        bytes
    }

    pub fn validate_version(&self) -> bool {
        self.version == VERSION
    }
}
