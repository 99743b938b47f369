//! Run-wide scalar encoding.
//!
//! Every scalar-valued operand of every stream in one compilation run uses
//! the same encoding. It is chosen once in the run configuration.

use serde::{Deserialize, Serialize};

/// How scalar values are stored in property payloads.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalarEncoding {
    /// IEEE-754 single precision, stored as its bit pattern.
    #[default]
    Float,
    /// Signed 16.16 fixed point.
    Fixed16,
    /// Signed 20.12 fixed point.
    Fixed20,
}

impl ScalarEncoding {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "float" => Some(Self::Float),
            "fixed16" | "16.16" => Some(Self::Fixed16),
            "fixed20" | "20.12" => Some(Self::Fixed20),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Float => "float",
            Self::Fixed16 => "fixed16",
            Self::Fixed20 => "fixed20",
        }
    }

    /// Multiplier applied before truncation, `None` for float.
    fn scale(self) -> Option<f32> {
        match self {
            Self::Float => None,
            Self::Fixed16 => Some(65536.0),
            Self::Fixed20 => Some(4096.0),
        }
    }

    /// Encode a scalar to the 32-bit pattern written into a stream.
    ///
    /// Fixed-point conversion truncates toward zero and saturates at the
    /// `i32` range.
    pub fn encode(self, value: f32) -> u32 {
        match self.scale() {
            None => value.to_bits(),
            Some(scale) => ((value * scale) as i32) as u32,
        }
    }

    /// Inverse of [`encode`](Self::encode), up to fixed-point precision.
    pub fn decode(self, bits: u32) -> f32 {
        match self.scale() {
            None => f32::from_bits(bits),
            Some(scale) => (bits as i32) as f32 / scale,
        }
    }
}

impl std::fmt::Display for ScalarEncoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
