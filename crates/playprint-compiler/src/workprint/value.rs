//! Property values carried by authoring-tree nodes.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// A named, typed property of a node.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub name: String,
    pub value: Value,
}

impl Property {
    pub fn new(name: impl Into<String>, value: Value) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// Every value kind a property can hold.
///
/// Serialized externally tagged, e.g. `{"vector3": [0, 1, 0]}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Value {
    Int(i32),
    Scalar(f32),
    Vector2([f32; 2]),
    Vector3([f32; 3]),
    Vector4([f32; 4]),
    /// Quaternion `x, y, z, w`.
    Rotation([f32; 4]),
    /// Four rows of three scalars.
    Transform([[f32; 3]; 4]),
    String(String),
    /// Stored as the position of `value` in `variants`.
    Enum {
        variants: Vec<String>,
        value: String,
    },
    IntArray(Vec<i32>),
    ScalarArray(Vec<f32>),
    Vector2Array(Vec<[f32; 2]>),
    Vector3Array(Vec<[f32; 3]>),
    Vector4Array(Vec<[f32; 4]>),
    StringArray(Vec<String>),
    /// Logical name of a media entry.
    MediaRef(String),
}

impl Value {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Int(_) => "int",
            Self::Scalar(_) => "scalar",
            Self::Vector2(_) => "vector2",
            Self::Vector3(_) => "vector3",
            Self::Vector4(_) => "vector4",
            Self::Rotation(_) => "rotation",
            Self::Transform(_) => "transform",
            Self::String(_) => "string",
            Self::Enum { .. } => "enum",
            Self::IntArray(_) => "int_array",
            Self::ScalarArray(_) => "scalar_array",
            Self::Vector2Array(_) => "vector2_array",
            Self::Vector3Array(_) => "vector3_array",
            Self::Vector4Array(_) => "vector4_array",
            Self::StringArray(_) => "string_array",
            Self::MediaRef(_) => "media_ref",
        }
    }
}

/// One file referenced by a media node.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MediaSource {
    #[serde(default)]
    pub flags: u32,
    /// Four-character media kind, e.g. `TEXR`.
    pub kind: String,
    pub path: PathBuf,
    /// Copy the file's bytes into the container instead of its path.
    #[serde(default)]
    pub embed: bool,
}
