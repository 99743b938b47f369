use std::path::PathBuf;

use playprint_format::Tag;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChunkKind {
    Media,
    Group,
    Set,
    Scene,
}

impl ChunkKind {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "media" => Some(Self::Media),
            "group" => Some(Self::Group),
            "set" => Some(Self::Set),
            "scene" => Some(Self::Scene),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Media => "media",
            Self::Group => "group",
            Self::Set => "set",
            Self::Scene => "scene",
        }
    }

    /// Tag of the chunk written for this kind. Media lists keep their own
    /// `LIST` form.
    pub fn tag(self) -> Tag {
        match self {
            Self::Media => Tag::LIST,
            Self::Group => Tag::GROUP,
            Self::Set => Tag::SET,
            Self::Scene => Tag::SCENE,
        }
    }

    /// File extension of this kind's source files.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Media => "mrfl",
            Self::Group => "grp",
            Self::Set => "set",
            Self::Scene => "scn",
        }
    }
}

impl std::fmt::Display for ChunkKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One collected chunk.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChunkEntry {
    pub kind: ChunkKind,
    pub source: PathBuf,
    /// Logical name; for media, the name asset references resolve against.
    pub name: String,
}
