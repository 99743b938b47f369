use std::path::PathBuf;

use playprint_format::ContainerError;

use super::ValueError;
use crate::symbols::SymbolError;
use crate::workprint::NodeKind;

#[derive(Debug, thiserror::Error)]
pub enum EmitError {
    #[error(transparent)]
    Symbol(#[from] SymbolError),

    #[error("property '{property}': {source}")]
    Value {
        property: String,
        #[source]
        source: ValueError,
    },

    #[error("set '{set}' property '{property}' references media; sets cannot hold media references")]
    MediaRefInSet { set: String, property: String },

    #[error("property '{property}' references an asset with an empty name")]
    EmptyAssetName { property: String },

    #[error("{kind} '{node}' is not an entity")]
    NotAnEntity { kind: NodeKind, node: String },

    #[error("media '{node}' has invalid kind '{kind}'")]
    BadMediaKind { node: String, kind: String },

    #[error("media '{node}' path '{}' is not a storable UTF-8 path", path.display())]
    BadMediaPath { node: String, path: PathBuf },

    #[error("cannot read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Container(#[from] ContainerError),
}

impl EmitError {
    /// Whether the entity can be dropped while the rest of the run continues.
    ///
    /// Only symbol misses qualify: an undeclared class, property, instance
    /// or enum variant.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Symbol(_)
                | Self::Value {
                    source: ValueError::UnknownVariant { .. },
                    ..
                }
        )
    }
}
