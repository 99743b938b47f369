use std::path::PathBuf;

use super::NodeKind;

#[derive(Debug, thiserror::Error)]
pub enum WorkprintError {
    #[error("cannot read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid workprint JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("workprint root must have kind 'root', found '{0}'")]
    RootKind(NodeKind),

    #[error("{child_kind} '{child}' cannot be placed inside {parent_kind} '{parent}'")]
    UnexpectedChild {
        parent: String,
        parent_kind: NodeKind,
        child: String,
        child_kind: NodeKind,
    },

    #[error("{0} node has an empty name")]
    EmptyName(NodeKind),

    #[error("{kind} name '{name}' is not a plain file name")]
    UnsafeName { kind: NodeKind, name: String },

    #[error("{kind} name '{name}' is used more than once")]
    DuplicateName { kind: NodeKind, name: String },
}
