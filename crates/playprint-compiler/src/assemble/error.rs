use std::path::PathBuf;

use playprint_format::{ContainerError, StreamError};

use super::ChunkKind;
use crate::relink::RelinkError;

#[derive(Debug, thiserror::Error)]
pub enum AssembleError {
    #[error("{kind} '{name}': source '{}' does not exist", path.display())]
    MissingSource {
        kind: ChunkKind,
        name: String,
        path: PathBuf,
    },

    #[error("media '{name}' registered after {content_kind} '{content}'; media must come first")]
    MediaAfterContent {
        name: String,
        content: String,
        content_kind: ChunkKind,
    },

    #[error("media '{0}' registered twice")]
    DuplicateMedia(String),

    #[error("{0} chunks do not fit the table of contents")]
    TooManyChunks(usize),

    #[error("cannot read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot write '{}': {source}", path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: ContainerError,
    },

    #[error("media '{name}' ('{}') is not a valid media list: {source}", path.display())]
    InvalidMedia {
        name: String,
        path: PathBuf,
        #[source]
        source: ContainerError,
    },

    #[error("{kind} '{name}': {source}")]
    Relink {
        kind: ChunkKind,
        name: String,
        #[source]
        source: RelinkError,
    },

    #[error("set '{name}': {source}")]
    Set {
        name: String,
        #[source]
        source: StreamError,
    },

    #[error("invalid manifest '{}': {source}", path.display())]
    Manifest {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl AssembleError {
    /// Whether the skip policy may drop the offending chunk.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Relink { source, .. } => source.is_recoverable(),
            _ => false,
        }
    }
}
