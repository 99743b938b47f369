//! Playprint compiler: authoring tree in, seekable runtime container out.
//!
//! The pipeline, leaf-first:
//! - `workprint` - authoring-tree collaborator traits and a JSON-backed tree
//! - `symbols` - scan the tree into a frozen `SymbolTable`
//! - `emit` - per-entity bytecode and media sub-containers
//! - `relink` - rewrite stream-local asset references to global indices
//! - `assemble` - collect named chunks and write the final container
//! - `compile` - drive scan and emission for a whole tree
//! - `config` - explicit run configuration

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod assemble;
pub mod compile;
pub mod config;
pub mod emit;
pub mod relink;
pub mod symbols;
pub mod workprint;

#[cfg(test)]
mod config_tests;
#[cfg(test)]
mod compile_tests;
#[cfg(test)]
pub mod test_utils;

pub use assemble::{
    AssembleError, Assembler, AssemblyReport, ChunkEntry, ChunkKind, Manifest, SkippedChunk,
    WrittenChunk,
};
pub use compile::{CompileReport, compile_workprint};
pub use config::{Config, ConfigOverrides, MissingPolicy};
pub use emit::{EmitError, EntityEmitter};
pub use relink::{RelinkError, relink_entity, relink_stream};
pub use symbols::{SymbolError, scan};
pub use workprint::{
    AttributeClassResolver, AuthoringTree, ClassResolver, NodeId, NodeKind, Workprint,
    WorkprintError, check_entity_names,
};

/// Errors surfaced by the compiler's entry points.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Workprint(#[from] WorkprintError),

    #[error(transparent)]
    Symbol(#[from] SymbolError),

    #[error(transparent)]
    Emit(#[from] EmitError),

    #[error(transparent)]
    Relink(#[from] RelinkError),

    #[error(transparent)]
    Assemble(#[from] AssembleError),

    #[error("cannot access '{}': {source}", path.display())]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot serialize '{}': {source}", path.display())]
    Json {
        path: std::path::PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Result type for compiler operations.
pub type Result<T> = std::result::Result<T, Error>;
