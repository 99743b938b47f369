//! Chunk relinker.
//!
//! Group and scene payloads leave the emitter with stream-local asset
//! numbers and a name table. Once the container's media entries are known,
//! each local number is replaced by the global index of its name. Every
//! other byte is copied through unchanged, and the name table is dropped.

mod error;
mod relinker;

#[cfg(test)]
mod relink_tests;

pub use error::RelinkError;
pub use relinker::{relink_entity, relink_stream};
