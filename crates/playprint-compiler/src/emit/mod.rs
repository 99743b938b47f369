//! Entity bytecode emitter.
//!
//! Turns one authoring-tree entity into the source file the assembler
//! consumes:
//! - group and scene: payload with a trailing asset name table
//! - set: size-prefixed stream without asset references
//! - media: a self-contained `LIST`/`MRFL` form

mod emitter;
mod error;
mod value;

#[cfg(test)]
mod emitter_tests;

pub use emitter::EntityEmitter;
pub use error::EmitError;
pub use value::{Encoded, ValueError, encode_value};
