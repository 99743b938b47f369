//! Playprint assembler.
//!
//! Two phases. `register` collects the chunk table in final order and
//! assigns every media entry its global asset index. `finalize` writes the
//! container:
//!
//! ```text
//! FORM size PPBE|PPLE
//!   hdr  { version, timestamp }
//!   toc  { count, (label, offset) × count }   reserved, filled last
//!   LIST MRFL …                               media, copied verbatim
//!   grp  / scn  …                             relinked payloads
//!   set  …                                    stream, size prefix dropped
//! ```

mod assembler;
mod chunk;
mod error;
mod manifest;


pub use assembler::{Assembler, AssemblyReport, SkippedChunk, WrittenChunk};
pub use chunk::{ChunkEntry, ChunkKind};
pub use error::AssembleError;
pub use manifest::Manifest;
