#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Core data structures shared by the Playprint format and compiler crates.
//!
//! - `symtab`: sorted, deduplicated name namespaces whose positions are the
//!   runtime indices embedded in compiled streams
//! - `scalar`: run-wide scalar encoding (float or fixed point)
//! - `order`: byte order of every multi-byte field in a container
//! - `colors`: ANSI palette for dumps

pub mod colors;
pub mod order;
pub mod scalar;
pub mod symtab;


pub use colors::Colors;
pub use order::ByteOrder;
pub use scalar::ScalarEncoding;
pub use symtab::{ClassInfo, Namespace, SymbolTable, SymbolTableBuilder};
