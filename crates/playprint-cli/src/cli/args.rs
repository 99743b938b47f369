//! Shared argument builders for CLI commands.
//!
//! Each function returns a `clap::Arg` so the same definition can be reused
//! by every command that takes it.

use std::path::PathBuf;

use clap::{Arg, ArgAction, value_parser};

/// Workprint JSON file (positional).
pub fn workprint_arg() -> Arg {
    Arg::new("workprint")
        .value_name("WORKPRINT")
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("Authoring tree (JSON)")
}

/// Assembly manifest (positional).
pub fn manifest_arg() -> Arg {
    Arg::new("manifest")
        .value_name("MANIFEST")
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("Assembly manifest (JSON)")
}

/// Container or entity source file (positional).
pub fn input_arg() -> Arg {
    Arg::new("input")
        .value_name("FILE")
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("Container, media list or entity source file")
}

/// Output directory (-o/--out-dir).
pub fn out_dir_arg() -> Arg {
    Arg::new("out_dir")
        .short('o')
        .long("out-dir")
        .value_name("DIR")
        .value_parser(value_parser!(PathBuf))
        .help("Directory for emitted files [default: current directory]")
}

/// Container path (-o/--output).
pub fn output_arg() -> Arg {
    Arg::new("output")
        .short('o')
        .long("output")
        .value_name("FILE")
        .value_parser(value_parser!(PathBuf))
        .help("Container path, relative to the output directory (overrides the manifest)")
}

/// Byte order (--byte-order).
pub fn byte_order_arg() -> Arg {
    Arg::new("byte_order")
        .long("byte-order")
        .value_name("ORDER")
        .value_parser(["big", "little", "be", "le"])
        .help("Byte order of multi-byte fields [default: big]")
}

/// Scalar encoding (--scalar).
pub fn scalar_arg() -> Arg {
    Arg::new("scalar")
        .long("scalar")
        .value_name("ENCODING")
        .value_parser(["float", "fixed16", "fixed20"])
        .help("Scalar encoding [default: float]")
}

/// Missing-symbol policy (--on-missing).
pub fn on_missing_arg() -> Arg {
    Arg::new("on_missing")
        .long("on-missing")
        .value_name("POLICY")
        .value_parser(["abort", "skip"])
        .help("What to do with entities that reference undeclared names [default: abort]")
}

/// Pinned header timestamp (--timestamp).
pub fn timestamp_arg() -> Arg {
    Arg::new("timestamp")
        .long("timestamp")
        .value_name("SECONDS")
        .value_parser(value_parser!(u32))
        .help("Fixed header timestamp, for reproducible output")
}

/// Root for embedded media paths (--asset-root).
pub fn asset_root_arg() -> Arg {
    Arg::new("asset_root")
        .long("asset-root")
        .value_name("DIR")
        .value_parser(value_parser!(PathBuf))
        .help("Directory embedded media paths are read from")
}

/// Entity kind of a standalone source file (--kind).
pub fn kind_arg() -> Arg {
    Arg::new("kind")
        .long("kind")
        .value_name("KIND")
        .value_parser(["grp", "scn", "set"])
        .help("Dump a standalone entity source of this kind")
}

/// Symbol table for annotations (--symbols).
pub fn symbols_arg() -> Arg {
    Arg::new("symbols")
        .long("symbols")
        .value_name("FILE")
        .value_parser(value_parser!(PathBuf))
        .help("symbols.json used to name indices")
}

/// Color output control (--color).
pub fn color_arg() -> Arg {
    Arg::new("color")
        .long("color")
        .value_name("WHEN")
        .default_value("auto")
        .value_parser(["auto", "always", "never"])
        .help("Colorize output")
}

/// Debug logging (-v/--verbose).
pub fn verbose_arg() -> Arg {
    Arg::new("verbose")
        .short('v')
        .long("verbose")
        .global(true)
        .action(ArgAction::SetTrue)
        .help("Log per-chunk progress")
}
