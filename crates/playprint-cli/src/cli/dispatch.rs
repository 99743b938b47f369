//! Extraction of typed parameters from `ArgMatches`.

use std::path::PathBuf;

use clap::ArgMatches;
use playprint_compiler::{ConfigOverrides, MissingPolicy};
use playprint_core::{ByteOrder, ScalarEncoding};

use super::ColorChoice;
use crate::commands::assemble::AssembleArgs;
use crate::commands::compile::CompileArgs;
use crate::commands::dump::DumpArgs;

pub struct CompileParams {
    pub workprint: PathBuf,
    pub out_dir: Option<PathBuf>,
    pub byte_order: Option<ByteOrder>,
    pub scalar: Option<ScalarEncoding>,
    pub on_missing: Option<MissingPolicy>,
    pub timestamp: Option<u32>,
    pub asset_root: Option<PathBuf>,
    pub verbose: bool,
}

impl CompileParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            workprint: m.get_one::<PathBuf>("workprint").cloned().unwrap(),
            out_dir: m.get_one::<PathBuf>("out_dir").cloned(),
            byte_order: parse_byte_order(m),
            scalar: m
                .get_one::<String>("scalar")
                .and_then(|s| ScalarEncoding::from_name(s)),
            on_missing: parse_on_missing(m),
            timestamp: m.get_one::<u32>("timestamp").copied(),
            asset_root: m.get_one::<PathBuf>("asset_root").cloned(),
            verbose: m.get_flag("verbose"),
        }
    }
}

impl From<CompileParams> for CompileArgs {
    fn from(p: CompileParams) -> Self {
        Self {
            workprint: p.workprint,
            overrides: ConfigOverrides {
                output_dir: p.out_dir,
                byte_order: p.byte_order,
                scalar: p.scalar,
                verbose: p.verbose,
                on_missing: p.on_missing,
                timestamp: p.timestamp,
                asset_root: p.asset_root,
            },
        }
    }
}

pub struct AssembleParams {
    pub manifest: PathBuf,
    pub output: Option<PathBuf>,
    pub on_missing: Option<MissingPolicy>,
    pub timestamp: Option<u32>,
    pub verbose: bool,
}

impl AssembleParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            manifest: m.get_one::<PathBuf>("manifest").cloned().unwrap(),
            output: m.get_one::<PathBuf>("output").cloned(),
            on_missing: parse_on_missing(m),
            timestamp: m.get_one::<u32>("timestamp").copied(),
            verbose: m.get_flag("verbose"),
        }
    }
}

impl From<AssembleParams> for AssembleArgs {
    fn from(p: AssembleParams) -> Self {
        Self {
            manifest: p.manifest,
            output: p.output,
            overrides: ConfigOverrides {
                verbose: p.verbose,
                on_missing: p.on_missing,
                timestamp: p.timestamp,
                ..ConfigOverrides::default()
            },
        }
    }
}

pub struct DumpParams {
    pub input: PathBuf,
    pub kind: Option<String>,
    pub symbols: Option<PathBuf>,
    pub byte_order: Option<ByteOrder>,
    pub color: ColorChoice,
}

impl DumpParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            input: m.get_one::<PathBuf>("input").cloned().unwrap(),
            kind: m.get_one::<String>("kind").cloned(),
            symbols: m.get_one::<PathBuf>("symbols").cloned(),
            byte_order: parse_byte_order(m),
            color: parse_color(m),
        }
    }
}

impl From<DumpParams> for DumpArgs {
    fn from(p: DumpParams) -> Self {
        Self {
            input: p.input,
            kind: p.kind,
            symbols: p.symbols,
            byte_order: p.byte_order,
            color: p.color.should_colorize(),
        }
    }
}

/// Parse --color flag into ColorChoice.
fn parse_color(m: &ArgMatches) -> ColorChoice {
    match m.get_one::<String>("color").map(|s| s.as_str()) {
        Some("always") => ColorChoice::Always,
        Some("never") => ColorChoice::Never,
        _ => ColorChoice::Auto,
    }
}

fn parse_byte_order(m: &ArgMatches) -> Option<ByteOrder> {
    m.get_one::<String>("byte_order")
        .and_then(|s| ByteOrder::from_name(s))
}

fn parse_on_missing(m: &ArgMatches) -> Option<MissingPolicy> {
    m.get_one::<String>("on_missing")
        .and_then(|s| MissingPolicy::from_name(s))
}
