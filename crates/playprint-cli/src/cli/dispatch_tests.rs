//! Tests for CLI dispatch logic: flag parsing and params extraction.

use std::path::PathBuf;

use clap::ArgMatches;
use playprint_compiler::MissingPolicy;
use playprint_core::{ByteOrder, ScalarEncoding};

use super::*;
use crate::commands::assemble::AssembleArgs;
use crate::commands::compile::CompileArgs;

fn subcommand(args: &[&str]) -> ArgMatches {
    let m = build_cli().try_get_matches_from(args).unwrap();
    let (_, sub) = m.subcommand().unwrap();
    sub.clone()
}

#[test]
fn compile_defaults() {
    let m = subcommand(&["playprint", "compile", "castle.json"]);
    let params = CompileParams::from_matches(&m);

    assert_eq!(params.workprint, PathBuf::from("castle.json"));
    assert_eq!(params.out_dir, None);
    assert_eq!(params.byte_order, None);
    assert_eq!(params.scalar, None);
    assert_eq!(params.on_missing, None);
    assert!(!params.verbose);
}

#[test]
fn compile_flags() {
    let m = subcommand(&[
        "playprint",
        "compile",
        "castle.json",
        "-o",
        "build",
        "--byte-order",
        "le",
        "--scalar",
        "fixed16",
        "--on-missing",
        "skip",
        "--timestamp",
        "42",
        "--asset-root",
        "assets",
        "-v",
    ]);
    let args: CompileArgs = CompileParams::from_matches(&m).into();

    let o = args.overrides;
    assert_eq!(o.output_dir, Some(PathBuf::from("build")));
    assert_eq!(o.byte_order, Some(ByteOrder::Little));
    assert_eq!(o.scalar, Some(ScalarEncoding::Fixed16));
    assert_eq!(o.on_missing, Some(MissingPolicy::Skip));
    assert_eq!(o.timestamp, Some(42));
    assert_eq!(o.asset_root, Some(PathBuf::from("assets")));
    assert!(o.verbose);
}

#[test]
fn verbose_is_global() {
    let m = build_cli()
        .try_get_matches_from(["playprint", "-v", "dump", "x.ppr"])
        .unwrap();
    assert!(m.get_flag("verbose"));
}

#[test]
fn compile_requires_workprint() {
    let res = build_cli().try_get_matches_from(["playprint", "compile"]);
    assert!(res.is_err());
}

#[test]
fn compile_rejects_unknown_scalar() {
    let res = build_cli().try_get_matches_from(["playprint", "compile", "a.json", "--scalar", "double"]);
    assert!(res.is_err());
}

#[test]
fn assemble_overrides() {
    let m = subcommand(&[
        "playprint",
        "assemble",
        "build/playprint.json",
        "-o",
        "castle.ppr",
        "--timestamp",
        "0",
    ]);
    let args: AssembleArgs = AssembleParams::from_matches(&m).into();

    assert_eq!(args.manifest, PathBuf::from("build/playprint.json"));
    assert_eq!(args.output, Some(PathBuf::from("castle.ppr")));
    assert_eq!(args.overrides.timestamp, Some(0));
    assert_eq!(args.overrides.byte_order, None);
    assert_eq!(args.overrides.on_missing, None);
}

#[test]
fn assemble_has_no_byte_order() {
    let res = build_cli().try_get_matches_from([
        "playprint",
        "assemble",
        "m.json",
        "--byte-order",
        "le",
    ]);
    assert!(res.is_err());
}

#[test]
fn dump_params() {
    let m = subcommand(&[
        "playprint",
        "dump",
        "squad.grp",
        "--kind",
        "grp",
        "--symbols",
        "symbols.json",
        "--color",
        "never",
    ]);
    let params = DumpParams::from_matches(&m);

    assert_eq!(params.input, PathBuf::from("squad.grp"));
    assert_eq!(params.kind.as_deref(), Some("grp"));
    assert_eq!(params.symbols, Some(PathBuf::from("symbols.json")));
    assert_eq!(params.color, ColorChoice::Never);
    assert!(!params.color.should_colorize());
}

#[test]
fn dump_color_defaults_to_auto() {
    let m = subcommand(&["playprint", "dump", "castle.ppr"]);
    assert_eq!(DumpParams::from_matches(&m).color, ColorChoice::Auto);
}

#[test]
fn help_lists_subcommands() {
    let help = build_cli().render_help().to_string();
    for name in ["compile", "assemble", "dump", "--verbose"] {
        assert!(help.contains(name), "{name} missing from help");
    }
}
