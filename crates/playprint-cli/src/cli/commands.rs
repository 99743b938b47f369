//! Command builders for the CLI.

use clap::Command;

use super::args::*;

/// Build the complete CLI with all subcommands.
pub fn build_cli() -> Command {
    Command::new("playprint")
        .about("Compile authoring trees into seekable playprint containers")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(verbose_arg())
        .subcommand(compile_command())
        .subcommand(assemble_command())
        .subcommand(dump_command())
}

/// Emit every entity of a workprint plus `symbols.json` and `playprint.json`.
pub fn compile_command() -> Command {
    Command::new("compile")
        .about("Emit entity sources, symbol table and manifest from a workprint")
        .after_help(
            r#"EXAMPLES:
  playprint compile castle.json -o build        # emit into build/
  playprint compile castle.json --scalar fixed16
  playprint compile castle.json --on-missing skip"#,
        )
        .arg(workprint_arg())
        .arg(out_dir_arg())
        .arg(byte_order_arg())
        .arg(scalar_arg())
        .arg(on_missing_arg())
        .arg(timestamp_arg())
        .arg(asset_root_arg())
}

/// Write the container described by a manifest.
pub fn assemble_command() -> Command {
    Command::new("assemble")
        .about("Assemble entity sources into one container")
        .after_help(
            r#"EXAMPLES:
  playprint assemble build/playprint.json
  playprint assemble build/playprint.json -o castle.ppr --timestamp 0"#,
        )
        .arg(manifest_arg())
        .arg(output_arg())
        .arg(on_missing_arg())
        .arg(timestamp_arg())
}

/// Render a container or entity source.
pub fn dump_command() -> Command {
    Command::new("dump")
        .about("Show the chunk tree and disassembled streams")
        .after_help(
            r#"EXAMPLES:
  playprint dump castle.ppr                            # whole container
  playprint dump castle.ppr --symbols build/symbols.json
  playprint dump build/squad.grp --kind grp           # one entity source"#,
        )
        .arg(input_arg())
        .arg(kind_arg())
        .arg(symbols_arg())
        .arg(byte_order_arg())
        .arg(color_arg())
}
