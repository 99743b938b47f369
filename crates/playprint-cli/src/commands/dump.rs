use std::path::{Path, PathBuf};

use playprint_core::{ByteOrder, Colors, SymbolTable};
use playprint_format::{Tag, dump, dump_entity};

pub struct DumpArgs {
    pub input: PathBuf,
    pub kind: Option<String>,
    pub symbols: Option<PathBuf>,
    pub byte_order: Option<ByteOrder>,
    pub color: bool,
}

pub fn run(args: DumpArgs) {
    let bytes = match std::fs::read(&args.input) {
        Ok(bytes) => bytes,
        Err(e) => {
            eprintln!("error: cannot read '{}': {}", args.input.display(), e);
            std::process::exit(1);
        }
    };

    let symbols = match args.symbols.as_deref().map(load_symbols).transpose() {
        Ok(symbols) => symbols,
        Err(msg) => {
            eprintln!("error: {}", msg);
            std::process::exit(1);
        }
    };

    let colors = Colors::new(args.color);
    let kind = args.kind.as_deref().or_else(|| kind_from_extension(&args.input));
    let res = match kind {
        Some(kind) => {
            let tag = match kind {
                "grp" => Tag::GROUP,
                "scn" => Tag::SCENE,
                _ => Tag::SET,
            };
            dump_entity(
                &bytes,
                tag,
                args.byte_order.unwrap_or_default(),
                symbols.as_ref(),
                colors,
            )
        }
        None => dump(&bytes, args.byte_order, symbols.as_ref(), colors),
    };

    match res {
        Ok(text) => print!("{}", text),
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    }
}

fn load_symbols(path: &Path) -> Result<SymbolTable, String> {
    let json = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read '{}': {}", path.display(), e))?;
    SymbolTable::from_json(&json).map_err(|e| format!("invalid symbol table '{}': {}", path.display(), e))
}

/// Entity sources are recognized by the extensions `compile` gives them.
fn kind_from_extension(path: &Path) -> Option<&'static str> {
    match path.extension()?.to_str()? {
        "grp" => Some("grp"),
        "scn" => Some("scn"),
        "set" => Some("set"),
        _ => None,
    }
}
