//! Whole-tree compilation: scan, emit every entity, write the manifest.

use std::path::{Path, PathBuf};

use playprint_core::SymbolTable;
use tracing::{debug, info, warn};

use crate::assemble::{ChunkEntry, ChunkKind, Manifest, SkippedChunk};
use crate::config::{Config, MissingPolicy};
use crate::emit::EntityEmitter;
use crate::symbols::scan;
use crate::workprint::{AuthoringTree, ClassResolver, NodeKind, check_entity_names};
use crate::{Error, Result};

pub const SYMBOLS_FILE: &str = "symbols.json";
pub const MANIFEST_FILE: &str = "playprint.json";
pub const DEFAULT_OUTPUT: &str = "playprint.ppr";

/// Emission order; media must precede content in the manifest.
const PASSES: [(NodeKind, ChunkKind); 4] = [
    (NodeKind::Media, ChunkKind::Media),
    (NodeKind::Set, ChunkKind::Set),
    (NodeKind::Group, ChunkKind::Group),
    (NodeKind::Scene, ChunkKind::Scene),
];

#[derive(Debug, Clone)]
pub struct CompileReport {
    pub symbols: SymbolTable,
    pub symbols_path: PathBuf,
    /// Manifest as written; its paths are relative to `manifest_path`'s directory.
    pub manifest: Manifest,
    pub manifest_path: PathBuf,
    pub skipped: Vec<SkippedChunk>,
}

/// Compile every entity of `tree` into source files under the configured
/// output directory.
///
/// Fails before writing anything when an entity name is not a plain file
/// name or repeats within its kind.
pub fn compile_workprint(
    tree: &dyn AuthoringTree,
    resolver: &dyn ClassResolver,
    config: &Config,
) -> Result<CompileReport> {
    check_entity_names(tree)?;
    let out_dir = config
        .output_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from("."));
    std::fs::create_dir_all(&out_dir).map_err(|source| Error::Io {
        path: out_dir.clone(),
        source,
    })?;

    let symbols = scan(tree, resolver);
    let emitter = EntityEmitter::new(tree, resolver, &symbols, config);
    let mut chunks = Vec::new();
    let mut skipped = Vec::new();

    for (node_kind, chunk_kind) in PASSES {
        for node in tree.nodes_of_kind(tree.root(), node_kind) {
            let name = tree.name(node);
            let bytes = match emitter.emit(node) {
                Ok(bytes) => bytes,
                Err(err) if err.is_recoverable() && config.on_missing == MissingPolicy::Skip => {
                    warn!(kind = %chunk_kind, name, error = %err, "skipping entity");
                    skipped.push(SkippedChunk {
                        kind: chunk_kind,
                        name: name.to_string(),
                        reason: err.to_string(),
                    });
                    continue;
                }
                Err(err) => return Err(err.into()),
            };

            let file = PathBuf::from(format!("{name}.{}", chunk_kind.extension()));
            write_file(&out_dir.join(&file), &bytes)?;
            if config.verbose {
                info!(kind = %chunk_kind, name, bytes = bytes.len(), "emitted");
            } else {
                debug!(kind = %chunk_kind, name, bytes = bytes.len(), "emitted");
            }
            chunks.push(ChunkEntry {
                kind: chunk_kind,
                source: file,
                name: name.to_string(),
            });
        }
    }

    let symbols_path = out_dir.join(SYMBOLS_FILE);
    let json = symbols.to_json().map_err(|source| Error::Json {
        path: symbols_path.clone(),
        source,
    })?;
    write_file(&symbols_path, json.as_bytes())?;

    let manifest = Manifest {
        config: Config {
            output_dir: None,
            asset_root: None,
            ..config.clone()
        },
        output: PathBuf::from(DEFAULT_OUTPUT),
        chunks,
    };
    let manifest_path = out_dir.join(MANIFEST_FILE);
    let json = manifest.to_json().map_err(|source| Error::Json {
        path: manifest_path.clone(),
        source,
    })?;
    write_file(&manifest_path, json.as_bytes())?;

    info!(
        entities = manifest.chunks.len(),
        skipped = skipped.len(),
        manifest = %manifest_path.display(),
        "compiled workprint"
    );
    Ok(CompileReport {
        symbols,
        symbols_path,
        manifest,
        manifest_path,
        skipped,
    })
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    std::fs::write(path, bytes).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })
}
