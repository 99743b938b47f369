use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{AssembleError, Assembler, ChunkEntry};
use crate::config::Config;

/// Serialized assembly input: configuration, output path and the chunk
/// table in final order.
///
/// ```json
/// {
///   "config": { "byte_order": "big" },
///   "output": "castle.ppr",
///   "chunks": [
///     { "kind": "media", "source": "tex1.mrfl", "name": "tex1" },
///     { "kind": "group", "source": "squad.grp", "name": "squad" }
///   ]
/// }
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    #[serde(default)]
    pub config: Config,
    pub output: PathBuf,
    #[serde(default)]
    pub chunks: Vec<ChunkEntry>,
}

impl Manifest {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Read a manifest. Relative source paths and the output directory are
    /// taken relative to the manifest's directory.
    pub fn load(path: &Path) -> Result<Self, AssembleError> {
        let json = std::fs::read_to_string(path).map_err(|source| AssembleError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let manifest = Self::from_json(&json).map_err(|source| AssembleError::Manifest {
            path: path.to_path_buf(),
            source,
        })?;
        let base = path.parent().unwrap_or(Path::new(""));
        Ok(manifest.with_base(base))
    }

    /// Join every relative path onto `base`.
    ///
    /// `output` itself is left alone: a relative output is resolved once, by
    /// [`Config::resolve_output`], against the output directory. That
    /// directory defaults to `base` when the manifest does not name one.
    pub fn with_base(mut self, base: &Path) -> Self {
        match &self.config.output_dir {
            Some(dir) if dir.is_relative() => self.config.output_dir = Some(base.join(dir)),
            Some(_) => {}
            None if base.as_os_str().is_empty() => {}
            None => self.config.output_dir = Some(base.to_path_buf()),
        }
        for chunk in &mut self.chunks {
            if chunk.source.is_relative() {
                chunk.source = base.join(&chunk.source);
            }
        }
        self
    }

    /// Register every chunk. Returns the assembler and the output path to
    /// pass to [`Assembler::finalize`].
    pub fn into_assembler(self) -> Result<(Assembler, PathBuf), AssembleError> {
        let mut assembler = Assembler::new(self.config);
        for chunk in self.chunks {
            assembler.register(chunk.kind, chunk.source, chunk.name)?;
        }
        Ok((assembler, self.output))
    }
}
