use std::io::BufWriter;
use std::path::{Path, PathBuf};

use playprint_format::{
    AssetIndex, ChunkWriter, ContainerError, FileHeader, MediaList, StreamError, Tag,
    parse_set_payload, strip_set_prefix,
};
use serde::Serialize;
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use super::{AssembleError, ChunkEntry, ChunkKind};
use crate::config::{Config, MissingPolicy};
use crate::relink::relink_entity;

/// A chunk written to the container.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct WrittenChunk {
    pub kind: ChunkKind,
    pub name: String,
    /// File offset of the chunk's tag, as recorded in the TOC.
    pub offset: u32,
}

/// A chunk dropped under [`MissingPolicy::Skip`]. Its TOC slot holds 0.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SkippedChunk {
    pub kind: ChunkKind,
    pub name: String,
    pub reason: String,
}

/// Outcome of a successful `finalize`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AssemblyReport {
    pub output: PathBuf,
    /// Total file size in bytes.
    pub size: u64,
    pub written: Vec<WrittenChunk>,
    pub skipped: Vec<SkippedChunk>,
}

/// Bytes ready to be placed in the container.
enum Prepared {
    /// A complete chunk, copied as-is.
    Verbatim(Vec<u8>),
    /// A chunk body to wrap in `tag`.
    Tagged(Tag, Vec<u8>),
}

trait OutputContext<T> {
    fn at(self, path: &Path) -> Result<T, AssembleError>;
}

impl<T> OutputContext<T> for Result<T, ContainerError> {
    fn at(self, path: &Path) -> Result<T, AssembleError> {
        self.map_err(|source| AssembleError::Output {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Collects named chunks, then writes them into one container.
#[derive(Debug)]
pub struct Assembler {
    config: Config,
    entries: Vec<ChunkEntry>,
    assets: AssetIndex,
}

impl Assembler {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            entries: Vec::new(),
            assets: AssetIndex::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Collected chunks in declared order.
    pub fn entries(&self) -> &[ChunkEntry] {
        &self.entries
    }

    /// Global asset index built from the media entries so far.
    pub fn assets(&self) -> &AssetIndex {
        &self.assets
    }

    /// Add one chunk to the table.
    ///
    /// Fails when the source does not exist, when media follows a content
    /// chunk, or when a media name repeats.
    pub fn register(
        &mut self,
        kind: ChunkKind,
        source: impl Into<PathBuf>,
        name: impl Into<String>,
    ) -> Result<(), AssembleError> {
        let source = source.into();
        let name = name.into();

        if !std::fs::metadata(&source).is_ok_and(|m| m.is_file()) {
            return Err(AssembleError::MissingSource {
                kind,
                name,
                path: source,
            });
        }

        if kind == ChunkKind::Media {
            if let Some(content) = self.entries.iter().find(|e| e.kind != ChunkKind::Media) {
                return Err(AssembleError::MediaAfterContent {
                    name,
                    content: content.name.clone(),
                    content_kind: content.kind,
                });
            }
            let (index, inserted) = self.assets.insert(name.clone());
            if !inserted {
                return Err(AssembleError::DuplicateMedia(name));
            }
            debug!(name, index, "assigned asset index");
        }

        debug!(kind = %kind, name, source = %source.display(), "registered chunk");
        self.entries.push(ChunkEntry { kind, source, name });
        Ok(())
    }

    /// Write the container to `output` (placed under the configured output
    /// directory when relative).
    ///
    /// The file only appears once it is complete; on error nothing is left
    /// at `output`.
    pub fn finalize(&self, output: &Path) -> Result<AssemblyReport, AssembleError> {
        let path = self.config.resolve_output(output);
        let order = self.config.byte_order;
        let count = u32::try_from(self.entries.len())
            .map_err(|_| AssembleError::TooManyChunks(self.entries.len()))?;

        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let tmp = NamedTempFile::new_in(dir).map_err(|source| AssembleError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let mut w = ChunkWriter::new(BufWriter::new(tmp), order);

        let root = w.begin_form(Tag::FORM, Tag::root_subtype(order)).at(&path)?;
        let header = FileHeader::new(self.config.header_timestamp());
        w.write_tagged(Tag::HDR, &header.to_bytes(order)).at(&path)?;
        w.begin_toc(count).at(&path)?;

        let mut report = AssemblyReport {
            output: path.clone(),
            size: 0,
            written: Vec::with_capacity(self.entries.len()),
            skipped: Vec::new(),
        };

        for entry in &self.entries {
            match self.prepare(entry) {
                Ok(prepared) => {
                    let offset = w.offset().at(&path)?;
                    match prepared {
                        Prepared::Verbatim(bytes) => w.write_bytes(&bytes).at(&path)?,
                        Prepared::Tagged(tag, body) => {
                            w.write_tagged(tag, &body).at(&path)?;
                        }
                    }
                    w.add_toc_entry(0, offset).at(&path)?;
                    if self.config.verbose {
                        info!(kind = %entry.kind, name = entry.name, offset, "wrote chunk");
                    } else {
                        debug!(kind = %entry.kind, name = entry.name, offset, "wrote chunk");
                    }
                    report.written.push(WrittenChunk {
                        kind: entry.kind,
                        name: entry.name.clone(),
                        offset,
                    });
                }
                Err(err)
                    if err.is_recoverable() && self.config.on_missing == MissingPolicy::Skip =>
                {
                    warn!(kind = %entry.kind, name = entry.name, error = %err, "skipping chunk");
                    w.add_toc_entry(0, 0).at(&path)?;
                    report.skipped.push(SkippedChunk {
                        kind: entry.kind,
                        name: entry.name.clone(),
                        reason: err.to_string(),
                    });
                }
                Err(err) => return Err(err),
            }
        }

        w.end_toc().at(&path)?;
        let root_size = w.end_form(root).at(&path)?;
        let buffered = w.finish().at(&path)?;
        let tmp = buffered
            .into_inner()
            .map_err(|e| AssembleError::Io {
                path: path.clone(),
                source: e.into_error(),
            })?;
        tmp.persist(&path).map_err(|e| AssembleError::Io {
            path: path.clone(),
            source: e.error,
        })?;

        report.size = u64::from(root_size) + 8;
        info!(
            output = %path.display(),
            chunks = report.written.len(),
            skipped = report.skipped.len(),
            bytes = report.size,
            "assembled playprint"
        );
        Ok(report)
    }

    /// Read and transform one entry's source.
    fn prepare(&self, entry: &ChunkEntry) -> Result<Prepared, AssembleError> {
        let order = self.config.byte_order;
        let bytes = std::fs::read(&entry.source).map_err(|source| AssembleError::Io {
            path: entry.source.clone(),
            source,
        })?;

        match entry.kind {
            ChunkKind::Media => {
                MediaList::from_bytes(&bytes, order).map_err(|source| {
                    AssembleError::InvalidMedia {
                        name: entry.name.clone(),
                        path: entry.source.clone(),
                        source,
                    }
                })?;
                Ok(Prepared::Verbatim(bytes))
            }
            ChunkKind::Group | ChunkKind::Scene => {
                let body = relink_entity(&bytes, order, &self.assets).map_err(|source| {
                    AssembleError::Relink {
                        kind: entry.kind,
                        name: entry.name.clone(),
                        source,
                    }
                })?;
                Ok(Prepared::Tagged(entry.kind.tag(), body))
            }
            ChunkKind::Set => {
                let set_error = |source: StreamError| AssembleError::Set {
                    name: entry.name.clone(),
                    source,
                };
                let body = strip_set_prefix(&bytes, order).map_err(set_error)?;
                parse_set_payload(body, order)
                    .and_then(|set| set.instructions(order))
                    .map_err(set_error)?;
                Ok(Prepared::Tagged(Tag::SET, body.to_vec()))
            }
        }
    }
}
