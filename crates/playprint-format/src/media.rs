//! Media reference lists (`LIST`/`MRFL` sub-containers).
//!
//! A media entry is a self-contained list form:
//!
//! ```text
//! LIST size MRFL
//!   info { flags:u32, media_type:u32, count:u32 }
//!   mref { flags:u32, kind:tag, size:u32, data:size bytes }   × count
//! ```
//!
//! The assembler copies these forms verbatim; the position of a media entry
//! among the container's chunks is its global asset index.

use std::io::{Cursor, Read, Seek, Write};

use playprint_core::ByteOrder;

use crate::container::{ChunkInfo, ChunkReader, ChunkWriter, ContainerError};
use crate::tag::Tag;

/// Byte length of the `info` body.
const INFO_LEN: u64 = 12;

/// Fixed fields preceding `mref` data.
const MREF_FIXED_LEN: u64 = 12;

/// One referenced media file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MediaReference {
    pub flags: u32,
    /// Media kind, e.g. `TEXR` or `SND `.
    pub kind: Tag,
    /// NUL-terminated path, or the embedded file bytes.
    pub data: Vec<u8>,
}

impl MediaReference {
    /// Reference a file by path; the path is stored NUL-terminated.
    pub fn path(flags: u32, kind: Tag, path: &str) -> Self {
        let mut data = Vec::with_capacity(path.len() + 1);
        data.extend_from_slice(path.as_bytes());
        data.push(0);
        Self { flags, kind, data }
    }

    pub fn embedded(flags: u32, kind: Tag, bytes: Vec<u8>) -> Self {
        Self {
            flags,
            kind,
            data: bytes,
        }
    }

    /// The data as a path, if it is NUL-terminated UTF-8 without interior NULs.
    pub fn as_path(&self) -> Option<&str> {
        let (last, body) = self.data.split_last()?;
        if *last != 0 || body.contains(&0) {
            return None;
        }
        std::str::from_utf8(body).ok()
    }
}

/// Contents of one `MRFL` list.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MediaList {
    pub flags: u32,
    /// Media class index from the symbol table.
    pub media_type: u32,
    pub references: Vec<MediaReference>,
}

impl MediaList {
    pub fn new(media_type: u32) -> Self {
        Self {
            media_type,
            ..Self::default()
        }
    }

    /// Write the list form at the writer's position.
    pub fn write<W: Write + Seek>(&self, w: &mut ChunkWriter<W>) -> Result<(), ContainerError> {
        let count = u32::try_from(self.references.len())
            .map_err(|_| ContainerError::SizeOverflow(self.references.len() as u64))?;

        let list = w.begin_form(Tag::LIST, Tag::MRFL)?;

        let info = w.begin_chunk(Tag::INFO)?;
        w.write_u32(self.flags)?;
        w.write_u32(self.media_type)?;
        w.write_u32(count)?;
        w.end_chunk(info)?;

        for reference in &self.references {
            let len = reference.data.len() as u64;
            let size = u32::try_from(len).map_err(|_| ContainerError::SizeOverflow(len))?;
            let mref = w.begin_chunk(Tag::MREF)?;
            w.write_u32(reference.flags)?;
            w.write_tag(reference.kind)?;
            w.write_u32(size)?;
            w.write_bytes(&reference.data)?;
            w.end_chunk(mref)?;
        }

        w.end_form(list)?;
        Ok(())
    }

    /// Encode as a standalone sub-container file.
    pub fn to_bytes(&self, order: ByteOrder) -> Result<Vec<u8>, ContainerError> {
        let mut w = ChunkWriter::new(Cursor::new(Vec::new()), order);
        self.write(&mut w)?;
        Ok(w.finish()?.into_inner())
    }

    /// Read the children of an already entered `LIST`/`MRFL` form.
    pub fn read<R: Read + Seek>(
        r: &mut ChunkReader<R>,
        list: &ChunkInfo,
    ) -> Result<Self, ContainerError> {
        r.seek(list.content_offset())?;

        let info = expect_child(r, list, Tag::INFO)?;
        if info.content_len() < INFO_LEN {
            return Err(ContainerError::Malformed {
                tag: Tag::INFO,
                reason: "info body shorter than 12 bytes",
            });
        }
        let flags = r.read_u32()?;
        let media_type = r.read_u32()?;
        let count = r.read_u32()?;
        r.ascend(&info)?;

        let mut references = Vec::with_capacity(count.min(1024) as usize);
        for _ in 0..count {
            let mref = expect_child(r, list, Tag::MREF)?;
            if mref.content_len() < MREF_FIXED_LEN {
                return Err(ContainerError::Malformed {
                    tag: Tag::MREF,
                    reason: "mref body shorter than its fixed fields",
                });
            }
            let flags = r.read_u32()?;
            let kind = r.read_tag()?;
            let size = u64::from(r.read_u32()?);
            let available = mref.content_len() - MREF_FIXED_LEN;
            if size > available {
                return Err(ContainerError::LengthMismatch {
                    declared: size,
                    actual: available,
                });
            }
            let data = r.read_bytes(size)?;
            r.ascend(&mref)?;
            references.push(MediaReference { flags, kind, data });
        }

        Ok(Self {
            flags,
            media_type,
            references,
        })
    }

    /// Decode a standalone sub-container file.
    ///
    /// The list form must span the whole input.
    pub fn from_bytes(bytes: &[u8], order: ByteOrder) -> Result<Self, ContainerError> {
        let mut r = ChunkReader::new(Cursor::new(bytes), order);
        let list = r.descend_form(Tag::LIST, Tag::MRFL)?;
        if list.end() != bytes.len() as u64 {
            return Err(ContainerError::LengthMismatch {
                declared: list.end(),
                actual: bytes.len() as u64,
            });
        }
        Self::read(&mut r, &list)
    }
}

fn expect_child<R: Read + Seek>(
    r: &mut ChunkReader<R>,
    parent: &ChunkInfo,
    tag: Tag,
) -> Result<ChunkInfo, ContainerError> {
    let offset = r.position()?;
    let Some(info) = r.next_chunk(parent)? else {
        return Err(ContainerError::Malformed {
            tag: parent.subtype.unwrap_or(parent.tag),
            reason: "fewer chunks than declared",
        });
    };
    if info.tag != tag {
        return Err(ContainerError::UnexpectedTag {
            expected: tag,
            found: info.tag,
            offset,
        });
    }
    Ok(info)
}
