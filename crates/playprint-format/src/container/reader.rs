//! Chunk container reader.

use std::io::{Read, Seek, SeekFrom};

use playprint_core::ByteOrder;

use super::{CHUNK_HEADER_LEN, ContainerError, TocEntry};
use crate::tag::Tag;

/// Location and shape of one chunk.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChunkInfo {
    pub tag: Tag,
    /// Sub-type of a form, `None` for leaf chunks.
    pub subtype: Option<Tag>,
    /// File offset of the tag field.
    pub offset: u64,
    /// Value of the size field (body bytes including pad).
    pub size: u32,
}

impl ChunkInfo {
    /// Offset of the first byte after the size field.
    pub fn body_offset(&self) -> u64 {
        self.offset + CHUNK_HEADER_LEN
    }

    /// Offset of the first nested chunk (forms) or payload byte (leaves).
    pub fn content_offset(&self) -> u64 {
        self.body_offset() + if self.subtype.is_some() { 4 } else { 0 }
    }

    /// Offset one past the chunk's last byte.
    pub fn end(&self) -> u64 {
        self.body_offset() + u64::from(self.size)
    }

    /// Payload length: body minus the sub-type of a form.
    pub fn content_len(&self) -> u64 {
        self.end() - self.content_offset()
    }
}

/// Reads nested chunks from a seekable source.
pub struct ChunkReader<R: Read + Seek> {
    inner: R,
    order: ByteOrder,
}

impl<R: Read + Seek> ChunkReader<R> {
    /// Create a reader. `order` applies until a root form declares another.
    pub fn new(inner: R, order: ByteOrder) -> Self {
        Self { inner, order }
    }

    pub fn order(&self) -> ByteOrder {
        self.order
    }

    pub fn position(&mut self) -> Result<u64, ContainerError> {
        Ok(self.inner.stream_position()?)
    }

    pub fn seek(&mut self, offset: u64) -> Result<(), ContainerError> {
        self.inner.seek(SeekFrom::Start(offset))?;
        Ok(())
    }

    pub fn read_tag(&mut self) -> Result<Tag, ContainerError> {
        let mut bytes = [0; 4];
        self.inner.read_exact(&mut bytes)?;
        Ok(Tag(bytes))
    }

    pub fn read_u32(&mut self) -> Result<u32, ContainerError> {
        let mut bytes = [0; 4];
        self.inner.read_exact(&mut bytes)?;
        Ok(self.order.u32_from_bytes(bytes))
    }

    pub fn read_i32(&mut self) -> Result<i32, ContainerError> {
        Ok(self.read_u32()? as i32)
    }

    pub fn read_bytes(&mut self, len: u64) -> Result<Vec<u8>, ContainerError> {
        let len = usize::try_from(len).map_err(|_| ContainerError::SizeOverflow(len))?;
        let mut bytes = vec![0; len];
        self.inner.read_exact(&mut bytes)?;
        Ok(bytes)
    }

    /// Read the chunk header at the current position, whatever its tag.
    pub fn read_header(&mut self) -> Result<ChunkInfo, ContainerError> {
        let offset = self.position()?;
        let tag = self.read_tag()?;
        let size = self.read_u32()?;
        let subtype = if tag.is_form() {
            Some(self.read_tag()?)
        } else {
            None
        };
        Ok(ChunkInfo {
            tag,
            subtype,
            offset,
            size,
        })
    }

    /// Enter the chunk at the current position, which must carry `tag`.
    ///
    /// Leaves the reader at the chunk's content.
    pub fn descend(&mut self, tag: Tag) -> Result<ChunkInfo, ContainerError> {
        let info = self.read_header()?;
        if info.tag != tag {
            return Err(ContainerError::UnexpectedTag {
                expected: tag,
                found: info.tag,
                offset: info.offset,
            });
        }
        Ok(info)
    }

    /// Enter a form with a specific sub-type.
    pub fn descend_form(&mut self, tag: Tag, subtype: Tag) -> Result<ChunkInfo, ContainerError> {
        let info = self.descend(tag)?;
        let found = info.subtype.unwrap_or(Tag([0; 4]));
        if found != subtype {
            return Err(ContainerError::UnexpectedSubtype {
                expected: subtype,
                found,
                offset: info.offset + CHUNK_HEADER_LEN,
            });
        }
        Ok(info)
    }

    /// Enter the root form and adopt the byte order its sub-type declares.
    ///
    /// The size field is re-read after the order is known.
    pub fn open_root(&mut self) -> Result<ChunkInfo, ContainerError> {
        let start = self.position()?;
        let mut info = self.descend(Tag::FORM)?;
        let subtype = info.subtype.unwrap_or(Tag([0; 4]));
        let order = subtype
            .root_order()
            .ok_or(ContainerError::UnknownRootSubtype(subtype))?;
        self.order = order;
        self.seek(start + 4)?;
        info.size = self.read_u32()?;
        self.seek(info.content_offset())?;
        Ok(info)
    }

    /// Enter the next child of `parent`, or `None` at the parent's end.
    pub fn next_chunk(&mut self, parent: &ChunkInfo) -> Result<Option<ChunkInfo>, ContainerError> {
        let pos = self.position()?;
        if pos + CHUNK_HEADER_LEN > parent.end() {
            return Ok(None);
        }
        let info = self.read_header()?;
        if info.end() > parent.end() {
            return Err(ContainerError::Overrun {
                tag: info.tag,
                offset: info.offset,
                end: info.end(),
                limit: parent.end(),
            });
        }
        Ok(Some(info))
    }

    /// Scan the children of `parent` for the first chunk tagged `tag`.
    pub fn find(&mut self, parent: &ChunkInfo, tag: Tag) -> Result<Option<ChunkInfo>, ContainerError> {
        self.seek(parent.content_offset())?;
        while let Some(info) = self.next_chunk(parent)? {
            if info.tag == tag {
                return Ok(Some(info));
            }
            self.ascend(&info)?;
        }
        Ok(None)
    }

    /// Leave a chunk: move to the first byte after it.
    pub fn ascend(&mut self, info: &ChunkInfo) -> Result<(), ContainerError> {
        self.seek(info.end())
    }

    /// Read a leaf chunk's whole body, pad byte included.
    pub fn read_body(&mut self, info: &ChunkInfo) -> Result<Vec<u8>, ContainerError> {
        self.seek(info.content_offset())?;
        self.read_bytes(info.content_len())
    }

    /// Read the entries of a `toc ` chunk.
    pub fn read_toc(&mut self, info: &ChunkInfo) -> Result<Vec<TocEntry>, ContainerError> {
        self.seek(info.content_offset())?;
        let count = self.read_u32()?;
        if super::toc_body_len(count) > info.content_len() {
            return Err(ContainerError::Malformed {
                tag: Tag::TOC,
                reason: "entry count exceeds chunk size",
            });
        }
        (0..count)
            .map(|_| {
                let label = self.read_i32()?;
                let offset = self.read_u32()?;
                Ok(TocEntry::new(label, offset))
            })
            .collect()
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}
