//! Chunk container writer with retroactive size patching.

use std::io::{Seek, SeekFrom, Write};

use playprint_core::ByteOrder;

use super::{ContainerError, SIZE_FIELD_LEN, TocEntry, toc_body_len};
use crate::tag::Tag;

/// An open chunk whose size field is still a placeholder.
///
/// Returned by `begin_chunk`/`begin_form` and consumed by the matching
/// `end_chunk`/`end_form`.
#[derive(Debug)]
#[must_use = "an open chunk must be closed to patch its size"]
pub struct ChunkMark {
    tag: Tag,
    size_offset: u64,
}

impl ChunkMark {
    pub fn tag(&self) -> Tag {
        self.tag
    }

    /// File offset of the chunk's tag.
    pub fn offset(&self) -> u64 {
        self.size_offset - 4
    }
}

struct TocState {
    body_offset: u64,
    reserved: u32,
    entries: Vec<TocEntry>,
}

/// Writes nested chunks to a seekable sink.
pub struct ChunkWriter<W: Write + Seek> {
    inner: W,
    order: ByteOrder,
    toc: Option<TocState>,
}

impl<W: Write + Seek> ChunkWriter<W> {
    /// Create a writer. `order` applies until a root form declares another.
    pub fn new(inner: W, order: ByteOrder) -> Self {
        Self {
            inner,
            order,
            toc: None,
        }
    }

    pub fn order(&self) -> ByteOrder {
        self.order
    }

    /// Current stream position.
    pub fn position(&mut self) -> Result<u64, ContainerError> {
        Ok(self.inner.stream_position()?)
    }

    /// Current stream position as a 32-bit file offset.
    pub fn offset(&mut self) -> Result<u32, ContainerError> {
        let pos = self.position()?;
        u32::try_from(pos).map_err(|_| ContainerError::OffsetOverflow(pos))
    }

    pub fn write_tag(&mut self, tag: Tag) -> Result<(), ContainerError> {
        self.inner.write_all(tag.as_bytes())?;
        Ok(())
    }

    pub fn write_u32(&mut self, value: u32) -> Result<(), ContainerError> {
        self.inner.write_all(&self.order.u32_to_bytes(value))?;
        Ok(())
    }

    pub fn write_i32(&mut self, value: i32) -> Result<(), ContainerError> {
        self.inner.write_all(&self.order.i32_to_bytes(value))?;
        Ok(())
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), ContainerError> {
        self.inner.write_all(bytes)?;
        Ok(())
    }

    /// Open a chunk: write its tag and a zero size placeholder.
    pub fn begin_chunk(&mut self, tag: Tag) -> Result<ChunkMark, ContainerError> {
        self.write_tag(tag)?;
        let size_offset = self.position()?;
        self.inner.write_all(&[0; 4])?;
        Ok(ChunkMark { tag, size_offset })
    }

    /// Close a chunk: pad an odd body, then patch the size field.
    ///
    /// Returns the patched size.
    pub fn end_chunk(&mut self, mark: ChunkMark) -> Result<u32, ContainerError> {
        let mut end = self.position()?;
        let mut body_len = end - mark.size_offset - SIZE_FIELD_LEN;
        if body_len % 2 == 1 {
            self.inner.write_all(&[0])?;
            end += 1;
            body_len += 1;
        }
        let size = u32::try_from(body_len).map_err(|_| ContainerError::SizeOverflow(body_len))?;

        self.inner.seek(SeekFrom::Start(mark.size_offset))?;
        self.write_u32(size)?;
        self.inner.seek(SeekFrom::Start(end))?;
        Ok(size)
    }

    /// Open a form with the given sub-type.
    ///
    /// A root sub-type switches the writer to the byte order it declares.
    pub fn begin_form(&mut self, tag: Tag, subtype: Tag) -> Result<ChunkMark, ContainerError> {
        if let Some(order) = subtype.root_order() {
            self.order = order;
        }
        let mark = self.begin_chunk(tag)?;
        self.write_tag(subtype)?;
        Ok(mark)
    }

    pub fn end_form(&mut self, mark: ChunkMark) -> Result<u32, ContainerError> {
        self.end_chunk(mark)
    }

    /// Write a complete chunk whose body is already in memory.
    pub fn write_tagged(&mut self, tag: Tag, body: &[u8]) -> Result<u32, ContainerError> {
        let mark = self.begin_chunk(tag)?;
        self.write_bytes(body)?;
        self.end_chunk(mark)
    }

    /// Reserve a `toc ` chunk with `count` zeroed slots.
    ///
    /// The slots are filled by [`end_toc`](Self::end_toc) once every
    /// chunk offset is known.
    pub fn begin_toc(&mut self, count: u32) -> Result<(), ContainerError> {
        if self.toc.is_some() {
            return Err(ContainerError::TocAlreadyReserved);
        }
        let mark = self.begin_chunk(Tag::TOC)?;
        let body_offset = self.position()?;
        let len = toc_body_len(count);
        let zeros = usize::try_from(len).map_err(|_| ContainerError::SizeOverflow(len))?;
        self.inner.write_all(&vec![0; zeros])?;
        self.end_chunk(mark)?;
        self.toc = Some(TocState {
            body_offset,
            reserved: count,
            entries: Vec::with_capacity(count as usize),
        });
        Ok(())
    }

    /// Record the next slot. Nothing is written until `end_toc`.
    pub fn add_toc_entry(&mut self, label: i32, offset: u32) -> Result<(), ContainerError> {
        let toc = self.toc.as_mut().ok_or(ContainerError::TocNotReserved)?;
        if toc.entries.len() == toc.reserved as usize {
            return Err(ContainerError::TocFull(toc.reserved));
        }
        toc.entries.push(TocEntry::new(label, offset));
        Ok(())
    }

    /// Write the recorded entries into the reserved region.
    pub fn end_toc(&mut self) -> Result<(), ContainerError> {
        let toc = self.toc.take().ok_or(ContainerError::TocNotReserved)?;
        if toc.entries.len() != toc.reserved as usize {
            return Err(ContainerError::TocCountMismatch {
                reserved: toc.reserved,
                written: toc.entries.len(),
            });
        }

        let resume = self.position()?;
        self.inner.seek(SeekFrom::Start(toc.body_offset))?;
        self.write_u32(toc.reserved)?;
        for entry in &toc.entries {
            self.write_i32(entry.label)?;
            self.write_u32(entry.offset)?;
        }
        self.inner.seek(SeekFrom::Start(resume))?;
        Ok(())
    }

    /// Flush and return the sink.
    pub fn finish(mut self) -> Result<W, ContainerError> {
        if let Some(toc) = &self.toc {
            return Err(ContainerError::TocCountMismatch {
                reserved: toc.reserved,
                written: toc.entries.len(),
            });
        }
        self.inner.flush()?;
        Ok(self.inner)
    }
}
