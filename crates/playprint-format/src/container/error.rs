use crate::tag::Tag;

/// Errors raised while reading or writing a chunk container.
#[derive(Debug, thiserror::Error)]
pub enum ContainerError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("expected chunk '{expected}' at offset {offset}, found '{found}'")]
    UnexpectedTag {
        expected: Tag,
        found: Tag,
        offset: u64,
    },

    #[error("expected sub-type '{expected}' at offset {offset}, found '{found}'")]
    UnexpectedSubtype {
        expected: Tag,
        found: Tag,
        offset: u64,
    },

    #[error("unknown root sub-type '{0}'")]
    UnknownRootSubtype(Tag),

    #[error("chunk '{tag}' at offset {offset} ends at {end}, past its parent's end {limit}")]
    Overrun {
        tag: Tag,
        offset: u64,
        end: u64,
        limit: u64,
    },

    #[error("chunk declares {declared} bytes but {actual} are available")]
    LengthMismatch { declared: u64, actual: u64 },

    #[error("chunk body of {0} bytes does not fit a 32-bit size field")]
    SizeOverflow(u64),

    #[error("file offset {0} does not fit in 32 bits")]
    OffsetOverflow(u64),

    #[error("malformed '{tag}' chunk: {reason}")]
    Malformed { tag: Tag, reason: &'static str },

    #[error("table of contents already reserved")]
    TocAlreadyReserved,

    #[error("table of contents not reserved")]
    TocNotReserved,

    #[error("table of contents is full ({0} entries)")]
    TocFull(u32),

    #[error("table of contents reserves {reserved} entries but {written} were added")]
    TocCountMismatch { reserved: u32, written: usize },
}
