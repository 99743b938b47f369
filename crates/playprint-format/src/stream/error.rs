/// Errors raised while decoding an entity stream or payload.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StreamError {
    #[error("unknown opcode 0x{byte:02x} at offset {offset}")]
    UnknownOpcode { byte: u8, offset: usize },

    #[error("expected an opcode at offset {offset}, found index byte 0x{byte:02x}")]
    ExpectedOpcode { byte: u8, offset: usize },

    #[error("index at offset {offset} does not fit in 32 bits")]
    IndexOverflow { offset: usize },

    #[error("{opcode} at offset {offset} is truncated")]
    Truncated { opcode: &'static str, offset: usize },

    #[error("Copy at offset {offset} has no preceding SetLength")]
    MissingLength { offset: usize },

    #[error("stream ends without End")]
    MissingTerminator,

    #[error("asset reference at offset {offset} in a set stream")]
    AssetInSet { offset: usize },

    #[error("asset name at offset {offset} is not NUL-terminated")]
    UnterminatedName { offset: usize },

    #[error("asset name at offset {offset} is not valid UTF-8")]
    InvalidName { offset: usize },

    #[error("payload of {len} bytes is shorter than its header")]
    PayloadTooShort { len: usize },

    #[error("name table offset {offset} lies outside the {len}-byte payload")]
    BadNameTableOffset { offset: u32, len: usize },

    #[error("{count} unexpected bytes after End at offset {offset}")]
    TrailingBytes { offset: usize, count: usize },

    #[error("set size prefix declares {declared} bytes but {actual} follow")]
    BadSetPrefix { declared: u32, actual: usize },
}
