use playprint_format::StreamError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RelinkError {
    #[error(transparent)]
    Stream(#[from] StreamError),

    #[error("asset reference ${local} is out of range ({count} names)")]
    LocalOutOfRange { local: u32, count: usize },

    #[error("unresolved asset '{name}'")]
    UnresolvedAsset { name: String },
}

impl RelinkError {
    /// Whether the entity can be skipped without failing the container.
    ///
    /// A name with no media entry is a symbol miss. Grammar errors and
    /// out-of-range locals mean the payload itself is corrupt.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::UnresolvedAsset { .. })
    }
}
