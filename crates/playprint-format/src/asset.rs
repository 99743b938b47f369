//! Asset references and the global asset index.
//!
//! An entity stream is emitted before the set of assets in the final
//! container is known, so its asset operands start out as names
//! ([`AssetRef::Pending`]) and become global indices ([`AssetRef::Resolved`])
//! when the relinker consults an [`AssetIndex`].

use indexmap::IndexSet;

/// Reference from a property value to a media asset.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum AssetRef {
    /// Not yet resolved: the asset's logical name.
    Pending(String),
    /// Global index into the container's media entries.
    Resolved(u32),
}

impl AssetRef {
    pub fn pending(name: impl Into<String>) -> Self {
        Self::Pending(name.into())
    }

    /// Global index of this reference against `index`. Already resolved
    /// references pass through.
    pub fn resolve(&self, index: &AssetIndex) -> Option<u32> {
        match self {
            Self::Pending(name) => index.get(name),
            Self::Resolved(i) => Some(*i),
        }
    }
}

impl std::fmt::Display for AssetRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending(name) => write!(f, "{name:?}"),
            Self::Resolved(i) => write!(f, "#{i}"),
        }
    }
}

/// Name → global index map for every media entry of a container.
///
/// A name's index is its insertion position, which matches its position in
/// the container's chunk table because media entries precede all content.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AssetIndex {
    names: IndexSet<String>,
}

impl AssetIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a name. Returns its index and whether it was newly inserted.
    pub fn insert(&mut self, name: impl Into<String>) -> (u32, bool) {
        let (index, inserted) = self.names.insert_full(name.into());
        (index as u32, inserted)
    }

    pub fn get(&self, name: &str) -> Option<u32> {
        self.names.get_index_of(name).map(|i| i as u32)
    }

    pub fn name(&self, index: u32) -> Option<&str> {
        self.names.get_index(index as usize).map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Iterate `(index, name)` in index order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &str)> {
        self.names
            .iter()
            .enumerate()
            .map(|(i, s)| (i as u32, s.as_str()))
    }
}

impl<S: Into<String>> FromIterator<S> for AssetIndex {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut index = Self::new();
        for name in iter {
            index.insert(name);
        }
        index
    }
}
