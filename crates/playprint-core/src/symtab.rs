//! Symbol table: deterministic integer indices for names.
//!
//! Names are collected unsorted while the authoring tree is scanned. When the
//! table is finished, each namespace is sorted lexicographically and adjacent
//! duplicates collapse; the position of a name in its namespace is the index
//! written into compiled streams. The table is read-only afterwards.
//!
//! Namespaces never share index space: `Actor` index 3 and `Property` index 3
//! are unrelated.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Independent index spaces of a symbol table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Namespace {
    ActorClass,
    RoleClass,
    GroupClass,
    SceneClass,
    SetClass,
    MediaClass,
    /// `"<class>_<property>"` qualified property names.
    Property,
    /// Names of actor, role, group and set instances.
    Instance,
}

impl Namespace {
    pub const ALL: [Namespace; 8] = [
        Self::ActorClass,
        Self::RoleClass,
        Self::GroupClass,
        Self::SceneClass,
        Self::SetClass,
        Self::MediaClass,
        Self::Property,
        Self::Instance,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::ActorClass => "actor_class",
            Self::RoleClass => "role_class",
            Self::GroupClass => "group_class",
            Self::SceneClass => "scene_class",
            Self::SetClass => "set_class",
            Self::MediaClass => "media_class",
            Self::Property => "property",
            Self::Instance => "instance",
        }
    }

    #[inline]
    fn slot(self) -> usize {
        self as usize
    }
}

/// Declared class of an authoring-tree node.
///
/// `header` and `package` are opaque strings carried through for binding
/// generation; nothing here interprets them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassInfo {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package: Option<String>,
}

impl ClassInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            header: None,
            package: None,
        }
    }
}

/// Build the qualified name of a property declared by `class`.
pub fn qualified_property(class: &str, property: &str) -> String {
    format!("{class}_{property}")
}

/// Collects names before the table is frozen.
#[derive(Debug, Clone, Default)]
pub struct SymbolTableBuilder {
    observed: [Vec<String>; 8],
    classes: BTreeMap<(Namespace, String), ClassInfo>,
}

impl SymbolTableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a name. Its index is only known once the table is finished.
    pub fn intern(&mut self, namespace: Namespace, name: impl Into<String>) {
        self.observed[namespace.slot()].push(name.into());
    }

    /// Record a class name together with its declaration metadata.
    ///
    /// The first declaration seen for a class wins.
    pub fn intern_class(&mut self, namespace: Namespace, info: ClassInfo) {
        self.intern(namespace, info.name.clone());
        self.classes
            .entry((namespace, info.name.clone()))
            .or_insert(info);
    }

    /// Sort and deduplicate every namespace, freezing indices.
    pub fn finish(self) -> SymbolTable {
        let mut namespaces = BTreeMap::new();
        for (ns, mut names) in Namespace::ALL.into_iter().zip(self.observed) {
            names.sort_unstable();
            names.dedup();
            namespaces.insert(ns, names);
        }
        let mut classes: BTreeMap<Namespace, Vec<ClassInfo>> = BTreeMap::new();
        for ((ns, _), info) in self.classes {
            classes.entry(ns).or_default().push(info);
        }
        SymbolTable {
            namespaces,
            classes,
        }
    }
}

/// Frozen name tables for one compilation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolTable {
    namespaces: BTreeMap<Namespace, Vec<String>>,
    /// Class metadata per class namespace, sorted by class name.
    #[serde(default)]
    classes: BTreeMap<Namespace, Vec<ClassInfo>>,
}

/// Tables up to this size are searched linearly.
const LINEAR_SEARCH_MAX: usize = 8;

impl SymbolTable {
    pub fn builder() -> SymbolTableBuilder {
        SymbolTableBuilder::new()
    }

    /// Index of `name` in `namespace`, or `None` if it was never interned.
    ///
    /// A miss means the authoring tree references a class, property or
    /// instance that was never declared; callers treat it as fatal for the
    /// entity being compiled.
    pub fn index(&self, namespace: Namespace, name: &str) -> Option<u32> {
        let names = self.names(namespace);
        let pos = if names.len() <= LINEAR_SEARCH_MAX {
            names.iter().position(|n| n == name)
        } else {
            names.binary_search_by(|n| n.as_str().cmp(name)).ok()
        };
        pos.map(|p| p as u32)
    }

    /// Name stored at `index` in `namespace`.
    #[inline]
    pub fn name(&self, namespace: Namespace, index: u32) -> Option<&str> {
        self.names(namespace)
            .get(index as usize)
            .map(|s| s.as_str())
    }

    /// All names of a namespace in index order.
    pub fn names(&self, namespace: Namespace) -> &[String] {
        self.namespaces
            .get(&namespace)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    pub fn len(&self, namespace: Namespace) -> usize {
        self.names(namespace).len()
    }

    pub fn is_empty(&self) -> bool {
        self.namespaces.values().all(|v| v.is_empty())
    }

    /// Declaration metadata recorded for a class.
    pub fn class_info(&self, namespace: Namespace, name: &str) -> Option<&ClassInfo> {
        self.classes
            .get(&namespace)?
            .iter()
            .find(|info| info.name == name)
    }

    /// Iterate `(namespace, index, name)` over every entry.
    pub fn iter(&self) -> impl Iterator<Item = (Namespace, u32, &str)> {
        Namespace::ALL.into_iter().flat_map(move |ns| {
            self.names(ns)
                .iter()
                .enumerate()
                .map(move |(i, s)| (ns, i as u32, s.as_str()))
        })
    }

    /// Serialize for the binding generator.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Load a table written by [`to_json`](Self::to_json).
    ///
    /// Namespaces are re-normalized so hand-edited files still produce
    /// sorted, duplicate-free indices.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut table: Self = serde_json::from_str(json)?;
        for names in table.namespaces.values_mut() {
            names.sort_unstable();
            names.dedup();
        }
        for infos in table.classes.values_mut() {
            infos.sort_by(|a, b| a.name.cmp(&b.name));
            infos.dedup_by(|a, b| a.name == b.name);
        }
        Ok(table)
    }
}
