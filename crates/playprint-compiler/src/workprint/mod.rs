//! Authoring-tree collaborator interfaces.
//!
//! The compiler never owns the authoring tool's data model. It reads the
//! tree through [`AuthoringTree`] and learns each node's declared class
//! through a [`ClassResolver`]. [`Workprint`] is the bundled JSON-backed
//! implementation used by the CLI and the tests.

mod error;
mod tree;
mod value;


pub use error::WorkprintError;
pub use tree::{NodeSpec, Workprint};
pub use value::{MediaSource, Property, Value};

use std::collections::HashSet;
use std::path::{Component, Path};

use playprint_core::ClassInfo;
use serde::{Deserialize, Serialize};

/// Handle to a node of an [`AuthoringTree`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Root,
    Scene,
    Group,
    Actor,
    Role,
    Set,
    Media,
}

impl NodeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Root => "root",
            Self::Scene => "scene",
            Self::Group => "group",
            Self::Actor => "actor",
            Self::Role => "role",
            Self::Set => "set",
            Self::Media => "media",
        }
    }

    /// Kinds a node of this kind may contain.
    pub fn allowed_children(self) -> &'static [NodeKind] {
        match self {
            Self::Root => &[Self::Scene, Self::Group, Self::Set, Self::Media],
            Self::Scene => &[Self::Group],
            Self::Group => &[Self::Actor],
            Self::Actor => &[Self::Role],
            Self::Role | Self::Set | Self::Media => &[],
        }
    }

    /// Whether nodes of this kind are emitted as their own source file.
    pub fn is_entity(self) -> bool {
        matches!(self, Self::Scene | Self::Group | Self::Set | Self::Media)
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Read access to an authoring tree.
pub trait AuthoringTree {
    fn root(&self) -> NodeId;

    fn kind(&self, node: NodeId) -> NodeKind;

    fn name(&self, node: NodeId) -> &str;

    fn children(&self, node: NodeId) -> &[NodeId];

    /// String metadata such as `class`, `header`, `package` or `set`.
    fn attribute(&self, node: NodeId, key: &str) -> Option<&str>;

    fn flags(&self, node: NodeId) -> u32;

    fn properties(&self, node: NodeId) -> &[Property];

    fn media_references(&self, node: NodeId) -> &[MediaSource];

    /// Every node of `kind` strictly below `under`, pre-order depth-first.
    fn nodes_of_kind(&self, under: NodeId, kind: NodeKind) -> Vec<NodeId> {
        let mut found = Vec::new();
        let mut stack: Vec<NodeId> = self.children(under).iter().rev().copied().collect();
        while let Some(node) = stack.pop() {
            if self.kind(node) == kind {
                found.push(node);
            }
            stack.extend(self.children(node).iter().rev().copied());
        }
        found
    }

    /// Direct children of `node` that have `kind`, in authoring order.
    fn children_of_kind(&self, node: NodeId, kind: NodeKind) -> Vec<NodeId> {
        self.children(node)
            .iter()
            .copied()
            .filter(|&child| self.kind(child) == kind)
            .collect()
    }
}

/// Classifies authoring-tree nodes.
pub trait ClassResolver {
    /// Declared class of `node`, or `None` when it has none.
    fn resolve(&self, tree: &dyn AuthoringTree, node: NodeId) -> Option<ClassInfo>;
}

/// Reads the `class`, `header` and `package` attributes verbatim.
#[derive(Clone, Copy, Debug, Default)]
pub struct AttributeClassResolver;

impl ClassResolver for AttributeClassResolver {
    fn resolve(&self, tree: &dyn AuthoringTree, node: NodeId) -> Option<ClassInfo> {
        let name = tree.attribute(node, "class")?;
        Some(ClassInfo {
            name: name.to_string(),
            header: tree.attribute(node, "header").map(str::to_string),
            package: tree.attribute(node, "package").map(str::to_string),
        })
    }
}

/// Check that every entity name of `tree` can be used as a file stem.
///
/// Entity names become `<name>.<ext>` under the output directory, so each
/// must be a single normal path component and unique within its kind.
pub fn check_entity_names(tree: &dyn AuthoringTree) -> Result<(), WorkprintError> {
    let mut seen = HashSet::new();
    let mut stack = vec![tree.root()];
    while let Some(node) = stack.pop() {
        stack.extend(tree.children(node).iter().rev().copied());
        let kind = tree.kind(node);
        if !kind.is_entity() {
            continue;
        }
        let name = tree.name(node);
        if !is_file_stem(name) {
            return Err(WorkprintError::UnsafeName {
                kind,
                name: name.to_string(),
            });
        }
        if !seen.insert((kind, name)) {
            return Err(WorkprintError::DuplicateName {
                kind,
                name: name.to_string(),
            });
        }
    }
    Ok(())
}

fn is_file_stem(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(c)), None) if c == name
    )
}
