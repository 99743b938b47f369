//! Arena-backed authoring tree loaded from JSON.

use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::{
    AuthoringTree, MediaSource, NodeId, NodeKind, Property, WorkprintError, check_entity_names,
};

/// Serialized form of one node and its subtree.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NodeSpec {
    pub kind: NodeKind,
    pub name: String,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub attributes: IndexMap<String, String>,
    #[serde(default)]
    pub flags: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<Property>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub media: Vec<MediaSource>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeSpec>,
}

#[derive(Clone, Debug)]
struct Node {
    kind: NodeKind,
    name: String,
    attributes: IndexMap<String, String>,
    flags: u32,
    properties: Vec<Property>,
    media: Vec<MediaSource>,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
}

/// A validated authoring tree. Node 0 is the root.
#[derive(Clone, Debug)]
pub struct Workprint {
    nodes: Vec<Node>,
}

impl Workprint {
    pub fn load(path: &Path) -> Result<Self, WorkprintError> {
        let json = std::fs::read_to_string(path).map_err(|source| WorkprintError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    pub fn from_json(json: &str) -> Result<Self, WorkprintError> {
        let spec: NodeSpec = serde_json::from_str(json)?;
        Self::from_spec(spec)
    }

    /// Flatten `spec` into an arena, checking kinds and names.
    pub fn from_spec(spec: NodeSpec) -> Result<Self, WorkprintError> {
        if spec.kind != NodeKind::Root {
            return Err(WorkprintError::RootKind(spec.kind));
        }
        let mut tree = Self { nodes: Vec::new() };
        tree.push(spec, None)?;
        check_entity_names(&tree)?;
        Ok(tree)
    }

    fn push(&mut self, spec: NodeSpec, parent: Option<NodeId>) -> Result<NodeId, WorkprintError> {
        if spec.name.is_empty() {
            return Err(WorkprintError::EmptyName(spec.kind));
        }
        for child in &spec.children {
            if !spec.kind.allowed_children().contains(&child.kind) {
                return Err(WorkprintError::UnexpectedChild {
                    parent: spec.name.clone(),
                    parent_kind: spec.kind,
                    child: child.name.clone(),
                    child_kind: child.kind,
                });
            }
        }

        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node {
            kind: spec.kind,
            name: spec.name,
            attributes: spec.attributes,
            flags: spec.flags,
            properties: spec.properties,
            media: spec.media,
            children: Vec::with_capacity(spec.children.len()),
            parent,
        });

        for child in spec.children {
            let child_id = self.push(child, Some(id))?;
            self.nodes[id.index()].children.push(child_id);
        }
        Ok(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.index()].parent
    }

    /// First node of `kind` named `name`, in pre-order.
    pub fn find(&self, kind: NodeKind, name: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .position(|n| n.kind == kind && n.name == name)
            .map(|i| NodeId(i as u32))
    }
}

impl AuthoringTree for Workprint {
    fn root(&self) -> NodeId {
        NodeId(0)
    }

    fn kind(&self, node: NodeId) -> NodeKind {
        self.nodes[node.index()].kind
    }

    fn name(&self, node: NodeId) -> &str {
        &self.nodes[node.index()].name
    }

    fn children(&self, node: NodeId) -> &[NodeId] {
        &self.nodes[node.index()].children
    }

    fn attribute(&self, node: NodeId, key: &str) -> Option<&str> {
        self.nodes[node.index()]
            .attributes
            .get(key)
            .map(String::as_str)
    }

    fn flags(&self, node: NodeId) -> u32 {
        self.nodes[node.index()].flags
    }

    fn properties(&self, node: NodeId) -> &[Property] {
        &self.nodes[node.index()].properties
    }

    fn media_references(&self, node: NodeId) -> &[MediaSource] {
        &self.nodes[node.index()].media
    }
}
