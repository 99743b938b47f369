use playprint_core::symtab::qualified_property;
use playprint_core::{ClassInfo, Namespace, SymbolTable};
use playprint_format::{
    AssetRef, EntityHeader, MediaList, MediaReference, Opcode, StreamWriter, Tag,
    build_entity_payload, build_set_file,
};
use tracing::debug;

use super::{EmitError, Encoded, encode_value};
use crate::config::Config;
use crate::symbols::{SymbolError, class_namespace, lookup};
use crate::workprint::{AuthoringTree, ClassResolver, NodeId, NodeKind, Value};

/// Emits entity source files from an authoring tree.
///
/// Holds only shared borrows: the tree, the frozen symbol table and the
/// run configuration. Each call owns the stream it builds.
pub struct EntityEmitter<'a> {
    tree: &'a dyn AuthoringTree,
    resolver: &'a dyn ClassResolver,
    symbols: &'a SymbolTable,
    config: &'a Config,
}

impl<'a> EntityEmitter<'a> {
    pub fn new(
        tree: &'a dyn AuthoringTree,
        resolver: &'a dyn ClassResolver,
        symbols: &'a SymbolTable,
        config: &'a Config,
    ) -> Self {
        Self {
            tree,
            resolver,
            symbols,
            config,
        }
    }

    /// Emit `node` according to its kind.
    pub fn emit(&self, node: NodeId) -> Result<Vec<u8>, EmitError> {
        match self.tree.kind(node) {
            NodeKind::Group => self.emit_group(node),
            NodeKind::Scene => self.emit_scene(node),
            NodeKind::Set => self.emit_set(node),
            NodeKind::Media => self.emit_media(node),
            kind => Err(EmitError::NotAnEntity {
                kind,
                node: self.tree.name(node).to_string(),
            }),
        }
    }

    /// Group payload: one `Actor … EndActor` block per actor child.
    pub fn emit_group(&self, node: NodeId) -> Result<Vec<u8>, EmitError> {
        let (_, class_index) = self.class(node)?;
        let actors = self.tree.children_of_kind(node, NodeKind::Actor);

        let mut w = StreamWriter::new(self.config.byte_order);
        for &actor in &actors {
            self.emit_actor(&mut w, actor)?;
        }
        let stream = w.finish();

        debug!(
            group = self.tree.name(node),
            actors = actors.len(),
            bytes = stream.bytes.len(),
            assets = stream.names.len(),
            "emitted group"
        );
        let header = EntityHeader {
            class_index,
            count: actors.len() as u32,
        };
        Ok(build_entity_payload(
            header,
            &stream.bytes,
            &stream.names,
            self.config.byte_order,
        ))
    }

    /// Scene payload: the scene's own properties, then one
    /// `BeginGroup … EndGroup` reference per group child.
    pub fn emit_scene(&self, node: NodeId) -> Result<Vec<u8>, EmitError> {
        let (class, class_index) = self.class(node)?;
        let groups = self.tree.children_of_kind(node, NodeKind::Group);

        let mut w = StreamWriter::new(self.config.byte_order);
        self.emit_flags(&mut w, node);
        self.emit_properties(&mut w, node, &class.name)?;
        for &group in &groups {
            let (_, group_class) = self.class(group)?;
            w.op_symbol(Opcode::BeginGroup, group_class);
            w.op_symbol(Opcode::Name, self.instance(self.tree.name(group))?);
            w.op(Opcode::EndGroup);
        }
        let stream = w.finish();

        debug!(
            scene = self.tree.name(node),
            groups = groups.len(),
            bytes = stream.bytes.len(),
            "emitted scene"
        );
        let header = EntityHeader {
            class_index,
            count: groups.len() as u32,
        };
        Ok(build_entity_payload(
            header,
            &stream.bytes,
            &stream.names,
            self.config.byte_order,
        ))
    }

    /// Set file: `Name` and properties behind a size prefix.
    pub fn emit_set(&self, node: NodeId) -> Result<Vec<u8>, EmitError> {
        let (class, class_index) = self.class(node)?;
        let name = self.tree.name(node);

        if let Some(property) = self
            .tree
            .properties(node)
            .iter()
            .find(|p| matches!(p.value, Value::MediaRef(_)))
        {
            return Err(EmitError::MediaRefInSet {
                set: name.to_string(),
                property: property.name.clone(),
            });
        }

        let mut w = StreamWriter::new(self.config.byte_order);
        w.op_symbol(Opcode::Name, self.instance(name)?);
        self.emit_flags(&mut w, node);
        self.emit_properties(&mut w, node, &class.name)?;
        let stream = w.finish();

        debug!(set = name, bytes = stream.bytes.len(), "emitted set");
        Ok(build_set_file(
            class_index,
            &stream.bytes,
            self.config.byte_order,
        ))
    }

    /// Media list form. Embedded references carry the file's bytes.
    pub fn emit_media(&self, node: NodeId) -> Result<Vec<u8>, EmitError> {
        let (_, media_type) = self.class(node)?;
        let name = self.tree.name(node);

        let mut list = MediaList::new(media_type);
        list.flags = self.tree.flags(node);
        for source in self.tree.media_references(node) {
            let kind = Tag::from_name(&source.kind)
                .filter(|_| !source.kind.is_empty())
                .ok_or_else(|| EmitError::BadMediaKind {
                    node: name.to_string(),
                    kind: source.kind.clone(),
                })?;

            let reference = if source.embed {
                let path = self.config.resolve_asset(&source.path);
                let bytes = std::fs::read(&path).map_err(|e| EmitError::Io {
                    path: path.clone(),
                    source: e,
                })?;
                MediaReference::embedded(source.flags, kind, bytes)
            } else {
                let path = source
                    .path
                    .to_str()
                    .filter(|p| !p.contains('\0'))
                    .ok_or_else(|| EmitError::BadMediaPath {
                        node: name.to_string(),
                        path: source.path.clone(),
                    })?;
                MediaReference::path(source.flags, kind, path)
            };
            list.references.push(reference);
        }

        debug!(
            media = name,
            references = list.references.len(),
            "emitted media list"
        );
        Ok(list.to_bytes(self.config.byte_order)?)
    }

    fn emit_actor(&self, w: &mut StreamWriter, actor: NodeId) -> Result<(), EmitError> {
        let (class, class_index) = self.class(actor)?;
        w.op_symbol(Opcode::Actor, class_index);
        w.op_symbol(Opcode::Name, self.instance(self.tree.name(actor))?);
        self.emit_flags(w, actor);
        if let Some(set) = self.tree.attribute(actor, "set") {
            w.op_symbol(Opcode::BindSet, self.set_instance(actor, set)?);
        }
        self.emit_properties(w, actor, &class.name)?;

        for role in self.tree.children_of_kind(actor, NodeKind::Role) {
            let (role_class, role_index) = self.class(role)?;
            w.op_symbol(Opcode::Role, role_index);
            w.op_symbol(Opcode::Name, self.instance(self.tree.name(role))?);
            self.emit_flags(w, role);
            self.emit_properties(w, role, &role_class.name)?;
            w.op(Opcode::EndRole);
        }

        w.op(Opcode::EndActor);
        Ok(())
    }

    fn emit_flags(&self, w: &mut StreamWriter, node: NodeId) {
        let flags = self.tree.flags(node);
        if flags != 0 {
            w.flags(flags);
        }
    }

    fn emit_properties(
        &self,
        w: &mut StreamWriter,
        node: NodeId,
        class: &str,
    ) -> Result<(), EmitError> {
        for property in self.tree.properties(node) {
            let qualified = qualified_property(class, &property.name);
            let index = lookup(self.symbols, Namespace::Property, &qualified)?;
            let encoded = encode_value(&property.value, self.config.byte_order, self.config.scalar)
                .map_err(|source| EmitError::Value {
                    property: qualified.clone(),
                    source,
                })?;
            match encoded {
                Encoded::Bytes(bytes) => w.property(index, &bytes),
                Encoded::Asset("") => {
                    return Err(EmitError::EmptyAssetName {
                        property: qualified,
                    });
                }
                Encoded::Asset(asset) => {
                    w.media_ref(index, &AssetRef::pending(asset));
                }
            }
        }
        Ok(())
    }

    /// Declared class of `node` and its index in the kind's namespace.
    fn class(&self, node: NodeId) -> Result<(ClassInfo, u32), EmitError> {
        let kind = self.tree.kind(node);
        let unclassified = || SymbolError::Unclassified {
            kind,
            node: self.tree.name(node).to_string(),
        };
        let namespace = class_namespace(kind).ok_or_else(unclassified)?;
        let info = self
            .resolver
            .resolve(self.tree, node)
            .ok_or_else(unclassified)?;
        let index = lookup(self.symbols, namespace, &info.name)?;
        Ok((info, index))
    }

    fn instance(&self, name: &str) -> Result<u32, EmitError> {
        Ok(lookup(self.symbols, Namespace::Instance, name)?)
    }

    /// Instance index of the set `actor` binds. Instance names are shared
    /// with groups, actors and roles, so the name must belong to a set node.
    fn set_instance(&self, actor: NodeId, name: &str) -> Result<u32, EmitError> {
        let root = self.tree.root();
        let is_set = self
            .tree
            .children_of_kind(root, NodeKind::Set)
            .into_iter()
            .any(|set| self.tree.name(set) == name);
        if !is_set {
            return Err(SymbolError::NotASet {
                actor: self.tree.name(actor).to_string(),
                name: name.to_string(),
            }
            .into());
        }
        self.instance(name)
    }
}
