//! Symbol scan: one walk over the authoring tree fills every namespace.
//!
//! | node kind | class namespace | instance name |
//! |-----------|-----------------|---------------|
//! | scene     | `SceneClass`    | no            |
//! | group     | `GroupClass`    | yes           |
//! | actor     | `ActorClass`    | yes           |
//! | role      | `RoleClass`     | yes           |
//! | set       | `SetClass`      | yes           |
//! | media     | `MediaClass`    | no            |
//!
//! Properties of classified nodes (except media) are interned as
//! `"<class>_<property>"`. Nodes the resolver cannot classify contribute
//! nothing; emitting them fails later with [`SymbolError::Unclassified`].

use playprint_core::symtab::qualified_property;
use playprint_core::{Namespace, SymbolTable};
use tracing::debug;

use crate::workprint::{AuthoringTree, ClassResolver, NodeKind};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SymbolError {
    #[error("{kind} '{node}' has no declared class")]
    Unclassified { kind: NodeKind, node: String },

    #[error("unknown {} '{name}'", .namespace.as_str())]
    Unknown { namespace: Namespace, name: String },

    #[error("actor '{actor}' binds '{name}', which is not a set")]
    NotASet { actor: String, name: String },
}

/// Class namespace for nodes of `kind`, if the kind carries a class.
pub fn class_namespace(kind: NodeKind) -> Option<Namespace> {
    match kind {
        NodeKind::Root => None,
        NodeKind::Scene => Some(Namespace::SceneClass),
        NodeKind::Group => Some(Namespace::GroupClass),
        NodeKind::Actor => Some(Namespace::ActorClass),
        NodeKind::Role => Some(Namespace::RoleClass),
        NodeKind::Set => Some(Namespace::SetClass),
        NodeKind::Media => Some(Namespace::MediaClass),
    }
}

fn has_instance_name(kind: NodeKind) -> bool {
    matches!(
        kind,
        NodeKind::Group | NodeKind::Actor | NodeKind::Role | NodeKind::Set
    )
}

/// Build the run's symbol table from every node below the root.
pub fn scan(tree: &dyn AuthoringTree, resolver: &dyn ClassResolver) -> SymbolTable {
    let mut builder = SymbolTable::builder();
    let mut stack = vec![tree.root()];

    while let Some(node) = stack.pop() {
        stack.extend(tree.children(node).iter().rev().copied());

        let kind = tree.kind(node);
        let Some(namespace) = class_namespace(kind) else {
            continue;
        };
        let Some(class) = resolver.resolve(tree, node) else {
            debug!(kind = %kind, node = tree.name(node), "skipping unclassified node");
            continue;
        };

        if has_instance_name(kind) {
            builder.intern(Namespace::Instance, tree.name(node));
        }
        if kind != NodeKind::Media {
            for property in tree.properties(node) {
                builder.intern(
                    Namespace::Property,
                    qualified_property(&class.name, &property.name),
                );
            }
        }
        builder.intern_class(namespace, class);
    }

    let table = builder.finish();
    debug!(
        properties = table.len(Namespace::Property),
        instances = table.len(Namespace::Instance),
        "symbol table built"
    );
    table
}

/// Index of `name` in `namespace`, or the miss as an error.
pub fn lookup(symbols: &SymbolTable, namespace: Namespace, name: &str) -> Result<u32, SymbolError> {
    symbols
        .index(namespace, name)
        .ok_or_else(|| SymbolError::Unknown {
            namespace,
            name: name.to_string(),
        })
}
