use std::io::Cursor;

use indoc::indoc;
use playprint_core::{ByteOrder, Namespace, SymbolTable};
use playprint_format::{ChunkReader, Opcode, Tag, parse_entity_payload};

use crate::assemble::{ChunkKind, Manifest};
use crate::compile::{MANIFEST_FILE, SYMBOLS_FILE, compile_workprint};
use crate::config::{Config, MissingPolicy};
use crate::emit::EmitError;
use crate::symbols::SymbolError;
use crate::test_utils::castle;
use crate::workprint::{
    AttributeClassResolver, AuthoringTree, MediaSource, NodeId, NodeKind, Property, Workprint,
    WorkprintError,
};
use crate::Error;

const UNCLASSIFIED_ACTOR: &str = indoc! {r#"
    {
      "kind": "root",
      "name": "r",
      "children": [
        {
          "kind": "group",
          "name": "broken",
          "attributes": { "class": "Squad" },
          "children": [{ "kind": "actor", "name": "nobody" }]
        },
        {
          "kind": "set",
          "name": "fine",
          "attributes": { "class": "Lighting" }
        }
      ]
    }
"#};

#[test]
fn castle_emits_every_entity() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::new().output_dir(dir.path()).timestamp(1);

    let report = compile_workprint(&castle(), &AttributeClassResolver, &config).unwrap();

    let files: Vec<_> = report
        .manifest
        .chunks
        .iter()
        .map(|c| (c.kind, c.source.to_str().unwrap().to_string()))
        .collect();
    assert_eq!(
        files,
        vec![
            (ChunkKind::Media, "tex1.mrfl".to_string()),
            (ChunkKind::Set, "lamps.set".to_string()),
            (ChunkKind::Group, "squad.grp".to_string()),
            (ChunkKind::Scene, "hall.scn".to_string()),
        ]
    );
    for (_, file) in &files {
        assert!(dir.path().join(file).is_file(), "{file} missing");
    }
    assert!(report.skipped.is_empty());
    assert_eq!(report.manifest_path, dir.path().join(MANIFEST_FILE));
}

#[test]
fn symbols_file_roundtrips() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::new().output_dir(dir.path());

    let report = compile_workprint(&castle(), &AttributeClassResolver, &config).unwrap();

    let json = std::fs::read_to_string(dir.path().join(SYMBOLS_FILE)).unwrap();
    let table = SymbolTable::from_json(&json).unwrap();
    assert_eq!(table, report.symbols);
    assert_eq!(table.index(Namespace::Instance, "hero"), Some(1));
}

#[test]
fn manifest_is_portable() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::new()
        .output_dir(dir.path())
        .byte_order(ByteOrder::Little)
        .timestamp(5);

    compile_workprint(&castle(), &AttributeClassResolver, &config).unwrap();

    let json = std::fs::read_to_string(dir.path().join(MANIFEST_FILE)).unwrap();
    let manifest = Manifest::from_json(&json).unwrap();
    assert_eq!(manifest.config, Config::new().byte_order(ByteOrder::Little).timestamp(5));
    assert!(manifest.output.is_relative());
}

#[test]
fn compile_then_assemble() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::new().output_dir(dir.path()).timestamp(1);
    let report = compile_workprint(&castle(), &AttributeClassResolver, &config).unwrap();

    let (assembler, output) = Manifest::load(&report.manifest_path)
        .unwrap()
        .into_assembler()
        .unwrap();
    let assembled = assembler.finalize(&output).unwrap();
    assert_eq!(assembled.output, dir.path().join("playprint.ppr"));
    assert_eq!(assembled.written.len(), 4);

    let bytes = std::fs::read(&assembled.output).unwrap();
    let mut r = ChunkReader::new(Cursor::new(bytes.as_slice()), ByteOrder::Big);
    let root = r.open_root().unwrap();
    let toc_info = r.find(&root, Tag::TOC).unwrap().unwrap();
    let toc = r.read_toc(&toc_info).unwrap();

    r.seek(u64::from(toc[2].offset)).unwrap();
    let grp = r.descend(Tag::GROUP).unwrap();
    let body = r.read_body(&grp).unwrap();
    let payload = parse_entity_payload(&body, ByteOrder::Big).unwrap();
    let assets: Vec<u32> = payload
        .instructions(ByteOrder::Big)
        .unwrap()
        .iter()
        .filter(|i| i.opcode == Opcode::CopyMediaRef)
        .filter_map(|i| i.index())
        .collect();
    assert_eq!(assets, vec![0]);
    assert!(payload.names.is_empty());
}

#[test]
fn unclassified_actor_aborts() {
    let dir = tempfile::tempdir().unwrap();
    let tree = Workprint::from_json(UNCLASSIFIED_ACTOR).unwrap();
    let config = Config::new().output_dir(dir.path());

    let err = compile_workprint(&tree, &AttributeClassResolver, &config).unwrap_err();
    assert!(matches!(
        err,
        Error::Emit(EmitError::Symbol(SymbolError::Unclassified { .. }))
    ));
    assert!(!dir.path().join(MANIFEST_FILE).exists());
}

#[test]
fn unclassified_actor_is_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let tree = Workprint::from_json(UNCLASSIFIED_ACTOR).unwrap();
    let config = Config::new()
        .output_dir(dir.path())
        .on_missing(MissingPolicy::Skip);

    let report = compile_workprint(&tree, &AttributeClassResolver, &config).unwrap();

    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].name, "broken");
    assert_eq!(report.skipped[0].reason, "actor 'nobody' has no declared class");
    let names: Vec<_> = report.manifest.chunks.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["fine"]);
    assert!(!dir.path().join("broken.grp").exists());
}

/// Root with flat entity children and no validation of its own.
struct FlatTree {
    nodes: Vec<(NodeKind, &'static str)>,
    children: Vec<NodeId>,
}

impl FlatTree {
    fn new(entities: &[(NodeKind, &'static str)]) -> Self {
        let mut nodes = vec![(NodeKind::Root, "r")];
        nodes.extend_from_slice(entities);
        let children = (1..nodes.len() as u32).map(NodeId).collect();
        Self { nodes, children }
    }
}

impl AuthoringTree for FlatTree {
    fn root(&self) -> NodeId {
        NodeId(0)
    }

    fn kind(&self, node: NodeId) -> NodeKind {
        self.nodes[node.index()].0
    }

    fn name(&self, node: NodeId) -> &str {
        self.nodes[node.index()].1
    }

    fn children(&self, node: NodeId) -> &[NodeId] {
        if node.index() == 0 { &self.children } else { &[] }
    }

    fn attribute(&self, _node: NodeId, key: &str) -> Option<&str> {
        (key == "class").then_some("Squad")
    }

    fn flags(&self, _node: NodeId) -> u32 {
        0
    }

    fn properties(&self, _node: NodeId) -> &[Property] {
        &[]
    }

    fn media_references(&self, _node: NodeId) -> &[MediaSource] {
        &[]
    }
}

#[test]
fn repeated_entity_name_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let tree = FlatTree::new(&[(NodeKind::Group, "squad"), (NodeKind::Group, "squad")]);
    let config = Config::new().output_dir(dir.path());

    let err = compile_workprint(&tree, &AttributeClassResolver, &config).unwrap_err();

    assert!(matches!(
        &err,
        Error::Workprint(WorkprintError::DuplicateName { kind: NodeKind::Group, name }) if name == "squad"
    ));
    assert!(!dir.path().join("squad.grp").exists());
    assert!(!dir.path().join(MANIFEST_FILE).exists());
}

#[test]
fn escaping_entity_name_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out");
    let tree = FlatTree::new(&[(NodeKind::Group, "../escaped")]);
    let config = Config::new().output_dir(&out);

    let err = compile_workprint(&tree, &AttributeClassResolver, &config).unwrap_err();

    assert_eq!(err.to_string(), "group name '../escaped' is not a plain file name");
    assert!(!dir.path().join("escaped.grp").exists());
}
