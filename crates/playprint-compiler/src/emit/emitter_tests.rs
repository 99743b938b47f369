use indoc::indoc;
use playprint_core::{ByteOrder, Colors, Namespace, ScalarEncoding, SymbolTable};
use playprint_format::{MediaList, Opcode, Tag, dump_entity, parse_entity_payload};

use super::{EmitError, EntityEmitter};
use crate::config::Config;
use crate::symbols::{SymbolError, scan};
use crate::test_utils::{castle, castle_symbols};
use crate::workprint::{AttributeClassResolver, AuthoringTree, NodeKind, Workprint};

fn emit(tree: &Workprint, symbols: &SymbolTable, config: &Config, kind: NodeKind, name: &str) -> Result<Vec<u8>, EmitError> {
    let node = tree.find(kind, name).unwrap();
    EntityEmitter::new(tree, &AttributeClassResolver, symbols, config).emit(node)
}

fn emit_castle(kind: NodeKind, name: &str) -> Vec<u8> {
    emit(&castle(), &castle_symbols(), &Config::new(), kind, name).unwrap()
}

fn single(json: &str) -> (Workprint, SymbolTable) {
    let tree = Workprint::from_json(json).unwrap();
    let symbols = scan(&tree, &AttributeClassResolver);
    (tree, symbols)
}

#[test]
fn group_stream() {
    let bytes = emit_castle(NodeKind::Group, "squad");
    let symbols = castle_symbols();
    let res = dump_entity(&bytes, Tag::GROUP, ByteOrder::Big, Some(&symbols), Colors::OFF).unwrap();

    insta::assert_snapshot!(res, @r#"
    grp  size=47
      class=0 count=1  ; Squad
      0000 Actor 0  ; Knight
      0001 Name 1  ; hero
      0003 Flags 0x00000001
      0008 BindSet 2  ; lamps
      0010 SetOffset 1  ; Knight_hp
      0012 SetLength 4
      0014 Copy 00 00 00 64
      0019 SetOffset 2  ; Knight_skin
      0021 CopyMediaRef $0  ; "tex1"
      0022 Role 0  ; Guard
      0023 Name 0  ; guard
      0024 SetOffset 0  ; Guard_radius
      0025 Copy 00 00 00 02
      0030 EndRole
      0031 EndActor
      0032 End
      $0 = "tex1"
    "#);
}

#[test]
fn group_payload_keeps_name_table() {
    let bytes = emit_castle(NodeKind::Group, "squad");
    let payload = parse_entity_payload(&bytes, ByteOrder::Big).unwrap();
    assert_eq!(payload.name_table_offset, 42);
    assert_eq!(payload.names, vec!["tex1"]);
}

#[test]
fn scene_stream() {
    let bytes = emit_castle(NodeKind::Scene, "hall");
    let symbols = castle_symbols();
    let res = dump_entity(&bytes, Tag::SCENE, ByteOrder::Big, Some(&symbols), Colors::OFF).unwrap();

    insta::assert_snapshot!(res, @r#"
    scn  size=14
      class=0 count=1  ; Hall
      0000 BeginGroup 0  ; Squad
      0001 Name 3  ; squad
      0003 EndGroup
      0004 End
    "#);
}

#[test]
fn set_stream() {
    let bytes = emit_castle(NodeKind::Set, "lamps");
    let symbols = castle_symbols();
    let res = dump_entity(&bytes, Tag::SET, ByteOrder::Big, Some(&symbols), Colors::OFF).unwrap();

    insta::assert_snapshot!(res, @r#"
    set  size=16
      class=0  ; Lighting
      0000 Name 2  ; lamps
      0002 SetOffset 3  ; Lighting_intensity
      0004 SetLength 4
      0006 Copy 00 00 00 03
      0011 End
    "#);
}

#[test]
fn media_list_by_path() {
    let bytes = emit_castle(NodeKind::Media, "tex1");
    let list = MediaList::from_bytes(&bytes, ByteOrder::Big).unwrap();

    assert_eq!(list.media_type, 0);
    assert_eq!(list.references.len(), 1);
    assert_eq!(list.references[0].kind, Tag::new(b"TEXR"));
    assert_eq!(list.references[0].as_path(), Some("tex1.png"));
}

#[test]
fn media_list_embeds_file() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("beep.wav"), [1, 2, 3]).unwrap();
    let (tree, symbols) = single(indoc! {r#"
        {
          "kind": "root", "name": "r",
          "children": [{
            "kind": "media", "name": "beep", "flags": 4,
            "attributes": { "class": "Sound" },
            "media": [{ "kind": "SND", "path": "beep.wav", "embed": true, "flags": 2 }]
          }]
        }
    "#});
    let config = Config::new().asset_root(dir.path());

    let bytes = emit(&tree, &symbols, &config, NodeKind::Media, "beep").unwrap();
    let list = MediaList::from_bytes(&bytes, ByteOrder::Big).unwrap();

    assert_eq!(list.flags, 4);
    assert_eq!(list.references[0].flags, 2);
    assert_eq!(list.references[0].kind, Tag::new(b"SND "));
    assert_eq!(list.references[0].data, vec![1, 2, 3]);
}

#[test]
fn missing_embedded_file_reports_path() {
    let (tree, symbols) = single(indoc! {r#"
        {
          "kind": "root", "name": "r",
          "children": [{
            "kind": "media", "name": "m", "attributes": { "class": "Sound" },
            "media": [{ "kind": "SND", "path": "/nonexistent/beep.wav", "embed": true }]
          }]
        }
    "#});

    let err = emit(&tree, &symbols, &Config::new(), NodeKind::Media, "m").unwrap_err();
    assert!(matches!(err, EmitError::Io { ref path, .. } if path.ends_with("beep.wav")));
    assert!(!err.is_recoverable());
}

#[test]
fn bad_media_kind() {
    let (tree, symbols) = single(indoc! {r#"
        {
          "kind": "root", "name": "r",
          "children": [{
            "kind": "media", "name": "m", "attributes": { "class": "Texture" },
            "media": [{ "kind": "TEXTURE", "path": "a.png" }]
          }]
        }
    "#});

    let err = emit(&tree, &symbols, &Config::new(), NodeKind::Media, "m").unwrap_err();
    assert_eq!(err.to_string(), "media 'm' has invalid kind 'TEXTURE'");
}

#[test]
fn little_endian_values() {
    let config = Config::new().byte_order(ByteOrder::Little);
    let bytes = emit(&castle(), &castle_symbols(), &config, NodeKind::Group, "squad").unwrap();

    let payload = parse_entity_payload(&bytes, ByteOrder::Little).unwrap();
    assert_eq!(&bytes[0..4], &42u32.to_le_bytes());
    // Flags operand, then the `hp` value inside its Copy.
    assert_eq!(&payload.stream[3..8], &[0x89, 1, 0, 0, 0]);
    assert_eq!(&payload.stream[14..19], &[0x8C, 100, 0, 0, 0]);
}

#[test]
fn scalar_encoding_applies() {
    let (tree, symbols) = single(indoc! {r#"
        {
          "kind": "root", "name": "r",
          "children": [{
            "kind": "set", "name": "s", "attributes": { "class": "S" },
            "properties": [{ "name": "speed", "value": { "scalar": 1.5 } }]
          }]
        }
    "#});
    let config = Config::new().scalar(ScalarEncoding::Fixed16);

    let bytes = emit(&tree, &symbols, &config, NodeKind::Set, "s").unwrap();
    assert!(bytes.ends_with(&[0x8C, 0x00, 0x01, 0x80, 0x00, 0x80]));
}

#[test]
fn set_rejects_media_ref() {
    let (tree, symbols) = single(indoc! {r#"
        {
          "kind": "root", "name": "r",
          "children": [{
            "kind": "set", "name": "s", "attributes": { "class": "S" },
            "properties": [{ "name": "icon", "value": { "media_ref": "tex1" } }]
          }]
        }
    "#});

    let err = emit(&tree, &symbols, &Config::new(), NodeKind::Set, "s").unwrap_err();
    assert!(matches!(err, EmitError::MediaRefInSet { ref property, .. } if property == "icon"));
    assert!(!err.is_recoverable());
}

#[test]
fn undeclared_property_is_recoverable_miss() {
    let tree = castle();
    let mut builder = SymbolTable::builder();
    for (ns, _, name) in castle_symbols().iter() {
        if name != "Knight_hp" {
            builder.intern(ns, name);
        }
    }
    let symbols = builder.finish();

    let err = emit(&tree, &symbols, &Config::new(), NodeKind::Group, "squad").unwrap_err();
    assert!(matches!(
        err,
        EmitError::Symbol(SymbolError::Unknown { ref name, .. }) if name == "Knight_hp"
    ));
    assert!(err.is_recoverable());
}

#[test]
fn unclassified_actor() {
    let (tree, symbols) = single(indoc! {r#"
        {
          "kind": "root", "name": "r",
          "children": [{
            "kind": "group", "name": "g", "attributes": { "class": "G" },
            "children": [{ "kind": "actor", "name": "nobody" }]
          }]
        }
    "#});

    let err = emit(&tree, &symbols, &Config::new(), NodeKind::Group, "g").unwrap_err();
    assert_eq!(err.to_string(), "actor 'nobody' has no declared class");
    assert!(err.is_recoverable());
}

#[test]
fn unknown_enum_variant_is_recoverable() {
    let (tree, symbols) = single(indoc! {r#"
        {
          "kind": "root", "name": "r",
          "children": [{
            "kind": "set", "name": "s", "attributes": { "class": "S" },
            "properties": [{
              "name": "mode",
              "value": { "enum": { "variants": ["walk", "run"], "value": "fly" } }
            }]
          }]
        }
    "#});

    let err = emit(&tree, &symbols, &Config::new(), NodeKind::Set, "s").unwrap_err();
    assert_eq!(
        err.to_string(),
        r#"property 'S_mode': 'fly' is not one of ["walk", "run"]"#
    );
    assert!(err.is_recoverable());
}

#[test]
fn empty_asset_name() {
    let (tree, symbols) = single(indoc! {r#"
        {
          "kind": "root", "name": "r",
          "children": [{
            "kind": "group", "name": "g", "attributes": { "class": "G" },
            "children": [{
              "kind": "actor", "name": "a", "attributes": { "class": "A" },
              "properties": [{ "name": "skin", "value": { "media_ref": "" } }]
            }]
          }]
        }
    "#});

    let err = emit(&tree, &symbols, &Config::new(), NodeKind::Group, "g").unwrap_err();
    assert!(matches!(err, EmitError::EmptyAssetName { ref property } if property == "A_skin"));
}

const BINDS_GROUP: &str = indoc! {r#"
    {
      "kind": "root", "name": "r",
      "children": [
        {
          "kind": "group", "name": "g", "attributes": { "class": "G" },
          "children": [{ "kind": "actor", "name": "a", "attributes": { "class": "A", "set": "g" } }]
        },
        { "kind": "set", "name": "s", "attributes": { "class": "S" } }
      ]
    }
"#};

#[test]
fn bind_set_rejects_non_set_instance() {
    let (tree, symbols) = single(BINDS_GROUP);

    let err = emit(&tree, &symbols, &Config::new(), NodeKind::Group, "g").unwrap_err();

    assert_eq!(err.to_string(), "actor 'a' binds 'g', which is not a set");
    assert!(err.is_recoverable());
}

#[test]
fn bind_set_accepts_set_instance() {
    let (tree, symbols) = single(&BINDS_GROUP.replace(r#""set": "g""#, r#""set": "s""#));

    let bytes = emit(&tree, &symbols, &Config::new(), NodeKind::Group, "g").unwrap();
    let payload = parse_entity_payload(&bytes, ByteOrder::Big).unwrap();
    let bound: Vec<_> = payload
        .instructions(ByteOrder::Big)
        .unwrap()
        .iter()
        .filter(|i| i.opcode == Opcode::BindSet)
        .filter_map(|i| i.index())
        .collect();
    assert_eq!(bound, vec![symbols.index(Namespace::Instance, "s").unwrap()]);
}

#[test]
fn root_is_not_an_entity() {
    let tree = castle();
    let symbols = castle_symbols();
    let config = Config::new();
    let err = EntityEmitter::new(&tree, &AttributeClassResolver, &symbols, &config)
        .emit(tree.root())
        .unwrap_err();
    assert!(matches!(err, EmitError::NotAnEntity { kind: NodeKind::Root, .. }));
}
