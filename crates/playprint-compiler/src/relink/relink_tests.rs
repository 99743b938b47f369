use playprint_core::ByteOrder;
use playprint_format::{
    AssetIndex, AssetRef, EntityHeader, Opcode, StreamError, StreamWriter, build_entity_payload,
    decode_stream, parse_entity_payload,
};
use proptest::prelude::*;

use super::{RelinkError, relink_entity, relink_stream};

fn asset_operands(stream: &[u8]) -> Vec<u32> {
    decode_stream(stream, ByteOrder::Big)
        .unwrap()
        .iter()
        .filter(|i| i.opcode == Opcode::CopyMediaRef)
        .filter_map(|i| i.index())
        .collect()
}

fn group_payload(refs: &[&str]) -> Vec<u8> {
    let mut w = StreamWriter::new(ByteOrder::Big);
    w.op_symbol(Opcode::Actor, 0);
    for (prop, name) in refs.iter().enumerate() {
        w.media_ref(prop as u32, &AssetRef::pending(*name));
    }
    w.op(Opcode::EndActor);
    let stream = w.finish();
    let header = EntityHeader {
        class_index: 5,
        count: 1,
    };
    build_entity_payload(header, &stream.bytes, &stream.names, ByteOrder::Big)
}

#[test]
fn single_texture_resolves_to_zero() {
    let payload = group_payload(&["tex1"]);
    let assets: AssetIndex = ["tex1"].into_iter().collect();

    let relinked = relink_entity(&payload, ByteOrder::Big, &assets).unwrap();
    let parsed = parse_entity_payload(&relinked, ByteOrder::Big).unwrap();

    assert_eq!(asset_operands(parsed.stream), vec![0]);
    assert!(parsed.names.is_empty());
    assert_eq!(parsed.name_table_offset as usize, relinked.len());
    assert_eq!(parsed.header.class_index, 5);
    assert_eq!(parsed.header.count, 1);
}

#[test]
fn reference_order_does_not_matter() {
    let payload = group_payload(&["b", "a"]);
    let before = parse_entity_payload(&payload, ByteOrder::Big).unwrap();
    assert_eq!(asset_operands(before.stream), vec![0, 1]);

    let assets: AssetIndex = ["a", "b"].into_iter().collect();
    let relinked = relink_entity(&payload, ByteOrder::Big, &assets).unwrap();
    let after = parse_entity_payload(&relinked, ByteOrder::Big).unwrap();

    assert_eq!(asset_operands(after.stream), vec![1, 0]);
}

#[test]
fn identity_map_reproduces_stream() {
    let payload = group_payload(&["a", "b", "a"]);
    let assets: AssetIndex = ["a", "b"].into_iter().collect();

    let relinked = relink_entity(&payload, ByteOrder::Big, &assets).unwrap();

    let before = parse_entity_payload(&payload, ByteOrder::Big).unwrap();
    let after = parse_entity_payload(&relinked, ByteOrder::Big).unwrap();
    assert_eq!(after.stream, before.stream);
}

#[test]
fn operand_width_can_grow() {
    let payload = group_payload(&["late"]);
    let mut assets = AssetIndex::new();
    for i in 0..200 {
        assets.insert(format!("m{i}"));
    }
    assets.insert("late");

    let relinked = relink_entity(&payload, ByteOrder::Big, &assets).unwrap();
    let after = parse_entity_payload(&relinked, ByteOrder::Big).unwrap();

    assert_eq!(asset_operands(after.stream), vec![200]);
    let before = parse_entity_payload(&payload, ByteOrder::Big).unwrap();
    assert_eq!(after.stream.len(), before.stream.len() + 2);
}

#[test]
fn unresolved_asset_is_recoverable() {
    let payload = group_payload(&["ghost"]);
    let err = relink_entity(&payload, ByteOrder::Big, &AssetIndex::new()).unwrap_err();

    assert_eq!(
        err,
        RelinkError::UnresolvedAsset {
            name: "ghost".to_string()
        }
    );
    assert!(err.is_recoverable());
}

#[test]
fn local_out_of_range() {
    let mut w = StreamWriter::new(ByteOrder::Big);
    w.media_ref(0, &AssetRef::Resolved(3));
    let stream = w.finish();
    let payload = build_entity_payload(EntityHeader::default(), &stream.bytes, &["a"], ByteOrder::Big);
    let assets: AssetIndex = ["a"].into_iter().collect();

    let err = relink_entity(&payload, ByteOrder::Big, &assets).unwrap_err();
    assert_eq!(err, RelinkError::LocalOutOfRange { local: 3, count: 1 });
    assert!(!err.is_recoverable());
}

#[test]
fn unknown_opcode_is_fatal() {
    let err = relink_stream(&[0x83, 0x9E, 0x80], ByteOrder::Big, Ok).unwrap_err();
    assert_eq!(
        err,
        RelinkError::Stream(StreamError::UnknownOpcode {
            byte: 0x9E,
            offset: 1
        })
    );
    assert!(!err.is_recoverable());
}

#[test]
fn missing_terminator_is_fatal() {
    let err = relink_stream(&[0x83, 0x01], ByteOrder::Big, Ok).unwrap_err();
    assert_eq!(err, RelinkError::Stream(StreamError::MissingTerminator));
}

#[test]
fn copy_bytes_that_look_like_opcodes_pass_through() {
    let mut w = StreamWriter::new(ByteOrder::Little);
    w.property(1, &[0x8D, 0x8D, 0x00, 0x7F]);
    w.media_ref(2, &AssetRef::Resolved(0));
    w.flags(0x8D8D_8D8D);
    let stream = w.finish().bytes;

    let relinked = relink_stream(&stream, ByteOrder::Little, |local| Ok(local + 1)).unwrap();

    // SetOffset SetLength Copy(4) SetOffset, then CopyMediaRef at 11 with
    // a zero-byte operand that becomes `01`.
    let mut expected = stream.clone();
    assert_eq!(expected[11], 0x8D);
    expected.insert(12, 0x01);
    assert_eq!(relinked, expected);
}

#[derive(Clone, Debug)]
enum Step {
    Actor(u32),
    Property(u32, Vec<u8>),
    Media(u32, u32),
    Flags(u32),
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![
        any::<u32>().prop_map(Step::Actor),
        (0u32..500, prop::collection::vec(any::<u8>(), 0..10)).prop_map(|(p, v)| Step::Property(p, v)),
        (0u32..500, any::<u32>()).prop_map(|(p, i)| Step::Media(p, i)),
        any::<u32>().prop_map(Step::Flags),
    ]
}

proptest! {
    #[test]
    fn identity_relink_is_byte_exact(steps in prop::collection::vec(step(), 0..30), little in any::<bool>()) {
        let order = if little { ByteOrder::Little } else { ByteOrder::Big };
        let mut w = StreamWriter::new(order);
        for step in &steps {
            match step {
                Step::Actor(c) => {
                    w.op_symbol(Opcode::Actor, *c);
                    w.op(Opcode::EndActor);
                }
                Step::Property(p, v) => w.property(*p, v),
                Step::Media(p, i) => {
                    w.media_ref(*p, &AssetRef::Resolved(*i));
                }
                Step::Flags(f) => w.flags(*f),
            }
        }
        let stream = w.finish().bytes;

        let relinked = relink_stream(&stream, order, Ok).unwrap();
        prop_assert_eq!(relinked, stream);
    }
}
