use playprint_core::ByteOrder;

use super::{
    EntityHeader, Opcode, StreamError, StreamWriter, build_entity_payload, build_set_file,
    decode_stream, parse_entity_payload, parse_names, parse_set_payload, strip_set_prefix,
};
use crate::asset::AssetRef;

#[test]
fn entity_payload_layout() {
    let mut w = StreamWriter::new(ByteOrder::Big);
    w.media_ref(1, &AssetRef::pending("tex1"));
    let stream = w.finish();
    let header = EntityHeader {
        class_index: 2,
        count: 1,
    };

    let bytes = build_entity_payload(header, &stream.bytes, &stream.names, ByteOrder::Big);

    assert_eq!(
        bytes,
        vec![
            0, 0, 0, 13, // name table offset
            0, 0, 0, 2, // class
            1, // count
            0x8A, 0x01, 0x8D, 0x80, // stream
            b't', b'e', b'x', b'1', 0,
        ]
    );
}

#[test]
fn entity_payload_roundtrip() {
    let mut w = StreamWriter::new(ByteOrder::Little);
    w.op_symbol(Opcode::Actor, 4);
    w.media_ref(7, &AssetRef::pending("b"));
    w.media_ref(8, &AssetRef::pending("a"));
    w.op(Opcode::EndActor);
    let stream = w.finish();
    let header = EntityHeader {
        class_index: 300,
        count: 0,
    };

    let bytes = build_entity_payload(header, &stream.bytes, &stream.names, ByteOrder::Little);
    let payload = parse_entity_payload(&bytes, ByteOrder::Little).unwrap();

    assert_eq!(payload.header, header);
    assert_eq!(payload.stream_offset, 8);
    assert_eq!(payload.stream, stream.bytes.as_slice());
    assert_eq!(payload.names, vec!["b", "a"]);
    let instrs = payload.instructions(ByteOrder::Little).unwrap();
    assert_eq!(instrs.last().map(|i| i.opcode), Some(Opcode::End));
}

#[test]
fn relinked_payload_has_no_names() {
    let stream = StreamWriter::new(ByteOrder::Big).finish();
    let none: &[&str] = &[];
    let bytes = build_entity_payload(EntityHeader::default(), &stream.bytes, none, ByteOrder::Big);

    let payload = parse_entity_payload(&bytes, ByteOrder::Big).unwrap();
    assert_eq!(payload.name_table_offset as usize, bytes.len());
    assert!(payload.names.is_empty());
}

#[test]
fn chunk_pad_is_not_a_name() {
    assert_eq!(parse_names(b"ab\0\0", 0).unwrap(), vec!["ab"]);
    assert!(parse_names(&[0], 0).unwrap().is_empty());
}

#[test]
fn unterminated_name() {
    let err = parse_names(b"ab\0cd", 10).unwrap_err();
    assert_eq!(err, StreamError::UnterminatedName { offset: 13 });
}

#[test]
fn invalid_utf8_name() {
    let err = parse_names(&[0xFF, 0xFE, 0], 0).unwrap_err();
    assert_eq!(err, StreamError::InvalidName { offset: 0 });
}

#[test]
fn bad_name_table_offset() {
    let mut bytes = build_entity_payload(
        EntityHeader::default(),
        &[0x80],
        &["x"],
        ByteOrder::Big,
    );
    bytes[3] = 200;

    let err = parse_entity_payload(&bytes, ByteOrder::Big).unwrap_err();
    assert!(matches!(err, StreamError::BadNameTableOffset { offset: 200, .. }));
}

#[test]
fn short_payload() {
    let err = parse_entity_payload(&[0, 0, 0], ByteOrder::Big).unwrap_err();
    assert_eq!(err, StreamError::PayloadTooShort { len: 3 });
}

#[test]
fn trailing_bytes_after_end() {
    let err = decode_stream(&[0x80, 0x01, 0x02], ByteOrder::Big).unwrap_err();
    assert_eq!(
        err,
        StreamError::TrailingBytes {
            offset: 1,
            count: 2
        }
    );
    assert!(decode_stream(&[0x80, 0x00], ByteOrder::Big).is_ok());
}

#[test]
fn set_file_roundtrip() {
    let mut w = StreamWriter::new(ByteOrder::Big);
    w.op_symbol(Opcode::Name, 2);
    w.property(1, &[0, 0, 0, 7]);
    let stream = w.finish();

    let file = build_set_file(3, &stream.bytes, ByteOrder::Big);
    assert_eq!(&file[0..4], &(4 + stream.bytes.len() as u32).to_be_bytes());

    let body = strip_set_prefix(&file, ByteOrder::Big).unwrap();
    let set = parse_set_payload(body, ByteOrder::Big).unwrap();
    assert_eq!(set.class_index, 3);
    assert_eq!(set.stream, stream.bytes.as_slice());
    assert_eq!(set.instructions(ByteOrder::Big).unwrap().len(), 5);
}

#[test]
fn set_prefix_mismatch() {
    let mut file = build_set_file(0, &[0x80], ByteOrder::Big);
    file.push(0);

    let err = strip_set_prefix(&file, ByteOrder::Big).unwrap_err();
    assert_eq!(
        err,
        StreamError::BadSetPrefix {
            declared: 5,
            actual: 6
        }
    );
}

#[test]
fn set_rejects_asset_reference() {
    let mut w = StreamWriter::new(ByteOrder::Big);
    w.media_ref(0, &AssetRef::Resolved(0));
    let stream = w.finish();
    let file = build_set_file(0, &stream.bytes, ByteOrder::Big);

    let body = strip_set_prefix(&file, ByteOrder::Big).unwrap();
    let set = parse_set_payload(body, ByteOrder::Big).unwrap();
    assert!(matches!(
        set.instructions(ByteOrder::Big),
        Err(StreamError::AssetInSet { .. })
    ));
}
