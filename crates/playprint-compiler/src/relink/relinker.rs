use playprint_core::ByteOrder;
use playprint_format::{
    AssetIndex, AssetRef, OperandKind, OperandValue, build_entity_payload, decode_stream,
    parse_entity_payload, write_index,
};
use tracing::debug;

use super::RelinkError;

/// Initial output capacity; `Vec` doubles it as needed.
const INITIAL_CAPACITY: usize = 64;

/// Copy `stream`, passing every asset operand through `resolve`.
///
/// The stream must be complete: it is fully decoded with the shared opcode
/// table before anything is written, so an unknown opcode or a truncated
/// operand fails the whole call.
pub fn relink_stream<F>(stream: &[u8], order: ByteOrder, mut resolve: F) -> Result<Vec<u8>, RelinkError>
where
    F: FnMut(u32) -> Result<u32, RelinkError>,
{
    let instrs = decode_stream(stream, order)?;
    let mut out = Vec::with_capacity(INITIAL_CAPACITY);

    for instr in &instrs {
        let end = instr.offset + instr.bytes.len();
        let mut copied = instr.offset;
        for operand in &instr.operands {
            if let (OperandKind::Asset, OperandValue::Index(local)) = (operand.kind, operand.value) {
                out.extend_from_slice(&stream[copied..operand.range.start]);
                write_index(&mut out, resolve(local)?);
                copied = operand.range.end;
            }
        }
        out.extend_from_slice(&stream[copied..end]);
    }
    Ok(out)
}

/// Relink a group/scene payload against the container's asset index.
///
/// The result keeps the payload's class and count, carries the relinked
/// stream, and has no name table.
pub fn relink_entity(
    payload: &[u8],
    order: ByteOrder,
    assets: &AssetIndex,
) -> Result<Vec<u8>, RelinkError> {
    let parsed = parse_entity_payload(payload, order)?;
    let names = &parsed.names;
    let mut rewritten = 0usize;

    let stream = relink_stream(parsed.stream, order, |local| {
        let name = names
            .get(local as usize)
            .ok_or(RelinkError::LocalOutOfRange {
                local,
                count: names.len(),
            })?;
        let reference = AssetRef::pending(*name);
        let global = reference
            .resolve(assets)
            .ok_or_else(|| RelinkError::UnresolvedAsset {
                name: name.to_string(),
            })?;
        rewritten += 1;
        Ok(global)
    })?;

    debug!(
        rewritten,
        names = names.len(),
        bytes = stream.len(),
        "relinked payload"
    );
    let none: &[&str] = &[];
    Ok(build_entity_payload(parsed.header, &stream, none, order))
}
