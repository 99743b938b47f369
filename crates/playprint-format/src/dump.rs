//! Human-readable container dump for debugging.
//!
//! Renders the chunk tree with offsets and sizes, decodes the header, TOC
//! and media lists, and disassembles every entity stream. Indices are
//! annotated with names when a symbol table is supplied.

use std::fmt::Write as _;
use std::io::Cursor;

use playprint_core::{ByteOrder, Colors, Namespace, SymbolTable};

use crate::container::{ChunkInfo, ChunkReader, ContainerError};
use crate::header::{FileHeader, VERSION};
use crate::stream::{
    EntityPayload, Instr, OperandKind, OperandValue, StreamError, parse_entity_payload,
    parse_set_payload, strip_set_prefix,
};
use crate::tag::Tag;

/// Bytes of a `Copy` operand shown before eliding.
const MAX_SHOWN_BYTES: usize = 16;

#[derive(Debug, thiserror::Error)]
pub enum DumpError {
    #[error(transparent)]
    Container(#[from] ContainerError),

    #[error(transparent)]
    Stream(#[from] StreamError),

    #[error("not a playprint container (starts with '{0}')")]
    NotAContainer(Tag),

    #[error("'{0}' is not an entity chunk kind")]
    NotAnEntity(Tag),
}

/// Dump a container or media sub-container.
///
/// A root form declares its own byte order; `order` applies to anything
/// else (defaults to big-endian).
pub fn dump(
    bytes: &[u8],
    order: Option<ByteOrder>,
    symbols: Option<&SymbolTable>,
    colors: Colors,
) -> Result<String, DumpError> {
    let ctx = DumpContext { symbols, colors };
    let mut out = String::new();
    let mut r = ChunkReader::new(Cursor::new(bytes), order.unwrap_or_default());

    let first = Tag(
        bytes
            .get(0..4)
            .and_then(|b| b.try_into().ok())
            .unwrap_or([0; 4]),
    );
    let root = match first {
        Tag::FORM => r.open_root()?,
        Tag::LIST => r.read_header()?,
        other => return Err(DumpError::NotAContainer(other)),
    };
    ctx.dump_form(&mut out, &mut r, &root, 0)?;
    Ok(out)
}

/// Dump a standalone entity source file: a group/scene payload or a set
/// file with its size prefix.
pub fn dump_entity(
    bytes: &[u8],
    kind: Tag,
    order: ByteOrder,
    symbols: Option<&SymbolTable>,
    colors: Colors,
) -> Result<String, DumpError> {
    let ctx = DumpContext { symbols, colors };
    let mut out = String::new();
    match kind {
        Tag::GROUP | Tag::SCENE => {
            writeln!(out, "{} size={}", colors.tag(&kind.to_string()), bytes.len()).unwrap();
            ctx.dump_entity_payload(&mut out, kind, bytes, order, 1)?;
        }
        Tag::SET => {
            let body = strip_set_prefix(bytes, order)?;
            writeln!(out, "{} size={}", colors.tag(&kind.to_string()), body.len()).unwrap();
            ctx.dump_set_payload(&mut out, body, order, 1)?;
        }
        other => return Err(DumpError::NotAnEntity(other)),
    }
    Ok(out)
}

struct DumpContext<'a> {
    symbols: Option<&'a SymbolTable>,
    colors: Colors,
}

fn indent(depth: usize) -> String {
    "  ".repeat(depth)
}

impl DumpContext<'_> {
    fn symbol_comment(&self, namespace: Namespace, index: u32) -> String {
        match self.symbols.and_then(|s| s.name(namespace, index)) {
            Some(name) => format!("  {}; {}{}", self.colors.dim, name, self.colors.reset),
            None => String::new(),
        }
    }

    fn chunk_line(&self, out: &mut String, info: &ChunkInfo, depth: usize) {
        let c = &self.colors;
        let label = match info.subtype {
            Some(sub) => format!("{} {}", info.tag, sub),
            None => info.tag.to_string(),
        };
        writeln!(
            out,
            "{}{} {}",
            indent(depth),
            c.tag(&label),
            c.meta(&format!("@{} size={}", info.offset, info.size))
        )
        .unwrap();
    }

    fn dump_form<R: std::io::Read + std::io::Seek>(
        &self,
        out: &mut String,
        r: &mut ChunkReader<R>,
        form: &ChunkInfo,
        depth: usize,
    ) -> Result<(), DumpError> {
        self.chunk_line(out, form, depth);
        r.seek(form.content_offset())?;
        while let Some(child) = r.next_chunk(form)? {
            if child.tag.is_form() {
                self.dump_form(out, r, &child, depth + 1)?;
            } else {
                self.chunk_line(out, &child, depth + 1);
                self.dump_leaf(out, r, &child, depth + 2)?;
            }
            r.ascend(&child)?;
        }
        Ok(())
    }

    fn dump_leaf<R: std::io::Read + std::io::Seek>(
        &self,
        out: &mut String,
        r: &mut ChunkReader<R>,
        info: &ChunkInfo,
        depth: usize,
    ) -> Result<(), DumpError> {
        let order = r.order();
        let pad = indent(depth);
        match info.tag {
            Tag::HDR => {
                let header = FileHeader::from_bytes(&r.read_body(info)?, order)?;
                let note = if header.validate_version() {
                    String::new()
                } else {
                    format!(
                        "  {}; unsupported, expected {VERSION}{}",
                        self.colors.dim, self.colors.reset
                    )
                };
                writeln!(
                    out,
                    "{pad}version={} timestamp={}{note}",
                    header.version, header.timestamp
                )
                .unwrap();
            }
            Tag::TOC => {
                for (i, entry) in r.read_toc(info)?.iter().enumerate() {
                    writeln!(out, "{pad}[{i}] @{}", entry.offset).unwrap();
                }
            }
            Tag::INFO => {
                let body = r.read_body(info)?;
                let field = |at| order.read_u32(&body, at).unwrap_or(0);
                let media_type = field(4);
                writeln!(
                    out,
                    "{pad}flags={} media_type={} count={}{}",
                    field(0),
                    media_type,
                    field(8),
                    self.symbol_comment(Namespace::MediaClass, media_type)
                )
                .unwrap();
            }
            Tag::MREF => self.dump_mref(out, &r.read_body(info)?, order, &pad)?,
            Tag::GROUP | Tag::SCENE => {
                let body = r.read_body(info)?;
                self.dump_entity_payload(out, info.tag, &body, order, depth)?;
            }
            Tag::SET => {
                let body = r.read_body(info)?;
                self.dump_set_payload(out, &body, order, depth)?;
            }
            _ => {}
        }
        Ok(())
    }

    fn dump_mref(
        &self,
        out: &mut String,
        body: &[u8],
        order: ByteOrder,
        pad: &str,
    ) -> Result<(), DumpError> {
        let malformed = ContainerError::Malformed {
            tag: Tag::MREF,
            reason: "mref body shorter than its fixed fields",
        };
        let (Some(flags), Some(size)) = (order.read_u32(body, 0), order.read_u32(body, 8)) else {
            return Err(malformed.into());
        };
        let kind = Tag([body[4], body[5], body[6], body[7]]);
        let data = body.get(12..12 + size as usize).ok_or(malformed)?;
        let shown = match data.split_last() {
            Some((&0, path)) if !path.contains(&0) => match std::str::from_utf8(path) {
                Ok(path) => self.colors.name(&format!("{path:?}")),
                Err(_) => format!("<{size} bytes>"),
            },
            _ => format!("<{size} bytes>"),
        };
        writeln!(out, "{pad}flags={flags} kind={kind} {shown}").unwrap();
        Ok(())
    }

    fn dump_entity_payload(
        &self,
        out: &mut String,
        kind: Tag,
        bytes: &[u8],
        order: ByteOrder,
        depth: usize,
    ) -> Result<(), DumpError> {
        let payload = parse_entity_payload(bytes, order)?;
        let class_ns = if kind == Tag::SCENE {
            Namespace::SceneClass
        } else {
            Namespace::GroupClass
        };
        let pad = indent(depth);
        writeln!(
            out,
            "{pad}class={} count={}{}",
            payload.header.class_index,
            payload.header.count,
            self.symbol_comment(class_ns, payload.header.class_index)
        )
        .unwrap();
        let instrs = payload.instructions(order)?;
        self.dump_instrs(out, &instrs, Some(&payload), &pad);
        for (i, name) in payload.names.iter().enumerate() {
            writeln!(out, "{pad}${i} = {}", self.colors.name(&format!("{name:?}"))).unwrap();
        }
        Ok(())
    }

    fn dump_set_payload(
        &self,
        out: &mut String,
        bytes: &[u8],
        order: ByteOrder,
        depth: usize,
    ) -> Result<(), DumpError> {
        let set = parse_set_payload(bytes, order)?;
        let pad = indent(depth);
        writeln!(
            out,
            "{pad}class={}{}",
            set.class_index,
            self.symbol_comment(Namespace::SetClass, set.class_index)
        )
        .unwrap();
        let instrs = set.instructions(order)?;
        self.dump_instrs(out, &instrs, None, &pad);
        Ok(())
    }

    fn dump_instrs(
        &self,
        out: &mut String,
        instrs: &[Instr<'_>],
        payload: Option<&EntityPayload<'_>>,
        pad: &str,
    ) {
        let c = &self.colors;
        let local_assets = payload.is_some_and(|p| !p.names.is_empty());
        for instr in instrs {
            let mut line = format!(
                "{pad}{} {}",
                c.meta(&format!("{:04}", instr.offset)),
                c.tag(instr.opcode.name())
            );
            let mut comment = String::new();
            for operand in &instr.operands {
                match (operand.kind, operand.value) {
                    (OperandKind::Symbol(ns), OperandValue::Index(i)) => {
                        write!(line, " {i}").unwrap();
                        comment = self.symbol_comment(ns, i);
                    }
                    (OperandKind::Asset, OperandValue::Index(i)) if local_assets => {
                        write!(line, " ${i}").unwrap();
                        let name = payload.and_then(|p| p.names.get(i as usize));
                        if let Some(name) = name {
                            comment = format!("  {}; {:?}{}", c.dim, name, c.reset);
                        }
                    }
                    (OperandKind::Asset, OperandValue::Index(i)) => write!(line, " #{i}").unwrap(),
                    (_, OperandValue::Index(i)) => write!(line, " {i}").unwrap(),
                    (_, OperandValue::Word(w)) => write!(line, " 0x{w:08x}").unwrap(),
                    (_, OperandValue::Bytes(b)) => line.push_str(&hex_bytes(b)),
                }
            }
            writeln!(out, "{line}{comment}").unwrap();
        }
    }
}

fn hex_bytes(bytes: &[u8]) -> String {
    let mut s = String::new();
    for b in bytes.iter().take(MAX_SHOWN_BYTES) {
        write!(s, " {b:02x}").unwrap();
    }
    if bytes.len() > MAX_SHOWN_BYTES {
        write!(s, " .. ({} bytes)", bytes.len()).unwrap();
    }
    s
}
