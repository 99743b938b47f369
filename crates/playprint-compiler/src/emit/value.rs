//! Property value encoding.
//!
//! Every multi-byte field follows the run's byte order and every scalar the
//! run's scalar encoding. Arrays carry a `u32` element count. Strings are
//! UTF-8 followed by a NUL.

use playprint_core::{ByteOrder, ScalarEncoding};

use crate::workprint::Value;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValueError {
    #[error("'{value}' is not one of {variants:?}")]
    UnknownVariant { value: String, variants: Vec<String> },

    #[error("string contains a NUL byte")]
    InteriorNul,

    #[error("{len} elements do not fit a u32 count")]
    TooLong { len: usize },
}

/// An encoded property value.
#[derive(Debug, Clone, PartialEq)]
pub enum Encoded<'a> {
    /// Bytes for a `Copy` operand.
    Bytes(Vec<u8>),
    /// Asset name for a `CopyMediaRef` operand.
    Asset(&'a str),
}

struct ValueWriter {
    out: Vec<u8>,
    order: ByteOrder,
    scalar: ScalarEncoding,
}

impl ValueWriter {
    fn u32(&mut self, value: u32) {
        self.out.extend_from_slice(&self.order.u32_to_bytes(value));
    }

    fn int(&mut self, value: i32) {
        self.out.extend_from_slice(&self.order.i32_to_bytes(value));
    }

    fn scalars(&mut self, values: &[f32]) {
        for &v in values {
            self.u32(self.scalar.encode(v));
        }
    }

    fn string(&mut self, value: &str) -> Result<(), ValueError> {
        if value.contains('\0') {
            return Err(ValueError::InteriorNul);
        }
        self.out.extend_from_slice(value.as_bytes());
        self.out.push(0);
        Ok(())
    }

    fn count(&mut self, len: usize) -> Result<(), ValueError> {
        let count = u32::try_from(len).map_err(|_| ValueError::TooLong { len })?;
        self.u32(count);
        Ok(())
    }

    fn scalar_rows<const N: usize>(&mut self, rows: &[[f32; N]]) -> Result<(), ValueError> {
        self.count(rows.len())?;
        for row in rows {
            self.scalars(row);
        }
        Ok(())
    }
}

/// Encode `value` for a property write.
pub fn encode_value(
    value: &Value,
    order: ByteOrder,
    scalar: ScalarEncoding,
) -> Result<Encoded<'_>, ValueError> {
    let mut w = ValueWriter {
        out: Vec::new(),
        order,
        scalar,
    };
    match value {
        Value::Int(v) => w.int(*v),
        Value::Scalar(v) => w.scalars(&[*v]),
        Value::Vector2(v) => w.scalars(v),
        Value::Vector3(v) => w.scalars(v),
        Value::Vector4(v) | Value::Rotation(v) => w.scalars(v),
        Value::Transform(rows) => {
            for row in rows {
                w.scalars(row);
            }
        }
        Value::String(s) => w.string(s)?,
        Value::Enum { variants, value } => {
            let pos = variants.iter().position(|v| v == value).ok_or_else(|| {
                ValueError::UnknownVariant {
                    value: value.clone(),
                    variants: variants.clone(),
                }
            })?;
            w.u32(pos as u32);
        }
        Value::IntArray(values) => {
            w.count(values.len())?;
            for &v in values {
                w.int(v);
            }
        }
        Value::ScalarArray(values) => {
            w.count(values.len())?;
            w.scalars(values);
        }
        Value::Vector2Array(rows) => w.scalar_rows(rows)?,
        Value::Vector3Array(rows) => w.scalar_rows(rows)?,
        Value::Vector4Array(rows) => w.scalar_rows(rows)?,
        Value::StringArray(values) => {
            w.count(values.len())?;
            for s in values {
                w.string(s)?;
            }
        }
        Value::MediaRef(name) => return Ok(Encoded::Asset(name)),
    }
    Ok(Encoded::Bytes(w.out))
}
