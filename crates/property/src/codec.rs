//! Conversion between typed values and their attribute text.

use std::fmt::{self, Write};
use std::str::FromStr;

use crate::tables::EnumTable;
use crate::value::{Value, ValueKind};

/// Upper bound on the rendered text of a single attribute, terminator included.
pub const PAGE_SIZE: usize = 4096;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    #[error("invalid integer: {0:?}")]
    InvalidInteger(String),

    #[error("text properties cannot be stored")]
    TextNotWritable,

    #[error("{value} value does not fit a {kind} property")]
    KindMismatch {
        kind: ValueKind,
        value: &'static str,
    },
}

/// Renders `value` with a single trailing newline.
pub fn encode(kind: ValueKind, value: &Value) -> Result<String, CodecError> {
    let mut buf = String::new();
    encode_into(kind, value, &mut buf)?;
    Ok(buf)
}

/// Appends the rendering of `value` to `buf`.
///
/// Enum ordinals outside their table are rendered as plain decimals.
pub fn encode_into(kind: ValueKind, value: &Value, buf: &mut String) -> Result<(), CodecError> {
    match (kind, value) {
        (ValueKind::Int32, Value::Int(v)) => push_line(buf, v),
        (ValueKind::Int64, Value::Int64(v)) => push_line(buf, v),
        (ValueKind::Enum(table), Value::Ordinal(ordinal)) => push_ordinal(buf, table, *ordinal),
        (ValueKind::DeviceType, Value::Ordinal(ordinal)) => {
            push_ordinal(buf, EnumTable::Type, *ordinal)
        }
        (ValueKind::Text, Value::Text(text)) => {
            buf.push_str(truncate(text, PAGE_SIZE - 1));
            buf.push('\n');
        }
        (kind, value) => {
            return Err(CodecError::KindMismatch {
                kind,
                value: value.variant_name(),
            })
        }
    }
    Ok(())
}

/// Parses attribute text into a value of the given kind.
///
/// Enumerated kinds first try an exact match against their table, then fall
/// back to a decimal ordinal. The fallback is not range checked, so a stored
/// value may later render as a bare number.
pub fn decode(kind: ValueKind, text: &str) -> Result<Value, CodecError> {
    let text = text.trim();
    match kind {
        ValueKind::Int32 => parse(text).map(Value::Int),
        ValueKind::Int64 => parse(text).map(Value::Int64),
        ValueKind::Enum(table) => decode_ordinal(table, text),
        ValueKind::DeviceType => decode_ordinal(EnumTable::Type, text),
        ValueKind::Text => Err(CodecError::TextNotWritable),
    }
}

fn decode_ordinal(table: EnumTable, text: &str) -> Result<Value, CodecError> {
    if let Some(position) = table.position(text) {
        return Ok(Value::Ordinal(position as i32));
    }
    parse(text).map(Value::Ordinal)
}

fn parse<T: FromStr>(text: &str) -> Result<T, CodecError> {
    text.parse()
        .map_err(|_| CodecError::InvalidInteger(text.to_string()))
}

fn push_ordinal(buf: &mut String, table: EnumTable, ordinal: i32) {
    match table.text(ordinal) {
        Some(text) => {
            buf.push_str(text);
            buf.push('\n');
        }
        None => push_line(buf, &ordinal),
    }
}

fn push_line(buf: &mut String, value: &dyn fmt::Display) {
    // Writing into a String cannot fail.
    let _ = writeln!(buf, "{value}");
}

fn truncate(text: &str, max: usize) -> &str {
    if text.len() <= max {
        return text;
    }
    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}
