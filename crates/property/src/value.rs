//! Value kinds and typed property values.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::tables::EnumTable;

/// How a property's value is represented and rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "table")]
pub enum ValueKind {
    Int32,
    Int64,
    /// Ordinal into the given text table.
    Enum(EnumTable),
    Text,
    /// The supply type. Taken from device metadata, never from the driver,
    /// and rendered through [`EnumTable::Type`].
    DeviceType,
}

impl ValueKind {
    /// The text table used to render this kind, if it is enumerated.
    pub fn table(self) -> Option<EnumTable> {
        match self {
            ValueKind::Enum(table) => Some(table),
            ValueKind::DeviceType => Some(EnumTable::Type),
            ValueKind::Int32 | ValueKind::Int64 | ValueKind::Text => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ValueKind::Int32 => "int",
            ValueKind::Int64 => "int64",
            ValueKind::Enum(_) => "enum",
            ValueKind::Text => "text",
            ValueKind::DeviceType => "type",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueKind::Enum(table) => write!(f, "enum({table})"),
            other => write!(f, "{}", other.label()),
        }
    }
}

/// A typed property value as exchanged with a device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Int(i32),
    Int64(i64),
    /// Enum ordinal. Not guaranteed to lie inside its table.
    Ordinal(i32),
    Text(String),
}

impl Value {
    pub fn variant_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::Int64(_) => "int64",
            Value::Ordinal(_) => "ordinal",
            Value::Text(_) => "text",
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(v) | Value::Ordinal(v) => Some(i64::from(*v)),
            Value::Int64(v) => Some(*v),
            Value::Text(_) => None,
        }
    }
}
