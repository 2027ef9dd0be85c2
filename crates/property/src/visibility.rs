//! Per-supply exposure of registry entries.

use std::fmt;

use serde::Serialize;

use crate::registry::PropertyDescriptor;
use crate::supply::PowerSupply;
use crate::value::ValueKind;

/// Whether, and how, a property is exposed for a given supply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    Hidden,
    ReadOnly,
    ReadWrite,
}

impl Mode {
    /// Permission bits of the attribute file.
    pub fn permissions(self) -> u32 {
        match self {
            Mode::Hidden => 0,
            Mode::ReadOnly => 0o444,
            Mode::ReadWrite => 0o644,
        }
    }

    /// `ls -l` style rendering of [`Mode::permissions`].
    pub fn symbolic(self) -> &'static str {
        match self {
            Mode::Hidden => "----------",
            Mode::ReadOnly => "-r--r--r--",
            Mode::ReadWrite => "-rw-r--r--",
        }
    }

    pub fn is_visible(self) -> bool {
        self != Mode::Hidden
    }

    pub fn is_writable(self) -> bool {
        self == Mode::ReadWrite
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbolic())
    }
}

/// Decides how `descriptor` is exposed for `supply`.
///
/// The supply type is always readable. Anything else must be declared by the
/// supply, and is writable only when its writability predicate says so.
pub fn resolve<S>(supply: &S, descriptor: &PropertyDescriptor) -> Mode
where
    S: PowerSupply + ?Sized,
{
    if descriptor.kind == ValueKind::DeviceType {
        return Mode::ReadOnly;
    }
    if !supply.desc().declares(descriptor.id) {
        return Mode::Hidden;
    }
    if supply.property_is_writeable(descriptor.id) {
        Mode::ReadWrite
    } else {
        Mode::ReadOnly
    }
}
