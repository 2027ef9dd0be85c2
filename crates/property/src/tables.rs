//! Display strings for enumerated properties.
//!
//! The ordinal of a value is its position in the table. Tables are fixed at
//! compile time and never reordered; drivers and userspace both depend on
//! the numbering.

use std::fmt;

use serde::{Deserialize, Serialize};

const STATUS_TEXT: &[&str] = &[
    "Unknown",
    "Charging",
    "Discharging",
    "Not charging",
    "Full",
    "Cmd discharging",
];

const CHARGE_TYPE_TEXT: &[&str] = &["Unknown", "N/A", "Trickle", "Fast"];

const HEALTH_TEXT: &[&str] = &[
    "Unknown",
    "Good",
    "Overheat",
    "Dead",
    "Over voltage",
    "Unspecified failure",
    "Cold",
    "Watchdog timer expire",
    "Safety timer expire",
];

const TECHNOLOGY_TEXT: &[&str] = &[
    "Unknown", "NiMH", "Li-ion", "Li-poly", "LiFe", "NiCd", "LiMn",
];

const CAPACITY_LEVEL_TEXT: &[&str] = &["Unknown", "Critical", "Low", "Normal", "High", "Full"];

const TYPE_TEXT: &[&str] = &[
    "Unknown",
    "Battery",
    "UPS",
    "Mains",
    "USB",
    "USB_DCP",
    "USB_CDP",
    "USB_ACA",
    "Wireless",
    "USB_C",
    "USB_PD",
    "USB_PD_DRP",
    "BrickID",
];

const SCOPE_TEXT: &[&str] = &["Unknown", "System", "Device"];

/// Identifies one of the enumerated text tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnumTable {
    Status,
    ChargeType,
    Health,
    Technology,
    CapacityLevel,
    /// Supply type, reported from device metadata rather than the driver.
    Type,
    Scope,
}

impl EnumTable {
    pub const ALL: [EnumTable; 7] = [
        EnumTable::Status,
        EnumTable::ChargeType,
        EnumTable::Health,
        EnumTable::Technology,
        EnumTable::CapacityLevel,
        EnumTable::Type,
        EnumTable::Scope,
    ];

    /// The display strings, indexed by ordinal.
    pub fn entries(self) -> &'static [&'static str] {
        match self {
            EnumTable::Status => STATUS_TEXT,
            EnumTable::ChargeType => CHARGE_TYPE_TEXT,
            EnumTable::Health => HEALTH_TEXT,
            EnumTable::Technology => TECHNOLOGY_TEXT,
            EnumTable::CapacityLevel => CAPACITY_LEVEL_TEXT,
            EnumTable::Type => TYPE_TEXT,
            EnumTable::Scope => SCOPE_TEXT,
        }
    }

    pub fn len(self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(self) -> bool {
        self.entries().is_empty()
    }

    /// Returns the display string for `ordinal`, or `None` when it lies
    /// outside the table.
    pub fn text(self, ordinal: i32) -> Option<&'static str> {
        usize::try_from(ordinal)
            .ok()
            .and_then(|i| self.entries().get(i).copied())
    }

    /// Exact, case-sensitive lookup of a display string.
    pub fn position(self, text: &str) -> Option<usize> {
        self.entries().iter().position(|entry| *entry == text)
    }

    pub fn label(self) -> &'static str {
        match self {
            EnumTable::Status => "status",
            EnumTable::ChargeType => "charge_type",
            EnumTable::Health => "health",
            EnumTable::Technology => "technology",
            EnumTable::CapacityLevel => "capacity_level",
            EnumTable::Type => "type",
            EnumTable::Scope => "scope",
        }
    }
}

impl fmt::Display for EnumTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}
