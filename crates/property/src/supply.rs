//! The device side of the property interface.
//!
//! A [`PowerSupply`] owns its property values and whatever locking they
//! need. The core only calls through this trait.

use std::collections::HashSet;
use std::fmt;
use std::io;

use serde::{Deserialize, Serialize};

use crate::codec::CodecError;
use crate::registry::{PropertyId, Registry};
use crate::tables::EnumTable;
use crate::value::{Value, ValueKind};

/// Kind of power supply. Discriminants are ordinals in [`EnumTable::Type`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[repr(i32)]
pub enum SupplyType {
    #[default]
    Unknown = 0,
    Battery = 1,
    #[serde(rename = "UPS")]
    Ups = 2,
    Mains = 3,
    #[serde(rename = "USB")]
    Usb = 4,
    #[serde(rename = "USB_DCP")]
    UsbDcp = 5,
    #[serde(rename = "USB_CDP")]
    UsbCdp = 6,
    #[serde(rename = "USB_ACA")]
    UsbAca = 7,
    Wireless = 8,
    #[serde(rename = "USB_C")]
    UsbC = 9,
    #[serde(rename = "USB_PD")]
    UsbPd = 10,
    #[serde(rename = "USB_PD_DRP")]
    UsbPdDrp = 11,
    #[serde(rename = "BrickID")]
    BrickId = 12,
}

impl SupplyType {
    const ALL: [SupplyType; 13] = [
        SupplyType::Unknown,
        SupplyType::Battery,
        SupplyType::Ups,
        SupplyType::Mains,
        SupplyType::Usb,
        SupplyType::UsbDcp,
        SupplyType::UsbCdp,
        SupplyType::UsbAca,
        SupplyType::Wireless,
        SupplyType::UsbC,
        SupplyType::UsbPd,
        SupplyType::UsbPdDrp,
        SupplyType::BrickId,
    ];

    pub fn ordinal(self) -> i32 {
        self as i32
    }

    pub fn from_ordinal(ordinal: i32) -> Option<Self> {
        usize::try_from(ordinal)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
    }

    /// Parses the text shown in a `type` attribute.
    pub fn from_label(label: &str) -> Option<Self> {
        EnumTable::Type
            .position(label.trim())
            .and_then(|i| Self::ALL.get(i).copied())
    }

    pub fn label(self) -> &'static str {
        EnumTable::Type.text(self.ordinal()).unwrap_or("Unknown")
    }
}

impl fmt::Display for SupplyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Failure reported by a device getter or setter.
#[derive(Debug, thiserror::Error)]
pub enum DeviceError {
    /// The driver has nothing to report right now.
    #[error("no data available")]
    NoData,

    /// The device is absent, e.g. a removed battery.
    #[error("device not present")]
    NotPresent,

    /// The device is not ready; ask again later.
    #[error("resource temporarily unavailable")]
    Busy,

    #[error("operation not supported")]
    NotSupported,

    #[error("driver returned an unusable value: {0}")]
    InvalidValue(#[source] CodecError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{0}")]
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DescError {
    #[error("property {0} declared more than once")]
    Duplicate(PropertyId),

    #[error("property {0} is not in the registry")]
    UnknownProperty(PropertyId),

    #[error("`{0}` is synthesized from the supply type and cannot be declared")]
    DeviceTypeDeclared(String),
}

/// Immutable registration data of a supply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SupplyDesc {
    name: String,
    supply_type: SupplyType,
    properties: Vec<PropertyId>,
}

impl SupplyDesc {
    /// Validates `properties` against `registry`.
    pub fn new(
        registry: &Registry,
        name: impl Into<String>,
        supply_type: SupplyType,
        properties: impl IntoIterator<Item = PropertyId>,
    ) -> Result<Self, DescError> {
        let properties: Vec<PropertyId> = properties.into_iter().collect();
        let mut seen = HashSet::with_capacity(properties.len());
        for &id in &properties {
            let desc = registry.get(id).ok_or(DescError::UnknownProperty(id))?;
            if desc.kind == ValueKind::DeviceType {
                return Err(DescError::DeviceTypeDeclared(desc.name.clone()));
            }
            if !seen.insert(id) {
                return Err(DescError::Duplicate(id));
            }
        }
        Ok(Self {
            name: name.into(),
            supply_type,
            properties,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn supply_type(&self) -> SupplyType {
        self.supply_type
    }

    /// Declared properties, in declaration order.
    pub fn properties(&self) -> &[PropertyId] {
        &self.properties
    }

    pub fn declares(&self, id: PropertyId) -> bool {
        self.properties.contains(&id)
    }
}

/// A device exposing typed properties.
///
/// Implementations may block on I/O and are responsible for serializing
/// access to their own state.
pub trait PowerSupply {
    fn desc(&self) -> &SupplyDesc;

    fn get_property(&self, id: PropertyId) -> Result<Value, DeviceError>;

    fn set_property(&self, id: PropertyId, value: &Value) -> Result<(), DeviceError> {
        let _ = (id, value);
        Err(DeviceError::NotSupported)
    }

    /// Writability predicate. Supplies without one keep the default and
    /// expose every declared property read-only.
    fn property_is_writeable(&self, id: PropertyId) -> bool {
        let _ = id;
        false
    }
}
