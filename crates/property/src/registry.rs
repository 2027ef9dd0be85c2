//! The catalogue of known properties.
//!
//! A [`Registry`] is built once from the standard descriptor list plus any
//! configured extensions, and is read-only afterwards. Property identifiers
//! are dense indices assigned in registration order; the standard entries
//! always come first, so their identifiers are the same in every registry.

use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::extension::{ExtensionProperty, ExtensionSet};
use crate::tables::EnumTable;
use crate::value::ValueKind;

/// Stable, zero-based property identifier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct PropertyId(u16);

impl PropertyId {
    pub const fn new(index: u16) -> Self {
        PropertyId(index)
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for PropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

macro_rules! standard_properties {
    ($($id:ident: $name:literal => $kind:expr),* $(,)?) => {
        #[allow(non_camel_case_types, dead_code, clippy::upper_case_acronyms)]
        #[repr(u16)]
        enum Slot {
            $($id),*
        }

        impl PropertyId {
            $(pub const $id: PropertyId = PropertyId(Slot::$id as u16);)*
        }

        const STANDARD: &[(&str, ValueKind)] = &[$(($name, $kind)),*];
    };
}

const INT: ValueKind = ValueKind::Int32;

standard_properties! {
    STATUS: "status" => ValueKind::Enum(EnumTable::Status),
    CHARGE_TYPE: "charge_type" => ValueKind::Enum(EnumTable::ChargeType),
    HEALTH: "health" => ValueKind::Enum(EnumTable::Health),
    PRESENT: "present" => INT,
    ONLINE: "online" => INT,
    AUTHENTIC: "authentic" => INT,
    TECHNOLOGY: "technology" => ValueKind::Enum(EnumTable::Technology),
    CYCLE_COUNT: "cycle_count" => INT,
    VOLTAGE_MAX: "voltage_max" => INT,
    VOLTAGE_MIN: "voltage_min" => INT,
    VOLTAGE_MAX_DESIGN: "voltage_max_design" => INT,
    VOLTAGE_MIN_DESIGN: "voltage_min_design" => INT,
    VOLTAGE_NOW: "voltage_now" => INT,
    VOLTAGE_AVG: "voltage_avg" => INT,
    VOLTAGE_OCV: "voltage_ocv" => INT,
    VOLTAGE_BOOT: "voltage_boot" => INT,
    CURRENT_MAX: "current_max" => INT,
    CURRENT_NOW: "current_now" => INT,
    CURRENT_AVG: "current_avg" => INT,
    CURRENT_BOOT: "current_boot" => INT,
    POWER_NOW: "power_now" => INT,
    POWER_AVG: "power_avg" => INT,
    CHARGE_FULL_DESIGN: "charge_full_design" => INT,
    CHARGE_EMPTY_DESIGN: "charge_empty_design" => INT,
    CHARGE_FULL: "charge_full" => INT,
    CHARGE_EMPTY: "charge_empty" => INT,
    CHARGE_NOW: "charge_now" => INT,
    CHARGE_AVG: "charge_avg" => INT,
    CHARGE_COUNTER: "charge_counter" => INT,
    CONSTANT_CHARGE_CURRENT: "constant_charge_current" => INT,
    CONSTANT_CHARGE_CURRENT_MAX: "constant_charge_current_max" => INT,
    CONSTANT_CHARGE_VOLTAGE: "constant_charge_voltage" => INT,
    CONSTANT_CHARGE_VOLTAGE_MAX: "constant_charge_voltage_max" => INT,
    CHARGE_CONTROL_LIMIT: "charge_control_limit" => INT,
    CHARGE_CONTROL_LIMIT_MAX: "charge_control_limit_max" => INT,
    INPUT_CURRENT_LIMIT: "input_current_limit" => INT,
    ENERGY_FULL_DESIGN: "energy_full_design" => INT,
    ENERGY_EMPTY_DESIGN: "energy_empty_design" => INT,
    ENERGY_FULL: "energy_full" => INT,
    ENERGY_EMPTY: "energy_empty" => INT,
    ENERGY_NOW: "energy_now" => INT,
    ENERGY_AVG: "energy_avg" => INT,
    CAPACITY: "capacity" => INT,
    CAPACITY_ALERT_MIN: "capacity_alert_min" => INT,
    CAPACITY_ALERT_MAX: "capacity_alert_max" => INT,
    CAPACITY_LEVEL: "capacity_level" => ValueKind::Enum(EnumTable::CapacityLevel),
    TEMP: "temp" => INT,
    TEMP_MAX: "temp_max" => INT,
    TEMP_MIN: "temp_min" => INT,
    TEMP_ALERT_MIN: "temp_alert_min" => INT,
    TEMP_ALERT_MAX: "temp_alert_max" => INT,
    TEMP_AMBIENT: "temp_ambient" => INT,
    TEMP_AMBIENT_ALERT_MIN: "temp_ambient_alert_min" => INT,
    TEMP_AMBIENT_ALERT_MAX: "temp_ambient_alert_max" => INT,
    TIME_TO_EMPTY_NOW: "time_to_empty_now" => INT,
    TIME_TO_EMPTY_AVG: "time_to_empty_avg" => INT,
    TIME_TO_FULL_NOW: "time_to_full_now" => INT,
    TIME_TO_FULL_AVG: "time_to_full_avg" => INT,
    TYPE: "type" => ValueKind::DeviceType,
    SCOPE: "scope" => ValueKind::Enum(EnumTable::Scope),
    PRECHARGE_CURRENT: "precharge_current" => INT,
    CHARGE_TERM_CURRENT: "charge_term_current" => INT,
    CALIBRATE: "calibrate" => INT,
    USB_HC: "usb_hc" => INT,
    USB_OTG: "usb_otg" => INT,
    CHARGE_ENABLED: "charge_enabled" => INT,
    CHARGE_COUNTER_EXT: "charge_counter_ext" => ValueKind::Int64,
    FLASHLIGHT_TEMP: "flashlight_temp" => INT,
    MODEL_NAME: "model_name" => ValueKind::Text,
    MANUFACTURER: "manufacturer" => ValueKind::Text,
    SERIAL_NUMBER: "serial_number" => ValueKind::Text,
}

/// Static metadata for one property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropertyDescriptor {
    pub id: PropertyId,
    /// Attribute name; uppercased it also forms the uevent key.
    pub name: String,
    pub kind: ValueKind,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("duplicate property name `{0}`")]
    DuplicateName(String),

    #[error("property names must not be empty")]
    EmptyName,

    #[error("invalid property name `{0}`: only ASCII letters, digits and `_` are allowed")]
    InvalidName(String),

    #[error("unknown extension set `{0}`")]
    UnknownExtensionSet(String),

    #[error("registry is full ({0} properties)")]
    TooManyProperties(usize),
}

/// Immutable, ordered catalogue of property descriptors.
#[derive(Debug, Clone)]
pub struct Registry {
    descriptors: Vec<PropertyDescriptor>,
    by_name: HashMap<String, PropertyId>,
}

impl Registry {
    /// The process-wide registry with only the standard properties.
    pub fn standard() -> &'static Registry {
        static STANDARD_REGISTRY: OnceLock<Registry> = OnceLock::new();
        STANDARD_REGISTRY.get_or_init(|| Registry::freeze(standard_entries()))
    }

    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    pub fn get(&self, id: PropertyId) -> Option<&PropertyDescriptor> {
        self.descriptors.get(id.index())
    }

    pub fn lookup(&self, name: &str) -> Option<&PropertyDescriptor> {
        self.by_name.get(name).and_then(|id| self.get(*id))
    }

    pub fn iter(&self) -> impl Iterator<Item = &PropertyDescriptor> {
        self.descriptors.iter()
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Number of standard entries; extension identifiers start here.
    pub fn standard_len() -> usize {
        STANDARD.len()
    }

    fn freeze(entries: Vec<(String, ValueKind)>) -> Registry {
        let descriptors: Vec<PropertyDescriptor> = entries
            .into_iter()
            .enumerate()
            .map(|(index, (name, kind))| PropertyDescriptor {
                id: PropertyId(index as u16),
                name,
                kind,
            })
            .collect();
        let by_name = descriptors
            .iter()
            .map(|d| (d.name.clone(), d.id))
            .collect();
        Registry {
            descriptors,
            by_name,
        }
    }
}

fn standard_entries() -> Vec<(String, ValueKind)> {
    STANDARD
        .iter()
        .map(|(name, kind)| (name.to_string(), *kind))
        .collect()
}

/// Names become attribute file names and uevent keys, so they are limited
/// to `[A-Za-z0-9_]`.
fn is_attribute_name(name: &str) -> bool {
    name.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

/// Collects extension descriptors before the registry is frozen.
#[derive(Debug, Clone)]
pub struct RegistryBuilder {
    entries: Vec<(String, ValueKind)>,
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self {
            entries: standard_entries(),
        }
    }

    pub fn extension_set(mut self, set: ExtensionSet) -> Self {
        self.entries.extend(
            set.properties()
                .iter()
                .map(|name| (name.to_string(), ValueKind::Int32)),
        );
        self
    }

    /// Adds a built-in extension set by its configuration name.
    pub fn named_extension_set(self, name: &str) -> Result<Self, RegistryError> {
        let set = name.parse::<ExtensionSet>()?;
        Ok(self.extension_set(set))
    }

    pub fn extension(mut self, property: &ExtensionProperty) -> Self {
        self.entries
            .push((property.name.clone(), property.kind.into()));
        self
    }

    /// Validates the collected names and freezes the registry.
    pub fn build(self) -> Result<Registry, RegistryError> {
        if self.entries.len() > usize::from(u16::MAX) {
            return Err(RegistryError::TooManyProperties(self.entries.len()));
        }
        let mut seen = HashMap::with_capacity(self.entries.len());
        for (name, _) in &self.entries {
            if name.is_empty() {
                return Err(RegistryError::EmptyName);
            }
            if !is_attribute_name(name) {
                return Err(RegistryError::InvalidName(name.clone()));
            }
            if seen.insert(name.as_str(), ()).is_some() {
                return Err(RegistryError::DuplicateName(name.clone()));
            }
        }
        let registry = Registry::freeze(self.entries);
        tracing::debug!(properties = registry.len(), "property registry built");
        Ok(registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extension::ExtensionKind;

    #[test]
    fn test_standard_registry_is_valid() {
        let built = RegistryBuilder::new().build().unwrap();
        assert_eq!(built.len(), Registry::standard().len());
        assert_eq!(built.len(), Registry::standard_len());
    }

    #[test]
    fn test_ids_are_dense_and_ordered() {
        for (index, desc) in Registry::standard().iter().enumerate() {
            assert_eq!(desc.id.index(), index);
        }
    }

    #[test]
    fn test_constants_match_names() {
        let registry = Registry::standard();
        assert_eq!(registry.get(PropertyId::STATUS).unwrap().name, "status");
        assert_eq!(registry.get(PropertyId::TEMP).unwrap().name, "temp");
        assert_eq!(registry.get(PropertyId::TYPE).unwrap().name, "type");
        assert_eq!(
            registry.get(PropertyId::SERIAL_NUMBER).unwrap().name,
            "serial_number"
        );
        assert_eq!(
            registry.get(PropertyId::CHARGE_COUNTER_EXT).unwrap().kind,
            ValueKind::Int64
        );
    }

    #[test]
    fn test_lookup_by_name() {
        let registry = Registry::standard();
        let desc = registry.lookup("capacity_level").unwrap();
        assert_eq!(desc.id, PropertyId::CAPACITY_LEVEL);
        assert_eq!(desc.kind, ValueKind::Enum(EnumTable::CapacityLevel));
        assert!(registry.lookup("CAPACITY_LEVEL").is_none());
    }

    #[test]
    fn test_only_type_is_device_type() {
        let device_types: Vec<_> = Registry::standard()
            .iter()
            .filter(|d| d.kind == ValueKind::DeviceType)
            .map(|d| d.id)
            .collect();
        assert_eq!(device_types, vec![PropertyId::TYPE]);
    }

    #[test]
    fn test_extensions_append_after_standard() {
        let registry = RegistryBuilder::new()
            .extension_set(ExtensionSet::MtkGauge)
            .extension(&ExtensionProperty {
                name: "cell_imbalance".into(),
                kind: ExtensionKind::Int64,
            })
            .build()
            .unwrap();

        assert_eq!(registry.get(PropertyId::STATUS).unwrap().name, "status");
        let batt_vol = registry.lookup("batt_vol").unwrap();
        assert_eq!(batt_vol.id.index(), Registry::standard_len());
        let custom = registry.lookup("cell_imbalance").unwrap();
        assert_eq!(custom.id.index(), registry.len() - 1);
        assert_eq!(custom.kind, ValueKind::Int64);
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let err = RegistryBuilder::new()
            .extension(&ExtensionProperty {
                name: "temp".into(),
                kind: ExtensionKind::Int,
            })
            .build()
            .unwrap_err();
        assert_eq!(err, RegistryError::DuplicateName("temp".into()));
    }

    #[test]
    fn test_empty_name_rejected() {
        let err = RegistryBuilder::new()
            .extension(&ExtensionProperty {
                name: String::new(),
                kind: ExtensionKind::Int,
            })
            .build()
            .unwrap_err();
        assert_eq!(err, RegistryError::EmptyName);
    }

    #[test]
    fn test_names_outside_attribute_charset_rejected() {
        for name in ["../secret", "a/b", "KEY=1", "two words", "nul\0", "..", "tëmp"] {
            let err = RegistryBuilder::new()
                .extension(&ExtensionProperty {
                    name: name.into(),
                    kind: ExtensionKind::Int,
                })
                .build()
                .unwrap_err();
            assert_eq!(err, RegistryError::InvalidName(name.into()));
        }
    }

    #[test]
    fn test_builtin_names_are_attribute_names() {
        let mut builder = RegistryBuilder::new();
        for set in ExtensionSet::ALL {
            builder = builder.extension_set(set);
        }
        let registry = builder.build().unwrap();
        assert!(registry.iter().all(|d| is_attribute_name(&d.name)));
    }

    #[test]
    fn test_unknown_extension_set() {
        let err = RegistryBuilder::new()
            .named_extension_set("acme")
            .unwrap_err();
        assert_eq!(err, RegistryError::UnknownExtensionSet("acme".into()));
    }
}
